//! Polling, change detection, and view-state reconciliation.
//!
//! # Design
//! - Views configure a [`group::PollGroup`] of [`resource::Resource`]s instead
//!   of hand-writing fetch/diff/state code.
//! - Everything here is DOM-free; the browser supplies a
//!   [`session::Scheduler`] backed by its timers and task queue.

pub mod batch;
pub mod detect;
pub mod group;
pub mod manual;
pub mod resource;
pub mod session;
pub mod state;

pub use batch::{Aggregation, BatchError, BatchOutcome, fetch_all, fetch_each};
pub use detect::{ChangeDetector, JsonDeepEq, Overwrite, SerializedEq, StructuralEq, deep_equal};
pub use group::{PollGroup, PollGroupBuilder};
pub use manual::ManualScheduler;
pub use resource::{Acceptance, FetchFuture, Pollable, Resource, Staged};
pub use session::{
    Cadence, OverlapPolicy, PollSession, Scheduler, SessionConfig, SessionToken, Tick,
    TimerGuard, Trigger,
};
pub use state::{Phase, Subscription, TickReport, ViewError, ViewState, ViewStore, settle_tick};
