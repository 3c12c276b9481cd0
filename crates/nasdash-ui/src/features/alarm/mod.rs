//! Alarm page: records, rules, and observed client addresses under tabs.
//!
//! # Design
//! - Only the active tab's list is polled, together with the statistics
//!   summary; switching tabs restarts the session.
//! - Each tab keeps its own view state so returning to a tab does not flash a
//!   loading placeholder over data already shown.

pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
