//! I/O page: per-disk and host-wide read/write counters.
//!
//! # Design
//! - Both endpoints are fetched as one batch; a failure of either leaves the
//!   page on its previous snapshot so the two tables never disagree.

pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
