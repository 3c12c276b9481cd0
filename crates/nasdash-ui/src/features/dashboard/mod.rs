//! Overview page: host identity, CPU, memory, and traffic on one screen.
//!
//! # Design
//! - Four independent resources polled best-effort; one failing endpoint
//!   leaves the others on screen.

pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
