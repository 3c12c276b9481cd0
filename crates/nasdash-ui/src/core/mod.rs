//! DOM-free building blocks shared by the views.
//!
//! # Design
//! - Everything here compiles and is tested natively; wasm-only code lives in
//!   `app`, `components`, `services`, and the feature `view` modules.

pub mod action;
pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod poll;
pub mod store;
