//! Feature slices, one per page.
//!
//! # Design
//! - `state` modules are DOM-free: resources, selectors, validation, and
//!   mutations over [`crate::core::backend::Backend`].
//! - `view` modules render with Yew and only exist on wasm.

pub mod alarm;
pub mod dashboard;
pub mod docker;
pub mod io;
pub mod login;
pub mod network;
pub mod system;
pub mod users;
