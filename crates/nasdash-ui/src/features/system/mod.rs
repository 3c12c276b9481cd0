//! System page: CPU breakdown, memory and swap, disk usage per mount.

pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
