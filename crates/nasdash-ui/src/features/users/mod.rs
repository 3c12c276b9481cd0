//! User management: list accounts, create, edit, and delete them.

pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
