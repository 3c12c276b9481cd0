//! Docker page: containers, live stats, images, and image pulls.

pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
