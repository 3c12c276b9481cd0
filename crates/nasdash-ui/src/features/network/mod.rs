//! Network page: traffic counters and the interface table.

pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod view;
