#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Logging setup shared across the dashboard workspace.
//!
//! The UI installs one `tracing` subscriber at boot; in the browser the
//! formatted lines are forwarded to the developer console.

mod console;
mod init;

pub use console::{ConsoleMakeWriter, ConsoleWriter};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, active_directive, init_logging};
