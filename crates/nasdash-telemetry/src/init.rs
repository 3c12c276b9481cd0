//! Subscriber installation.
//!
//! # Design
//! - One entry point; callers pick a level directive and an output format.
//! - Browser builds have no wall clock, so events carry no timestamps.
//! - Installing twice is an error the caller may ignore.

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::console::ConsoleMakeWriter;

/// Directive used when the configured one does not parse.
pub const DEFAULT_LOG_LEVEL: &str = "info";

static ACTIVE_DIRECTIVE: OnceCell<String> = OnceCell::new();

/// How events are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Plain text lines.
    Pretty,
}

impl LogFormat {
    /// Pretty in debug builds, JSON in release builds.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }

    /// Parse `json`/`pretty`, case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" | "text" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Logging options for [`init_logging`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `nasdash_ui::core::poll=debug`.
    pub directive: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directive: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::infer(),
        }
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = filter_for(&config.directive);
    let directive = filter.to_string();
    let layer = fmt::layer()
        .with_target(true)
        .without_time()
        .with_writer(ConsoleMakeWriter::default());
    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Pretty => registry.with(layer.with_ansi(false)).try_init(),
    }
    .context("tracing subscriber already installed")?;
    let _ = ACTIVE_DIRECTIVE.set(directive);
    Ok(())
}

/// Filter directive of the installed subscriber, if any.
#[must_use]
pub fn active_directive() -> Option<&'static str> {
    ACTIVE_DIRECTIVE.get().map(String::as_str)
}

fn filter_for(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}
