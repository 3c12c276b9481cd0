//! `MakeWriter` that forwards formatted events to the browser console.
//!
//! Each event is buffered and emitted as one console call when the writer is
//! dropped, using the console method that matches the event level. Native
//! builds write the same lines to stderr.

use std::io::{self, Write};

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Writer factory installed by [`crate::init_logging`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter {
    _private: (),
}

/// Buffered writer for a single formatted event.
#[derive(Debug)]
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    const fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if let Some(line) = finish_line(&self.buffer) {
            emit(self.level, line);
        }
    }
}

/// Decode the buffered bytes and strip the trailing newline.
fn finish_line(buffer: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(buffer);
    let trimmed = text.trim_end_matches(['\n', '\r']);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: String) {
    match level {
        Level::ERROR => gloo::console::error!(line),
        Level::WARN => gloo::console::warn!(line),
        Level::DEBUG | Level::TRACE => gloo::console::debug!(line),
        Level::INFO => gloo::console::log!(line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: String) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{line}");
}
