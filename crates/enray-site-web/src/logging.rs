//! `tracing` output for the browser console.
//!
//! Each formatted event is buffered and written with the console method that
//! matches its level, so warnings and errors stand out in developer tools.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;

use enray_site_core::logging::targets;

/// Makes a [`ConsoleWriter`] per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

/// Buffers one formatted event and flushes it to the console on drop.
#[derive(Debug)]
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
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
        if self.buffer.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.buffer);
        let message = wasm_bindgen::JsValue::from_str(text.trim_end());
        match self.level {
            Level::ERROR => web_sys::console::error_1(&message),
            Level::WARN => web_sys::console::warn_1(&message),
            Level::INFO => web_sys::console::info_1(&message),
            _ => web_sys::console::debug_1(&message),
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buffer: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buffer: Vec::new(),
        }
    }
}

/// Install the console subscriber.
///
/// Timer and signal chatter stays off; everything else logs at `level`.
/// Installing twice is a no-op.
pub fn init(level: LevelFilter) {
    let filter = Targets::new()
        .with_default(level)
        .with_target(targets::TIMER, LevelFilter::OFF)
        .with_target(targets::SIGNAL, LevelFilter::OFF);

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(ConsoleMakeWriter)
        .with_ansi(false)
        .without_time()
        .with_level(false);

    if tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!(target: targets::WEB, "subscriber already installed");
    }
}

/// Default level: debug builds log component state changes.
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}
