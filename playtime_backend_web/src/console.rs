// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`log`] backend writing to the browser console.

use alloc::format;
use alloc::string::String;
use core::fmt;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use wasm_bindgen::JsValue;
use web_sys::console;

/// Writes log records to `console.*`, one call per record.
///
/// Errors and warnings go to `console.error` and `console.warn`; info goes to
/// `console.log`; debug and trace go to `console.debug`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Installs [`ConsoleLogger`] as the global logger with `level` as the
/// maximum level.
///
/// Fails if another logger is already installed.
pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConsoleMethod {
    Error,
    Warn,
    Log,
    Debug,
}

fn console_method(level: Level) -> ConsoleMethod {
    match level {
        Level::Error => ConsoleMethod::Error,
        Level::Warn => ConsoleMethod::Warn,
        Level::Info => ConsoleMethod::Log,
        Level::Debug | Level::Trace => ConsoleMethod::Debug,
    }
}

fn format_line(level: Level, target: &str, args: &fmt::Arguments<'_>) -> String {
    // Info lines are user-facing and stay bare.
    if level == Level::Info {
        format!("{args}")
    } else {
        format!("[{target}] {args}")
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record.level(), record.target(), record.args());
        let value = JsValue::from_str(&line);
        match console_method(record.level()) {
            ConsoleMethod::Error => console::error_1(&value),
            ConsoleMethod::Warn => console::warn_1(&value),
            ConsoleMethod::Log => console::log_1(&value),
            ConsoleMethod::Debug => console::debug_1(&value),
        }
    }

    fn flush(&self) {}
}
