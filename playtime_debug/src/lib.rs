// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and JSON export for playtime diagnostics.
//!
//! This crate provides [`TraceSink`](playtime_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`json::export`]: writes recorded bytes as a JSON array of event
//!   objects.

pub mod json;
pub mod pretty;
pub mod recorder;

use playtime_core::DurationParts;

/// Formats raw parts as `HH:MM:SS` without normalizing them.
pub(crate) fn hms(parts: DurationParts) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        parts.hours, parts.minutes, parts.seconds
    )
}
