// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recorded events.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes them as a JSON array, one object per event. Every object has an
//! `"event"` name and a `"cycle"`; durations are written both as `HH:MM:SS`
//! text and as total seconds.

use std::io::{self, Write};

use serde_json::{Value, json};

use playtime_core::DurationParts;

use crate::hms;
use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a pretty-printed JSON array.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes).map(|e| event_json(&e)).collect();
    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn duration_json(parts: DurationParts) -> Value {
    json!({
        "text": hms(parts),
        "seconds": parts.total_seconds(),
    })
}

fn event_json(recorded: &RecordedEvent) -> Value {
    match recorded {
        RecordedEvent::CycleStart(e) => json!({
            "event": "CycleStart",
            "cycle": e.cycle,
            "items": e.items,
            "pending": e.pending,
        }),
        RecordedEvent::ContextSkip(e) => json!({
            "event": "ContextSkip",
            "cycle": e.cycle,
        }),
        RecordedEvent::Item(e) => json!({
            "event": "Item",
            "cycle": e.cycle,
            "position": e.position,
            "state": format!("{:?}", e.state),
        }),
        RecordedEvent::WatchResolved(e) => json!({
            "event": "WatchResolved",
            "cycle": e.current_cycle,
            "armed_cycle": e.armed_cycle,
            "position": e.position,
            "applied": e.applied,
            "stale": e.is_stale(),
        }),
        RecordedEvent::Accumulate(e) => json!({
            "event": "Accumulate",
            "cycle": e.cycle,
            "added": duration_json(e.added),
            "total": duration_json(e.total),
        }),
        RecordedEvent::Render(e) => json!({
            "event": "Render",
            "cycle": e.cycle,
            "outcome": format!("{:?}", e.outcome),
            "total": duration_json(e.total),
        }),
    }
}
