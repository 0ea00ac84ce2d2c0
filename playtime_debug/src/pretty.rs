// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use playtime_core::render::RenderOutcome;
use playtime_core::trace::{
    AccumulateEvent, ContextSkipEvent, CycleStartEvent, ItemEvent, ItemState, RenderEvent,
    TraceSink, WatchResolvedEvent,
};

use crate::hms;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn outcome_name(outcome: RenderOutcome) -> &'static str {
    match outcome {
        RenderOutcome::NoContainer => "no-container",
        RenderOutcome::Created => "created",
        RenderOutcome::Updated => "updated",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_cycle_start(&mut self, e: &CycleStartEvent) {
        let _ = writeln!(
            self.writer,
            "[cycle] cycle={} items={} pending={}",
            e.cycle, e.items, e.pending,
        );
    }

    fn on_context_skip(&mut self, e: &ContextSkipEvent) {
        let _ = writeln!(self.writer, "[skip] cycle={} not a playlist", e.cycle);
    }

    fn on_item(&mut self, e: &ItemEvent) {
        let state = match e.state {
            ItemState::Resolved => "resolved",
            ItemState::Pending => "watching",
        };
        let _ = writeln!(
            self.writer,
            "[item] cycle={} position={} {state}",
            e.cycle, e.position,
        );
    }

    fn on_watch_resolved(&mut self, e: &WatchResolvedEvent) {
        let stale = if e.is_stale() { " STALE" } else { "" };
        let applied = if e.applied { "applied" } else { "discarded" };
        let _ = writeln!(
            self.writer,
            "[watch] armed={} current={} position={} {applied}{stale}",
            e.armed_cycle, e.current_cycle, e.position,
        );
    }

    fn on_accumulate(&mut self, e: &AccumulateEvent) {
        let _ = writeln!(
            self.writer,
            "[add] cycle={} +{} total={}",
            e.cycle,
            hms(e.added),
            hms(e.total),
        );
    }

    fn on_render(&mut self, e: &RenderEvent) {
        let _ = writeln!(
            self.writer,
            "[render] cycle={} {} total={}",
            e.cycle,
            outcome_name(e.outcome),
            hms(e.total),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playtime_core::DurationParts;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn pretty_print_accumulate() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_accumulate(&AccumulateEvent {
            cycle: 2,
            added: DurationParts::new(0, 2, 15),
            total: DurationParts::new(1, 31, 45),
        });
        let output = output(sink);
        assert_eq!(output, "[add] cycle=2 +00:02:15 total=01:31:45\n");
    }

    #[test]
    fn pretty_print_stale_watch() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_watch_resolved(&WatchResolvedEvent {
            armed_cycle: 1,
            current_cycle: 2,
            position: 4,
            applied: false,
        });
        let output = output(sink);
        assert!(output.contains("discarded STALE"), "got: {output}");
        assert!(output.contains("position=4"), "got: {output}");
    }

    #[test]
    fn pretty_print_render() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_render(&RenderEvent {
            cycle: 1,
            outcome: RenderOutcome::NoContainer,
            total: DurationParts::ZERO,
        });
        let output = output(sink);
        assert!(output.starts_with("[render]"), "got: {output}");
        assert!(output.contains("no-container"), "got: {output}");
    }
}
