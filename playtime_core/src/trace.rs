// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for summary cycles.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Controller`](crate::controller::Controller) calls as a cycle progresses.
//! All method bodies default to no-ops, so implementing only the events you
//! care about is fine.
//!
//! [`Tracer`] wraps an optional boxed `TraceSink`. When the `trace` feature is
//! **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use alloc::boxed::Box;

use crate::render::RenderOutcome;
use crate::time::DurationParts;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Where an item stands once its cycle has looked at it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemState {
    /// The label was already rendered and has been summed.
    Resolved,
    /// No label yet; a watch is armed on the item.
    Pending,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a trigger starts a new cycle, after item selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleStartEvent {
    /// Cycle number, starting at 1.
    pub cycle: u64,
    /// Number of items on the page.
    pub items: u32,
    /// Number of items from the active one to the end.
    pub pending: u32,
}

/// Emitted when a trigger arrives outside a playlist context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContextSkipEvent {
    /// Number of the most recent cycle, unchanged by the skip.
    pub cycle: u64,
}

/// Emitted once per pending item during a cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemEvent {
    /// Cycle that looked at the item.
    pub cycle: u64,
    /// Zero-based position of the item in the full list.
    pub position: u32,
    /// Whether the item was summed immediately or is being watched.
    pub state: ItemState,
}

/// Emitted when a watch finds its label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WatchResolvedEvent {
    /// Cycle that armed the watch.
    pub armed_cycle: u64,
    /// Cycle current at resolution.
    pub current_cycle: u64,
    /// Zero-based position of the item in the list it was armed from.
    pub position: u32,
    /// Whether the duration was added to the total.
    pub applied: bool,
}

impl WatchResolvedEvent {
    /// Returns `true` if the watch outlived the cycle that armed it.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.armed_cycle != self.current_cycle
    }
}

/// Emitted after a duration is added to the total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccumulateEvent {
    /// Cycle current when the duration was added.
    pub cycle: u64,
    /// The raw duration that was added.
    pub added: DurationParts,
    /// The normalized total afterwards.
    pub total: DurationParts,
}

/// Emitted after each successful render attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderEvent {
    /// Cycle current at render time.
    pub cycle: u64,
    /// What the renderer did.
    pub outcome: RenderOutcome,
    /// The total that was rendered.
    pub total: DurationParts,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the controller.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a cycle starts.
    fn on_cycle_start(&mut self, e: &CycleStartEvent) {
        _ = e;
    }

    /// Called when a trigger is ignored because the page is not a playlist.
    fn on_context_skip(&mut self, e: &ContextSkipEvent) {
        _ = e;
    }

    /// Called for each pending item of a cycle.
    fn on_item(&mut self, e: &ItemEvent) {
        _ = e;
    }

    /// Called when a watch resolves.
    fn on_watch_resolved(&mut self, e: &WatchResolvedEvent) {
        _ = e;
    }

    /// Called after a duration is accumulated.
    fn on_accumulate(&mut self, e: &AccumulateEvent) {
        _ = e;
    }

    /// Called after a render attempt that did not fail.
    fn on_render(&mut self, e: &RenderEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional owned [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing and
/// [`Tracer::new`] drops the sink. When **on**, each method checks the inner
/// `Option` (one branch) before dispatching to the sink.
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::none()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {}
        }
    }

    /// Removes and returns the sink, leaving the tracer silent.
    #[inline]
    pub fn take_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        #[cfg(feature = "trace")]
        {
            self.sink.take()
        }
        #[cfg(not(feature = "trace"))]
        {
            None
        }
    }

    /// Emits a [`CycleStartEvent`].
    #[inline]
    pub fn cycle_start(&mut self, e: &CycleStartEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_cycle_start(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ContextSkipEvent`].
    #[inline]
    pub fn context_skip(&mut self, e: &ContextSkipEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_context_skip(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`ItemEvent`].
    #[inline]
    pub fn item(&mut self, e: &ItemEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_item(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`WatchResolvedEvent`].
    #[inline]
    pub fn watch_resolved(&mut self, e: &WatchResolvedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_watch_resolved(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AccumulateEvent`].
    #[inline]
    pub fn accumulate(&mut self, e: &AccumulateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_accumulate(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RenderEvent`].
    #[inline]
    pub fn render(&mut self, e: &RenderEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_render(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_resolved(armed: u64, current: u64) -> WatchResolvedEvent {
        WatchResolvedEvent {
            armed_cycle: armed,
            current_cycle: current,
            position: 3,
            applied: true,
        }
    }

    #[test]
    fn stale_watch_detection() {
        assert!(!sample_resolved(2, 2).is_stale());
        assert!(sample_resolved(1, 2).is_stale());
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_cycle_start(&CycleStartEvent {
            cycle: 1,
            items: 4,
            pending: 3,
        });
        sink.on_watch_resolved(&sample_resolved(1, 1));
        sink.on_render(&RenderEvent {
            cycle: 1,
            outcome: RenderOutcome::NoContainer,
            total: DurationParts::ZERO,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.context_skip(&ContextSkipEvent { cycle: 0 });
        tracer.watch_resolved(&sample_resolved(1, 1));
        assert!(tracer.take_sink().is_none());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::rc::Rc;
        use alloc::vec::Vec;
        use core::cell::RefCell;

        struct RecordingSink {
            cycles: Rc<RefCell<Vec<u64>>>,
        }
        impl TraceSink for RecordingSink {
            fn on_cycle_start(&mut self, e: &CycleStartEvent) {
                self.cycles.borrow_mut().push(e.cycle);
            }
        }

        let cycles = Rc::new(RefCell::new(Vec::new()));
        let mut tracer = Tracer::new(Box::new(RecordingSink {
            cycles: Rc::clone(&cycles),
        }));
        tracer.cycle_start(&CycleStartEvent {
            cycle: 42,
            items: 0,
            pending: 0,
        });
        assert_eq!(*cycles.borrow(), [42]);
        assert!(tracer.take_sink().is_some());
    }
}
