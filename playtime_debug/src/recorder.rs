// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].

use playtime_core::DurationParts;
use playtime_core::render::RenderOutcome;
use playtime_core::trace::{
    AccumulateEvent, ContextSkipEvent, CycleStartEvent, ItemEvent, ItemState, RenderEvent,
    TraceSink, WatchResolvedEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_CYCLE_START: u8 = 1;
const TAG_CONTEXT_SKIP: u8 = 2;
const TAG_ITEM: u8 = 3;
const TAG_WATCH_RESOLVED: u8 = 4;
const TAG_ACCUMULATE: u8 = 5;
const TAG_RENDER: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_parts(&mut self, p: DurationParts) {
        self.write_u64(p.hours);
        self.write_u64(p.minutes);
        self.write_u64(p.seconds);
    }

    fn write_state(&mut self, s: ItemState) {
        self.write_u8(match s {
            ItemState::Resolved => 0,
            ItemState::Pending => 1,
        });
    }

    fn write_outcome(&mut self, o: RenderOutcome) {
        self.write_u8(match o {
            RenderOutcome::NoContainer => 0,
            RenderOutcome::Created => 1,
            RenderOutcome::Updated => 2,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_cycle_start(&mut self, e: &CycleStartEvent) {
        self.write_u8(TAG_CYCLE_START);
        self.write_u64(e.cycle);
        self.write_u32(e.items);
        self.write_u32(e.pending);
    }

    fn on_context_skip(&mut self, e: &ContextSkipEvent) {
        self.write_u8(TAG_CONTEXT_SKIP);
        self.write_u64(e.cycle);
    }

    fn on_item(&mut self, e: &ItemEvent) {
        self.write_u8(TAG_ITEM);
        self.write_u64(e.cycle);
        self.write_u32(e.position);
        self.write_state(e.state);
    }

    fn on_watch_resolved(&mut self, e: &WatchResolvedEvent) {
        self.write_u8(TAG_WATCH_RESOLVED);
        self.write_u64(e.armed_cycle);
        self.write_u64(e.current_cycle);
        self.write_u32(e.position);
        self.write_u8(u8::from(e.applied));
    }

    fn on_accumulate(&mut self, e: &AccumulateEvent) {
        self.write_u8(TAG_ACCUMULATE);
        self.write_u64(e.cycle);
        self.write_parts(e.added);
        self.write_parts(e.total);
    }

    fn on_render(&mut self, e: &RenderEvent) {
        self.write_u8(TAG_RENDER);
        self.write_u64(e.cycle);
        self.write_outcome(e.outcome);
        self.write_parts(e.total);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`CycleStartEvent`].
    CycleStart(CycleStartEvent),
    /// A [`ContextSkipEvent`].
    ContextSkip(ContextSkipEvent),
    /// An [`ItemEvent`].
    Item(ItemEvent),
    /// A [`WatchResolvedEvent`].
    WatchResolved(WatchResolvedEvent),
    /// An [`AccumulateEvent`].
    Accumulate(AccumulateEvent),
    /// A [`RenderEvent`].
    Render(RenderEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
///
/// Stops at the first unknown tag or truncated record.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let end = self.pos.checked_add(N)?;
        let bytes = self.data.get(self.pos..end)?.try_into().ok()?;
        self.pos = end;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_parts(&mut self) -> Option<DurationParts> {
        Some(DurationParts::new(
            self.read_u64()?,
            self.read_u64()?,
            self.read_u64()?,
        ))
    }

    fn read_state(&mut self) -> Option<ItemState> {
        Some(match self.read_u8()? {
            0 => ItemState::Resolved,
            _ => ItemState::Pending,
        })
    }

    fn read_outcome(&mut self) -> Option<RenderOutcome> {
        Some(match self.read_u8()? {
            0 => RenderOutcome::NoContainer,
            1 => RenderOutcome::Created,
            _ => RenderOutcome::Updated,
        })
    }

    fn decode_cycle_start(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::CycleStart(CycleStartEvent {
            cycle: self.read_u64()?,
            items: self.read_u32()?,
            pending: self.read_u32()?,
        }))
    }

    fn decode_context_skip(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ContextSkip(ContextSkipEvent {
            cycle: self.read_u64()?,
        }))
    }

    fn decode_item(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Item(ItemEvent {
            cycle: self.read_u64()?,
            position: self.read_u32()?,
            state: self.read_state()?,
        }))
    }

    fn decode_watch_resolved(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::WatchResolved(WatchResolvedEvent {
            armed_cycle: self.read_u64()?,
            current_cycle: self.read_u64()?,
            position: self.read_u32()?,
            applied: self.read_u8()? != 0,
        }))
    }

    fn decode_accumulate(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Accumulate(AccumulateEvent {
            cycle: self.read_u64()?,
            added: self.read_parts()?,
            total: self.read_parts()?,
        }))
    }

    fn decode_render(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Render(RenderEvent {
            cycle: self.read_u64()?,
            outcome: self.read_outcome()?,
            total: self.read_parts()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_CYCLE_START => self.decode_cycle_start(),
            TAG_CONTEXT_SKIP => self.decode_context_skip(),
            TAG_ITEM => self.decode_item(),
            TAG_WATCH_RESOLVED => self.decode_watch_resolved(),
            TAG_ACCUMULATE => self.decode_accumulate(),
            TAG_RENDER => self.decode_render(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
