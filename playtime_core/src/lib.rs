// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core accumulator, parser, and watch state machine for playlist duration
//! summaries.
//!
//! `playtime_core` computes the remaining duration of a playlist that a host
//! page renders incrementally. Item durations may not be on the page yet when
//! a summary starts; they are discovered as the page fills them in. The crate
//! is `no_std` compatible (with `alloc`) and talks to the page only through
//! the [`PageHost`](host::PageHost) trait.
//!
//! # Architecture
//!
//! ```text
//!   navigation signal
//!       │
//!       ▼
//!   Controller::trigger() ──► select_pending() ──► per item:
//!                                                     │
//!                      ┌── label on page ─────────────┤
//!                      │                              └── no label
//!                      ▼                                      │
//!   parse_duration() ──► PlaylistTime::accumulate()    DurationWatcher
//!                                │                            │
//!                                ▼                            │ (insertion batch)
//!                         Renderer::render() ◄────────────────┘
//! ```
//!
//! **[`time`]**: `PlaylistTime` accumulator with carry normalization.
//!
//! **[`parse`]**: Lenient `MM:SS` / `H:MM:SS` label parsing.
//!
//! **[`select`]**: Which items still count, from the active one onward.
//!
//! **[`watch`]**: One-shot duration discovery over subtree insertions.
//!
//! **[`render`]**: Idempotent `HH:MM:SS` summary node maintenance.
//!
//! **[`controller`]**: The cycle state machine tying it all together.
//!
//! **[`host`]**: The [`PageHost`](host::PageHost) contract implemented by
//! page backends.
//!
//! **[`config`]**: Selectors, element names, and the stale-watch policy.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! cycle instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod controller;
pub mod host;
pub mod parse;
pub mod render;
pub mod select;
pub mod time;
pub mod trace;
pub mod watch;

pub use config::{Config, StaleWatchPolicy};
pub use controller::{Controller, CycleReport, Phase, TriggerOutcome};
pub use host::{HostError, PageHost};
pub use time::{DurationParts, PlaylistTime};
