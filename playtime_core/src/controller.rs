// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The summary cycle state machine.
//!
//! A [`Controller`] owns the running total and drives one *cycle* per
//! [`trigger`](Controller::trigger):
//!
//! ```text
//!   trigger ──► not a playlist? ──► Idle (nothing happens)
//!      │
//!      ▼
//!   Computing: reset total, render 00:00:00, select pending items
//!      │
//!      ├── label present ──► accumulate + render        (item Resolved)
//!      └── label missing ──► arm DurationWatcher         (item Pending)
//!                               │
//!                               ▼  (later, from the host's event loop)
//!                            accumulate + render         (item Resolved)
//! ```
//!
//! Triggers may arrive while watches from an earlier cycle are still armed.
//! Those watches keep running; [`StaleWatchPolicy`] decides whether their
//! late durations still count.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use core::fmt;

use crate::config::{Config, StaleWatchPolicy};
use crate::host::PageHost;
use crate::parse::parse_duration;
use crate::render::{RenderOutcome, Renderer};
use crate::select::{ActiveHint, select_pending};
use crate::time::PlaylistTime;
use crate::trace::{
    AccumulateEvent, ContextSkipEvent, CycleStartEvent, ItemEvent, ItemState, RenderEvent,
    TraceSink, Tracer, WatchResolvedEvent,
};
use crate::watch::DurationWatcher;

/// Where the controller is in its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No cycle is running and no watch of the current cycle is armed.
    Idle,
    /// A trigger is being processed.
    Computing,
    /// The current cycle is waiting on this many armed watches.
    Awaiting(usize),
}

/// Counts describing one completed [`trigger`](Controller::trigger).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Cycle number, starting at 1.
    pub cycle: u64,
    /// Items found on the page.
    pub items: usize,
    /// Items from the active one to the end.
    pub pending: usize,
    /// Pending items whose label was already rendered and parsed.
    pub summed: usize,
    /// Pending items now being watched.
    pub armed: usize,
}

/// What a call to [`Controller::trigger`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The page is not showing a playlist; nothing changed.
    NotPlaylist,
    /// A new cycle ran.
    Computed(CycleReport),
}

#[derive(Debug, Default)]
struct State {
    total: PlaylistTime,
    cycle: u64,
    computing: bool,
    /// Armed watches belonging to the current cycle.
    outstanding: usize,
    /// Armed watches from any cycle.
    live: usize,
}

struct Shared<H> {
    host: H,
    config: Config,
    renderer: Renderer,
    state: RefCell<State>,
    tracer: RefCell<Tracer>,
}

/// Computes and renders the remaining duration of a playlist.
///
/// Cloning is cheap and yields a handle to the same state, which is how the
/// controller is shared with navigation listeners.
pub struct Controller<H: PageHost + 'static> {
    shared: Rc<Shared<H>>,
}

impl<H: PageHost + 'static> Clone for Controller<H> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<H: PageHost + 'static> fmt::Debug for Controller<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("Controller")
            .field("cycle", &state.cycle)
            .field("total", &state.total)
            .field("outstanding", &state.outstanding)
            .field("live", &state.live)
            .finish_non_exhaustive()
    }
}

impl<H: PageHost + 'static> Controller<H> {
    /// Creates an idle controller over `host`.
    #[must_use]
    pub fn new(host: H, config: Config) -> Self {
        Self {
            shared: Rc::new(Shared {
                renderer: Renderer::new(&config),
                host,
                config,
                state: RefCell::new(State::default()),
                tracer: RefCell::new(Tracer::none()),
            }),
        }
    }

    /// Routes trace events to `sink` from now on.
    pub fn set_trace_sink(&self, sink: Box<dyn TraceSink>) {
        *self.shared.tracer.borrow_mut() = Tracer::new(sink);
    }

    /// Stops tracing and returns the previous sink, if any.
    pub fn take_trace_sink(&self) -> Option<Box<dyn TraceSink>> {
        self.shared.tracer.borrow_mut().take_sink()
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.shared.host
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    /// Returns the current total.
    #[must_use]
    pub fn total(&self) -> PlaylistTime {
        self.shared.state.borrow().total
    }

    /// Returns the number of the most recent cycle, or 0 before the first.
    #[must_use]
    pub fn cycle(&self) -> u64 {
        self.shared.state.borrow().cycle
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        let state = self.shared.state.borrow();
        if state.computing {
            Phase::Computing
        } else if state.outstanding > 0 {
            Phase::Awaiting(state.outstanding)
        } else {
            Phase::Idle
        }
    }

    /// Returns the number of armed watches across all cycles.
    #[must_use]
    pub fn pending_watches(&self) -> usize {
        self.shared.state.borrow().live
    }

    /// Starts a new cycle if the page is showing a playlist.
    ///
    /// The total is reset and rendered as `00:00:00` before any item is
    /// summed. Items whose label is already on the page are summed right
    /// away; the rest are watched and summed when their label appears.
    pub fn trigger(&self) -> TriggerOutcome {
        let shared = &self.shared;
        let query = shared.host.query();
        if !query.is_playlist() {
            let cycle = shared.state.borrow().cycle;
            log::debug!("not a playlist page; skipping duration summary");
            shared
                .tracer
                .borrow_mut()
                .context_skip(&ContextSkipEvent { cycle });
            return TriggerOutcome::NotPlaylist;
        }

        log::info!("Calculating playlist duration...");
        let cycle = {
            let mut state = shared.state.borrow_mut();
            state.cycle += 1;
            state.total.reset();
            state.computing = true;
            state.outstanding = 0;
            state.cycle
        };
        shared.render();

        let config = &shared.config;
        let items = shared.host.items(config.items);
        let hint = ActiveHint::from_query(query.index.as_deref());
        let pending = select_pending(&items, hint, |item| {
            shared.host.has_attribute(item, config.active_attribute)
        });
        let start = items.len() - pending.len();

        let mut report = CycleReport {
            cycle,
            items: items.len(),
            pending: pending.len(),
            ..CycleReport::default()
        };
        shared.tracer.borrow_mut().cycle_start(&CycleStartEvent {
            cycle,
            items: saturating_u32(items.len()),
            pending: saturating_u32(pending.len()),
        });
        log::debug!(
            "cycle {cycle}: {} of {} items pending",
            pending.len(),
            items.len()
        );

        for (offset, item) in pending.iter().enumerate() {
            let position = start + offset;
            let state = match shared.host.label_text(item, config.label) {
                Some(text) => {
                    if shared.accumulate_label(&text) {
                        report.summed += 1;
                    }
                    ItemState::Resolved
                }
                None => {
                    if !arm_watch(shared, cycle, position, item) {
                        continue;
                    }
                    report.armed += 1;
                    ItemState::Pending
                }
            };
            shared.tracer.borrow_mut().item(&ItemEvent {
                cycle,
                position: saturating_u32(position),
                state,
            });
        }

        shared.state.borrow_mut().computing = false;
        TriggerOutcome::Computed(report)
    }
}

impl<H: PageHost + 'static> Shared<H> {
    /// Parses `text` and adds it to the total. Returns `false` for
    /// non-duration text.
    fn accumulate_label(&self, text: &str) -> bool {
        let Some(parts) = parse_duration(text) else {
            log::debug!("ignoring non-duration label {text:?}");
            return false;
        };
        let (cycle, total) = {
            let mut state = self.state.borrow_mut();
            state.total.accumulate(parts);
            (state.cycle, state.total)
        };
        self.tracer.borrow_mut().accumulate(&AccumulateEvent {
            cycle,
            added: parts,
            total: total.parts(),
        });
        self.render();
        true
    }

    fn render(&self) {
        let (cycle, total) = {
            let state = self.state.borrow();
            (state.cycle, state.total)
        };
        match self.renderer.render(&self.host, &total) {
            Ok(outcome) => {
                if outcome == RenderOutcome::NoContainer {
                    log::debug!("summary container not on the page yet");
                }
                self.tracer.borrow_mut().render(&RenderEvent {
                    cycle,
                    outcome,
                    total: total.parts(),
                });
            }
            Err(err) => log::warn!("failed to render playlist duration: {err}"),
        }
    }

    fn resolve_watch(&self, armed_cycle: u64, position: usize, text: &str) {
        let (current_cycle, discard) = {
            let mut state = self.state.borrow_mut();
            state.live = state.live.saturating_sub(1);
            if state.cycle == armed_cycle {
                state.outstanding = state.outstanding.saturating_sub(1);
            }
            let stale = state.cycle != armed_cycle;
            (
                state.cycle,
                stale && self.config.stale_watches == StaleWatchPolicy::Discard,
            )
        };

        let applied = if discard {
            log::debug!("discarding label {text:?} from cycle {armed_cycle}");
            false
        } else {
            self.accumulate_label(text)
        };
        self.tracer
            .borrow_mut()
            .watch_resolved(&WatchResolvedEvent {
                armed_cycle,
                current_cycle,
                position: saturating_u32(position),
                applied,
            });
    }
}

/// Arms a watch on `item`. Returns `false` if the host refused.
fn arm_watch<H: PageHost + 'static>(
    shared: &Rc<Shared<H>>,
    cycle: u64,
    position: usize,
    item: &H::Item,
) -> bool {
    let weak: Weak<Shared<H>> = Rc::downgrade(shared);
    let watcher = DurationWatcher::new(shared.config.label_tag, move |text: &str| {
        if let Some(shared) = weak.upgrade() {
            shared.resolve_watch(cycle, position, text);
        }
    });

    {
        let mut state = shared.state.borrow_mut();
        state.outstanding += 1;
        state.live += 1;
    }
    match shared.host.watch_insertions(item, watcher.into_handler()) {
        Ok(id) => {
            log::trace!("cycle {cycle}: watching item {position} as {id:?}");
            true
        }
        Err(err) => {
            let mut state = shared.state.borrow_mut();
            state.outstanding = state.outstanding.saturating_sub(1);
            state.live = state.live.saturating_sub(1);
            log::warn!("cannot watch item {position} for its duration: {err}");
            false
        }
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
