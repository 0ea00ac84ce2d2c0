// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory page host for driving playtime controllers without a browser.
//!
//! - [`FakePage`] implements [`PageHost`](playtime_core::PageHost) over a
//!   flat element tree. Insertions are queued and delivered to observers on
//!   [`flush`](FakePage::flush), so asynchronous label discovery can be
//!   stepped deterministically.
//! - [`PlaylistFixture`] builds pages shaped like the live playlist panel.

#![no_std]

extern crate alloc;

mod fixture;
mod page;
mod selector;

pub use fixture::{FixtureItem, PlaylistFixture};
pub use page::{FakePage, NodeId};

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::string::ToString as _;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use playtime_core::trace::{
        AccumulateEvent, ItemEvent, ItemState, RenderEvent, TraceSink, WatchResolvedEvent,
    };
    use playtime_core::{
        Config, Controller, DurationParts, Phase, StaleWatchPolicy, TriggerOutcome,
    };

    use super::*;

    #[derive(Default)]
    struct Events {
        renders: Vec<RenderEvent>,
        accumulates: Vec<AccumulateEvent>,
        items: Vec<ItemEvent>,
        resolved: Vec<WatchResolvedEvent>,
    }

    struct SharedSink(Rc<RefCell<Events>>);

    impl TraceSink for SharedSink {
        fn on_render(&mut self, e: &RenderEvent) {
            self.0.borrow_mut().renders.push(*e);
        }
        fn on_accumulate(&mut self, e: &AccumulateEvent) {
            self.0.borrow_mut().accumulates.push(*e);
        }
        fn on_item(&mut self, e: &ItemEvent) {
            self.0.borrow_mut().items.push(*e);
        }
        fn on_watch_resolved(&mut self, e: &WatchResolvedEvent) {
            self.0.borrow_mut().resolved.push(*e);
        }
    }

    fn setup(config: Config) -> (PlaylistFixture, Controller<FakePage>, Rc<RefCell<Events>>) {
        let fx = PlaylistFixture::new(config);
        fx.add_container();
        let controller = Controller::new(fx.page().clone(), config);
        let events = Rc::new(RefCell::new(Events::default()));
        controller.set_trace_sink(Box::new(SharedSink(Rc::clone(&events))));
        (fx, controller, events)
    }

    fn summary_text(fx: &PlaylistFixture) -> Option<alloc::string::String> {
        let nodes = fx.page().all_by_id(fx.config().summary_id);
        assert!(nodes.len() <= 1, "summary node must be unique");
        nodes.first().map(|&n| fx.page().text_content(n))
    }

    fn computed(outcome: TriggerOutcome) -> playtime_core::CycleReport {
        match outcome {
            TriggerOutcome::Computed(report) => report,
            TriggerOutcome::NotPlaylist => panic!("expected a playlist cycle"),
        }
    }

    #[test]
    fn sums_prerendered_labels() {
        let (fx, controller, _) = setup(Config::youtube());
        fx.add_labeled_item("3:00", false);
        fx.add_labeled_item("1:30:00", false);
        fx.add_labeled_item("0:45", false);

        let report = computed(controller.trigger());
        assert_eq!(report.items, 3);
        assert_eq!(report.summed, 3);
        assert_eq!(report.armed, 0);
        assert_eq!(controller.total().to_string(), "01:33:45");
        assert_eq!(summary_text(&fx).as_deref(), Some("01:33:45"));
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[test]
    fn summary_node_matches_siblings() {
        let (fx, controller, _) = setup(Config::youtube());
        fx.add_labeled_item("1:00", false);
        controller.trigger();

        let node = fx.page().all_by_id("header-TIME")[0];
        assert_eq!(fx.page().tag(node), "h2");
        assert_eq!(
            fx.page().attribute(node, "class").as_deref(),
            Some("yt-simple-endpoint style-scope yt-formatted-string")
        );
        let container = fx.page().all_by_id("header-description")[0];
        assert_eq!(fx.page().children(container), [node]);
    }

    #[test]
    fn skips_items_before_the_selected_one() {
        let (fx, controller, _) = setup(Config::youtube());
        fx.add_labeled_item("10:00", false);
        fx.add_labeled_item("1:00", true);
        fx.add_labeled_item("2:00", false);
        fx.add_labeled_item("3:00", false);

        let report = computed(controller.trigger());
        assert_eq!(report.pending, 3);
        assert_eq!(summary_text(&fx).as_deref(), Some("00:06:00"));
    }

    #[test]
    fn index_parameter_overrides_marker() {
        let (fx, controller, _) = setup(Config::youtube());
        fx.add_labeled_item("10:00", true);
        fx.add_labeled_item("1:00", false);
        fx.add_labeled_item("2:00", false);
        fx.page().set_query(Some("PL1"), Some("3"));

        controller.trigger();
        assert_eq!(controller.total().to_string(), "00:02:00");
    }

    #[test]
    fn non_playlist_page_is_ignored() {
        let (fx, controller, _) = setup(Config::youtube());
        fx.add_labeled_item("3:00", false);
        fx.page().set_query(None, Some("2"));

        assert_eq!(controller.trigger(), TriggerOutcome::NotPlaylist);
        assert_eq!(controller.cycle(), 0);
        assert_eq!(summary_text(&fx), None);
    }

    #[test]
    fn watcher_resolves_once_and_stops_observing() {
        let (fx, controller, events) = setup(Config::youtube());
        let row = fx.add_item(false);
        fx.page().flush();

        let report = computed(controller.trigger());
        assert_eq!(report.armed, 1);
        assert_eq!(controller.phase(), Phase::Awaiting(1));
        assert_eq!(summary_text(&fx).as_deref(), Some("00:00:00"));

        fx.show_label(row, "2:15");
        fx.page().settle();
        assert_eq!(controller.total().parts(), DurationParts::new(0, 2, 15));
        assert_eq!(summary_text(&fx).as_deref(), Some("00:02:15"));
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.pending_watches(), 0);
        assert_eq!(fx.page().active_watches(), 0);

        // Later insertions into the same row are not observed.
        fx.show_label(row, "9:00");
        fx.page().settle();
        assert_eq!(summary_text(&fx).as_deref(), Some("00:02:15"));

        let events = events.borrow();
        assert_eq!(events.accumulates.len(), 1);
        assert_eq!(events.accumulates[0].added, DurationParts::new(0, 2, 15));
        assert_eq!(events.resolved.len(), 1);
        assert!(events.resolved[0].applied);
        assert_eq!(events.items[0].state, ItemState::Pending);
    }

    #[test]
    fn two_labels_in_one_batch_count_once() {
        let (fx, controller, _) = setup(Config::youtube());
        let row = fx.add_item(false);
        fx.page().flush();
        controller.trigger();

        fx.show_label(row, "1:00");
        fx.show_label(row, "5:00");
        assert_eq!(fx.page().flush(), 1);
        assert_eq!(controller.total().to_string(), "00:01:00");
    }

    #[test]
    fn mixes_immediate_and_late_labels() {
        let (fx, controller, _) = setup(Config::youtube());
        fx.add_labeled_item("59:30", false);
        let late = fx.add_item(false);
        fx.page().flush();

        controller.trigger();
        assert_eq!(controller.total().to_string(), "00:59:30");

        fx.show_label(late, "0:45");
        fx.page().settle();
        assert_eq!(controller.total().to_string(), "01:00:15");
    }

    #[test]
    fn second_trigger_resets_visible_total_first() {
        let (fx, controller, events) = setup(Config::youtube());
        fx.add_labeled_item("4:00", false);
        fx.add_item(false);
        fx.page().flush();

        controller.trigger();
        assert_eq!(summary_text(&fx).as_deref(), Some("00:04:00"));

        events.borrow_mut().renders.clear();
        controller.trigger();

        {
            let events = events.borrow();
            let first = events.renders.first().expect("second cycle renders");
            assert_eq!(first.cycle, 2);
            assert_eq!(first.total, DurationParts::ZERO);
        }

        // The unlabeled row is now watched by both cycles.
        assert_eq!(summary_text(&fx).as_deref(), Some("00:04:00"));
        assert_eq!(controller.pending_watches(), 2);
        assert_eq!(controller.phase(), Phase::Awaiting(1));
    }

    #[test]
    fn stale_watch_adds_into_new_cycle_by_default() {
        let (fx, controller, events) = setup(Config::youtube());
        let row = fx.add_item(false);
        fx.page().flush();

        controller.trigger();
        // The row drops out of the list before the second cycle, leaving the
        // first cycle's watch armed.
        fx.page().remove_attribute(row.item, "id");
        controller.trigger();
        assert_eq!(controller.pending_watches(), 1);
        assert_eq!(controller.phase(), Phase::Idle);

        fx.show_label(row, "3:00");
        fx.page().settle();
        assert_eq!(controller.total().to_string(), "00:03:00");

        let events = events.borrow();
        let resolved = events.resolved.last().expect("watch resolved");
        assert!(resolved.is_stale());
        assert!(resolved.applied);
    }

    #[test]
    fn stale_watch_can_be_discarded() {
        let config = Config::youtube().with_stale_watches(StaleWatchPolicy::Discard);
        let (fx, controller, events) = setup(config);
        let row = fx.add_item(false);
        fx.page().flush();

        controller.trigger();
        fx.page().remove_attribute(row.item, "id");
        controller.trigger();

        fx.show_label(row, "3:00");
        fx.page().settle();
        assert_eq!(controller.total().to_string(), "00:00:00");
        assert_eq!(controller.pending_watches(), 0);

        let events = events.borrow();
        let resolved = events.resolved.last().expect("watch resolved");
        assert!(resolved.is_stale());
        assert!(!resolved.applied);
    }

    #[test]
    fn row_watched_by_two_cycles_counts_twice_by_default() {
        let (fx, controller, events) = setup(Config::youtube());
        let row = fx.add_item(false);
        fx.page().flush();

        controller.trigger();
        controller.trigger();
        assert_eq!(controller.pending_watches(), 2);

        fx.show_label(row, "3:00");
        fx.page().settle();
        assert_eq!(controller.total().to_string(), "00:06:00");
        assert_eq!(summary_text(&fx).as_deref(), Some("00:06:00"));
        assert_eq!(controller.pending_watches(), 0);

        let events = events.borrow();
        assert_eq!(events.resolved.len(), 2);
        assert!(events.resolved.iter().all(|e| e.applied));
        assert_eq!(events.resolved.iter().filter(|e| e.is_stale()).count(), 1);
    }

    #[test]
    fn row_watched_by_two_cycles_counts_once_when_discarding() {
        let config = Config::youtube().with_stale_watches(StaleWatchPolicy::Discard);
        let (fx, controller, events) = setup(config);
        let row = fx.add_item(false);
        fx.page().flush();

        controller.trigger();
        controller.trigger();
        assert_eq!(controller.pending_watches(), 2);

        fx.show_label(row, "3:00");
        fx.page().settle();
        assert_eq!(controller.total().to_string(), "00:03:00");
        assert_eq!(controller.phase(), Phase::Idle);

        let events = events.borrow();
        assert_eq!(events.resolved.len(), 2);
        assert_eq!(events.resolved.iter().filter(|e| e.applied).count(), 1);
        assert!(events.resolved.iter().all(|e| e.applied != e.is_stale()));
    }

    #[test]
    fn recorded_cycle_exports_as_json() {
        use playtime_core::trace::{ContextSkipEvent, CycleStartEvent};
        use playtime_debug::json;
        use playtime_debug::recorder::RecorderSink;
        use serde_json::Value;

        struct Recording(Rc<RefCell<RecorderSink>>);

        impl TraceSink for Recording {
            fn on_cycle_start(&mut self, e: &CycleStartEvent) {
                self.0.borrow_mut().on_cycle_start(e);
            }
            fn on_context_skip(&mut self, e: &ContextSkipEvent) {
                self.0.borrow_mut().on_context_skip(e);
            }
            fn on_item(&mut self, e: &ItemEvent) {
                self.0.borrow_mut().on_item(e);
            }
            fn on_watch_resolved(&mut self, e: &WatchResolvedEvent) {
                self.0.borrow_mut().on_watch_resolved(e);
            }
            fn on_accumulate(&mut self, e: &AccumulateEvent) {
                self.0.borrow_mut().on_accumulate(e);
            }
            fn on_render(&mut self, e: &RenderEvent) {
                self.0.borrow_mut().on_render(e);
            }
        }

        let config = Config::youtube();
        let fx = PlaylistFixture::new(config);
        fx.add_container();
        let controller = Controller::new(fx.page().clone(), config);
        let recorder = Rc::new(RefCell::new(RecorderSink::new()));
        controller.set_trace_sink(Box::new(Recording(Rc::clone(&recorder))));

        fx.add_labeled_item("3:00", false);
        fx.add_labeled_item("1:30:00", false);
        fx.add_labeled_item("0:45", false);
        controller.trigger();

        let mut out = Vec::<u8>::new();
        json::export(recorder.borrow().as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();

        // Reset render, cycle start, then add, render and item per row.
        assert_eq!(parsed.len(), 11);
        assert_eq!(parsed[0]["event"], "Render");
        assert_eq!(parsed[0]["total"]["seconds"], 0);
        assert_eq!(parsed[1]["event"], "CycleStart");
        assert_eq!(parsed[1]["items"], 3);
        assert!(parsed.iter().all(|e| e["cycle"] == 1));

        let adds = parsed.iter().filter(|e| e["event"] == "Accumulate").count();
        assert_eq!(adds, 3);
        let last_render = parsed
            .iter()
            .rev()
            .find(|e| e["event"] == "Render")
            .unwrap();
        assert_eq!(last_render["total"]["text"], "01:33:45");
        assert_eq!(last_render["total"]["seconds"], 5625);
    }

    #[test]
    fn missing_container_still_accumulates() {
        let config = Config::youtube();
        let fx = PlaylistFixture::new(config);
        let controller = Controller::new(fx.page().clone(), config);
        fx.add_labeled_item("1:00", false);
        let late = fx.add_item(false);
        fx.page().flush();

        controller.trigger();
        assert_eq!(summary_text(&fx), None);
        assert_eq!(controller.total().to_string(), "00:01:00");

        // Once the header loads, the next accumulation renders.
        fx.add_container();
        fx.show_label(late, "1:00");
        fx.page().settle();
        assert_eq!(summary_text(&fx).as_deref(), Some("00:02:00"));
    }

    #[test]
    fn host_failures_are_contained() {
        let (fx, controller, _) = setup(Config::youtube());
        fx.add_labeled_item("1:00", false);
        fx.add_item(false);
        fx.page().fail_creates(true);
        fx.page().fail_watches(true);

        let report = computed(controller.trigger());
        assert_eq!(report.summed, 1);
        assert_eq!(report.armed, 0);
        assert_eq!(controller.total().to_string(), "00:01:00");
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(summary_text(&fx), None);
    }

    #[test]
    fn non_duration_label_is_ignored() {
        let (fx, controller, _) = setup(Config::youtube());
        fx.add_labeled_item("LIVE", false);
        fx.add_labeled_item("2:00", false);

        let report = computed(controller.trigger());
        assert_eq!(report.summed, 1);
        assert_eq!(report.armed, 0);
        assert_eq!(controller.total().to_string(), "00:02:00");
    }

    #[test]
    fn empty_playlist_renders_zero() {
        let (fx, controller, _) = setup(Config::youtube());
        let report = computed(controller.trigger());
        assert_eq!(report.items, 0);
        assert_eq!(summary_text(&fx).as_deref(), Some("00:00:00"));
    }
}
