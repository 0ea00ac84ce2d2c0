// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selectors, element names, and policies for a summary controller.

/// What to do with a watch that resolves after a newer cycle has started.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StaleWatchPolicy {
    /// Add the late duration into the current total.
    ///
    /// Watches are not versioned, so a watch armed before a reset still
    /// contributes to the total computed after it. A row that is still
    /// unlabeled across two triggers is watched by both cycles and its
    /// duration is counted twice.
    #[default]
    Accumulate,
    /// Drop durations from watches armed by an earlier cycle.
    Discard,
}

/// Configuration for the [`Controller`](crate::controller::Controller).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Selector matching every list item.
    pub items: &'static str,
    /// Selector, relative to an item, of its rendered duration label.
    pub label: &'static str,
    /// Node name of inserted nodes that may carry a duration.
    ///
    /// Compared case-insensitively.
    pub label_tag: &'static str,
    /// Attribute marking the item currently playing.
    pub active_attribute: &'static str,
    /// Id of the container the summary node is appended to.
    pub container_id: &'static str,
    /// Id of the summary node.
    pub summary_id: &'static str,
    /// Element name of the summary node.
    pub summary_tag: &'static str,
    /// Class list given to the summary node so it matches its siblings.
    pub summary_class: &'static str,
    /// Query parameter naming the list.
    pub list_param: &'static str,
    /// Query parameter holding the 1-based position of the playing item.
    pub index_param: &'static str,
    /// Event fired by the page when it starts a navigation.
    pub navigation_event: &'static str,
    /// Handling of watches that outlive their cycle.
    pub stale_watches: StaleWatchPolicy,
}

impl Config {
    /// Configuration for the `youtube.com` watch page playlist panel.
    #[must_use]
    pub const fn youtube() -> Self {
        Self {
            items: "#playlist-items",
            label: "#overlays > ytd-thumbnail-overlay-time-status-renderer > span",
            label_tag: "SPAN",
            active_attribute: "selected",
            container_id: "header-description",
            summary_id: "header-TIME",
            summary_tag: "h2",
            summary_class: "yt-simple-endpoint style-scope yt-formatted-string",
            list_param: "list",
            index_param: "index",
            navigation_event: "yt-navigate-start",
            stale_watches: StaleWatchPolicy::Accumulate,
        }
    }

    /// Returns a copy using `policy` for stale watches.
    #[must_use]
    pub const fn with_stale_watches(mut self, policy: StaleWatchPolicy) -> Self {
        self.stale_watches = policy;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::youtube()
    }
}
