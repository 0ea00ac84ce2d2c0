// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Playlist page builders shaped like the live page.
//!
//! The layout mirrors what [`Config::youtube`] selects:
//!
//! ```text
//!   body
//!   ├── div#header-description
//!   └── ytd-playlist-panel-video-renderer#playlist-items [selected]
//!       └── div#overlays
//!           └── ytd-thumbnail-overlay-time-status-renderer
//!               └── span  "3:00"
//! ```

use playtime_core::Config;

use crate::page::{FakePage, NodeId};

const ITEM_TAG: &str = "ytd-playlist-panel-video-renderer";
const OVERLAYS_ID: &str = "overlays";
const STATUS_TAG: &str = "ytd-thumbnail-overlay-time-status-renderer";

/// One playlist row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixtureItem {
    /// The element matched by [`Config::items`].
    pub item: NodeId,
    /// The `#overlays` element labels are rendered into.
    pub overlays: NodeId,
}

/// Builds playlist pages on a [`FakePage`].
#[derive(Clone, Debug)]
pub struct PlaylistFixture {
    page: FakePage,
    config: Config,
}

impl PlaylistFixture {
    /// Creates a fixture on an empty page, with the page address set to a
    /// playlist.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let page = FakePage::new();
        page.set_query(Some("PLfixture"), None);
        Self { page, config }
    }

    /// Returns a handle to the page.
    #[must_use]
    pub fn page(&self) -> &FakePage {
        &self.page
    }

    /// Returns the configuration the page is shaped for.
    #[must_use]
    pub fn config(&self) -> Config {
        self.config
    }

    /// Adds the header container the summary node is rendered into.
    pub fn add_container(&self) -> NodeId {
        let node = self.page.append(self.page.root(), "div");
        self.page
            .set_attribute(node, "id", self.config.container_id);
        node
    }

    /// Adds a row with no label rendered yet.
    pub fn add_item(&self, active: bool) -> FixtureItem {
        let item = self.page.append(self.page.root(), ITEM_TAG);
        self.page.set_attribute(item, "id", "playlist-items");
        if active {
            self.page
                .set_attribute(item, self.config.active_attribute, "");
        }
        let overlays = self.page.append(item, "div");
        self.page.set_attribute(overlays, "id", OVERLAYS_ID);
        FixtureItem { item, overlays }
    }

    /// Adds a row whose label is already rendered.
    pub fn add_labeled_item(&self, label: &str, active: bool) -> FixtureItem {
        let row = self.add_item(active);
        self.show_label(row, label);
        row
    }

    /// Renders `label` into a row, queuing insertion records for the status
    /// element and its `span` separately, as the live page does.
    pub fn show_label(&self, row: FixtureItem, label: &str) -> NodeId {
        let status = self.page.append(row.overlays, STATUS_TAG);
        let span = self.page.append(status, "span");
        self.page.write_text(span, label);
        span
    }
}

#[cfg(test)]
mod tests {
    use playtime_core::PageHost as _;

    use super::*;

    #[test]
    fn label_selector_finds_rendered_label() {
        let fx = PlaylistFixture::new(Config::youtube());
        let row = fx.add_labeled_item("3:00", false);
        let label = fx.page().label_text(&row.item, fx.config().label);
        assert_eq!(label.as_deref(), Some("3:00"));
    }

    #[test]
    fn items_selector_finds_rows_in_order() {
        let fx = PlaylistFixture::new(Config::youtube());
        let a = fx.add_item(false);
        let b = fx.add_item(true);
        assert_eq!(fx.page().items(fx.config().items), [a.item, b.item]);
        assert!(fx.page().has_attribute(&b.item, "selected"));
        assert!(!fx.page().has_attribute(&a.item, "selected"));
    }
}
