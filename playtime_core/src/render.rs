// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Writing the running total into the page.

use alloc::string::ToString as _;

use crate::config::Config;
use crate::host::{HostError, PageHost};
use crate::time::PlaylistTime;

/// What a call to [`Renderer::render`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderOutcome {
    /// The header container is not on the page yet; nothing was written.
    NoContainer,
    /// The summary node was created and filled.
    Created,
    /// The existing summary node's text was replaced.
    Updated,
}

/// Maintains the single summary node under the header container.
///
/// Rendering is idempotent: the node is looked up by id on every call and
/// only created when missing, so repeated renders never duplicate it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Renderer {
    container_id: &'static str,
    summary_id: &'static str,
    summary_tag: &'static str,
    summary_class: &'static str,
}

impl Renderer {
    /// Creates a renderer using the element names in `config`.
    #[must_use]
    pub const fn new(config: &Config) -> Self {
        Self {
            container_id: config.container_id,
            summary_id: config.summary_id,
            summary_tag: config.summary_tag,
            summary_class: config.summary_class,
        }
    }

    /// Writes `time` as `HH:MM:SS` into the summary node.
    ///
    /// Returns [`RenderOutcome::NoContainer`] without touching the page when
    /// the header container is missing.
    pub fn render<H: PageHost>(
        &self,
        host: &H,
        time: &PlaylistTime,
    ) -> Result<RenderOutcome, HostError> {
        let Some(container) = host.element_by_id(self.container_id) else {
            return Ok(RenderOutcome::NoContainer);
        };

        let (node, outcome) = match host.element_by_id(self.summary_id) {
            Some(node) => (node, RenderOutcome::Updated),
            None => {
                let node = host.create_child(
                    &container,
                    self.summary_tag,
                    &[("class", self.summary_class), ("id", self.summary_id)],
                )?;
                (node, RenderOutcome::Created)
            }
        };

        host.set_text(&node, &time.to_string());
        Ok(outcome)
    }
}
