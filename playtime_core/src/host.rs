// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for page integrations.
//!
//! Playtime splits page-specific work into *host* implementations. A host
//! provides:
//!
//! - **Queries** over a tree of labeled nodes: the list items, their active
//!   marker, their duration label, and elements by id.
//! - **Mutation** of exactly one summary node: creating it and setting its
//!   text.
//! - **Subtree observation** via [`PageHost::watch_insertions`], delivering
//!   batches of inserted nodes until the handler asks to stop.
//! - **Query parameters** of the current page address as a [`PageQuery`].
//!
//! The navigation signal is not abstracted here; hosts wire it to
//! [`Controller::trigger`](crate::controller::Controller::trigger) because
//! registration and teardown differ fundamentally across hosts.
//!
//! # Crate boundaries
//!
//! `playtime_core` owns the data model, the state machine, and this contract
//! module. Host crates depend on `playtime_core` and provide page glue.
//! Application code depends on both and wires them together.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::ops::ControlFlow;

/// Query parameters of the current page address that drive a summary cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageQuery {
    /// The list identifier. Its presence marks a playlist context.
    pub list: Option<String>,
    /// The raw 1-based position of the playing item.
    pub index: Option<String>,
}

impl PageQuery {
    /// Returns `true` if the page is showing a playlist.
    #[must_use]
    pub fn is_playlist(&self) -> bool {
        self.list.as_deref().is_some_and(|list| !list.is_empty())
    }
}

/// A node reported as inserted by a subtree observation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertedNode {
    /// Node name as the host reports it (`"SPAN"`, `"#text"`, ...).
    pub tag: String,
    /// Text content of the node, if any.
    pub text: Option<String>,
}

impl InsertedNode {
    /// Creates an inserted-node record.
    #[must_use]
    pub fn new(tag: impl Into<String>, text: Option<String>) -> Self {
        Self {
            tag: tag.into(),
            text,
        }
    }
}

/// Identifies one subtree observation armed on a host.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WatchId(pub u32);

impl fmt::Debug for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WatchId({})", self.0)
    }
}

/// Receives each batch of inserted nodes for one observation.
///
/// Returning [`ControlFlow::Break`] cancels the observation; the host must not
/// call the handler again afterwards.
pub type BatchHandler = Box<dyn FnMut(&[InsertedNode]) -> ControlFlow<()>>;

/// A host operation that failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostError {
    /// Creating an element failed.
    CreateElement(String),
    /// Setting an attribute failed.
    Attribute(String),
    /// Attaching an element to its parent failed.
    Append(String),
    /// Arming a subtree observation failed.
    Observe(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateElement(msg) => write!(f, "failed to create element: {msg}"),
            Self::Attribute(msg) => write!(f, "failed to set attribute: {msg}"),
            Self::Append(msg) => write!(f, "failed to append element: {msg}"),
            Self::Observe(msg) => write!(f, "failed to observe subtree: {msg}"),
        }
    }
}

impl core::error::Error for HostError {}

/// A page that can be queried, observed, and written to.
///
/// Implemented by the web backend over the live DOM and by the harness over
/// an in-memory tree, enabling the same controller to run against both.
///
/// Every lookup returns an `Option`: absence means "not loaded yet" or "wrong
/// page", not failure.
pub trait PageHost {
    /// Handle to one list item.
    type Item: Clone + 'static;
    /// Handle to an arbitrary element.
    type Node;

    /// Returns the query parameters of the current page address.
    fn query(&self) -> PageQuery;

    /// Returns every element matching `selector`, in document order.
    fn items(&self, selector: &str) -> Vec<Self::Item>;

    /// Returns `true` if `item` carries the attribute `name`.
    fn has_attribute(&self, item: &Self::Item, name: &str) -> bool;

    /// Returns the text of the first descendant of `item` matching `selector`.
    fn label_text(&self, item: &Self::Item, selector: &str) -> Option<String>;

    /// Returns the element with the given id.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Creates a `tag` element with `attrs` and appends it to `parent`.
    fn create_child(
        &self,
        parent: &Self::Node,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> Result<Self::Node, HostError>;

    /// Replaces the text content of `node`.
    fn set_text(&self, node: &Self::Node, text: &str);

    /// Starts observing insertions anywhere under `item`.
    ///
    /// `handler` receives each batch in delivery order. The host cancels the
    /// observation as soon as the handler returns [`ControlFlow::Break`].
    fn watch_insertions(
        &self,
        item: &Self::Item,
        handler: BatchHandler,
    ) -> Result<WatchId, HostError>;
}
