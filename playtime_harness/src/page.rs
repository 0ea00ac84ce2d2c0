// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory page with batched insertion delivery.
//!
//! [`FakePage`] stores an element tree in flat arrays addressed by
//! [`NodeId`]. Appending a node queues an insertion record; observers armed
//! with [`PageHost::watch_insertions`] only see records when
//! [`flush`](FakePage::flush) runs, mirroring how a browser batches mutation
//! records and delivers them after the current task.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::ops::ControlFlow;

use playtime_core::host::{BatchHandler, HostError, InsertedNode, PageHost, PageQuery, WatchId};

use crate::selector::{self, Combinator, Part, Step};

/// A handle to an element in a [`FakePage`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

#[derive(Debug)]
struct NodeData {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

struct WatchSlot {
    root: NodeId,
    /// Insertions with a sequence number below this predate the watch.
    since: u64,
    /// `None` once cancelled, or while the handler is running.
    handler: Option<BatchHandler>,
    cancelled: bool,
}

#[derive(Default)]
struct Inner {
    nodes: RefCell<Vec<NodeData>>,
    query: RefCell<PageQuery>,
    watches: RefCell<Vec<WatchSlot>>,
    /// Pending insertion records as `(sequence, node)`.
    queue: RefCell<Vec<(u64, NodeId)>>,
    next_seq: Cell<u64>,
    fail_creates: Cell<bool>,
    fail_watches: Cell<bool>,
}

/// An in-memory page implementing [`PageHost`].
///
/// Cloning yields another handle to the same page, so a test can keep one
/// handle while a controller owns another.
#[derive(Clone)]
pub struct FakePage {
    inner: Rc<Inner>,
}

impl fmt::Debug for FakePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakePage")
            .field("nodes", &self.inner.nodes.borrow().len())
            .field("queued", &self.inner.queue.borrow().len())
            .field("active_watches", &self.active_watches())
            .finish_non_exhaustive()
    }
}

impl Default for FakePage {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePage {
    /// Creates a page holding only a `body` element.
    #[must_use]
    pub fn new() -> Self {
        let inner = Inner::default();
        inner.nodes.borrow_mut().push(NodeData {
            tag: "body".into(),
            attrs: Vec::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
        });
        Self {
            inner: Rc::new(inner),
        }
    }

    /// Returns the `body` element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Sets the page address query parameters.
    pub fn set_query(&self, list: Option<&str>, index: Option<&str>) {
        *self.inner.query.borrow_mut() = PageQuery {
            list: list.map(Into::into),
            index: index.map(Into::into),
        };
    }

    /// Makes every following [`PageHost::create_child`] call fail.
    pub fn fail_creates(&self, fail: bool) {
        self.inner.fail_creates.set(fail);
    }

    /// Makes every following [`PageHost::watch_insertions`] call fail.
    pub fn fail_watches(&self, fail: bool) {
        self.inner.fail_watches.set(fail);
    }

    /// Appends a `tag` element to `parent` and queues an insertion record.
    pub fn append(&self, parent: NodeId, tag: &str) -> NodeId {
        let id = {
            let mut nodes = self.inner.nodes.borrow_mut();
            #[expect(
                clippy::cast_possible_truncation,
                reason = "test pages stay far below u32::MAX nodes"
            )]
            let id = NodeId(nodes.len() as u32);
            nodes.push(NodeData {
                tag: tag.into(),
                attrs: Vec::new(),
                text: String::new(),
                parent: Some(parent),
                children: Vec::new(),
            });
            nodes[parent.slot()].children.push(id);
            id
        };
        let seq = self.inner.next_seq.get();
        self.inner.next_seq.set(seq + 1);
        self.inner.queue.borrow_mut().push((seq, id));
        id
    }

    /// Sets (or replaces) an attribute.
    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        let mut nodes = self.inner.nodes.borrow_mut();
        let attrs = &mut nodes[node.slot()].attrs;
        match attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.into(),
            None => attrs.push((name.into(), value.into())),
        }
    }

    /// Removes an attribute if present.
    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        self.inner.nodes.borrow_mut()[node.slot()]
            .attrs
            .retain(|(n, _)| n != name);
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner.nodes.borrow()[node.slot()]
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    /// Sets an element's own text without queuing an insertion record.
    pub fn write_text(&self, node: NodeId, text: &str) {
        self.inner.nodes.borrow_mut()[node.slot()].text = text.into();
    }

    /// Returns the element's text concatenated with its descendants' text.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let nodes = self.inner.nodes.borrow();
        let mut out = String::new();
        collect_text(&nodes, node, &mut out);
        out
    }

    /// Returns the element name as written when it was appended.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> String {
        self.inner.nodes.borrow()[node.slot()].tag.clone()
    }

    /// Returns the children of `node` in order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner.nodes.borrow()[node.slot()].children.clone()
    }

    /// Returns every element in the document whose `id` is `id`.
    #[must_use]
    pub fn all_by_id(&self, id: &str) -> Vec<NodeId> {
        let nodes = self.inner.nodes.borrow();
        document_order(&nodes, self.root())
            .into_iter()
            .filter(|&n| attr(&nodes, n, "id") == Some(id))
            .collect()
    }

    /// Returns every element matching `selector`, in document order.
    #[must_use]
    pub fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        self.select_within(self.root(), selector, false)
    }

    /// Returns the number of insertion records not yet delivered.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    /// Returns the number of observations that have not been cancelled.
    #[must_use]
    pub fn active_watches(&self) -> usize {
        self.inner
            .watches
            .borrow()
            .iter()
            .filter(|w| !w.cancelled)
            .count()
    }

    /// Delivers queued insertion records, one batch per affected watch.
    ///
    /// Records are taken off the queue before any handler runs; insertions
    /// made by handlers are queued for the next flush. Returns the number of
    /// batches delivered.
    pub fn flush(&self) -> usize {
        let records = core::mem::take(&mut *self.inner.queue.borrow_mut());
        if records.is_empty() {
            return 0;
        }

        let watch_count = self.inner.watches.borrow().len();
        let mut delivered = 0;
        for idx in 0..watch_count {
            let Some(batch) = self.batch_for(idx, &records) else {
                continue;
            };
            let Some(mut handler) = self.inner.watches.borrow_mut()[idx].handler.take() else {
                continue;
            };

            delivered += 1;
            let flow = handler(&batch);

            let mut watches = self.inner.watches.borrow_mut();
            match flow {
                ControlFlow::Break(()) => watches[idx].cancelled = true,
                ControlFlow::Continue(()) => watches[idx].handler = Some(handler),
            }
        }
        delivered
    }

    /// Flushes until no insertion records remain. Returns the total number of
    /// batches delivered.
    pub fn settle(&self) -> usize {
        let mut total = 0;
        while self.queued() > 0 {
            total += self.flush();
        }
        total
    }

    fn batch_for(&self, idx: usize, records: &[(u64, NodeId)]) -> Option<Vec<InsertedNode>> {
        let (root, since) = {
            let watches = self.inner.watches.borrow();
            let w = &watches[idx];
            if w.cancelled {
                return None;
            }
            (w.root, w.since)
        };

        let nodes = self.inner.nodes.borrow();
        let batch: Vec<InsertedNode> = records
            .iter()
            .filter(|&&(seq, node)| {
                seq >= since && node != root && is_inclusive_ancestor(&nodes, root, node)
            })
            .map(|&(_, node)| {
                let mut text = String::new();
                collect_text(&nodes, node, &mut text);
                InsertedNode::new(nodes[node.slot()].tag.to_ascii_uppercase(), Some(text))
            })
            .collect();
        (!batch.is_empty()).then_some(batch)
    }

    fn select_within(&self, scope: NodeId, selector: &str, first_only: bool) -> Vec<NodeId> {
        let Some(parts) = selector::parse(selector) else {
            return Vec::new();
        };
        let nodes = self.inner.nodes.borrow();
        let mut out = Vec::new();
        for node in document_order(&nodes, scope) {
            if node == scope || !matches_chain(&nodes, node, &parts) {
                continue;
            }
            out.push(node);
            if first_only {
                break;
            }
        }
        out
    }
}

impl PageHost for FakePage {
    type Item = NodeId;
    type Node = NodeId;

    fn query(&self) -> PageQuery {
        self.inner.query.borrow().clone()
    }

    fn items(&self, selector: &str) -> Vec<NodeId> {
        self.query_selector_all(selector)
    }

    fn has_attribute(&self, item: &NodeId, name: &str) -> bool {
        self.attribute(*item, name).is_some()
    }

    fn label_text(&self, item: &NodeId, selector: &str) -> Option<String> {
        let found = self.select_within(*item, selector, true);
        found.first().map(|&node| self.text_content(node))
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.all_by_id(id).first().copied()
    }

    fn create_child(
        &self,
        parent: &NodeId,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> Result<NodeId, HostError> {
        if self.inner.fail_creates.get() {
            return Err(HostError::CreateElement(tag.into()));
        }
        let node = self.append(*parent, tag);
        for (name, value) in attrs {
            self.set_attribute(node, name, value);
        }
        Ok(node)
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        let mut nodes = self.inner.nodes.borrow_mut();
        let data = &mut nodes[node.slot()];
        data.text = text.into();
        // Replacing text content detaches every child.
        for child in core::mem::take(&mut data.children) {
            nodes[child.slot()].parent = None;
        }
    }

    fn watch_insertions(&self, item: &NodeId, handler: BatchHandler) -> Result<WatchId, HostError> {
        if self.inner.fail_watches.get() {
            return Err(HostError::Observe("watching disabled".into()));
        }
        let mut watches = self.inner.watches.borrow_mut();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "test pages stay far below u32::MAX watches"
        )]
        let id = WatchId(watches.len() as u32);
        watches.push(WatchSlot {
            root: *item,
            since: self.inner.next_seq.get(),
            handler: Some(handler),
            cancelled: false,
        });
        Ok(id)
    }
}

impl fmt::Debug for WatchSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchSlot")
            .field("root", &self.root)
            .field("since", &self.since)
            .field("cancelled", &self.cancelled)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tree helpers
// ---------------------------------------------------------------------------

fn attr<'a>(nodes: &'a [NodeData], node: NodeId, name: &str) -> Option<&'a str> {
    nodes[node.slot()]
        .attrs
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

fn collect_text(nodes: &[NodeData], node: NodeId, out: &mut String) {
    let data = &nodes[node.slot()];
    out.push_str(&data.text);
    for &child in &data.children {
        collect_text(nodes, child, out);
    }
}

/// Pre-order traversal starting at (and including) `scope`.
fn document_order(nodes: &[NodeData], scope: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = Vec::from([scope]);
    while let Some(node) = stack.pop() {
        out.push(node);
        stack.extend(nodes[node.slot()].children.iter().rev().copied());
    }
    out
}

fn is_inclusive_ancestor(nodes: &[NodeData], ancestor: NodeId, node: NodeId) -> bool {
    let mut cursor = Some(node);
    while let Some(current) = cursor {
        if current == ancestor {
            return true;
        }
        cursor = nodes[current.slot()].parent;
    }
    false
}

fn matches_step(nodes: &[NodeData], node: NodeId, step: &Step) -> bool {
    let data = &nodes[node.slot()];
    if let Some(tag) = &step.tag
        && !tag.eq_ignore_ascii_case(&data.tag)
    {
        return false;
    }
    if let Some(id) = &step.id
        && attr(nodes, node, "id") != Some(id.as_str())
    {
        return false;
    }
    let classes = attr(nodes, node, "class").unwrap_or("");
    if !step
        .classes
        .iter()
        .all(|c| classes.split_whitespace().any(|have| have == c))
    {
        return false;
    }
    step.attrs.iter().all(|a| attr(nodes, node, a).is_some())
}

/// Matches right to left, walking ancestors as the combinators require.
fn matches_chain(nodes: &[NodeData], node: NodeId, parts: &[Part]) -> bool {
    let Some((last, rest)) = parts.split_last() else {
        return false;
    };
    if !matches_step(nodes, node, &last.step) {
        return false;
    }

    let mut current = node;
    let mut combinator = last.combinator;
    for part in rest.iter().rev() {
        let matched = match combinator.unwrap_or(Combinator::Descendant) {
            Combinator::Child => nodes[current.slot()]
                .parent
                .filter(|&parent| matches_step(nodes, parent, &part.step)),
            Combinator::Descendant => {
                let mut cursor = nodes[current.slot()].parent;
                let mut found = None;
                while let Some(parent) = cursor {
                    if matches_step(nodes, parent, &part.step) {
                        found = Some(parent);
                        break;
                    }
                    cursor = nodes[parent.slot()].parent;
                }
                found
            }
        };
        let Some(matched) = matched else {
            return false;
        };
        current = matched;
        combinator = part.combinator;
    }
    true
}
