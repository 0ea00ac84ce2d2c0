// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot discovery of a lazily rendered duration label.
//!
//! A [`DurationWatcher`] consumes the insertion batches of one subtree
//! observation (see [`PageHost::watch_insertions`]). The first inserted node
//! that looks like a duration label resolves it. Resolution and cancellation
//! happen in the same step: the callback is taken out of the watcher and
//! invoked, and the batch handler returns [`ControlFlow::Break`] so the host
//! disconnects before delivering anything else.
//!
//! [`PageHost::watch_insertions`]: crate::host::PageHost::watch_insertions

use alloc::boxed::Box;
use core::fmt;
use core::ops::ControlFlow;

use crate::host::{BatchHandler, InsertedNode};

/// Returns the text of `node` if it is a label-bearing node holding a `:`.
#[must_use]
pub fn label_candidate<'a>(node: &'a InsertedNode, label_tag: &str) -> Option<&'a str> {
    if !node.tag.eq_ignore_ascii_case(label_tag) {
        return None;
    }
    node.text.as_deref().filter(|text| text.contains(':'))
}

/// Resolves exactly once with the first duration-shaped inserted node.
pub struct DurationWatcher<F> {
    label_tag: &'static str,
    on_resolved: Option<F>,
}

impl<F> fmt::Debug for DurationWatcher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DurationWatcher")
            .field("label_tag", &self.label_tag)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

impl<F> DurationWatcher<F> {
    /// Returns `true` once the callback has fired.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.on_resolved.is_none()
    }
}

impl<F: FnOnce(&str)> DurationWatcher<F> {
    /// Creates a watcher that calls `on_resolved` with the label text.
    ///
    /// `label_tag` is the node name of label-bearing nodes, compared
    /// case-insensitively.
    #[must_use]
    pub fn new(label_tag: &'static str, on_resolved: F) -> Self {
        Self {
            label_tag,
            on_resolved: Some(on_resolved),
        }
    }

    /// Scans one batch of inserted nodes.
    ///
    /// Returns [`ControlFlow::Break`] once resolved. Only the first qualifying
    /// node is honored, even when a batch holds several.
    pub fn on_batch(&mut self, batch: &[InsertedNode]) -> ControlFlow<()> {
        if self.is_resolved() {
            return ControlFlow::Break(());
        }
        let Some(text) = batch
            .iter()
            .find_map(|node| label_candidate(node, self.label_tag))
        else {
            return ControlFlow::Continue(());
        };
        if let Some(on_resolved) = self.on_resolved.take() {
            on_resolved(text);
        }
        ControlFlow::Break(())
    }
}

impl<F: FnOnce(&str) + 'static> DurationWatcher<F> {
    /// Boxes the watcher as a host batch handler.
    #[must_use]
    pub fn into_handler(mut self) -> BatchHandler {
        Box::new(move |batch: &[InsertedNode]| self.on_batch(batch))
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;

    fn span(text: &str) -> InsertedNode {
        InsertedNode::new("SPAN", Some(text.into()))
    }

    fn recording() -> (Rc<RefCell<Vec<String>>>, impl FnOnce(&str)) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |text: &str| sink.borrow_mut().push(text.into()))
    }

    #[test]
    fn ignores_non_label_insertions() {
        let (seen, cb) = recording();
        let mut w = DurationWatcher::new("SPAN", cb);

        let batch = vec![
            InsertedNode::new("DIV", Some("1:00".into())),
            span("LIVE"),
            InsertedNode::new("#text", Some("2:00".into())),
            InsertedNode::new("SPAN", None),
        ];
        assert_eq!(w.on_batch(&batch), ControlFlow::Continue(()));
        assert!(!w.is_resolved());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn resolves_once_then_breaks() {
        let (seen, cb) = recording();
        let mut w = DurationWatcher::new("SPAN", cb);

        assert_eq!(w.on_batch(&[span("2:15")]), ControlFlow::Break(()));
        assert!(w.is_resolved());
        // A late batch must not fire again.
        assert_eq!(w.on_batch(&[span("9:99")]), ControlFlow::Break(()));
        assert_eq!(*seen.borrow(), ["2:15"]);
    }

    #[test]
    fn first_qualifying_node_in_batch_wins() {
        let (seen, cb) = recording();
        let mut w = DurationWatcher::new("SPAN", cb);

        let batch = vec![span("text"), span("4:01"), span("5:02")];
        assert_eq!(w.on_batch(&batch), ControlFlow::Break(()));
        assert_eq!(*seen.borrow(), ["4:01"]);
    }

    #[test]
    fn tag_match_is_case_insensitive() {
        let node = InsertedNode::new("span", Some("1:00".into()));
        assert_eq!(label_candidate(&node, "SPAN"), Some("1:00"));
    }

    #[test]
    fn boxed_handler_forwards_batches() {
        let (seen, cb) = recording();
        let mut handler = DurationWatcher::new("SPAN", cb).into_handler();

        assert_eq!(handler(&[]), ControlFlow::Continue(()));
        assert_eq!(handler(&[span("0:30")]), ControlFlow::Break(()));
        assert_eq!(*seen.borrow(), ["0:30"]);
    }

    #[test]
    fn debug_reports_resolution() {
        let (_seen, cb) = recording();
        let mut w = DurationWatcher::new("SPAN", cb);
        assert_eq!(
            format!("{w:?}"),
            r#"DurationWatcher { label_tag: "SPAN", resolved: false }"#
        );

        let _ = w.on_batch(&[span("1:00")]);
        assert!(format!("{w:?}").contains("resolved: true"));
    }
}
