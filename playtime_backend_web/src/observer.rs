// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `MutationObserver` subscriptions.
//!
//! Each watch owns one observer and the JS closure it calls. The closure must
//! outlive every callback the browser may still deliver, and it cannot be
//! dropped from inside itself, so when a handler asks to stop the observer is
//! disconnected on the spot and the entry is only marked finished. Finished
//! entries are dropped by the next [`ObserverRegistry::prune`], which runs
//! whenever a new watch is armed.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use js_sys::Array;
use playtime_core::host::{BatchHandler, HostError, InsertedNode, WatchId};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use web_sys::{MutationObserver, MutationObserverInit, MutationRecord, Node};

use crate::describe;

type MutationClosure = Closure<dyn FnMut(Array, MutationObserver)>;

struct Entry {
    id: WatchId,
    observer: MutationObserver,
    /// Kept alive for as long as the observer may call it.
    _closure: MutationClosure,
    finished: Rc<Cell<bool>>,
}

impl Drop for Entry {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

#[derive(Default)]
struct RegistryInner {
    entries: Vec<Entry>,
    next_id: u32,
}

/// The set of armed subtree observations.
///
/// Cloning yields a handle to the same registry.
#[derive(Clone, Default)]
pub struct ObserverRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl core::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObserverRegistry")
            .field("entries", &inner.entries.len())
            .field("active", &self.active())
            .field("next_id", &inner.next_id)
            .finish()
    }
}

impl ObserverRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observes insertions anywhere under `target`.
    ///
    /// `handler` is called once per delivered batch that contains at least one
    /// inserted node. Returning [`ControlFlow::Break`] disconnects the observer
    /// before the callback returns.
    ///
    /// [`ControlFlow::Break`]: core::ops::ControlFlow::Break
    pub fn observe(&self, target: &Node, mut handler: BatchHandler) -> Result<WatchId, HostError> {
        self.prune();

        let finished = Rc::new(Cell::new(false));
        let flag = Rc::clone(&finished);
        let closure = Closure::wrap(Box::new(move |records: Array, observer: MutationObserver| {
            if flag.get() {
                return;
            }
            let batch = inserted_nodes(&records);
            if batch.is_empty() {
                return;
            }
            if handler(&batch).is_break() {
                observer.disconnect();
                flag.set(true);
            }
        }) as Box<dyn FnMut(Array, MutationObserver)>);

        let observer = MutationObserver::new(closure.as_ref().unchecked_ref())
            .map_err(|e| HostError::Observe(describe(&e)))?;
        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        observer
            .observe_with_options(target, &options)
            .map_err(|e| HostError::Observe(describe(&e)))?;

        let mut inner = self.inner.borrow_mut();
        let id = WatchId(inner.next_id);
        inner.next_id = inner.next_id.wrapping_add(1);
        inner.entries.push(Entry {
            id,
            observer,
            _closure: closure,
            finished,
        });
        log::trace!("observing insertions as {id:?}");
        Ok(id)
    }

    /// Drops entries whose handler has asked to stop.
    ///
    /// Must not be called from inside an observer callback.
    pub fn prune(&self) {
        let finished: Vec<Entry> = {
            let mut inner = self.inner.borrow_mut();
            let (done, live) = core::mem::take(&mut inner.entries)
                .into_iter()
                .partition(|e| e.finished.get());
            inner.entries = live;
            done
        };
        for entry in &finished {
            log::trace!("released observer {:?}", entry.id);
        }
    }

    /// Returns the number of observations still waiting for their batch.
    #[must_use]
    pub fn active(&self) -> usize {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|e| !e.finished.get())
            .count()
    }

    /// Returns the number of entries held, including finished ones not yet
    /// pruned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Returns `true` if no entries are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Flattens the added nodes of `records` into one batch, in record order.
fn inserted_nodes(records: &Array) -> Vec<InsertedNode> {
    let mut batch = Vec::new();
    for record in records.iter() {
        let Ok(record) = record.dyn_into::<MutationRecord>() else {
            continue;
        };
        if record.type_() != "childList" {
            continue;
        }
        let added = record.added_nodes();
        for i in 0..added.length() {
            if let Some(node) = added.item(i) {
                batch.push(InsertedNode::new(node.node_name(), node.text_content()));
            }
        }
    }
    batch
}
