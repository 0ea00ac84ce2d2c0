// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page navigation signal.
//!
//! Single-page sites swap content without a load event; they announce it with
//! a custom event instead (`yt-navigate-start` on the live site). A
//! [`NavigationListener`] calls back on every such event until dropped.

use alloc::boxed::Box;

use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, EventTarget};

/// An event listener that is removed when dropped.
///
/// To keep it for the lifetime of the page, pass it to
/// [`core::mem::forget`].
pub struct NavigationListener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl NavigationListener {
    /// Calls `on_navigate` every time `target` dispatches `event`.
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        mut on_navigate: impl FnMut() + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(move |_event: Event| {
            on_navigate();
        }) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }

    /// Returns the event name listened for.
    #[must_use]
    pub fn event(&self) -> &'static str {
        self.event
    }
}

impl Drop for NavigationListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

impl core::fmt::Debug for NavigationListener {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NavigationListener")
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}
