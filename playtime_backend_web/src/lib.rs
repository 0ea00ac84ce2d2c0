// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for playtime.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`DomHost`]: [`PageHost`] over the live document
//! - [`ObserverRegistry`]: `MutationObserver` subscriptions backing
//!   [`PageHost::watch_insertions`]
//! - [`NavigationListener`]: the page navigation signal
//! - [`ConsoleLogger`]: a [`log`] backend writing to the browser console

#![no_std]

extern crate alloc;

mod console;
mod dom;
mod navigation;
mod observer;

pub use console::{ConsoleLogger, init_logger};
pub use dom::DomHost;
pub use navigation::NavigationListener;
pub use observer::ObserverRegistry;
pub use playtime_core::host::PageHost;

use alloc::format;
use alloc::string::String;

use wasm_bindgen::prelude::*;

// Direct global binding instead of `web_sys::Window` methods, so reading the
// clock never needs to fetch (and unwrap) the Window/Performance objects.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    fn performance_now() -> f64;
}

/// Returns the current page time from `performance.now()`, in milliseconds.
#[must_use]
pub fn now() -> f64 {
    performance_now()
}

/// Renders a thrown JS value as a message for [`HostError`].
///
/// [`HostError`]: playtime_core::HostError
pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
