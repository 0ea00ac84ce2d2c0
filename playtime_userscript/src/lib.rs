// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shows the remaining duration of the open playlist above its item list.
//!
//! The summary is computed once when the module starts and again on every
//! in-page navigation.
//!
//! Build with: `wasm-pack build --target web playtime_userscript`
//! Then load the generated module from a userscript or extension content
//! script on the playlist site.

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use playtime_backend_web::{DomHost, NavigationListener, init_logger, now};
use playtime_core::{Config, Controller, TriggerOutcome};
use wasm_bindgen::prelude::*;

/// Entry point for the userscript.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() -> Result<(), JsValue> {
    if init_logger(log::LevelFilter::Info).is_err() {
        // Another module on the page installed a logger first; keep it.
        log::debug!("console logger already installed");
    }

    let config = Config::youtube();
    let host = DomHost::from_global(&config).ok_or_else(|| JsValue::from_str("no document"))?;
    let window = host.window().clone();
    let controller = Controller::new(host, config);

    run(&controller);

    let on_navigate = controller.clone();
    let listener = NavigationListener::new(&window, config.navigation_event, move || {
        run(&on_navigate);
    })?;
    core::mem::forget(listener);

    Ok(())
}

fn run(controller: &Controller<DomHost>) {
    let start = now();
    if let TriggerOutcome::Computed(report) = controller.trigger() {
        log::debug!(
            "cycle {}: summed {} of {} pending items in {:.1} ms, watching {}",
            report.cycle,
            report.summed,
            report.pending,
            now() - start,
            report.armed,
        );
    }
}
