// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`PageHost`] over the live document.

use alloc::string::String;
use alloc::vec::Vec;

use playtime_core::Config;
use playtime_core::host::{BatchHandler, HostError, PageHost, PageQuery, WatchId};
use wasm_bindgen::JsCast as _;
use web_sys::{Document, Element, UrlSearchParams, Window};

use crate::describe;
use crate::observer::ObserverRegistry;

/// Reads and writes the page through `web-sys`.
///
/// Items and nodes are plain [`Element`]s. Subtree observations are held by
/// an [`ObserverRegistry`] for as long as they are armed.
pub struct DomHost {
    window: Window,
    document: Document,
    observers: ObserverRegistry,
    list_param: &'static str,
    index_param: &'static str,
}

impl core::fmt::Debug for DomHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomHost")
            .field("document", &"Document")
            .field("observers", &self.observers)
            .field("list_param", &self.list_param)
            .field("index_param", &self.index_param)
            .finish_non_exhaustive()
    }
}

impl DomHost {
    /// Creates a host over `window`'s document.
    ///
    /// Returns `None` if the window has no document.
    #[must_use]
    pub fn new(window: Window, config: &Config) -> Option<Self> {
        let document = window.document()?;
        Some(Self {
            window,
            document,
            observers: ObserverRegistry::new(),
            list_param: config.list_param,
            index_param: config.index_param,
        })
    }

    /// Creates a host over the global window, if there is one.
    #[must_use]
    pub fn from_global(config: &Config) -> Option<Self> {
        Self::new(web_sys::window()?, config)
    }

    /// Returns the window.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Returns the document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Returns the registry holding this host's subtree observations.
    #[must_use]
    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    fn search_params(&self) -> Option<UrlSearchParams> {
        let search = self.window.location().search().ok()?;
        UrlSearchParams::new_with_str(&search).ok()
    }
}

impl PageHost for DomHost {
    type Item = Element;
    type Node = Element;

    fn query(&self) -> PageQuery {
        let Some(params) = self.search_params() else {
            return PageQuery::default();
        };
        PageQuery {
            list: params.get(self.list_param),
            index: params.get(self.index_param),
        }
    }

    fn items(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            log::warn!("invalid item selector {selector:?}");
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn has_attribute(&self, item: &Element, name: &str) -> bool {
        item.has_attribute(name)
    }

    fn label_text(&self, item: &Element, selector: &str) -> Option<String> {
        item.query_selector(selector).ok()??.text_content()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn create_child(
        &self,
        parent: &Element,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> Result<Element, HostError> {
        let el = self
            .document
            .create_element(tag)
            .map_err(|e| HostError::CreateElement(describe(&e)))?;
        for (name, value) in attrs {
            el.set_attribute(name, value)
                .map_err(|e| HostError::Attribute(describe(&e)))?;
        }
        parent
            .append_child(&el)
            .map_err(|e| HostError::Append(describe(&e)))?;
        Ok(el)
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn watch_insertions(&self, item: &Element, handler: BatchHandler) -> Result<WatchId, HostError> {
        self.observers.observe(item, handler)
    }
}
