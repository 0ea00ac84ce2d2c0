// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Choosing which items still count toward the total.
//!
//! Items before the one currently playing are already watched and are left
//! out. The playing item itself still counts.

use crate::parse::parse_leading_int;

/// How the currently playing item is identified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActiveHint {
    /// Explicit 1-based position, typically from an `index` query value.
    ///
    /// `Index(0)` and out-of-range positions identify no item.
    Index(usize),
    /// The first item carrying the active marker attribute.
    Marker,
}

impl ActiveHint {
    /// Builds a hint from a raw `index` query value.
    ///
    /// An absent or empty value falls back to [`Marker`](Self::Marker). A
    /// present but unparseable value becomes `Index(0)`, which selects no item
    /// and therefore keeps the whole list.
    #[must_use]
    pub fn from_query(index: Option<&str>) -> Self {
        match index {
            None | Some("") => Self::Marker,
            Some(raw) => Self::Index(
                parse_leading_int(raw)
                    .and_then(|n| usize::try_from(n).ok())
                    .unwrap_or(0),
            ),
        }
    }
}

/// Returns the zero-based position of the active item, if one is identified.
pub fn active_position<T>(
    items: &[T],
    hint: ActiveHint,
    mut is_active: impl FnMut(&T) -> bool,
) -> Option<usize> {
    match hint {
        ActiveHint::Index(n) => n.checked_sub(1).filter(|&pos| pos < items.len()),
        ActiveHint::Marker => items.iter().position(is_active),
    }
}

/// Returns the items still pending: from the active item to the end.
///
/// With no identifiable active item the whole list is pending.
pub fn select_pending<T>(items: &[T], hint: ActiveHint, is_active: impl FnMut(&T) -> bool) -> &[T] {
    match active_position(items, hint, is_active) {
        Some(pos) => &items[pos..],
        None => items,
    }
}
