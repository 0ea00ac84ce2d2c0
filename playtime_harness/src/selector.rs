// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small CSS selector subset for the in-memory page.
//!
//! Supported: type selectors, `#id`, `.class`, `[attr]`, `*`, and compounds
//! of those, joined by the descendant (whitespace) and child (`>`)
//! combinators. Anything else fails to parse and matches nothing.

use alloc::string::String;
use alloc::vec::Vec;

/// One compound selector, e.g. `span#title.big[hidden]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Step {
    pub(crate) tag: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<String>,
}

/// Relation of a step to the step on its left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Part {
    pub(crate) step: Step,
    /// `None` for the leftmost step.
    pub(crate) combinator: Option<Combinator>,
}

/// Parses a selector chain. Returns `None` for unsupported syntax.
pub(crate) fn parse(selector: &str) -> Option<Vec<Part>> {
    let mut parts = Vec::new();
    let mut pending: Option<Combinator> = None;

    for token in tokenize(selector) {
        if token == ">" {
            if pending.is_some() || parts.is_empty() {
                return None;
            }
            pending = Some(Combinator::Child);
            continue;
        }
        let step = parse_step(token)?;
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(Combinator::Descendant))
        };
        parts.push(Part { step, combinator });
    }

    if parts.is_empty() || pending.is_some() {
        return None;
    }
    Some(parts)
}

/// Splits on whitespace, keeping `>` as its own token.
fn tokenize(selector: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for word in selector.split_whitespace() {
        let mut rest = word;
        while let Some(idx) = rest.find('>') {
            if idx > 0 {
                tokens.push(&rest[..idx]);
            }
            tokens.push(">");
            rest = &rest[idx + 1..];
        }
        if !rest.is_empty() {
            tokens.push(rest);
        }
    }
    tokens
}

fn parse_step(token: &str) -> Option<Step> {
    let mut step = Step::default();
    let bytes = token.as_bytes();
    let mut pos = 0;

    // Leading type selector or `*`.
    let end = ident_end(token, pos);
    if end > pos {
        step.tag = Some(token[pos..end].into());
        pos = end;
    } else if bytes.first() == Some(&b'*') {
        pos = 1;
    }

    while pos < bytes.len() {
        match bytes[pos] {
            b'#' => {
                let end = ident_end(token, pos + 1);
                if end == pos + 1 {
                    return None;
                }
                step.id = Some(token[pos + 1..end].into());
                pos = end;
            }
            b'.' => {
                let end = ident_end(token, pos + 1);
                if end == pos + 1 {
                    return None;
                }
                step.classes.push(token[pos + 1..end].into());
                pos = end;
            }
            b'[' => {
                let close = token[pos..].find(']')? + pos;
                let name = token[pos + 1..close].trim();
                if name.is_empty() || ident_end(name, 0) != name.len() {
                    return None;
                }
                step.attrs.push(name.into());
                pos = close + 1;
            }
            _ => return None,
        }
    }
    Some(step)
}

fn ident_end(s: &str, start: usize) -> usize {
    s[start..]
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .map_or(s.len(), |i| start + i)
}
