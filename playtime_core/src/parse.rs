// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Duration label parsing.
//!
//! Labels are colon-delimited: `MM:SS` or `H:MM:SS`. Parsing is lenient in
//! the way host pages need it to be. Surrounding whitespace is skipped,
//! trailing fields past the third are ignored, and a field without leading
//! digits counts as zero instead of rejecting the whole label.

use crate::time::DurationParts;

/// Parses a duration label into raw components.
///
/// Returns `None` when the text has fewer than two `:`-separated fields,
/// which is how non-duration text (badges like `"LIVE"`, empty strings) is
/// told apart from a duration.
///
/// ```
/// use playtime_core::parse::parse_duration;
/// use playtime_core::time::DurationParts;
///
/// assert_eq!(parse_duration("5:09"), Some(DurationParts::new(0, 5, 9)));
/// assert_eq!(parse_duration("1:02:03"), Some(DurationParts::new(1, 2, 3)));
/// assert_eq!(parse_duration("abc"), None);
/// ```
#[must_use]
pub fn parse_duration(text: &str) -> Option<DurationParts> {
    let mut fields = text.split(':');
    let first = fields.next()?;
    let second = fields.next()?;

    let parts = match fields.next() {
        None => DurationParts::new(0, field(first), field(second)),
        Some(third) => DurationParts::new(field(first), field(second), field(third)),
    };
    Some(parts)
}

/// Parses the leading base-10 integer of `text`.
///
/// Leading whitespace and a single `+` are skipped; digits are consumed up to
/// the first non-digit. Returns `None` if no digit follows, or the value does
/// not fit in a `u64`.
#[must_use]
pub fn parse_leading_int(text: &str) -> Option<u64> {
    let text = text.trim_start();
    let text = text.strip_prefix('+').unwrap_or(text);
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

/// An unparseable field contributes nothing.
fn field(text: &str) -> u64 {
    parse_leading_int(text).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_fields_are_minutes_and_seconds() {
        assert_eq!(parse_duration("5:09"), Some(DurationParts::new(0, 5, 9)));
        assert_eq!(parse_duration("0:45"), Some(DurationParts::new(0, 0, 45)));
    }

    #[test]
    fn three_fields_are_hours_minutes_seconds() {
        assert_eq!(
            parse_duration("1:02:03"),
            Some(DurationParts::new(1, 2, 3))
        );
    }

    #[test]
    fn extra_fields_are_ignored() {
        assert_eq!(
            parse_duration("1:02:03:04"),
            Some(DurationParts::new(1, 2, 3))
        );
    }

    #[test]
    fn single_field_is_not_a_duration() {
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("42"), None);
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        // Host labels carry indentation and newlines around the text.
        assert_eq!(
            parse_duration("\n    3:00\n  "),
            Some(DurationParts::new(0, 3, 0))
        );
    }

    #[test]
    fn unparseable_field_counts_as_zero() {
        assert_eq!(parse_duration("x:30"), Some(DurationParts::new(0, 0, 30)));
        assert_eq!(parse_duration("1::05"), Some(DurationParts::new(1, 0, 5)));
    }

    #[test]
    fn leading_int_stops_at_first_non_digit() {
        assert_eq!(parse_leading_int("12abc"), Some(12));
        assert_eq!(parse_leading_int("  7"), Some(7));
        assert_eq!(parse_leading_int("+3"), Some(3));
        assert_eq!(parse_leading_int("-3"), None);
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn leading_int_rejects_overflow() {
        assert_eq!(parse_leading_int("99999999999999999999999"), None);
    }
}
