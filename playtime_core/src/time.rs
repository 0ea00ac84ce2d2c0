// Copyright 2026 the Playtime Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Duration arithmetic.
//!
//! [`PlaylistTime`] is the running total of a summary cycle. Durations are
//! added raw with [`add_raw`](PlaylistTime::add_raw) and then carried into
//! range by [`normalize`](PlaylistTime::normalize). [`DurationParts`] is the
//! un-normalized `(hours, minutes, seconds)` triple read from one label.

use core::fmt;

/// Seconds per minute, and minutes per hour.
const SEXAGESIMAL: u64 = 60;

/// Raw hour, minute and second components of a single duration label.
///
/// The fields are not normalized: a label like `"0:75"` yields
/// `minutes: 0, seconds: 75`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DurationParts {
    /// Whole hours.
    pub hours: u64,
    /// Whole minutes.
    pub minutes: u64,
    /// Whole seconds.
    pub seconds: u64,
}

impl DurationParts {
    /// A zero-length duration.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Creates a triple from its components.
    #[inline]
    #[must_use]
    pub const fn new(hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// Returns the total length in seconds, saturating at `u64::MAX`.
    #[must_use]
    pub const fn total_seconds(self) -> u64 {
        self.hours
            .saturating_mul(SEXAGESIMAL * SEXAGESIMAL)
            .saturating_add(self.minutes.saturating_mul(SEXAGESIMAL))
            .saturating_add(self.seconds)
    }
}

/// Running total of a playlist summary.
///
/// After every call to [`normalize`](Self::normalize), `seconds < 60` and
/// `minutes < 60` hold. Hours are unbounded.
///
/// `Display` writes `HH:MM:SS`, each field zero-padded to two digits. Hour
/// counts of three or more digits widen the first field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PlaylistTime {
    hours: u64,
    minutes: u64,
    seconds: u64,
}

impl PlaylistTime {
    /// Creates a zeroed total.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }

    /// Sets every field back to zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Adds `parts` field by field without carrying.
    ///
    /// Must be followed by [`normalize`](Self::normalize) before the total is
    /// read or rendered.
    pub fn add_raw(&mut self, parts: DurationParts) {
        self.hours = self.hours.saturating_add(parts.hours);
        self.minutes = self.minutes.saturating_add(parts.minutes);
        self.seconds = self.seconds.saturating_add(parts.seconds);
    }

    /// Carries overflowing seconds into minutes and minutes into hours.
    pub fn normalize(&mut self) {
        while self.seconds >= SEXAGESIMAL {
            self.minutes = self.minutes.saturating_add(self.seconds / SEXAGESIMAL);
            self.seconds %= SEXAGESIMAL;
        }
        while self.minutes >= SEXAGESIMAL {
            self.hours = self.hours.saturating_add(self.minutes / SEXAGESIMAL);
            self.minutes %= SEXAGESIMAL;
        }
    }

    /// Adds `parts` and restores the normalized invariant.
    pub fn accumulate(&mut self, parts: DurationParts) {
        self.add_raw(parts);
        self.normalize();
    }

    /// Hours of the total.
    #[inline]
    #[must_use]
    pub const fn hours(&self) -> u64 {
        self.hours
    }

    /// Minutes of the total.
    #[inline]
    #[must_use]
    pub const fn minutes(&self) -> u64 {
        self.minutes
    }

    /// Seconds of the total.
    #[inline]
    #[must_use]
    pub const fn seconds(&self) -> u64 {
        self.seconds
    }

    /// Returns the total as `DurationParts`.
    #[must_use]
    pub const fn parts(&self) -> DurationParts {
        DurationParts::new(self.hours, self.minutes, self.seconds)
    }

    /// Returns the total length in seconds, saturating at `u64::MAX`.
    #[must_use]
    pub const fn total_seconds(&self) -> u64 {
        self.parts().total_seconds()
    }

    /// Returns `true` if nothing has been accumulated since the last reset.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }
}

impl fmt::Display for PlaylistTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}
