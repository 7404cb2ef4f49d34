//! Wall-clock times of day at minute granularity.
//!
//! Timetable times are stored as `HH:MM` strings with no date component.
//! Arithmetic never wraps at midnight: a show running late produces `25:10`,
//! which formats and parses back unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Minutes in one hour.
pub const MINUTES_PER_HOUR: u32 = 60;

/// Seconds in one minute.
pub const SECONDS_PER_MINUTE: i64 = 60;

/// Largest hour a stored time can carry (three digits).
pub const MAX_HOUR: u32 = 999;

/// A time of day, counted in minutes since 00:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u32);

impl ClockTime {
    /// Latest representable time, `999:59`.
    pub const MAX: Self = Self(MAX_HOUR * MINUTES_PER_HOUR + MINUTES_PER_HOUR - 1);

    /// Build a time from minutes since midnight.
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    /// Build a time from an hour and minute pair.
    pub const fn from_hm(hour: u32, minute: u32) -> Self {
        Self(hour * MINUTES_PER_HOUR + minute)
    }

    /// Minutes since midnight.
    pub const fn minutes(self) -> u32 {
        self.0
    }

    /// The time `minutes` later. Does not wrap past 24:00 and saturates at
    /// [`ClockTime::MAX`].
    pub const fn plus(self, minutes: u32) -> Self {
        let sum = self.0.saturating_add(minutes);
        if sum > Self::MAX.0 {
            Self::MAX
        } else {
            Self(sum)
        }
    }

    /// Parse an optional `HH:MM` value, treating blank strings as absent.
    pub fn parse_optional(value: Option<&str>) -> Result<Option<Self>, CoreError> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => text.parse().map(Some),
        }
    }
}

impl FromStr for ClockTime {
    type Err = CoreError;

    /// Accepts `HH:MM` and `HH:MM:SS` (as returned by PostgreSQL `time`).
    /// Seconds are ignored. Hours above [`MAX_HOUR`] are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::Validation(format!("Invalid time of day '{s}', expected HH:MM"));

        let mut parts = s.trim().split(':');
        let hour = parse_component(parts.next()).ok_or_else(invalid)?;
        let minute = parse_component(parts.next()).ok_or_else(invalid)?;
        if let Some(seconds) = parts.next() {
            parse_component(Some(seconds)).ok_or_else(invalid)?;
        }
        if parts.next().is_some() || minute >= MINUTES_PER_HOUR {
            return Err(invalid());
        }
        if hour > MAX_HOUR {
            return Err(CoreError::Validation(format!(
                "Invalid time of day '{s}', hour must be at most {MAX_HOUR}"
            )));
        }

        Ok(Self::from_hm(hour, minute))
    }
}

fn parse_component(part: Option<&str>) -> Option<u32> {
    let part = part?;
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}",
            self.0 / MINUTES_PER_HOUR,
            self.0 % MINUTES_PER_HOUR
        )
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Round a duration in seconds up to whole minutes.
///
/// Returns `None` for zero or negative totals: no usable estimate.
pub fn seconds_to_minutes_ceil(seconds: i64) -> Option<u32> {
    if seconds <= 0 {
        return None;
    }
    let minutes = (seconds + SECONDS_PER_MINUTE - 1) / SECONDS_PER_MINUTE;
    u32::try_from(minutes).ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
