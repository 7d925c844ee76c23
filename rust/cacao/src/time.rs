//! Second-precision timestamps and their canonical ISO-8601 rendering.

use crate::CacaoError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, time::SystemTime};

/// `0000-01-01T00:00:00Z`
const MIN_SECONDS: i64 = -62_167_219_200;
/// `9999-12-31T23:59:59Z`
const MAX_SECONDS: i64 = 253_402_300_799;

/// Seconds since the Unix epoch, restricted to dates with a four digit year.
///
/// Sub-second precision is never stored: conversions from [`DateTime`] or
/// [`SystemTime`] truncate toward the start of the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from seconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`CacaoError::InvalidTimestamp`] when the seconds fall outside
    /// of years 0 through 9999.
    pub fn from_unix(seconds: i64) -> Result<Self, CacaoError> {
        if (MIN_SECONDS..=MAX_SECONDS).contains(&seconds) {
            Ok(Self(seconds))
        } else {
            Err(CacaoError::InvalidTimestamp(seconds))
        }
    }

    /// The current time, truncated to the second.
    ///
    /// A clock reporting a date outside of years 0 through 9999 is clamped
    /// to the nearest end of the supported range.
    #[must_use]
    pub fn now() -> Self {
        Self::clamped(Utc::now().timestamp())
    }

    fn clamped(seconds: i64) -> Self {
        Self(seconds.clamp(MIN_SECONDS, MAX_SECONDS))
    }

    /// Seconds since the Unix epoch.
    #[must_use]
    pub const fn as_unix(&self) -> i64 {
        self.0
    }

    /// Offsets this timestamp by `seconds`.
    ///
    /// # Errors
    ///
    /// Returns [`CacaoError::InvalidTimestamp`] when the result leaves the
    /// supported range.
    pub fn checked_add(&self, seconds: i64) -> Result<Self, CacaoError> {
        let sum = self
            .0
            .checked_add(seconds)
            .ok_or(CacaoError::InvalidTimestamp(self.0))?;
        Self::from_unix(sum)
    }

    /// Renders `YYYY-MM-DDTHH:MM:SSZ` in UTC.
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        match DateTime::<Utc>::from_timestamp(self.0, 0) {
            Some(datetime) => datetime.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            // Construction keeps the value within chrono's range
            None => unreachable!("timestamp {} outside of the supported range", self.0),
        }
    }
}

/// Renders seconds since the epoch as the canonical message timestamp.
#[must_use]
pub fn to_canonical_timestamp(timestamp: Timestamp) -> String {
    timestamp.to_iso8601()
}

impl TryFrom<DateTime<Utc>> for Timestamp {
    type Error = CacaoError;

    fn try_from(datetime: DateTime<Utc>) -> Result<Self, Self::Error> {
        Self::from_unix(datetime.timestamp())
    }
}

impl TryFrom<SystemTime> for Timestamp {
    type Error = CacaoError;

    fn try_from(time: SystemTime) -> Result<Self, Self::Error> {
        Self::try_from(DateTime::<Utc>::from(time))
    }
}

impl TryFrom<i64> for Timestamp {
    type Error = CacaoError;

    fn try_from(seconds: i64) -> Result<Self, Self::Error> {
        Self::from_unix(seconds)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let seconds = i64::deserialize(deserializer)?;
        Self::from_unix(seconds).map_err(serde::de::Error::custom)
    }
}
