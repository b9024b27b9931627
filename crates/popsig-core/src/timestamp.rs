//! FILETIME-style timestamps
//!
//! The authority counts 100-nanosecond ticks since 1601-01-01 UTC. Only
//! whole seconds are taken from the clock; the sub-second part is always
//! zero in generated values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Seconds between 1601-01-01 and 1970-01-01
pub const FILETIME_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;

/// 100ns ticks per second
pub const TICKS_PER_SECOND: u64 = 10_000_000;

/// Count of 100ns intervals since 1601-01-01 UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Current wall-clock time
    pub fn now() -> Result<Self> {
        Self::from_unix_seconds(Utc::now().timestamp())
    }

    /// `(unix_seconds + 11644473600) * 10_000_000`
    pub fn from_unix_seconds(unix_seconds: i64) -> Result<Self> {
        let since_1601 = unix_seconds
            .checked_add(FILETIME_EPOCH_OFFSET_SECS)
            .filter(|secs| *secs >= 0)
            .ok_or_else(|| {
                Error::Encoding(format!("unix time {} is before 1601-01-01", unix_seconds))
            })?;
        (since_1601 as u64)
            .checked_mul(TICKS_PER_SECOND)
            .map(Self)
            .ok_or_else(|| Error::Encoding(format!("unix time {} overflows FILETIME", unix_seconds)))
    }

    /// Wrap a raw FILETIME tick count
    pub const fn from_filetime(ticks: u64) -> Self {
        Self(ticks)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Big-endian encoding as embedded in payloads and envelopes
    pub const fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    pub const fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }

    /// Whole seconds since the Unix epoch (negative before 1970)
    pub fn unix_seconds(&self) -> i64 {
        (self.0 / TICKS_PER_SECOND) as i64 - FILETIME_EPOCH_OFFSET_SECS
    }

    /// Convert to a UTC date-time for display
    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        let nanos = (self.0 % TICKS_PER_SECOND) as u32 * 100;
        DateTime::<Utc>::from_timestamp(self.unix_seconds(), nanos)
            .ok_or_else(|| Error::Encoding(format!("FILETIME {} out of range", self.0)))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
