// ============================================================================
// Ledger Time
// Seconds since the ledger epoch (2000-01-01T00:00:00Z)
// ============================================================================

use chrono::{DateTime, TimeZone, Utc};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Seconds between the Unix epoch and the ledger epoch
pub const LEDGER_EPOCH_OFFSET: i64 = 946_684_800;

/// Seconds in the 365-day year used by interest rates
pub const SECONDS_PER_YEAR: i64 = 365 * 24 * 3600;

/// A point in time in ledger-epoch seconds.
///
/// Unix timestamps only enter through [`LedgerTime::from_unix_seconds`] or
/// the `DateTime<Utc>` conversion, so the two epochs never mix silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LedgerTime(i64);

impl LedgerTime {
    /// The ledger epoch itself
    pub const EPOCH: Self = Self(0);

    #[inline]
    pub const fn from_ledger_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    #[inline]
    pub const fn from_unix_seconds(seconds: i64) -> Self {
        Self(seconds - LEDGER_EPOCH_OFFSET)
    }

    #[inline]
    pub const fn as_ledger_seconds(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn as_unix_seconds(&self) -> i64 {
        self.0 + LEDGER_EPOCH_OFFSET
    }

    pub fn now() -> Self {
        Utc::now().into()
    }

    /// Shift by a number of seconds
    #[inline]
    pub const fn plus_seconds(&self, seconds: i64) -> Self {
        Self(self.0 + seconds)
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.as_unix_seconds(), 0).single()
    }
}

impl From<DateTime<Utc>> for LedgerTime {
    fn from(value: DateTime<Utc>) -> Self {
        Self::from_unix_seconds(value.timestamp())
    }
}

impl FromStr for LedgerTime {
    type Err = ParseIntError;

    /// Ledger-epoch seconds as a decimal integer
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        text.trim().parse().map(Self)
    }
}

impl fmt::Display for LedgerTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
