//! The `Instant` held by every `DatetimeValue`.

use num_traits::FromPrimitive;
use zone_provider::epoch_nanoseconds::{is_valid_epoch_nanos, EpochNanoseconds};

use crate::{equations, DatetimeError, DatetimeResult, NS_PER_MS};

/// A point in time as nanoseconds since the Unix epoch, or the `Invalid`
/// sentinel.
///
/// Valid instants are always within ±8.64e15 milliseconds of the epoch.
/// Every constructor that receives an out of range or non-finite value
/// produces `Invalid`; there is no partially valid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instant {
    Valid(EpochNanoseconds),
    Invalid,
}

impl Instant {
    /// Creates an `Instant` from nanoseconds since the epoch.
    #[must_use]
    pub fn from_epoch_nanoseconds(nanoseconds: i128) -> Self {
        if is_valid_epoch_nanos(&nanoseconds) {
            Self::Valid(EpochNanoseconds::from(nanoseconds))
        } else {
            Self::Invalid
        }
    }

    /// Creates an `Instant` from milliseconds since the epoch.
    #[must_use]
    pub fn from_epoch_milliseconds(milliseconds: i64) -> Self {
        Self::from_epoch_nanoseconds(i128::from(milliseconds) * NS_PER_MS)
    }

    /// Creates an `Instant` from a time value after applying `TimeClip`.
    #[must_use]
    pub fn from_time_value(time_value: f64) -> Self {
        let clipped = equations::time_clip(time_value);
        match i64::from_f64(clipped) {
            Some(ms) => Self::from_epoch_milliseconds(ms),
            None => Self::Invalid,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Returns the epoch nanoseconds, failing for `Invalid`.
    pub fn epoch_nanoseconds(&self) -> DatetimeResult<EpochNanoseconds> {
        match self {
            Self::Valid(ns) => Ok(*ns),
            Self::Invalid => Err(DatetimeError::invalid_instant()),
        }
    }

    /// Returns the floored epoch milliseconds, failing for `Invalid`.
    pub fn epoch_milliseconds(&self) -> DatetimeResult<i64> {
        self.epoch_nanoseconds().map(|ns| ns.epoch_milliseconds())
    }

    /// Returns the time value of this instant: `NaN` when `Invalid`.
    #[must_use]
    pub fn time_value(&self) -> f64 {
        match self {
            Self::Valid(ns) => ns.epoch_milliseconds() as f64,
            Self::Invalid => f64::NAN,
        }
    }

    /// The nanoseconds past the last whole millisecond, `0..=999_999`.
    pub fn submillisecond_nanoseconds(&self) -> DatetimeResult<u32> {
        self.epoch_nanoseconds()
            .map(|ns| ns.as_i128().rem_euclid(NS_PER_MS) as u32)
    }

    /// Replaces the millisecond part of this instant with a new time value,
    /// keeping the sub-millisecond nanoseconds.
    pub(crate) fn with_time_value(&self, time_value: f64) -> Self {
        let remainder = match self {
            Self::Valid(ns) => ns.as_i128().rem_euclid(NS_PER_MS),
            Self::Invalid => 0,
        };
        match Self::from_time_value(time_value) {
            Self::Valid(ns) => Self::from_epoch_nanoseconds(ns.as_i128() + remainder),
            Self::Invalid => Self::Invalid,
        }
    }
}

impl From<EpochNanoseconds> for Instant {
    fn from(value: EpochNanoseconds) -> Self {
        Self::from_epoch_nanoseconds(value.as_i128())
    }
}
