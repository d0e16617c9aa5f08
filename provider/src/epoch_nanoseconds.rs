use crate::ZoneProviderError;

/// Number of nanoseconds in a day
#[doc(hidden)]
pub const NS_PER_DAY: u64 = MS_PER_DAY as u64 * 1_000_000;

/// Milliseconds per day constant: 8.64e+7
const MS_PER_DAY: u32 = 24 * 60 * 60 * 1000;
/// Max Instant nanosecond constant
#[doc(hidden)]
pub const NS_MAX_INSTANT: i128 = NS_PER_DAY as i128 * 100_000_000i128;
/// Min Instant nanosecond constant
#[doc(hidden)]
pub const NS_MIN_INSTANT: i128 = -NS_MAX_INSTANT;

/// A count of nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct EpochNanoseconds(pub(crate) i128);

impl From<i128> for EpochNanoseconds {
    fn from(value: i128) -> Self {
        Self(value)
    }
}

impl EpochNanoseconds {
    pub fn as_i128(&self) -> i128 {
        self.0
    }

    /// Returns the floored epoch milliseconds of this value.
    pub fn epoch_milliseconds(&self) -> i64 {
        self.0.div_euclid(1_000_000) as i64
    }

    /// Returns the floored epoch seconds of this value.
    pub fn epoch_seconds(&self) -> i64 {
        self.0.div_euclid(1_000_000_000) as i64
    }

    pub fn from_seconds(seconds: i64) -> Self {
        Self(i128::from(seconds) * 1_000_000_000)
    }

    pub fn check_validity(&self) -> Result<(), ZoneProviderError> {
        if !is_valid_epoch_nanos(&self.0) {
            return Err(ZoneProviderError::InstantOutOfRange);
        }
        Ok(())
    }
}

/// Utility for determining if the nanos are within a valid range.
#[inline]
#[must_use]
pub fn is_valid_epoch_nanos(nanos: &i128) -> bool {
    (NS_MIN_INSTANT..=NS_MAX_INSTANT).contains(nanos)
}
