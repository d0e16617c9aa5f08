//! The `TimeZoneProvider` trait.

use alloc::borrow::Cow;
use alloc::string::String;

use crate::{epoch_nanoseconds::EpochNanoseconds, utils, ZoneProviderError};

pub type ZoneProviderResult<T> = Result<T, ZoneProviderError>;

/// `UtcOffsetSeconds` represents the amount of seconds we need to add to the UTC to reach the local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct UtcOffsetSeconds(pub i64);

impl UtcOffsetSeconds {
    pub fn as_nanoseconds(&self) -> i128 {
        i128::from(self.0) * 1_000_000_000
    }
}

/// A wall-clock date and time with no associated offset.
///
/// The provider does not validate field ranges; callers are expected to
/// pass balanced values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalDateTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
    pub microsecond: u16,
    pub nanosecond: u16,
}

impl LocalDateTime {
    /// The seconds of this wall-clock value as if it were in UTC.
    pub fn local_seconds(&self) -> i64 {
        let days = utils::epoch_days_from_gregorian_date(self.year, self.month, self.day);
        days * utils::SECONDS_PER_DAY
            + i64::from(self.hour) * 3600
            + i64::from(self.minute) * 60
            + i64::from(self.second)
    }

    fn subsecond_nanoseconds(&self) -> i128 {
        i128::from(self.millisecond) * 1_000_000
            + i128::from(self.microsecond) * 1_000
            + i128::from(self.nanosecond)
    }

    /// Convert this wall-clock value to nanoseconds as if it were in UTC.
    pub fn as_nanoseconds(&self) -> EpochNanoseconds {
        EpochNanoseconds(
            i128::from(self.local_seconds()) * 1_000_000_000 + self.subsecond_nanoseconds(),
        )
    }
}

/// An EpochNanoseconds and a UTC offset
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EpochNanosecondsAndOffset {
    /// The resolved nanoseconds value
    pub ns: EpochNanoseconds,
    /// The resolved time zone offset corresponding
    /// to the nanoseconds value, in the given time zone
    pub offset: UtcOffsetSeconds,
}

/// `TimeZoneTransitionInfo` represents information about a timezone transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeZoneTransitionInfo {
    /// The transition time epoch at which the offset needs to be applied.
    pub transition_epoch: Option<i64>,
    /// The time zone offset in seconds.
    pub offset: UtcOffsetSeconds,
}

/// The offsets on either side of a skipped range of wall-clock time.
///
/// When a local time falls inside a gap there is no candidate instant,
/// so the offsets in effect before and after the gap are reported instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GapEntryOffsets {
    pub offset_before: UtcOffsetSeconds,
    pub offset_after: UtcOffsetSeconds,
    pub transition_epoch: EpochNanoseconds,
}

/// The potential candidates for a given local datetime
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CandidateEpochNanoseconds {
    Zero(GapEntryOffsets),
    One(EpochNanosecondsAndOffset),
    Two([EpochNanosecondsAndOffset; 2]),
}

impl CandidateEpochNanoseconds {
    pub fn as_slice(&self) -> &[EpochNanosecondsAndOffset] {
        match *self {
            Self::Zero(..) => &[],
            Self::One(ref one) => core::slice::from_ref(one),
            Self::Two(ref multiple) => &multiple[..],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(*self, Self::Zero(..))
    }

    pub fn len(&self) -> usize {
        match *self {
            Self::Zero(..) => 0,
            Self::One(..) => 1,
            Self::Two(..) => 2,
        }
    }

    pub fn first(&self) -> Option<EpochNanosecondsAndOffset> {
        match *self {
            Self::Zero(..) => None,
            Self::One(one) | Self::Two([one, _]) => Some(one),
        }
    }

    pub fn last(&self) -> Option<EpochNanosecondsAndOffset> {
        match *self {
            Self::Zero(..) => None,
            Self::One(last) | Self::Two([_, last]) => Some(last),
        }
    }
}

/// The `TimeZoneProvider` trait provides methods required for a provider
/// to implement in order to source time zone data from that provider.
pub trait TimeZoneProvider {
    /// Returns the provider's spelling of `ident`, or an error if the
    /// identifier is unknown.
    fn normalize_identifier(&self, ident: &'_ [u8]) -> ZoneProviderResult<Cow<'_, str>>;

    /// Returns the instants that display `local_datetime` in the zone.
    fn get_named_tz_epoch_nanoseconds(
        &self,
        identifier: &str,
        local_datetime: LocalDateTime,
    ) -> ZoneProviderResult<CandidateEpochNanoseconds>;

    /// Returns the offset in effect at `epoch_nanoseconds`.
    fn get_named_tz_offset_nanoseconds(
        &self,
        identifier: &str,
        epoch_nanoseconds: i128,
    ) -> ZoneProviderResult<TimeZoneTransitionInfo>;
}

impl<T: TimeZoneProvider + ?Sized> TimeZoneProvider for &T {
    fn normalize_identifier(&self, ident: &'_ [u8]) -> ZoneProviderResult<Cow<'_, str>> {
        (**self).normalize_identifier(ident)
    }

    fn get_named_tz_epoch_nanoseconds(
        &self,
        identifier: &str,
        local_datetime: LocalDateTime,
    ) -> ZoneProviderResult<CandidateEpochNanoseconds> {
        (**self).get_named_tz_epoch_nanoseconds(identifier, local_datetime)
    }

    fn get_named_tz_offset_nanoseconds(
        &self,
        identifier: &str,
        epoch_nanoseconds: i128,
    ) -> ZoneProviderResult<TimeZoneTransitionInfo> {
        (**self).get_named_tz_offset_nanoseconds(identifier, epoch_nanoseconds)
    }
}

/// A provider with no time zone data.
///
/// Only offset time zones can be resolved when this provider is in use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverProvider;

impl TimeZoneProvider for NeverProvider {
    fn normalize_identifier(&self, ident: &'_ [u8]) -> ZoneProviderResult<Cow<'_, str>> {
        Err(ZoneProviderError::UnknownIdentifier(
            String::from_utf8_lossy(ident).into_owned(),
        ))
    }

    fn get_named_tz_epoch_nanoseconds(
        &self,
        _: &str,
        _: LocalDateTime,
    ) -> ZoneProviderResult<CandidateEpochNanoseconds> {
        Err(ZoneProviderError::Unavailable)
    }

    fn get_named_tz_offset_nanoseconds(
        &self,
        _: &str,
        _: i128,
    ) -> ZoneProviderResult<TimeZoneTransitionInfo> {
        Err(ZoneProviderError::Unavailable)
    }
}
