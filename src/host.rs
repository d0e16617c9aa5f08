//! Trait definitions for reading the current time and zone from the host.
//!
//! NOTE: This is a power user API. Most callers want `DatetimeValue::now`.

use crate::{provider::TimeZoneProvider, time::EpochNanoseconds, DatetimeResult, TimeZone};

/// The `HostClock` trait defines an accessor to the host's clock.
pub trait HostClock {
    fn get_host_epoch_nanoseconds(&self) -> DatetimeResult<EpochNanoseconds>;
}

/// The `HostTimeZone` trait defines the host's time zone.
pub trait HostTimeZone {
    fn get_host_time_zone(&self, provider: &impl TimeZoneProvider) -> DatetimeResult<TimeZone>;
}

/// `HostHooks` bundles a clock and a zone for `DatetimeValue::now_with_host`.
pub trait HostHooks: HostClock + HostTimeZone {}

/// A host frozen at the epoch in UTC.
impl HostClock for () {
    fn get_host_epoch_nanoseconds(&self) -> DatetimeResult<EpochNanoseconds> {
        Ok(EpochNanoseconds::from(0))
    }
}

impl HostTimeZone for () {
    fn get_host_time_zone(&self, _: &impl TimeZoneProvider) -> DatetimeResult<TimeZone> {
        Ok(TimeZone::utc())
    }
}

impl HostHooks for () {}

/// The system clock and zone, backed by `web-time` and `iana-time-zone`.
#[cfg(feature = "sys")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

#[cfg(feature = "sys")]
impl HostClock for SystemHost {
    fn get_host_epoch_nanoseconds(&self) -> DatetimeResult<EpochNanoseconds> {
        crate::sys::get_system_nanoseconds()
    }
}

#[cfg(feature = "sys")]
impl HostTimeZone for SystemHost {
    fn get_host_time_zone(&self, provider: &impl TimeZoneProvider) -> DatetimeResult<TimeZone> {
        crate::sys::get_system_timezone(provider)
    }
}

#[cfg(feature = "sys")]
impl HostHooks for SystemHost {}
