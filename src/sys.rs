use crate::provider::TimeZoneProvider;
use crate::time::EpochNanoseconds;
use crate::DatetimeError;
use crate::DatetimeResult;
use crate::TimeZone;

use web_time::{SystemTime, UNIX_EPOCH};

/// Reads the host zone id and resolves it with `provider`.
#[inline]
pub(crate) fn get_system_timezone(provider: &impl TimeZoneProvider) -> DatetimeResult<TimeZone> {
    let identifier = iana_time_zone::get_timezone()
        .map_err(|_| DatetimeError::general("Error fetching system time zone"))?;
    #[cfg(feature = "log")]
    log::trace!("host time zone is {identifier}");
    TimeZone::try_from_identifier_str_with_provider(&identifier, provider)
}

/// Returns the system time in nanoseconds.
pub(crate) fn get_system_nanoseconds() -> DatetimeResult<EpochNanoseconds> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| DatetimeError::general("Error fetching system time"))?;
    let nanoseconds = i128::try_from(elapsed.as_nanos())
        .map_err(|_| DatetimeError::general("System time is out of range"))?;
    Ok(EpochNanoseconds::from(nanoseconds))
}
