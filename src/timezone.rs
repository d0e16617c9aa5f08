//! This module implements `TimeZone` and offset resolution.

use alloc::{borrow::Cow, format, string::String, sync::Arc};
use core::{fmt, iter::Peekable, str::Chars};

use crate::{
    components::DateTimeComponents,
    options::Disambiguation,
    provider::{CandidateEpochNanoseconds, LocalDateTime, TimeZoneProvider},
    DatetimeError, DatetimeResult, Sign, NS_PER_MINUTE,
};

#[cfg(feature = "compiled_data")]
use crate::provider::CompiledTzdbProvider;
#[cfg(feature = "compiled_data")]
use std::sync::{LazyLock, Mutex};

/// The bundled tzdb provider used by the methods without a provider argument.
#[cfg(feature = "compiled_data")]
pub static TZ_PROVIDER: LazyLock<Mutex<CompiledTzdbProvider>> =
    LazyLock::new(|| Mutex::new(CompiledTzdbProvider::default()));

const UTC_IDENTIFIER: &str = "UTC";
const MAX_OFFSET_MINUTES: i16 = 23 * 60 + 59;

/// A time zone: either a named zone resolved through a provider or a
/// fixed offset in minutes east of UTC.
///
/// Named identifiers are shared and never mutated; changing a value's
/// zone replaces the whole `TimeZone`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimeZone {
    Named(ZoneName),
    OffsetMinutes(i16),
}

/// A zone identifier in the spelling of the provider that resolved it.
///
/// Only [`TimeZone::try_from_identifier_str_with_provider`] and its
/// compiled variants create one, so a `ZoneName` never holds an
/// identifier that failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneName(Arc<str>);

impl ZoneName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for TimeZone {
    fn default() -> Self {
        Self::Named(ZoneName(Arc::from(UTC_IDENTIFIER)))
    }
}

impl TimeZone {
    /// The `UTC` time zone.
    #[must_use]
    pub fn utc() -> Self {
        Self::default()
    }

    /// Parses a `TimeZone` from an identifier or an offset string.
    ///
    /// Named identifiers are normalized to the provider's spelling; an
    /// unknown identifier fails with `InvalidZoneId`.
    pub fn try_from_identifier_str_with_provider(
        source: &str,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<Self> {
        if source == "Z" {
            return Ok(Self::OffsetMinutes(0));
        }
        let mut cursor = source.chars().peekable();
        if cursor.peek().is_some_and(is_ascii_sign) {
            return parse_offset(&mut cursor);
        }
        if source.eq_ignore_ascii_case(UTC_IDENTIFIER) {
            return Ok(Self::utc());
        }
        let normalized = provider
            .normalize_identifier(source.as_bytes())
            .map_err(|_| {
                DatetimeError::invalid_zone()
                    .with_message(format!("Invalid time zone identifier: {source}"))
            })?;
        #[cfg(feature = "log")]
        log::trace!("resolved time zone {source} as {normalized}");
        Ok(Self::Named(ZoneName(Arc::from(normalized.as_ref()))))
    }

    /// Returns the identifier of this zone; offsets render as `±HH:MM`.
    #[must_use]
    pub fn identifier(&self) -> Cow<'_, str> {
        match self {
            Self::Named(name) => Cow::Borrowed(name.as_str()),
            Self::OffsetMinutes(minutes) => {
                let sign = Sign::from(minutes.signum() as i8);
                let abs = minutes.unsigned_abs();
                Cow::Owned(format!("{}{:02}:{:02}", sign.as_char(), abs / 60, abs % 60))
            }
        }
    }

    fn is_utc(&self) -> bool {
        match self {
            Self::Named(name) => name.as_str() == UTC_IDENTIFIER,
            Self::OffsetMinutes(minutes) => *minutes == 0,
        }
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier())
    }
}

impl TimeZone {
    /// Returns the offset in nanoseconds east of UTC at `utc_epoch`.
    pub fn get_offset_nanos_for(
        &self,
        utc_epoch: i128,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<i128> {
        match self {
            Self::OffsetMinutes(minutes) => Ok(i128::from(*minutes) * NS_PER_MINUTE),
            _ if self.is_utc() => Ok(0),
            Self::Named(identifier) => Ok(provider
                .get_named_tz_offset_nanoseconds(identifier.as_str(), utc_epoch)?
                .offset
                .as_nanoseconds()),
        }
    }

    /// Returns the wall clock components of `utc_epoch` in this zone.
    pub(crate) fn get_components_for(
        &self,
        utc_epoch: i128,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<DateTimeComponents> {
        let offset = self.get_offset_nanos_for(utc_epoch, provider)?;
        DateTimeComponents::from_local_nanoseconds(utc_epoch + offset)
    }

    /// Resolves a wall clock time in this zone to epoch nanoseconds.
    ///
    /// The result is not range checked.
    pub fn get_epoch_nanoseconds_for(
        &self,
        local: LocalDateTime,
        disambiguation: Disambiguation,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<i128> {
        let local_ns = local.as_nanoseconds().as_i128();
        let identifier = match self {
            Self::OffsetMinutes(minutes) => {
                return Ok(local_ns - i128::from(*minutes) * NS_PER_MINUTE)
            }
            _ if self.is_utc() => return Ok(local_ns),
            Self::Named(identifier) => identifier.as_str(),
        };
        let candidates = provider.get_named_tz_epoch_nanoseconds(identifier, local)?;
        #[cfg(feature = "log")]
        log::trace!("{} candidates for {local:?} in {identifier}", candidates.len());
        disambiguate(local_ns, candidates, disambiguation)
    }
}

fn disambiguate(
    local_ns: i128,
    candidates: CandidateEpochNanoseconds,
    disambiguation: Disambiguation,
) -> DatetimeResult<i128> {
    match (candidates, disambiguation) {
        (CandidateEpochNanoseconds::One(one), _) => Ok(one.ns.as_i128()),
        (_, Disambiguation::Reject) => {
            Err(DatetimeError::range().with_message("Rejecting ambiguous wall clock time."))
        }
        (
            CandidateEpochNanoseconds::Two([first, _]),
            Disambiguation::Compatible | Disambiguation::Earlier,
        ) => Ok(first.ns.as_i128()),
        (CandidateEpochNanoseconds::Two([_, last]), Disambiguation::Later) => Ok(last.ns.as_i128()),
        // A skipped time is read with the offset from before the gap to move
        // forward, or the offset after the gap to move backward.
        (CandidateEpochNanoseconds::Zero(gap), Disambiguation::Earlier) => {
            Ok(local_ns - gap.offset_after.as_nanoseconds())
        }
        (CandidateEpochNanoseconds::Zero(gap), _) => {
            Ok(local_ns - gap.offset_before.as_nanoseconds())
        }
    }
}

#[cfg(feature = "compiled_data")]
impl TimeZone {
    /// Parses a `TimeZone` with the bundled tzdb provider.
    pub fn try_from_str(source: &str) -> DatetimeResult<Self> {
        let provider = TZ_PROVIDER
            .lock()
            .map_err(|_| DatetimeError::general("Unable to acquire lock"))?;
        Self::try_from_identifier_str_with_provider(source, &*provider)
    }
}

#[cfg(feature = "sys")]
impl TimeZone {
    /// Returns the host's time zone.
    pub fn host() -> DatetimeResult<Self> {
        let provider = TZ_PROVIDER
            .lock()
            .map_err(|_| DatetimeError::general("Unable to acquire lock"))?;
        crate::sys::get_system_timezone(&*provider)
    }
}

#[inline]
pub(crate) fn parse_offset(chars: &mut Peekable<Chars<'_>>) -> DatetimeResult<TimeZone> {
    let sign = chars.next().map_or(1, |c| if c == '+' { 1 } else { -1 });
    let hours = parse_digit_pair(chars)?;

    if chars.peek().is_some_and(|ch| *ch == ':') {
        let _ = chars.next();
    }

    let minutes = match chars.peek().map(char::is_ascii_digit) {
        Some(true) => parse_digit_pair(chars)?,
        Some(false) => return Err(non_ascii_digit()),
        None => 0,
    };

    if chars.next().is_some() {
        return Err(DatetimeError::range().with_message("Trailing characters in offset string"));
    }
    if hours > 23 || minutes > 59 {
        return Err(DatetimeError::range().with_message("Offset is out of range"));
    }

    let total = (hours * 60 + minutes) * sign;
    debug_assert!(total.abs() <= MAX_OFFSET_MINUTES);
    Ok(TimeZone::OffsetMinutes(total))
}

fn parse_digit_pair(chars: &mut Peekable<Chars<'_>>) -> DatetimeResult<i16> {
    let mut value = 0;
    for _ in 0..2 {
        let digit = chars
            .next()
            .ok_or_else(abrupt_end)?
            .to_digit(10)
            .ok_or_else(non_ascii_digit)?;
        value = value * 10 + digit as i16;
    }
    Ok(value)
}

fn abrupt_end() -> DatetimeError {
    DatetimeError::range().with_message("Abrupt end while parsing offset string")
}

fn non_ascii_digit() -> DatetimeError {
    DatetimeError::range().with_message("Non ascii digit found while parsing offset string")
}

fn is_ascii_sign(ch: &char) -> bool {
    *ch == '+' || *ch == '-'
}

/// Renders an offset in minutes as `±HHMM` with the legacy sign rule: the
/// minutes are positive west of UTC, so a positive value renders `-`.
pub(crate) fn legacy_offset_string(offset_minutes: i64) -> String {
    let sign = if offset_minutes > 0 { '-' } else { '+' };
    let abs = offset_minutes.unsigned_abs();
    format!("{sign}{:02}{:02}", abs / 60, abs % 60)
}
