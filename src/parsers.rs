//! This module implements date-time string parsing and the ISO 8601
//! instant string.

use alloc::{format, string::String};
use core::fmt;

use ixdtf::{
    encoding::Utf8,
    parsers::IxdtfParser,
    records::{IxdtfParseRecord, TimeRecord, TimeZoneRecord, UtcOffsetRecordOrZ},
    ParseError,
};
use writeable::{impl_display_with_writeable, Writeable};

use crate::{
    components::DateTimeComponents,
    instant::Instant,
    names,
    options::Disambiguation,
    provider::{LocalDateTime, TimeZoneProvider},
    timezone::TimeZone,
    DatetimeError, DatetimeResult, NS_PER_MINUTE,
};

/// The result of parsing a date-time string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDatetime {
    pub instant: Instant,
    /// The zone named by the string, if any.
    pub zone: Option<TimeZone>,
}

fn map_parse_error(err: ParseError) -> DatetimeError {
    use ParseError::*;
    let message = match err {
        InvalidMonthRange => "Month is outside valid range (1-12)".into(),
        InvalidDayRange => "Day is outside valid range for the given month/year".into(),
        DateYear => "Invalid year format".into(),
        DateMonth => "Invalid month format".into(),
        DateDay => "Invalid day format".into(),
        TimeHour => "Invalid hour format".into(),
        TimeMinuteSecond => "Invalid minute or second format".into(),
        TimeSecond => "Invalid second format".into(),
        FractionPart => "Invalid fractional seconds format".into(),
        AbruptEnd { location } => format!("Unexpected end while parsing {location}"),
        InvalidEnd => "Unexpected character at end of input".into(),
        _ => format!("Parse error: {err:?}"),
    };
    DatetimeError::syntax().with_message(message)
}

/// Parses an RFC 9557 / ISO 8601 string.
///
/// - A date without a time, offset or annotation is midnight UTC.
/// - A `Z` or numeric offset gives an exact instant.
/// - A zone annotation without an offset is wall clock time in that zone.
/// - Anything else is wall clock time in `fallback`.
///
/// Calendar annotations other than `iso8601` and `gregory` are rejected.
pub fn parse_ixdtf_with_provider(
    source: &str,
    fallback: &TimeZone,
    provider: &impl TimeZoneProvider,
) -> DatetimeResult<ParsedDatetime> {
    let record = IxdtfParser::from_utf8(source.as_bytes())
        .parse()
        .map_err(map_parse_error)?;
    check_calendar(&record)?;

    let date = record
        .date
        .ok_or_else(|| DatetimeError::syntax().with_message("A date is required."))?;

    let zone = match record.tz.map(|annotation| annotation.tz) {
        Some(TimeZoneRecord::Name(name)) => {
            let name = core::str::from_utf8(name)
                .map_err(|_| DatetimeError::syntax().with_message("Invalid time zone name."))?;
            Some(TimeZone::try_from_identifier_str_with_provider(name, provider)?)
        }
        Some(TimeZoneRecord::Offset(offset)) => {
            let minutes = i16::from(offset.hour) * 60 + i16::from(offset.minute);
            Some(TimeZone::OffsetMinutes(minutes * offset.sign as i16))
        }
        Some(_) => {
            return Err(DatetimeError::unsupported().with_message("Unsupported time zone record."))
        }
        None => None,
    };

    let (time, nanoseconds) = split_time(record.time);
    let local = LocalDateTime {
        year: date.year,
        month: date.month,
        day: date.day,
        hour: time.hour,
        minute: time.minute,
        // A leap second reads as the last second of the minute.
        second: time.second.min(59),
        millisecond: (nanoseconds / 1_000_000) as u16,
        microsecond: (nanoseconds / 1_000 % 1_000) as u16,
        nanosecond: (nanoseconds % 1_000) as u16,
    };
    let local_ns = local.as_nanoseconds().as_i128();

    let epoch_ns = match record.offset {
        Some(UtcOffsetRecordOrZ::Z) => local_ns,
        Some(UtcOffsetRecordOrZ::Offset(offset)) => {
            let offset_ns = (i128::from(offset.hour()) * 3_600_000_000_000
                + i128::from(offset.minute()) * NS_PER_MINUTE
                + i128::from(offset.second().unwrap_or(0)) * 1_000_000_000
                + i128::from(offset.fraction().and_then(|f| f.to_nanoseconds()).unwrap_or(0)))
                * i128::from(offset.sign() as i8);
            local_ns - offset_ns
        }
        None if record.time.is_none() && zone.is_none() => local_ns,
        None => zone.as_ref().unwrap_or(fallback).get_epoch_nanoseconds_for(
            local,
            Disambiguation::Compatible,
            provider,
        )?,
    };

    Ok(ParsedDatetime {
        instant: Instant::from_epoch_nanoseconds(epoch_ns),
        zone,
    })
}

fn check_calendar(record: &IxdtfParseRecord<'_, Utf8>) -> DatetimeResult<()> {
    match record.calendar {
        None => Ok(()),
        Some(calendar)
            if calendar.eq_ignore_ascii_case(b"iso8601")
                || calendar.eq_ignore_ascii_case(b"gregory") =>
        {
            Ok(())
        }
        Some(calendar) => Err(DatetimeError::unsupported().with_message(format!(
            "Unsupported calendar: {}",
            String::from_utf8_lossy(calendar)
        ))),
    }
}

struct WallTime {
    hour: u8,
    minute: u8,
    second: u8,
}

fn split_time(time: Option<TimeRecord>) -> (WallTime, u32) {
    match time {
        Some(time) => (
            WallTime {
                hour: time.hour,
                minute: time.minute,
                second: time.second,
            },
            time.fraction
                .and_then(|fraction| fraction.to_nanoseconds())
                .unwrap_or(0),
        ),
        None => (
            WallTime {
                hour: 0,
                minute: 0,
                second: 0,
            },
            0,
        ),
    }
}

/// Parses the strings produced by `to_string_legacy`
/// (`"Fri Mar 01 2024 14:30:50 UTC+0900 (Asia/Tokyo)"`) and
/// `to_utc_string` (`"Fri, 01 Mar 2024 05:30:50 GMT"`).
pub fn parse_legacy_with_provider(
    source: &str,
    provider: &impl TimeZoneProvider,
) -> DatetimeResult<ParsedDatetime> {
    let mut parts = source.split_ascii_whitespace();
    let weekday = parts.next().ok_or_else(legacy_error)?;
    let utc_form = weekday.ends_with(',');
    if !names::is_short_day_name(weekday.trim_end_matches(',')) {
        return Err(legacy_error());
    }

    let (month, day) = if utc_form {
        let day = parts.next().ok_or_else(legacy_error)?;
        let month = parts.next().ok_or_else(legacy_error)?;
        (month, day)
    } else {
        let month = parts.next().ok_or_else(legacy_error)?;
        let day = parts.next().ok_or_else(legacy_error)?;
        (month, day)
    };
    let month = names::month_from_short_name(month).ok_or_else(legacy_error)?;
    let day: u8 = day.parse().map_err(|_| legacy_error())?;
    let year: i32 = parts
        .next()
        .ok_or_else(legacy_error)?
        .parse()
        .map_err(|_| legacy_error())?;
    let (hour, minute, second) = parse_clock(parts.next().ok_or_else(legacy_error)?)?;

    let offset = parts.next().ok_or_else(legacy_error)?;
    let offset_minutes = parse_legacy_offset(offset)?;

    let zone = match parts.next() {
        Some(name) => {
            let name = name
                .strip_prefix('(')
                .and_then(|name| name.strip_suffix(')'))
                .ok_or_else(legacy_error)?;
            Some(TimeZone::try_from_identifier_str_with_provider(name, provider)?)
        }
        None if utc_form => None,
        None => Some(TimeZone::OffsetMinutes(offset_minutes)),
    };
    if parts.next().is_some() {
        return Err(legacy_error());
    }

    if day == 0 || day > crate::equations::iso_days_in_month(year, month + 1) {
        return Err(DatetimeError::range().with_message("Day is out of range."));
    }
    let local = LocalDateTime {
        year,
        month: month + 1,
        day,
        hour,
        minute,
        second,
        ..Default::default()
    };
    let epoch_ns = local.as_nanoseconds().as_i128() - i128::from(offset_minutes) * NS_PER_MINUTE;
    Ok(ParsedDatetime {
        instant: Instant::from_epoch_nanoseconds(epoch_ns),
        zone,
    })
}

fn parse_clock(source: &str) -> DatetimeResult<(u8, u8, u8)> {
    let mut fields = source.split(':').map(|field| {
        if field.len() != 2 {
            return Err(legacy_error());
        }
        field.parse::<u8>().map_err(|_| legacy_error())
    });
    let hour = fields.next().ok_or_else(legacy_error)??;
    let minute = fields.next().ok_or_else(legacy_error)??;
    let second = fields.next().ok_or_else(legacy_error)??;
    if fields.next().is_some() || hour > 23 || minute > 59 || second > 59 {
        return Err(legacy_error());
    }
    Ok((hour, minute, second))
}

/// Parses `GMT`, `UTC±HHMM` or `GMT±HHMM` into minutes east of UTC.
fn parse_legacy_offset(source: &str) -> DatetimeResult<i16> {
    let rest = source
        .strip_prefix("UTC")
        .or_else(|| source.strip_prefix("GMT"))
        .ok_or_else(legacy_error)?;
    if rest.is_empty() {
        return Ok(0);
    }
    let sign = match rest.as_bytes()[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return Err(legacy_error()),
    };
    let digits = &rest[1..];
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(legacy_error());
    }
    let hours: i16 = digits[..2].parse().map_err(|_| legacy_error())?;
    let minutes: i16 = digits[2..].parse().map_err(|_| legacy_error())?;
    if hours > 23 || minutes > 59 {
        return Err(legacy_error());
    }
    Ok(sign * (hours * 60 + minutes))
}

fn legacy_error() -> DatetimeError {
    DatetimeError::syntax().with_message("Unrecognized date-time string.")
}

/// The `toISOString` form of an instant: UTC with millisecond precision,
/// using the six digit signed year outside `0..=9999`.
#[derive(Debug)]
pub struct FormattableIsoInstant(pub DateTimeComponents);

impl Writeable for FormattableIsoInstant {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        let c = &self.0;
        write_year(c.year, sink)?;
        sink.write_char('-')?;
        write_padded(c.iso_month().into(), 2, sink)?;
        sink.write_char('-')?;
        write_padded(c.day.into(), 2, sink)?;
        sink.write_char('T')?;
        write_padded(c.hour.into(), 2, sink)?;
        sink.write_char(':')?;
        write_padded(c.minute.into(), 2, sink)?;
        sink.write_char(':')?;
        write_padded(c.second.into(), 2, sink)?;
        sink.write_char('.')?;
        write_padded(c.millisecond.into(), 3, sink)?;
        sink.write_char('Z')
    }

    fn writeable_length_hint(&self) -> writeable::LengthHint {
        let year_length = if (0..=9999).contains(&self.0.year) { 4 } else { 7 };
        writeable::LengthHint::exact(year_length + 20)
    }
}

impl_display_with_writeable!(FormattableIsoInstant);

fn write_year<W: fmt::Write + ?Sized>(year: i32, sink: &mut W) -> fmt::Result {
    if (0..=9999).contains(&year) {
        return write_padded(year.unsigned_abs(), 4, sink);
    }
    sink.write_char(if year < 0 { '-' } else { '+' })?;
    write_padded(year.unsigned_abs(), 6, sink)
}

fn write_padded<W: fmt::Write + ?Sized>(value: u32, width: u32, sink: &mut W) -> fmt::Result {
    let digits = value.checked_ilog10().map_or(1, |d| d + 1);
    for _ in digits..width {
        sink.write_char('0')?;
    }
    value.write_to(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, provider::NeverProvider};

    fn ms(parsed: &ParsedDatetime) -> i64 {
        parsed.instant.epoch_milliseconds().unwrap()
    }

    #[test]
    fn iso_instant_string() {
        let c = DateTimeComponents::from_local_nanoseconds(1_709_271_050_123_456_789).unwrap();
        assert_eq!(FormattableIsoInstant(c).to_string(), "2024-03-01T05:30:50.123Z");
        let c = DateTimeComponents::from_local_nanoseconds(-62_198_755_200_000 * 1_000_000)
            .unwrap();
        assert_eq!(FormattableIsoInstant(c).to_string(), "-000001-01-01T00:00:00.000Z");
        let c = DateTimeComponents::from_local_nanoseconds(253_402_300_800_000 * 1_000_000)
            .unwrap();
        assert_eq!(FormattableIsoInstant(c).to_string(), "+010000-01-01T00:00:00.000Z");
    }

    #[test]
    fn exact_and_date_only() {
        let provider = &NeverProvider;
        let utc = TimeZone::utc();
        let parsed =
            parse_ixdtf_with_provider("2024-03-01T05:30:50.123Z", &utc, provider).unwrap();
        assert_eq!(ms(&parsed), 1_709_271_050_123);
        assert!(parsed.zone.is_none());

        let parsed =
            parse_ixdtf_with_provider("2024-03-01T14:30:50.123+09:00", &utc, provider).unwrap();
        assert_eq!(ms(&parsed), 1_709_271_050_123);

        let fallback = TimeZone::OffsetMinutes(300);
        let parsed = parse_ixdtf_with_provider("2024-03-01", &fallback, provider).unwrap();
        assert_eq!(ms(&parsed), 1_709_251_200_000);
    }

    #[test]
    fn wall_clock_in_fallback_or_annotation() {
        let provider = &NeverProvider;
        let fallback = TimeZone::OffsetMinutes(60);
        let parsed = parse_ixdtf_with_provider("2024-03-01T01:00", &fallback, provider).unwrap();
        assert_eq!(ms(&parsed), 1_709_251_200_000);

        let parsed =
            parse_ixdtf_with_provider("2024-03-01T09:00[+09:00]", &fallback, provider).unwrap();
        assert_eq!(ms(&parsed), 1_709_251_200_000);
        assert_eq!(parsed.zone, Some(TimeZone::OffsetMinutes(540)));
    }

    #[test]
    fn rejects_calendars_and_unknown_zones() {
        let provider = &NeverProvider;
        let utc = TimeZone::utc();
        let err = parse_ixdtf_with_provider("2024-03-01[u-ca=japanese]", &utc, provider)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert!(parse_ixdtf_with_provider("2024-03-01[u-ca=iso8601]", &utc, provider).is_ok());

        let err = parse_ixdtf_with_provider("2024-03-01T00:00[Mars/Base]", &utc, provider)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidZoneId);

        let err = parse_ixdtf_with_provider("2024-13-01", &utc, provider).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn legacy_strings() {
        let provider = &NeverProvider;
        let parsed =
            parse_legacy_with_provider("Fri, 01 Mar 2024 05:30:50 GMT", provider).unwrap();
        assert_eq!(ms(&parsed), 1_709_271_050_000);
        assert!(parsed.zone.is_none());

        let parsed =
            parse_legacy_with_provider("Fri Mar 01 2024 14:30:50 UTC+0900 (+09:00)", provider)
                .unwrap();
        assert_eq!(ms(&parsed), 1_709_271_050_000);
        assert_eq!(parsed.zone, Some(TimeZone::OffsetMinutes(540)));

        let parsed =
            parse_legacy_with_provider("Thu Feb 29 2024 23:00:00 UTC-0500", provider).unwrap();
        assert_eq!(ms(&parsed), 1_709_265_600_000);
        assert_eq!(parsed.zone, Some(TimeZone::OffsetMinutes(-300)));
    }

    #[test]
    fn legacy_rejects_garbage() {
        let provider = &NeverProvider;
        for source in [
            "",
            "Fri Mar 01 2024",
            "Fri Mar 01 2024 14:30 UTC+0900",
            "Fri Mar 32 2024 14:30:50 UTC+0900",
            "Fri Mar 01 2024 14:30:50 EST",
            "Fri Mar 01 2024 14:30:50 UTC+0900 (+09:00) extra",
            "Xyz Mar 01 2024 14:30:50 GMT",
        ] {
            assert!(parse_legacy_with_provider(source, provider).is_err(), "{source}");
        }
    }
}
