//! This module implements `DatetimeValue`.

use alloc::{borrow::Cow, format, string::String};

use icu_locale::Locale;
use writeable::Writeable;

use crate::{
    calendar::{CalendarFields, IsoCalendar},
    components::{DateTimeComponents, PartialDateTime},
    equations,
    format::{FormatFields, Pattern},
    host::{HostClock, HostHooks},
    html::TimeElement,
    instant::Instant,
    mutator,
    names::{EnglishNames, LocaleFormatter, NameProvider},
    options::{DiscordStyle, RelativeTimeOptions},
    parsers::{self, FormattableIsoInstant},
    provider::{NeverProvider, TimeZoneProvider},
    relative,
    timezone::{legacy_offset_string, TimeZone},
    DatetimeError, DatetimeResult, NS_PER_MINUTE, NS_PER_MS,
};

#[cfg(feature = "compiled_data")]
mod compiled;

#[cfg(test)]
mod tests;

const INVALID_DATE: &str = "Invalid Date";
const LEGACY_PATTERN: &str = "[datetime_global_v2]";
const UTC_STRING_PATTERN: &str = r"D, d M Y H:i:s \G\M\T";
const DATE_STRING_PATTERN: &str = "[date_v1]";
const TIME_STRING_PATTERN: &str = r"H:i:s \U\T\CO (e)";

/// A zoned date-time with the behavior of the legacy ECMAScript `Date`.
///
/// A `DatetimeValue` owns an [`Instant`] and a [`TimeZone`]. Calendar
/// components are derived from the pair on every read. Setters replace
/// the instant as a whole; an out of range argument carries into the
/// neighboring units.
///
/// Months are zero based and weekdays count from Sunday, as in `Date`.
///
/// Every method that reads zone data has a `*_with_provider` form. With the
/// `compiled_data` feature each also has a form that uses the bundled tzdb.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatetimeValue {
    instant: Instant,
    zone: TimeZone,
}

// ==== Constructors ====

impl DatetimeValue {
    #[inline]
    #[must_use]
    pub fn new(instant: Instant, zone: TimeZone) -> Self {
        Self { instant, zone }
    }

    /// Creates a value from milliseconds since the epoch.
    #[inline]
    #[must_use]
    pub fn from_epoch_millis(milliseconds: i64, zone: TimeZone) -> Self {
        Self::new(Instant::from_epoch_milliseconds(milliseconds), zone)
    }

    /// Creates a value from nanoseconds since the epoch.
    #[inline]
    #[must_use]
    pub fn from_epoch_nanos(nanoseconds: i128, zone: TimeZone) -> Self {
        Self::new(Instant::from_epoch_nanoseconds(nanoseconds), zone)
    }

    /// Creates a value from UTC components, as `Date.UTC` does.
    ///
    /// `month` is zero based. Every argument may be out of range and is
    /// folded into its neighbors; years 0 through 99 map to 1900 through
    /// 1999. `nanosecond` is added after the millisecond time value is
    /// clipped.
    #[must_use]
    pub fn from_components_utc(
        year: i64,
        month: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
        millisecond: i64,
        nanosecond: i64,
        zone: TimeZone,
    ) -> Self {
        let day = equations::make_day(
            equations::make_full_year(year as f64),
            month as f64,
            day as f64,
        );
        let time = equations::make_time(
            hour as f64,
            minute as f64,
            second as f64,
            millisecond as f64,
        );
        let instant = match Instant::from_time_value(equations::make_date(day, time)) {
            Instant::Valid(ns) => {
                Instant::from_epoch_nanoseconds(ns.as_i128() + i128::from(nanosecond))
            }
            Instant::Invalid => Instant::Invalid,
        };
        Self::new(instant, zone)
    }

    /// Parses an ISO 8601 / RFC 9557 string, or a string in the shape of
    /// `to_string_legacy` or `to_utc_string`.
    ///
    /// A zone named by the string becomes the value's zone. Otherwise the
    /// value is in `fallback`, and date-times without an offset are read as
    /// wall clock time in `fallback`.
    pub fn from_str_with_provider(
        source: &str,
        fallback: TimeZone,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<Self> {
        let parsed = if source
            .trim_start()
            .starts_with(|ch: char| ch.is_ascii_alphabetic())
        {
            parsers::parse_legacy_with_provider(source.trim(), provider)?
        } else {
            parsers::parse_ixdtf_with_provider(source, &fallback, provider)?
        };
        Ok(Self::new(parsed.instant, parsed.zone.unwrap_or(fallback)))
    }

    /// Reads the current time from `host`. Without a `zone` the host's
    /// time zone is used.
    pub fn now_with_host(
        host: &impl HostHooks,
        zone: Option<TimeZone>,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<Self> {
        let zone = match zone {
            Some(zone) => zone,
            None => host.get_host_time_zone(provider)?,
        };
        let now = host.get_host_epoch_nanoseconds()?;
        Ok(Self::new(Instant::from(now), zone))
    }

    /// The host's epoch milliseconds with the sub-second part set to zero.
    pub fn zero_ms_with_host(host: &impl HostClock) -> DatetimeResult<i64> {
        Ok(host.get_host_epoch_nanoseconds()?.epoch_seconds() * 1000)
    }

    /// The host's epoch nanoseconds with the sub-second part set to zero.
    pub fn zero_ns_with_host(host: &impl HostClock) -> DatetimeResult<i128> {
        Ok(i128::from(Self::zero_ms_with_host(host)?) * NS_PER_MS)
    }
}

// ==== Instant and zone accessors ====

impl DatetimeValue {
    #[inline]
    #[must_use]
    pub fn instant(&self) -> Instant {
        self.instant
    }

    #[inline]
    #[must_use]
    pub fn timezone(&self) -> &TimeZone {
        &self.zone
    }

    /// The zone identifier, `getZoneId` in the legacy API.
    #[must_use]
    pub fn timezone_id(&self) -> Cow<'_, str> {
        self.zone.identifier()
    }

    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.instant.is_valid()
    }

    /// Milliseconds since the epoch, `getTime` in the legacy API.
    pub fn get_time(&self) -> DatetimeResult<i64> {
        self.instant.epoch_milliseconds()
    }

    /// The time value: `NaN` for an invalid value.
    #[must_use]
    pub fn value_of(&self) -> f64 {
        self.instant.time_value()
    }

    pub fn epoch_nanoseconds(&self) -> DatetimeResult<i128> {
        self.instant.epoch_nanoseconds().map(|ns| ns.as_i128())
    }

    /// Returns a copy of this value in `zone`. The instant is unchanged.
    #[must_use]
    pub fn to_timezone(&self, zone: TimeZone) -> Self {
        Self::new(self.instant, zone)
    }

    /// Replaces the zone of this value. The instant is unchanged.
    #[must_use]
    pub fn with_timezone(mut self, zone: TimeZone) -> Self {
        self.zone = zone;
        self
    }

    /// Resolves `identifier` and returns a copy of this value in that zone.
    pub fn to_timezone_identifier_with_provider(
        &self,
        identifier: &str,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<Self> {
        let zone = TimeZone::try_from_identifier_str_with_provider(identifier, provider)?;
        Ok(self.to_timezone(zone))
    }

    /// Replaces the instant with `milliseconds` since the epoch.
    pub fn set_time(&mut self, milliseconds: i64) {
        self.instant = Instant::from_epoch_milliseconds(milliseconds);
    }
}

// ==== Component getters ====

impl DatetimeValue {
    /// The wall clock components of this value in its zone.
    pub fn components_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<DateTimeComponents> {
        let ns = self.instant.epoch_nanoseconds()?;
        self.zone.get_components_for(ns.as_i128(), provider)
    }

    /// The components of this value in UTC.
    pub fn utc_components(&self) -> DatetimeResult<DateTimeComponents> {
        let ns = self.instant.epoch_nanoseconds()?;
        DateTimeComponents::from_local_nanoseconds(ns.as_i128())
    }

    pub fn get_full_year_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<i32> {
        Ok(self.components_with_provider(provider)?.year)
    }

    /// The full year minus 1900.
    pub fn get_year_with_provider(&self, provider: &impl TimeZoneProvider) -> DatetimeResult<i32> {
        Ok(self.get_full_year_with_provider(provider)? - 1900)
    }

    /// The zero based month.
    pub fn get_month_with_provider(&self, provider: &impl TimeZoneProvider) -> DatetimeResult<u8> {
        Ok(self.components_with_provider(provider)?.month)
    }

    /// The day of the month.
    pub fn get_date_with_provider(&self, provider: &impl TimeZoneProvider) -> DatetimeResult<u8> {
        Ok(self.components_with_provider(provider)?.day)
    }

    /// The weekday, 0 for Sunday.
    pub fn get_day_with_provider(&self, provider: &impl TimeZoneProvider) -> DatetimeResult<u8> {
        Ok(self.components_with_provider(provider)?.weekday)
    }

    /// Same as `get_day_with_provider`.
    pub fn get_day_number_week_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<u8> {
        self.get_day_with_provider(provider)
    }

    /// Same as `get_date_with_provider`.
    pub fn get_day_number_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<u8> {
        self.get_date_with_provider(provider)
    }

    /// Same as `get_date_with_provider`.
    pub fn get_day_number_month_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<u8> {
        self.get_date_with_provider(provider)
    }

    pub fn get_hours_with_provider(&self, provider: &impl TimeZoneProvider) -> DatetimeResult<u8> {
        Ok(self.components_with_provider(provider)?.hour)
    }

    pub fn get_minutes_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<u8> {
        Ok(self.components_with_provider(provider)?.minute)
    }

    pub fn get_seconds_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<u8> {
        Ok(self.components_with_provider(provider)?.second)
    }

    pub fn get_milliseconds_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<u16> {
        Ok(self.components_with_provider(provider)?.millisecond)
    }

    /// The nanoseconds past the last whole millisecond, `0..=999_999`.
    ///
    /// Offsets are whole seconds, so this is the same in every zone.
    pub fn get_nanoseconds(&self) -> DatetimeResult<u32> {
        self.instant.submillisecond_nanoseconds()
    }

    pub fn get_utc_full_year(&self) -> DatetimeResult<i32> {
        Ok(self.utc_components()?.year)
    }

    pub fn get_utc_month(&self) -> DatetimeResult<u8> {
        Ok(self.utc_components()?.month)
    }

    pub fn get_utc_date(&self) -> DatetimeResult<u8> {
        Ok(self.utc_components()?.day)
    }

    pub fn get_utc_day(&self) -> DatetimeResult<u8> {
        Ok(self.utc_components()?.weekday)
    }

    pub fn get_utc_hours(&self) -> DatetimeResult<u8> {
        Ok(self.utc_components()?.hour)
    }

    pub fn get_utc_minutes(&self) -> DatetimeResult<u8> {
        Ok(self.utc_components()?.minute)
    }

    pub fn get_utc_seconds(&self) -> DatetimeResult<u8> {
        Ok(self.utc_components()?.second)
    }

    pub fn get_utc_milliseconds(&self) -> DatetimeResult<u16> {
        Ok(self.utc_components()?.millisecond)
    }

    /// The legacy offset in minutes: positive west of UTC, so
    /// `America/New_York` in winter returns 300.
    pub fn get_timezone_offset_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<i64> {
        let ns = self.instant.epoch_nanoseconds()?;
        let offset = self.zone.get_offset_nanos_for(ns.as_i128(), provider)?;
        Ok(legacy_offset_minutes(offset))
    }

    /// Renders a legacy offset as `UTC±HHMM`.
    #[must_use]
    pub fn utc_offset_string(offset_minutes: i64) -> String {
        format!("UTC{}", legacy_offset_string(offset_minutes))
    }
}

fn legacy_offset_minutes(offset_nanoseconds: i128) -> i64 {
    (-(offset_nanoseconds / NS_PER_MINUTE)) as i64
}

// ==== Zone aware setters ====

impl DatetimeValue {
    /// Applies `partial` to the wall clock components of this value and
    /// returns the corrected value.
    ///
    /// Fields left unset keep their current value. Out of range fields
    /// carry and borrow under the ISO calendar.
    ///
    /// An invalid value stays invalid, unless `partial` sets the year; the
    /// components then start from 1970-01-01T00:00 wall clock time.
    pub fn with_with_provider(
        &self,
        partial: PartialDateTime,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<Self> {
        self.with_calendar_with_provider(partial, &IsoCalendar, provider)
    }

    /// Like `with_with_provider`, with the unit capacities taken from
    /// `calendar`.
    pub fn with_calendar_with_provider(
        &self,
        partial: PartialDateTime,
        calendar: &impl CalendarFields,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<Self> {
        let (current, sub_ms) = match self.instant {
            Instant::Valid(ns) => (
                self.zone.get_components_for(ns.as_i128(), provider)?,
                self.instant.submillisecond_nanoseconds()?,
            ),
            Instant::Invalid if partial.year.is_some() => {
                (DateTimeComponents::from_local_nanoseconds(0)?, 0)
            }
            Instant::Invalid => return Ok(self.clone()),
        };
        let instant =
            mutator::apply_overflowing(&current, &partial, sub_ms, &self.zone, calendar, provider)?;
        Ok(Self::new(instant, self.zone.clone()))
    }

    fn apply_with_provider(
        &mut self,
        partial: PartialDateTime,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<()> {
        self.instant = self.with_with_provider(partial, provider)?.instant;
        Ok(())
    }

    pub fn set_full_year_with_provider(
        &mut self,
        year: i64,
        month: Option<i64>,
        date: Option<i64>,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<()> {
        let partial = PartialDateTime {
            year: Some(year),
            month,
            day: date,
            ..PartialDateTime::default()
        };
        self.apply_with_provider(partial, provider)
    }

    /// Sets the year; 0 through 99 mean 1900 through 1999.
    pub fn set_year_with_provider(
        &mut self,
        year: i64,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<()> {
        let year = equations::make_full_year(year as f64) as i64;
        self.set_full_year_with_provider(year, None, None, provider)
    }

    /// Sets the zero based month.
    pub fn set_month_with_provider(
        &mut self,
        month: i64,
        date: Option<i64>,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<()> {
        let partial = PartialDateTime {
            month: Some(month),
            day: date,
            ..PartialDateTime::default()
        };
        self.apply_with_provider(partial, provider)
    }

    pub fn set_date_with_provider(
        &mut self,
        date: i64,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<()> {
        self.apply_with_provider(PartialDateTime::new().with_day(date), provider)
    }

    pub fn set_hours_with_provider(
        &mut self,
        hours: i64,
        minutes: Option<i64>,
        seconds: Option<i64>,
        milliseconds: Option<i64>,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<()> {
        let partial = PartialDateTime {
            hour: Some(hours),
            minute: minutes,
            second: seconds,
            millisecond: milliseconds,
            ..PartialDateTime::default()
        };
        self.apply_with_provider(partial, provider)
    }

    pub fn set_minutes_with_provider(
        &mut self,
        minutes: i64,
        seconds: Option<i64>,
        milliseconds: Option<i64>,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<()> {
        let partial = PartialDateTime {
            minute: Some(minutes),
            second: seconds,
            millisecond: milliseconds,
            ..PartialDateTime::default()
        };
        self.apply_with_provider(partial, provider)
    }

    pub fn set_seconds_with_provider(
        &mut self,
        seconds: i64,
        milliseconds: Option<i64>,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<()> {
        let partial = PartialDateTime {
            second: Some(seconds),
            millisecond: milliseconds,
            ..PartialDateTime::default()
        };
        self.apply_with_provider(partial, provider)
    }

    pub fn set_milliseconds_with_provider(
        &mut self,
        milliseconds: i64,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<()> {
        self.apply_with_provider(
            PartialDateTime::new().with_millisecond(milliseconds),
            provider,
        )
    }

    /// Replaces the nanoseconds past the last whole millisecond.
    ///
    /// `nanoseconds` must be below one millisecond; the value must be valid.
    pub fn set_nanoseconds(&mut self, nanoseconds: u32) -> DatetimeResult<()> {
        if i128::from(nanoseconds) >= NS_PER_MS {
            return Err(DatetimeError::range()
                .with_message("Nanoseconds must be in the range 0..=999999."));
        }
        let ms = self.instant.epoch_milliseconds()?;
        self.instant =
            Instant::from_epoch_nanoseconds(i128::from(ms) * NS_PER_MS + i128::from(nanoseconds));
        Ok(())
    }
}

// ==== UTC pinned setters ====

impl DatetimeValue {
    /// Applies `partial` to the UTC components with the `MakeDay`,
    /// `MakeTime` and `TimeClip` rules. No zone data is read.
    ///
    /// An invalid value stays invalid unless `partial` sets the year.
    #[must_use]
    pub fn with_utc(&self, partial: PartialDateTime) -> Self {
        let t = match self.instant {
            Instant::Valid(_) => self.instant.time_value(),
            Instant::Invalid if partial.year.is_some() => 0.0,
            Instant::Invalid => return self.clone(),
        };
        let field = |value: Option<i64>, current: f64| value.map_or(current, |value| value as f64);
        let day = equations::make_day(
            field(partial.year, equations::year_from_time(t)),
            field(partial.month, equations::month_from_time(t)),
            field(partial.day, equations::date_from_time(t)),
        );
        let time = equations::make_time(
            field(partial.hour, equations::hour_from_time(t)),
            field(partial.minute, equations::min_from_time(t)),
            field(partial.second, equations::sec_from_time(t)),
            field(partial.millisecond, equations::ms_from_time(t)),
        );
        let instant = self
            .instant
            .with_time_value(equations::make_date(day, time));
        Self::new(instant, self.zone.clone())
    }

    fn apply_utc(&mut self, partial: PartialDateTime) {
        self.instant = self.with_utc(partial).instant;
    }

    pub fn set_utc_full_year(&mut self, year: i64, month: Option<i64>, date: Option<i64>) {
        self.apply_utc(PartialDateTime {
            year: Some(year),
            month,
            day: date,
            ..PartialDateTime::default()
        });
    }

    pub fn set_utc_month(&mut self, month: i64, date: Option<i64>) {
        self.apply_utc(PartialDateTime {
            month: Some(month),
            day: date,
            ..PartialDateTime::default()
        });
    }

    pub fn set_utc_date(&mut self, date: i64) {
        self.apply_utc(PartialDateTime::new().with_day(date));
    }

    pub fn set_utc_hours(
        &mut self,
        hours: i64,
        minutes: Option<i64>,
        seconds: Option<i64>,
        milliseconds: Option<i64>,
    ) {
        self.apply_utc(PartialDateTime {
            hour: Some(hours),
            minute: minutes,
            second: seconds,
            millisecond: milliseconds,
            ..PartialDateTime::default()
        });
    }

    pub fn set_utc_minutes(
        &mut self,
        minutes: i64,
        seconds: Option<i64>,
        milliseconds: Option<i64>,
    ) {
        self.apply_utc(PartialDateTime {
            minute: Some(minutes),
            second: seconds,
            millisecond: milliseconds,
            ..PartialDateTime::default()
        });
    }

    pub fn set_utc_seconds(&mut self, seconds: i64, milliseconds: Option<i64>) {
        self.apply_utc(PartialDateTime {
            second: Some(seconds),
            millisecond: milliseconds,
            ..PartialDateTime::default()
        });
    }

    pub fn set_utc_milliseconds(&mut self, milliseconds: i64) {
        self.apply_utc(PartialDateTime::new().with_millisecond(milliseconds));
    }
}

// ==== String output ====

impl DatetimeValue {
    fn format_fields<'z>(
        &self,
        zone: &'z TimeZone,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<FormatFields<'z>> {
        let ns = self.instant.epoch_nanoseconds()?;
        let offset = zone.get_offset_nanos_for(ns.as_i128(), provider)?;
        Ok(FormatFields {
            components: DateTimeComponents::from_local_nanoseconds(ns.as_i128() + offset)?,
            offset_minutes: legacy_offset_minutes(offset),
            zone: zone.identifier(),
            epoch_milliseconds: ns.epoch_milliseconds(),
        })
    }

    fn render(
        &self,
        pattern: &str,
        zone: &TimeZone,
        names: &dyn NameProvider,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<String> {
        let pattern = Pattern::parse(pattern)?;
        let fields = self.format_fields(zone, provider)?;
        Ok(pattern.bind(&fields, names).write_to_string().into_owned())
    }

    fn render_or_invalid(
        &self,
        pattern: &str,
        zone: &TimeZone,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<String> {
        if !self.is_valid() {
            return Ok(String::from(INVALID_DATE));
        }
        self.render(pattern, zone, &EnglishNames, provider)
    }

    /// Renders this value with a format pattern and English names.
    pub fn format_with_provider(
        &self,
        pattern: &str,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<String> {
        self.format_with_names_with_provider(pattern, &EnglishNames, provider)
    }

    /// Renders this value with a format pattern and the names from `names`.
    pub fn format_with_names_with_provider(
        &self,
        pattern: &str,
        names: &dyn NameProvider,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<String> {
        self.render(pattern, &self.zone, names, provider)
    }

    /// The ISO 8601 string of the instant in UTC with millisecond precision,
    /// e.g. `2024-03-01T05:30:50.123Z`.
    pub fn to_iso_string(&self) -> DatetimeResult<String> {
        Ok(FormattableIsoInstant(self.utc_components()?)
            .write_to_string()
            .into_owned())
    }

    /// The ISO string, or `None` for an invalid value.
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        self.to_iso_string().ok()
    }

    /// `"Fri Mar 01 2024 14:30:50 UTC+0900 (Asia/Tokyo)"`, or
    /// `"Invalid Date"`.
    pub fn to_string_legacy_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<String> {
        self.render_or_invalid(LEGACY_PATTERN, &self.zone, provider)
    }

    /// `"Fri, 01 Mar 2024 05:30:50 GMT"`, or `"Invalid Date"`.
    pub fn to_utc_string(&self) -> DatetimeResult<String> {
        self.render_or_invalid(UTC_STRING_PATTERN, &TimeZone::utc(), &NeverProvider)
    }

    /// `"Fri Mar 01 2024"`, or `"Invalid Date"`.
    pub fn to_date_string_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<String> {
        self.render_or_invalid(DATE_STRING_PATTERN, &self.zone, provider)
    }

    /// `"14:30:50 UTC+0900 (Asia/Tokyo)"`, or `"Invalid Date"`.
    pub fn to_time_string_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<String> {
        self.render_or_invalid(TIME_STRING_PATTERN, &self.zone, provider)
    }

    /// Hands the components of this value to a locale formatter.
    pub fn to_locale_string_with_provider(
        &self,
        formatter: &impl LocaleFormatter,
        locale: &Locale,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<String> {
        let components = self.components_with_provider(provider)?;
        formatter.format(locale, &components, &self.zone)
    }

    /// The relative phrase for this value as seen from
    /// `now_epoch_milliseconds`.
    pub fn relative_to(
        &self,
        now_epoch_milliseconds: i64,
        options: RelativeTimeOptions,
    ) -> DatetimeResult<String> {
        let delta = relative::delta_seconds(now_epoch_milliseconds, self.get_time()?);
        Ok(relative::relative_time(delta, options))
    }
}

// ==== Names ====

impl DatetimeValue {
    pub fn day_name_with_provider<'n, N: NameProvider + ?Sized>(
        &self,
        names: &'n N,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<&'n str> {
        Ok(names.short_day_name(self.get_day_with_provider(provider)?))
    }

    pub fn full_day_name_with_provider<'n, N: NameProvider + ?Sized>(
        &self,
        names: &'n N,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<&'n str> {
        Ok(names.full_day_name(self.get_day_with_provider(provider)?))
    }

    pub fn month_name_with_provider<'n, N: NameProvider + ?Sized>(
        &self,
        names: &'n N,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<&'n str> {
        Ok(names.short_month_name(self.get_month_with_provider(provider)?))
    }

    pub fn full_month_name_with_provider<'n, N: NameProvider + ?Sized>(
        &self,
        names: &'n N,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<&'n str> {
        Ok(names.full_month_name(self.get_month_with_provider(provider)?))
    }
}

// ==== HTML output ====

impl DatetimeValue {
    fn time_element(
        &self,
        text: &str,
        format: Option<char>,
        title: Option<&str>,
    ) -> DatetimeResult<String> {
        let iso = self.to_iso_string()?;
        let element = TimeElement {
            datetime: &iso,
            format,
            title,
            text,
        };
        Ok(element.write_to_string().into_owned())
    }

    /// `<time datetime="…">` holding `to_string_legacy`.
    pub fn to_html_string_with_provider(
        &self,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<String> {
        let text = self.to_string_legacy_with_provider(provider)?;
        self.time_element(&text, None, None)
    }

    /// `<time datetime="…">` holding `to_utc_string`.
    pub fn to_html_utc(&self) -> DatetimeResult<String> {
        let text = self.to_utc_string()?;
        self.time_element(&text, None, None)
    }

    /// `<time datetime="…">` holding this value rendered with `pattern`.
    pub fn to_html_formatted_with_provider(
        &self,
        pattern: &str,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<String> {
        let text = self.format_with_provider(pattern, provider)?;
        self.time_element(&text, None, None)
    }

    /// A timestamp element in one of the chat styles, with the style in
    /// `data-format` and `to_string_legacy` in `title`.
    ///
    /// The relative style is measured from `now_epoch_milliseconds`.
    pub fn to_html_discord_string_with_provider(
        &self,
        style: DiscordStyle,
        now_epoch_milliseconds: i64,
        provider: &impl TimeZoneProvider,
    ) -> DatetimeResult<String> {
        let text = match style.pattern() {
            Some(pattern) => self.format_with_provider(pattern, provider)?,
            None => {
                let delta = i128::from(now_epoch_milliseconds) - i128::from(self.get_time()?);
                let delta = i64::try_from(delta)
                    .map_err(|_| DatetimeError::range().with_message("Delta is out of range."))?;
                relative::short_relative_phrase(delta)
            }
        };
        let title = self.to_string_legacy_with_provider(provider)?;
        self.time_element(&text, Some(style.flag()), Some(&title))
    }
}
