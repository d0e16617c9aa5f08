//! `DatetimeValue` methods backed by the bundled tzdb provider.
//!
//! Enable with the `compiled_data` feature flag.

use alloc::string::String;
use core::{fmt, str::FromStr};

use icu_locale::Locale;

use super::DatetimeValue;
use crate::{
    components::{DateTimeComponents, PartialDateTime},
    names::{EnglishNames, LocaleFormatter, NameProvider},
    provider::CompiledTzdbProvider,
    timezone::{TimeZone, TZ_PROVIDER},
    DatetimeError, DatetimeResult,
};

fn with_tz_provider<T>(
    f: impl FnOnce(&CompiledTzdbProvider) -> DatetimeResult<T>,
) -> DatetimeResult<T> {
    let provider = TZ_PROVIDER
        .lock()
        .map_err(|_| DatetimeError::general("Unable to acquire lock"))?;
    f(&*provider)
}

impl fmt::Display for DatetimeValue {
    /// Writes `to_string_legacy`, or `Invalid Date` when the value cannot
    /// be rendered.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_string_legacy() {
            Ok(string) => f.write_str(&string),
            Err(_) => f.write_str(super::INVALID_DATE),
        }
    }
}

impl FromStr for DatetimeValue {
    type Err = DatetimeError;

    /// Parses a date-time string. Strings that name no zone are read in
    /// the host's time zone with the `sys` feature, and in UTC without it.
    fn from_str(source: &str) -> Result<Self, Self::Err> {
        with_tz_provider(|provider| {
            #[cfg(feature = "sys")]
            let fallback = crate::sys::get_system_timezone(provider)?;
            #[cfg(not(feature = "sys"))]
            let fallback = TimeZone::utc();
            Self::from_str_with_provider(source, fallback, provider)
        })
    }
}

// ==== Constructors ====

impl DatetimeValue {
    /// Parses a date-time string, reading strings without a zone in
    /// `fallback`.
    pub fn parse(source: &str, fallback: TimeZone) -> DatetimeResult<Self> {
        with_tz_provider(|provider| Self::from_str_with_provider(source, fallback, provider))
    }

    /// The current time. Without a `zone` the host's time zone is used.
    #[cfg(feature = "sys")]
    pub fn now(zone: Option<TimeZone>) -> DatetimeResult<Self> {
        with_tz_provider(|provider| Self::now_with_host(&crate::host::SystemHost, zone, provider))
    }

    /// The system clock's epoch milliseconds with the sub-second part set
    /// to zero.
    #[cfg(feature = "sys")]
    pub fn zero_ms() -> DatetimeResult<i64> {
        Self::zero_ms_with_host(&crate::host::SystemHost)
    }

    /// The system clock's epoch nanoseconds with the sub-second part set
    /// to zero.
    #[cfg(feature = "sys")]
    pub fn zero_ns() -> DatetimeResult<i128> {
        Self::zero_ns_with_host(&crate::host::SystemHost)
    }

    /// Resolves `identifier` and returns a copy of this value in that zone.
    pub fn to_timezone_identifier(&self, identifier: &str) -> DatetimeResult<Self> {
        with_tz_provider(|provider| self.to_timezone_identifier_with_provider(identifier, provider))
    }
}

// ==== Getters ====

impl DatetimeValue {
    pub fn components(&self) -> DatetimeResult<DateTimeComponents> {
        with_tz_provider(|provider| self.components_with_provider(provider))
    }

    pub fn get_full_year(&self) -> DatetimeResult<i32> {
        Ok(self.components()?.year)
    }

    pub fn get_year(&self) -> DatetimeResult<i32> {
        with_tz_provider(|provider| self.get_year_with_provider(provider))
    }

    pub fn get_month(&self) -> DatetimeResult<u8> {
        Ok(self.components()?.month)
    }

    pub fn get_date(&self) -> DatetimeResult<u8> {
        Ok(self.components()?.day)
    }

    pub fn get_day(&self) -> DatetimeResult<u8> {
        Ok(self.components()?.weekday)
    }

    pub fn get_day_number_week(&self) -> DatetimeResult<u8> {
        self.get_day()
    }

    pub fn get_day_number(&self) -> DatetimeResult<u8> {
        self.get_date()
    }

    pub fn get_day_number_month(&self) -> DatetimeResult<u8> {
        self.get_date()
    }

    pub fn get_hours(&self) -> DatetimeResult<u8> {
        Ok(self.components()?.hour)
    }

    pub fn get_minutes(&self) -> DatetimeResult<u8> {
        Ok(self.components()?.minute)
    }

    pub fn get_seconds(&self) -> DatetimeResult<u8> {
        Ok(self.components()?.second)
    }

    pub fn get_milliseconds(&self) -> DatetimeResult<u16> {
        Ok(self.components()?.millisecond)
    }

    pub fn get_timezone_offset(&self) -> DatetimeResult<i64> {
        with_tz_provider(|provider| self.get_timezone_offset_with_provider(provider))
    }

    pub fn day_name(&self) -> DatetimeResult<&'static str> {
        with_tz_provider(|provider| self.day_name_with_provider(&EnglishNames, provider))
    }

    pub fn full_day_name(&self) -> DatetimeResult<&'static str> {
        with_tz_provider(|provider| self.full_day_name_with_provider(&EnglishNames, provider))
    }

    pub fn month_name(&self) -> DatetimeResult<&'static str> {
        with_tz_provider(|provider| self.month_name_with_provider(&EnglishNames, provider))
    }

    pub fn full_month_name(&self) -> DatetimeResult<&'static str> {
        with_tz_provider(|provider| self.full_month_name_with_provider(&EnglishNames, provider))
    }
}

// ==== Setters ====

impl DatetimeValue {
    pub fn with(&self, partial: PartialDateTime) -> DatetimeResult<Self> {
        with_tz_provider(|provider| self.with_with_provider(partial, provider))
    }

    pub fn set_full_year(
        &mut self,
        year: i64,
        month: Option<i64>,
        date: Option<i64>,
    ) -> DatetimeResult<()> {
        with_tz_provider(|provider| self.set_full_year_with_provider(year, month, date, provider))
    }

    pub fn set_year(&mut self, year: i64) -> DatetimeResult<()> {
        with_tz_provider(|provider| self.set_year_with_provider(year, provider))
    }

    pub fn set_month(&mut self, month: i64, date: Option<i64>) -> DatetimeResult<()> {
        with_tz_provider(|provider| self.set_month_with_provider(month, date, provider))
    }

    pub fn set_date(&mut self, date: i64) -> DatetimeResult<()> {
        with_tz_provider(|provider| self.set_date_with_provider(date, provider))
    }

    pub fn set_hours(
        &mut self,
        hours: i64,
        minutes: Option<i64>,
        seconds: Option<i64>,
        milliseconds: Option<i64>,
    ) -> DatetimeResult<()> {
        with_tz_provider(|provider| {
            self.set_hours_with_provider(hours, minutes, seconds, milliseconds, provider)
        })
    }

    pub fn set_minutes(
        &mut self,
        minutes: i64,
        seconds: Option<i64>,
        milliseconds: Option<i64>,
    ) -> DatetimeResult<()> {
        with_tz_provider(|provider| {
            self.set_minutes_with_provider(minutes, seconds, milliseconds, provider)
        })
    }

    pub fn set_seconds(&mut self, seconds: i64, milliseconds: Option<i64>) -> DatetimeResult<()> {
        with_tz_provider(|provider| self.set_seconds_with_provider(seconds, milliseconds, provider))
    }

    pub fn set_milliseconds(&mut self, milliseconds: i64) -> DatetimeResult<()> {
        with_tz_provider(|provider| self.set_milliseconds_with_provider(milliseconds, provider))
    }
}

// ==== String output ====

impl DatetimeValue {
    pub fn format(&self, pattern: &str) -> DatetimeResult<String> {
        with_tz_provider(|provider| self.format_with_provider(pattern, provider))
    }

    pub fn format_with_names(
        &self,
        pattern: &str,
        names: &dyn NameProvider,
    ) -> DatetimeResult<String> {
        with_tz_provider(|provider| self.format_with_names_with_provider(pattern, names, provider))
    }

    pub fn to_string_legacy(&self) -> DatetimeResult<String> {
        with_tz_provider(|provider| self.to_string_legacy_with_provider(provider))
    }

    pub fn to_date_string(&self) -> DatetimeResult<String> {
        with_tz_provider(|provider| self.to_date_string_with_provider(provider))
    }

    pub fn to_time_string(&self) -> DatetimeResult<String> {
        with_tz_provider(|provider| self.to_time_string_with_provider(provider))
    }

    pub fn to_locale_string(
        &self,
        formatter: &impl LocaleFormatter,
        locale: &Locale,
    ) -> DatetimeResult<String> {
        with_tz_provider(|provider| self.to_locale_string_with_provider(formatter, locale, provider))
    }

    pub fn to_html_string(&self) -> DatetimeResult<String> {
        with_tz_provider(|provider| self.to_html_string_with_provider(provider))
    }

    pub fn to_html_formatted(&self, pattern: &str) -> DatetimeResult<String> {
        with_tz_provider(|provider| self.to_html_formatted_with_provider(pattern, provider))
    }

    /// A timestamp element in one of the chat styles, with the relative
    /// style measured from the system clock.
    #[cfg(feature = "sys")]
    pub fn to_html_discord_string(
        &self,
        style: crate::options::DiscordStyle,
    ) -> DatetimeResult<String> {
        let now = crate::sys::get_system_nanoseconds()?.epoch_milliseconds();
        with_tz_provider(|provider| self.to_html_discord_string_with_provider(style, now, provider))
    }
}
