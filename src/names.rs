//! Day and month names, and the locale formatting collaborator.

use alloc::string::String;

use icu_locale::Locale;

use crate::{components::DateTimeComponents, DatetimeResult, TimeZone};

/// Supplies weekday and month names to the format engine.
///
/// Weekdays count from Sunday and months are zero based.
pub trait NameProvider {
    fn short_day_name(&self, weekday: u8) -> &str;

    fn full_day_name(&self, weekday: u8) -> &str;

    fn short_month_name(&self, month: u8) -> &str;

    fn full_month_name(&self, month: u8) -> &str;
}

const SHORT_DAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const FULL_DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];
const SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const FULL_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The zero based month for an English short month name, ignoring case.
pub(crate) fn month_from_short_name(name: &str) -> Option<u8> {
    SHORT_MONTHS
        .iter()
        .position(|month| month.eq_ignore_ascii_case(name))
        .map(|index| index as u8)
}

pub(crate) fn is_short_day_name(name: &str) -> bool {
    SHORT_DAYS.iter().any(|day| day.eq_ignore_ascii_case(name))
}

/// English names, the default `NameProvider`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnglishNames;

impl NameProvider for EnglishNames {
    fn short_day_name(&self, weekday: u8) -> &str {
        SHORT_DAYS[usize::from(weekday % 7)]
    }

    fn full_day_name(&self, weekday: u8) -> &str {
        FULL_DAYS[usize::from(weekday % 7)]
    }

    fn short_month_name(&self, month: u8) -> &str {
        SHORT_MONTHS[usize::from(month % 12)]
    }

    fn full_month_name(&self, month: u8) -> &str {
        FULL_MONTHS[usize::from(month % 12)]
    }
}

/// A locale aware renderer for `DatetimeValue::to_locale_string`.
///
/// No locale data ships with this crate; callers bring their own.
pub trait LocaleFormatter {
    fn format(
        &self,
        locale: &Locale,
        components: &DateTimeComponents,
        zone: &TimeZone,
    ) -> DatetimeResult<String>;
}
