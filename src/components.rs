//! Wall clock component records.

use crate::{datetime_assert, equations, DatetimeResult, DatetimeUnwrap, NS_PER_MS};

/// The wall clock components of an instant in a time zone.
///
/// `month` is zero based and `weekday` counts from Sunday, matching the
/// legacy `Date` getters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeComponents {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub weekday: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
    pub microsecond: u16,
    pub nanosecond: u16,
}

impl DateTimeComponents {
    /// Derives the components from nanoseconds since the epoch on the
    /// local time line.
    pub(crate) fn from_local_nanoseconds(local: i128) -> DatetimeResult<Self> {
        let ms = local.div_euclid(NS_PER_MS);
        let sub_ms = local.rem_euclid(NS_PER_MS) as u32;
        let t = i64::try_from(ms).ok().datetime_unwrap()? as f64;
        let year = equations::year_from_time(t);
        datetime_assert!(
            equations::day_from_year(year) <= equations::day(t),
            "no year in the search range contains the time value {t}"
        );
        Ok(Self {
            year: year as i32,
            month: equations::month_from_time(t) as u8,
            day: equations::date_from_time(t) as u8,
            weekday: equations::week_day(t) as u8,
            hour: equations::hour_from_time(t) as u8,
            minute: equations::min_from_time(t) as u8,
            second: equations::sec_from_time(t) as u8,
            millisecond: equations::ms_from_time(t) as u16,
            microsecond: (sub_ms / 1000) as u16,
            nanosecond: (sub_ms % 1000) as u16,
        })
    }

    /// The one based month.
    #[inline]
    #[must_use]
    pub fn iso_month(&self) -> u8 {
        self.month + 1
    }
}

/// Setter overrides applied on top of the current wall clock components.
///
/// Every field may hold an out of range value; the mutator carries the
/// excess into the neighboring units. `month` is zero based.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PartialDateTime {
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub day: Option<i64>,
    pub hour: Option<i64>,
    pub minute: Option<i64>,
    pub second: Option<i64>,
    pub millisecond: Option<i64>,
}

impl PartialDateTime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_year(mut self, year: i64) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub const fn with_month(mut self, month: i64) -> Self {
        self.month = Some(month);
        self
    }

    #[must_use]
    pub const fn with_day(mut self, day: i64) -> Self {
        self.day = Some(day);
        self
    }

    #[must_use]
    pub const fn with_hour(mut self, hour: i64) -> Self {
        self.hour = Some(hour);
        self
    }

    #[must_use]
    pub const fn with_minute(mut self, minute: i64) -> Self {
        self.minute = Some(minute);
        self
    }

    #[must_use]
    pub const fn with_second(mut self, second: i64) -> Self {
        self.second = Some(second);
        self
    }

    #[must_use]
    pub const fn with_millisecond(mut self, millisecond: i64) -> Self {
        self.millisecond = Some(millisecond);
        self
    }

    /// Returns true if no field is overridden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_from_local_nanoseconds() {
        // 2024-03-01T05:30:50.123456789
        let c = DateTimeComponents::from_local_nanoseconds(1_709_271_050_123_456_789).unwrap();
        assert_eq!((c.year, c.month, c.day, c.weekday), (2024, 2, 1, 5));
        assert_eq!((c.hour, c.minute, c.second), (5, 30, 50));
        assert_eq!((c.millisecond, c.microsecond, c.nanosecond), (123, 456, 789));
    }

    #[test]
    fn components_before_epoch() {
        let c = DateTimeComponents::from_local_nanoseconds(-1).unwrap();
        assert_eq!((c.year, c.month, c.day), (1969, 11, 31));
        assert_eq!((c.hour, c.minute, c.second, c.millisecond), (23, 59, 59, 999));
        assert_eq!((c.microsecond, c.nanosecond), (999, 999));
        assert_eq!(c.weekday, 3);
    }

    #[test]
    fn components_outside_the_year_search_range() {
        let err = DateTimeComponents::from_local_nanoseconds(-1_000_000_000_000_000_000_000_000)
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Assert);
    }

    #[test]
    fn partial_builders() {
        let partial = PartialDateTime::new().with_hour(30).with_minute(30);
        assert_eq!(partial.hour, Some(30));
        assert_eq!(partial.minute, Some(30));
        assert!(partial.day.is_none());
        assert!(!partial.is_empty());
        assert!(PartialDateTime::new().is_empty());
    }
}
