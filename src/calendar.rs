//! Calendar capacities queried by the overflow correcting mutator.

use crate::equations;

/// The unit capacities of a calendar.
///
/// The mutator re-queries these on every correction step, so an
/// implementation may return different capacities for different months
/// or days. Months are one based.
pub trait CalendarFields {
    /// The number of months in `year`.
    fn months_in_year(&self, year: i32) -> u8;

    /// The number of days in `month` of `year`.
    fn days_in_month(&self, year: i32, month: u8) -> u8;

    /// The number of wall clock hour labels on the given day.
    ///
    /// This counts labels, not elapsed hours: a day shortened or
    /// lengthened by a zone transition still runs from hour 0 to hour 23,
    /// and the skipped or repeated hour is settled when the corrected wall
    /// clock time is resolved in the zone.
    fn hours_in_day(&self, year: i32, month: u8, day: u8) -> u8;
}

/// The proleptic Gregorian calendar.
///
/// Every day has 24 hour labels, including days with a zone transition.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IsoCalendar;

impl CalendarFields for IsoCalendar {
    fn months_in_year(&self, _: i32) -> u8 {
        12
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        equations::iso_days_in_month(year, month)
    }

    fn hours_in_day(&self, _: i32, _: u8, _: u8) -> u8 {
        24
    }
}

impl<T: CalendarFields + ?Sized> CalendarFields for &T {
    fn months_in_year(&self, year: i32) -> u8 {
        (**self).months_in_year(year)
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        (**self).days_in_month(year, month)
    }

    fn hours_in_day(&self, year: i32, month: u8, day: u8) -> u8 {
        (**self).hours_in_day(year, month, day)
    }
}
