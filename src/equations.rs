//! Epoch and calendar equations.
//!
//! These are the date equations of ECMA-262 §21.4.1 operating on time
//! values: `f64` milliseconds since the epoch where `NaN` marks an invalid
//! time. Every operation propagates `NaN` and none of them panic.

use core_maths::CoreFloat;

/// Milliseconds per day as a time value.
pub(crate) const MS_PER_DAY: f64 = 86_400_000.0;
pub(crate) const MS_PER_HOUR: f64 = 3_600_000.0;
pub(crate) const MS_PER_MINUTE: f64 = 60_000.0;
pub(crate) const MS_PER_SECOND: f64 = 1_000.0;

/// The largest magnitude a time value may have.
pub(crate) const MAX_TIME_VALUE: f64 = 8.64e15;

/// Year bounds used by the `year_from_time` search. They bracket every
/// representable time value with a year of margin.
const MIN_SEARCH_YEAR: f64 = -271_822.0;
const MAX_SEARCH_YEAR: f64 = 275_761.0;

/// Days elapsed before the first of each month, common then leap years.
const DAYS_BEFORE_MONTH: [[u16; 12]; 2] = [
    [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334],
    [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335],
];

#[inline]
fn floor(x: f64) -> f64 {
    CoreFloat::floor(x)
}

#[inline]
fn trunc(x: f64) -> f64 {
    CoreFloat::trunc(x)
}

/// Euclidean modulo: the result always has the sign of `divisor`.
#[inline]
pub(crate) fn modulo(value: f64, divisor: f64) -> f64 {
    let rem = value % divisor;
    if rem < 0.0 {
        rem + divisor
    } else if rem == 0.0 {
        0.0
    } else {
        rem
    }
}

/// `Day(t)`
#[inline]
pub(crate) fn day(t: f64) -> f64 {
    floor(t / MS_PER_DAY)
}

/// `DaysInYear(y)`
pub(crate) fn days_in_year(y: f64) -> f64 {
    if modulo(y, 4.0) != 0.0 {
        365.0
    } else if modulo(y, 100.0) != 0.0 {
        366.0
    } else if modulo(y, 400.0) != 0.0 {
        365.0
    } else {
        366.0
    }
}

/// `DayFromYear(y)`
pub(crate) fn day_from_year(y: f64) -> f64 {
    365.0 * (y - 1970.0) + floor((y - 1969.0) / 4.0) - floor((y - 1901.0) / 100.0)
        + floor((y - 1601.0) / 400.0)
}

/// `YearFromTime(t)`: the largest year whose first day is not after `t`.
pub(crate) fn year_from_time(t: f64) -> f64 {
    if !t.is_finite() {
        return f64::NAN;
    }
    let target = day(t);
    let (mut low, mut high) = (MIN_SEARCH_YEAR, MAX_SEARCH_YEAR);
    // Invariant: day_from_year(low) <= target < day_from_year(high + 1)
    while low < high {
        let mid = floor((low + high + 1.0) / 2.0);
        if day_from_year(mid) <= target {
            low = mid;
        } else {
            high = mid - 1.0;
        }
    }
    low
}

/// `InLeapYear(t)`
#[inline]
pub(crate) fn in_leap_year(t: f64) -> bool {
    days_in_year(year_from_time(t)) == 366.0
}

/// `DayWithinYear(t)`, zero based.
#[inline]
pub(crate) fn day_within_year(t: f64) -> f64 {
    day(t) - day_from_year(year_from_time(t))
}

#[inline]
fn month_table(leap: bool) -> &'static [u16; 12] {
    &DAYS_BEFORE_MONTH[usize::from(leap)]
}

/// `MonthFromTime(t)`, zero based.
pub(crate) fn month_from_time(t: f64) -> f64 {
    if !t.is_finite() {
        return f64::NAN;
    }
    let day_in_year = day_within_year(t);
    let table = month_table(in_leap_year(t));
    let month = table.partition_point(|&start| f64::from(start) <= day_in_year);
    (month.max(1) - 1) as f64
}

/// `DateFromTime(t)`, one based.
pub(crate) fn date_from_time(t: f64) -> f64 {
    if !t.is_finite() {
        return f64::NAN;
    }
    let month = month_from_time(t) as usize;
    let table = month_table(in_leap_year(t));
    day_within_year(t) - f64::from(table[month]) + 1.0
}

/// `WeekDay(t)`, zero is Sunday.
#[inline]
pub(crate) fn week_day(t: f64) -> f64 {
    modulo(day(t) + 4.0, 7.0)
}

/// `HourFromTime(t)`
#[inline]
pub(crate) fn hour_from_time(t: f64) -> f64 {
    modulo(floor(t / MS_PER_HOUR), 24.0)
}

/// `MinFromTime(t)`
#[inline]
pub(crate) fn min_from_time(t: f64) -> f64 {
    modulo(floor(t / MS_PER_MINUTE), 60.0)
}

/// `SecFromTime(t)`
#[inline]
pub(crate) fn sec_from_time(t: f64) -> f64 {
    modulo(floor(t / MS_PER_SECOND), 60.0)
}

/// `msFromTime(t)`
#[inline]
pub(crate) fn ms_from_time(t: f64) -> f64 {
    modulo(t, MS_PER_SECOND)
}

/// `MakeTime(hour, min, sec, ms)`
pub(crate) fn make_time(hour: f64, min: f64, sec: f64, ms: f64) -> f64 {
    if !hour.is_finite() || !min.is_finite() || !sec.is_finite() || !ms.is_finite() {
        return f64::NAN;
    }
    trunc(hour) * MS_PER_HOUR + trunc(min) * MS_PER_MINUTE + trunc(sec) * MS_PER_SECOND + trunc(ms)
}

/// `MakeDay(year, month, date)` where `month` is zero based and may be out
/// of range; the excess folds into the year.
pub(crate) fn make_day(year: f64, month: f64, date: f64) -> f64 {
    if !year.is_finite() || !month.is_finite() || !date.is_finite() {
        return f64::NAN;
    }
    let (y, m, dt) = (trunc(year), trunc(month), trunc(date));
    let ym = y + floor(m / 12.0);
    if !(MIN_SEARCH_YEAR..=MAX_SEARCH_YEAR).contains(&ym) {
        return f64::NAN;
    }
    let mn = modulo(m, 12.0) as usize;
    let leap = days_in_year(ym) == 366.0;
    day_from_year(ym) + f64::from(month_table(leap)[mn]) + dt - 1.0
}

/// `MakeDate(day, time)`
#[inline]
pub(crate) fn make_date(day: f64, time: f64) -> f64 {
    if !day.is_finite() || !time.is_finite() {
        return f64::NAN;
    }
    let tv = day * MS_PER_DAY + time;
    if !tv.is_finite() {
        return f64::NAN;
    }
    tv
}

/// `MakeFullYear(year)`: years 0 through 99 map to 1900 through 1999.
pub(crate) fn make_full_year(year: f64) -> f64 {
    if year.is_nan() {
        return f64::NAN;
    }
    let truncated = trunc(year);
    if (0.0..=99.0).contains(&truncated) {
        1900.0 + truncated
    } else {
        truncated
    }
}

/// `TimeClip(time)`: non-finite or out of range values become `NaN`,
/// `-0` becomes `+0`, and everything else is truncated.
pub(crate) fn time_clip(time: f64) -> f64 {
    if !time.is_finite() || CoreFloat::abs(time) > MAX_TIME_VALUE {
        return f64::NAN;
    }
    // Adding zero canonicalizes -0 to +0.
    trunc(time) + 0.0
}

/// Days in a one based month of a proleptic Gregorian year.
pub(crate) fn iso_days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if is_leap_year(year) => 29,
        _ => 28,
    }
}

#[inline]
pub(crate) const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Zero based day of the year for a one based month.
pub(crate) fn day_of_year(year: i32, month: u8, day: u8) -> u16 {
    let index = usize::from(month.clamp(1, 12) - 1);
    month_table(is_leap_year(year))[index] + u16::from(day) - 1
}

/// The ISO 8601 week number of a date, 1 through 53.
pub(crate) fn iso_week_number(year: i32, month: u8, day: u8) -> u8 {
    let ordinal = i32::from(day_of_year(year, month, day)) + 1;
    let weekday = iso_weekday(year, month, day);
    let week = (ordinal - weekday + 10) / 7;
    if week < 1 {
        return iso_weeks_in_year(year - 1);
    }
    if week > i32::from(iso_weeks_in_year(year)) {
        return 1;
    }
    week as u8
}

/// ISO weekday where Monday is 1 and Sunday is 7.
fn iso_weekday(year: i32, month: u8, day: u8) -> i32 {
    let days = make_day(f64::from(year), f64::from(month) - 1.0, f64::from(day));
    let weekday = modulo(days + 4.0, 7.0) as i32;
    if weekday == 0 {
        7
    } else {
        weekday
    }
}

fn iso_weeks_in_year(year: i32) -> u8 {
    // A year has 53 weeks when it starts on a Thursday, or on a Wednesday
    // in a leap year.
    let jan_first = iso_weekday(year, 1, 1);
    if jan_first == 4 || (jan_first == 3 && is_leap_year(year)) {
        53
    } else {
        52
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T_2024_03_01: f64 = 1_709_271_050_123.0;

    fn time_from_year(y: f64) -> f64 {
        MS_PER_DAY * day_from_year(y)
    }

    #[test]
    fn year_from_time_boundaries() {
        assert_eq!(year_from_time(0.0), 1970.0);
        assert_eq!(year_from_time(-1.0), 1969.0);
        assert_eq!(year_from_time(T_2024_03_01), 2024.0);
        assert_eq!(year_from_time(time_from_year(2000.0)), 2000.0);
        assert_eq!(year_from_time(time_from_year(2000.0) - 1.0), 1999.0);
        assert_eq!(year_from_time(-MAX_TIME_VALUE), -271_821.0);
        assert_eq!(year_from_time(MAX_TIME_VALUE), 275_760.0);
        assert!(year_from_time(f64::NAN).is_nan());
    }

    #[test]
    fn components_from_time() {
        assert_eq!(month_from_time(T_2024_03_01), 2.0);
        assert_eq!(date_from_time(T_2024_03_01), 1.0);
        assert_eq!(hour_from_time(T_2024_03_01), 5.0);
        assert_eq!(min_from_time(T_2024_03_01), 30.0);
        assert_eq!(sec_from_time(T_2024_03_01), 50.0);
        assert_eq!(ms_from_time(T_2024_03_01), 123.0);
        // Friday
        assert_eq!(week_day(T_2024_03_01), 5.0);

        // 2024-02-29
        let leap_day = make_date(make_day(2024.0, 1.0, 29.0), 0.0);
        assert_eq!(month_from_time(leap_day), 1.0);
        assert_eq!(date_from_time(leap_day), 29.0);
        // 2023-12-31
        let new_years_eve = make_date(make_day(2023.0, 11.0, 31.0), 0.0);
        assert_eq!(month_from_time(new_years_eve), 11.0);
        assert_eq!(date_from_time(new_years_eve), 31.0);
    }

    #[test]
    fn modulo_is_never_negative() {
        for t in [-1.0, -3_600_001.0, -86_400_000.0, -8.64e15, 1.0, 59_999.0] {
            let hour = hour_from_time(t);
            let minute = min_from_time(t);
            assert!((0.0..24.0).contains(&hour), "{t} hour {hour}");
            assert!((0.0..60.0).contains(&minute), "{t} minute {minute}");
            assert!((0.0..60.0).contains(&sec_from_time(t)));
            assert!((0.0..1000.0).contains(&ms_from_time(t)));
        }
        // 1969-12-31T23:59:59.999Z
        assert_eq!(hour_from_time(-1.0), 23.0);
        assert_eq!(min_from_time(-1.0), 59.0);
        assert_eq!(ms_from_time(-1.0), 999.0);
        assert_eq!(week_day(-1.0), 3.0);
    }

    #[test]
    fn make_day_folds_months() {
        assert_eq!(make_day(2024.0, 12.0, 1.0), make_day(2025.0, 0.0, 1.0));
        assert_eq!(make_day(2024.0, -1.0, 1.0), make_day(2023.0, 11.0, 1.0));
        assert_eq!(make_day(2024.0, 0.0, 32.0), make_day(2024.0, 1.0, 1.0));
        assert_eq!(make_day(2024.0, 0.0, 0.0), make_day(2023.0, 11.0, 31.0));
        assert_eq!(make_day(1970.0, 0.0, 1.0), 0.0);
        assert!(make_day(f64::NAN, 0.0, 1.0).is_nan());
        assert!(make_day(f64::INFINITY, 0.0, 1.0).is_nan());
    }

    #[test]
    fn make_time_and_date() {
        let time = make_time(5.0, 30.0, 50.0, 123.0);
        let day = make_day(2024.0, 2.0, 1.0);
        assert_eq!(make_date(day, time), T_2024_03_01);
        // Out of range components carry.
        assert_eq!(make_time(25.0, 0.0, 0.0, 0.0), MS_PER_DAY + MS_PER_HOUR);
        assert_eq!(make_time(0.0, -1.0, 0.0, 0.0), -MS_PER_MINUTE);
        assert!(make_time(f64::NAN, 0.0, 0.0, 0.0).is_nan());
    }

    #[test]
    fn time_clip_canonicalizes() {
        assert!(time_clip(f64::NAN).is_nan());
        assert!(time_clip(f64::INFINITY).is_nan());
        assert!(time_clip(8.64e15 + 1.0).is_nan());
        assert_eq!(time_clip(8.64e15), 8.64e15);
        assert_eq!(time_clip(-8.64e15), -8.64e15);
        assert_eq!(time_clip(1.9), 1.0);
        assert_eq!(time_clip(-1.9), -1.0);
        let zero = time_clip(-0.0);
        assert_eq!(zero, 0.0);
        assert!(zero.is_sign_positive());

        for x in [0.5, -0.0, 1e16, -7.5, f64::NAN, 8.64e15] {
            let once = time_clip(x);
            let twice = time_clip(once);
            assert!(once == twice || (once.is_nan() && twice.is_nan()));
        }
    }

    #[test]
    fn full_year() {
        assert_eq!(make_full_year(99.0), 1999.0);
        assert_eq!(make_full_year(0.0), 1900.0);
        assert_eq!(make_full_year(100.0), 100.0);
        assert_eq!(make_full_year(-1.0), -1.0);
        assert!(make_full_year(f64::NAN).is_nan());
    }

    #[test]
    fn iso_weeks() {
        assert_eq!(iso_week_number(2024, 1, 1), 1);
        assert_eq!(iso_week_number(2024, 3, 1), 9);
        assert_eq!(iso_week_number(2021, 1, 1), 53);
        assert_eq!(iso_week_number(2020, 12, 31), 53);
        assert_eq!(iso_week_number(2019, 12, 30), 1);
        assert_eq!(day_of_year(2024, 3, 1), 60);
        assert_eq!(day_of_year(2023, 3, 1), 59);
    }
}
