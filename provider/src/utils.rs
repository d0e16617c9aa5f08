//! Integer Gregorian calendar helpers used while resolving transition rules.

pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

/// Days elapsed before the first day of each month in a common year.
const DAYS_BEFORE_MONTH: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

#[inline]
pub(crate) const fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days between the epoch and the first day of `year`.
pub(crate) fn epoch_days_for_year(year: i32) -> i64 {
    let y = i64::from(year);
    365 * (y - 1970) + (y - 1969).div_euclid(4) - (y - 1901).div_euclid(100)
        + (y - 1601).div_euclid(400)
}

/// Days before the zero-based `month` in a year.
pub(crate) fn month_to_day(month: u8, is_leap: bool) -> u16 {
    let index = usize::from(month.min(11));
    DAYS_BEFORE_MONTH[index] + u16::from(is_leap && month >= 2)
}

pub(crate) fn iso_days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if is_leap(year) => 29,
        _ => 28,
    }
}

/// Epoch days for a one-based month date.
pub(crate) fn epoch_days_from_gregorian_date(year: i32, month: u8, day: u8) -> i64 {
    epoch_days_for_year(year)
        + i64::from(month_to_day(month.saturating_sub(1), is_leap(year)))
        + i64::from(day)
        - 1
}

/// The inverse of [`epoch_days_from_gregorian_date`].
pub(crate) fn ymd_from_epoch_days(epoch_days: i64) -> (i32, u8, u8) {
    let z = epoch_days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year as i32, month, day)
}

/// Day of the week with Sunday as zero.
pub(crate) fn epoch_days_to_day_of_week(epoch_days: i64) -> u8 {
    (epoch_days + 4).rem_euclid(7) as u8
}

pub(crate) fn epoch_seconds_to_year(seconds: i64) -> i32 {
    ymd_from_epoch_days(seconds.div_euclid(SECONDS_PER_DAY)).0
}
