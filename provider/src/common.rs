//! Transition rule logic shared by the `TZif` backed providers.

use tzif::data::{
    posix::{DstTransitionInfo, PosixTzString, TransitionDate, TransitionDay},
    tzif::LocalTimeTypeRecord,
};

use crate::{
    provider::{TimeZoneTransitionInfo, UtcOffsetSeconds},
    utils,
};

impl From<LocalTimeTypeRecord> for UtcOffsetSeconds {
    fn from(value: LocalTimeTypeRecord) -> Self {
        Self(value.utoff.0)
    }
}

/// The POSIX tz string stores offsets as "seconds that must be added to
/// reach UTC", so the sign is inverted.
#[inline]
pub(crate) fn posix_std_offset(posix_tz_string: &PosixTzString) -> UtcOffsetSeconds {
    UtcOffsetSeconds(-posix_tz_string.std_info.offset.0)
}

#[inline]
pub(crate) fn posix_dst_offset(dst_variant: &DstTransitionInfo) -> UtcOffsetSeconds {
    UtcOffsetSeconds(-dst_variant.variant_info.offset.0)
}

/// Stores the information about DST transitions for a given year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DstTransitionInfoForYear {
    pub(crate) dst_start_seconds: i64,
    pub(crate) dst_end_seconds: i64,
    pub(crate) std_offset: UtcOffsetSeconds,
    pub(crate) dst_offset: UtcOffsetSeconds,
}

impl DstTransitionInfoForYear {
    pub(crate) fn compute(
        posix_tz_string: &PosixTzString,
        dst_variant: &DstTransitionInfo,
        year: i32,
    ) -> Self {
        let std_offset = posix_std_offset(posix_tz_string);
        let dst_offset = posix_dst_offset(dst_variant);
        let dst_start_seconds =
            calculate_transition_seconds_for_year(year, dst_variant.start_date, std_offset);
        let dst_end_seconds =
            calculate_transition_seconds_for_year(year, dst_variant.end_date, dst_offset);
        Self {
            dst_start_seconds,
            dst_end_seconds,
            std_offset,
            dst_offset,
        }
    }

    /// Southern hemisphere rules end daylight saving time before they start it.
    fn is_inverted(&self) -> bool {
        self.dst_end_seconds < self.dst_start_seconds
    }

    fn in_dst(&self, seconds: i64) -> bool {
        if self.is_inverted() {
            seconds < self.dst_end_seconds || seconds >= self.dst_start_seconds
        } else {
            (self.dst_start_seconds..self.dst_end_seconds).contains(&seconds)
        }
    }
}

/// Resolves the offset in effect at `seconds` using only the POSIX footer.
pub(crate) fn resolve_posix_tz_string_for_epoch_seconds(
    posix_tz_string: &PosixTzString,
    seconds: i64,
) -> TimeZoneTransitionInfo {
    let Some(dst_variant) = &posix_tz_string.dst_info else {
        // Regardless of the time, there is one variant and we can return it.
        return TimeZoneTransitionInfo {
            transition_epoch: None,
            offset: posix_std_offset(posix_tz_string),
        };
    };

    // The local year is what the rules are written against.
    let std_offset = posix_std_offset(posix_tz_string);
    let year = utils::epoch_seconds_to_year(seconds + std_offset.0);
    let current = DstTransitionInfoForYear::compute(posix_tz_string, dst_variant, year);
    let previous = DstTransitionInfoForYear::compute(posix_tz_string, dst_variant, year - 1);

    let in_dst = current.in_dst(seconds);
    let offset = if in_dst {
        current.dst_offset
    } else {
        current.std_offset
    };

    // The most recent transition at or before `seconds`.
    let transition_epoch = match (current.is_inverted(), in_dst) {
        (false, true) => current.dst_start_seconds,
        (false, false) if seconds >= current.dst_end_seconds => current.dst_end_seconds,
        (false, false) => previous.dst_end_seconds,
        (true, false) => current.dst_end_seconds,
        (true, true) if seconds >= current.dst_start_seconds => current.dst_start_seconds,
        (true, true) => previous.dst_start_seconds,
    };

    TimeZoneTransitionInfo {
        transition_epoch: Some(transition_epoch),
        offset,
    }
}

/// Computes the epoch seconds of a POSIX transition date in `year`.
///
/// `offset` is the offset in effect immediately before the transition,
/// since the transition time is expressed in that local time.
pub(crate) fn calculate_transition_seconds_for_year(
    year: i32,
    transition_date: TransitionDate,
    offset: UtcOffsetSeconds,
) -> i64 {
    let year_epoch_days = utils::epoch_days_for_year(year);
    let is_leap = utils::is_leap(year);

    // Zero-indexed day of the year.
    let day_of_year = match transition_date.day {
        // Jn: 1..=365, February 29th is never counted.
        TransitionDay::NoLeap(day) if day > 59 => i64::from(day) - 1 + i64::from(is_leap),
        TransitionDay::NoLeap(day) => i64::from(day) - 1,
        // n: 0..=365, February 29th is counted.
        TransitionDay::WithLeap(day) => i64::from(day),
        TransitionDay::Mwd(month, week, day) => {
            let month = month.clamp(1, 12) as u8;
            let days_to_month = i64::from(utils::month_to_day(month - 1, is_leap));
            let days_in_month = i64::from(utils::iso_days_in_month(year, month));
            let first_weekday =
                i64::from(utils::epoch_days_to_day_of_week(year_epoch_days + days_to_month));

            // Week 5 means "the last $weekday of the month", so step back
            // a week until the date lands inside the month.
            let mut day_of_month = (i64::from(day) - first_weekday).rem_euclid(7)
                + (i64::from(week).max(1) - 1) * 7;
            while day_of_month >= days_in_month {
                day_of_month -= 7;
            }

            days_to_month + day_of_month
        }
    };

    // Transition time is on local time, so we need to remove the UTC offset
    // to get the correct UTC timestamp for the transition.
    (year_epoch_days + day_of_year) * utils::SECONDS_PER_DAY + transition_date.time.0 - offset.0
}
