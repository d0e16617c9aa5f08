//! The overflow correcting mutator behind the zone aware setters.
//!
//! A candidate record is built from the current wall clock components with
//! the caller's overrides applied. While the candidate is not a valid
//! calendar date, one correction pass carries or borrows every unit into
//! its neighbor in a fixed order:
//!
//! 1. milliseconds into seconds
//! 2. seconds into minutes
//! 3. minutes into hours
//! 4. hours into days, with the calendar's hours in the day
//! 5. days into months, re-querying the days in every month crossed
//! 6. months into years, with the calendar's months in the year
//!
//! The loop is bounded by [`PRECAUTION_LIMIT`]. Reaching it means the
//! calendar reported inconsistent capacities.

use crate::{
    calendar::CalendarFields,
    components::{DateTimeComponents, PartialDateTime},
    equations,
    instant::Instant,
    options::Disambiguation,
    provider::{LocalDateTime, TimeZoneProvider},
    timezone::TimeZone,
    DatetimeError, DatetimeResult, PRECAUTION_LIMIT,
};

/// Wall clock fields with room for any carry. `month` is one based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    year: i128,
    month: i128,
    day: i128,
    hour: i128,
    minute: i128,
    second: i128,
    millisecond: i128,
}

impl Candidate {
    fn new(current: &DateTimeComponents, partial: &PartialDateTime) -> Self {
        let pick = |value: Option<i64>, fallback: i128| value.map_or(fallback, i128::from);
        Self {
            year: pick(partial.year, current.year.into()),
            month: pick(partial.month, current.month.into()) + 1,
            day: pick(partial.day, current.day.into()),
            hour: pick(partial.hour, current.hour.into()),
            minute: pick(partial.minute, current.minute.into()),
            second: pick(partial.second, current.second.into()),
            millisecond: pick(partial.millisecond, current.millisecond.into()),
        }
    }

    /// The naive time value of the candidate read as UTC.
    fn estimate(&self) -> f64 {
        let day = equations::make_day(
            self.year as f64,
            (self.month - 1) as f64,
            self.day as f64,
        );
        let time = equations::make_time(
            self.hour as f64,
            self.minute as f64,
            self.second as f64,
            self.millisecond as f64,
        );
        equations::make_date(day, time)
    }

    fn is_valid(&self, calendar: &impl CalendarFields) -> bool {
        let Ok(year) = i32::try_from(self.year) else {
            return false;
        };
        let in_unit = |value: i128, capacity: u8| (0..i128::from(capacity)).contains(&value);
        if !(1..=i128::from(calendar.months_in_year(year))).contains(&self.month) {
            return false;
        }
        let month = self.month as u8;
        if !(1..=i128::from(calendar.days_in_month(year, month))).contains(&self.day) {
            return false;
        }
        in_unit(self.hour, calendar.hours_in_day(year, month, self.day as u8))
            && in_unit(self.minute, 60)
            && in_unit(self.second, 60)
            && (0..1000).contains(&self.millisecond)
    }

    fn correct(&mut self, calendar: &impl CalendarFields) -> DatetimeResult<()> {
        carry(&mut self.millisecond, &mut self.second, 1000)?;
        carry(&mut self.second, &mut self.minute, 60)?;
        carry(&mut self.minute, &mut self.hour, 60)?;
        let hours = calendar.hours_in_day(
            clamp_year(self.year),
            clamp_u8(self.month),
            clamp_u8(self.day),
        );
        carry(&mut self.hour, &mut self.day, hours.into())?;
        self.correct_day(calendar)?;
        self.correct_month(calendar)
    }

    fn correct_day(&mut self, calendar: &impl CalendarFields) -> DatetimeResult<()> {
        self.correct_month(calendar)?;
        loop {
            let days = i128::from(
                calendar.days_in_month(clamp_year(self.year), clamp_u8(self.month)),
            );
            check_capacity(days)?;
            if self.day > days {
                self.day -= days;
                self.month += 1;
            } else if self.day < 1 {
                self.month -= 1;
                self.correct_month(calendar)?;
                let days = i128::from(
                    calendar.days_in_month(clamp_year(self.year), clamp_u8(self.month)),
                );
                check_capacity(days)?;
                self.day += days;
                continue;
            } else {
                return Ok(());
            }
            self.correct_month(calendar)?;
        }
    }

    fn correct_month(&mut self, calendar: &impl CalendarFields) -> DatetimeResult<()> {
        loop {
            let months = i128::from(calendar.months_in_year(clamp_year(self.year)));
            check_capacity(months)?;
            if self.month > months {
                self.month -= months;
                self.year += 1;
            } else if self.month < 1 {
                self.year -= 1;
                let months = i128::from(calendar.months_in_year(clamp_year(self.year)));
                check_capacity(months)?;
                self.month += months;
            } else {
                return Ok(());
            }
        }
    }

    fn to_local_date_time(self, sub_ms_nanoseconds: u32) -> Option<LocalDateTime> {
        Some(LocalDateTime {
            year: i32::try_from(self.year).ok()?,
            month: u8::try_from(self.month).ok()?,
            day: u8::try_from(self.day).ok()?,
            hour: u8::try_from(self.hour).ok()?,
            minute: u8::try_from(self.minute).ok()?,
            second: u8::try_from(self.second).ok()?,
            millisecond: u16::try_from(self.millisecond).ok()?,
            microsecond: (sub_ms_nanoseconds / 1000) as u16,
            nanosecond: (sub_ms_nanoseconds % 1000) as u16,
        })
    }
}

/// Carries `value` into `next` until `0 <= value < base`.
fn carry(value: &mut i128, next: &mut i128, base: i128) -> DatetimeResult<()> {
    check_capacity(base)?;
    loop {
        if *value >= base {
            *next += *value / base;
            *value %= base;
        } else if *value < 0 {
            *next -= 1 + value.abs() / base;
            *value = base + *value % base;
        } else {
            return Ok(());
        }
    }
}

fn check_capacity(capacity: i128) -> DatetimeResult<()> {
    if capacity <= 0 {
        return Err(DatetimeError::convergence()
            .with_message("Calendar reported a unit with no capacity."));
    }
    Ok(())
}

fn clamp_year(year: i128) -> i32 {
    year.clamp(i32::MIN.into(), i32::MAX.into()) as i32
}

fn clamp_u8(value: i128) -> u8 {
    value.clamp(0, u8::MAX.into()) as u8
}

/// Applies `partial` to the wall clock `current` in `zone` and returns the
/// corrected instant.
///
/// The sub-millisecond nanoseconds of the original instant are kept.
/// Candidates that cannot land inside the instant range resolve to
/// `Instant::Invalid` without entering the correction loop.
pub(crate) fn apply_overflowing(
    current: &DateTimeComponents,
    partial: &PartialDateTime,
    sub_ms_nanoseconds: u32,
    zone: &TimeZone,
    calendar: &impl CalendarFields,
    provider: &impl TimeZoneProvider,
) -> DatetimeResult<Instant> {
    let mut candidate = Candidate::new(current, partial);

    // Offsets never exceed a day, so anything further out than the range
    // plus a day cannot resolve to a valid instant.
    let estimate = candidate.estimate();
    if !estimate.is_finite()
        || core_maths::CoreFloat::abs(estimate)
            > equations::MAX_TIME_VALUE + equations::MS_PER_DAY
    {
        return Ok(Instant::Invalid);
    }

    for _pass in 0..PRECAUTION_LIMIT {
        if candidate.is_valid(calendar) {
            let Some(local) = candidate.to_local_date_time(sub_ms_nanoseconds) else {
                return Ok(Instant::Invalid);
            };
            #[cfg(feature = "log")]
            log::trace!("overflow correction settled after {_pass} passes: {local:?}");
            let ns = zone.get_epoch_nanoseconds_for(local, Disambiguation::Compatible, provider)?;
            return Ok(Instant::from_epoch_nanoseconds(ns));
        }
        candidate.correct(calendar)?;
    }

    #[cfg(feature = "log")]
    log::warn!("overflow correction did not settle: {candidate:?}");
    Err(DatetimeError::convergence().with_message(alloc::format!(
        "Overflow correction exceeded the precaution limit of {PRECAUTION_LIMIT} passes."
    )))
}
