//! Multi-unit human durations.

use alloc::{format, string::String, vec::Vec};
use core::fmt;

use writeable::{impl_display_with_writeable, Writeable};

/// Seconds in the coarse year used by relative phrases.
pub const SECONDS_PER_YEAR: u64 = 31_536_000;
/// Seconds in the mean Gregorian month.
pub const SECONDS_PER_MONTH: u64 = 2_629_746;
pub const SECONDS_PER_WEEK: u64 = 604_800;
pub const SECONDS_PER_DAY: u64 = 86_400;
pub const SECONDS_PER_HOUR: u64 = 3_600;
pub const SECONDS_PER_MINUTE: u64 = 60;

/// A decomposed duration. Every unit is a magnitude; `negative` carries
/// the direction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration {
    pub years: u64,
    pub months: u64,
    pub weeks: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub milliseconds: u64,
    pub microseconds: u64,
    pub nanoseconds: u64,
    pub negative: bool,
}

impl HumanDuration {
    /// Splits a signed number of seconds into years through seconds using
    /// the relative time bucket sizes.
    #[must_use]
    pub fn from_seconds(seconds: i64) -> Self {
        let mut rest = seconds.unsigned_abs();
        let mut take = |size: u64| {
            let whole = rest / size;
            rest %= size;
            whole
        };
        let years = take(SECONDS_PER_YEAR);
        let months = take(SECONDS_PER_MONTH);
        let weeks = take(SECONDS_PER_WEEK);
        let days = take(SECONDS_PER_DAY);
        let hours = take(SECONDS_PER_HOUR);
        let minutes = take(SECONDS_PER_MINUTE);
        Self {
            years,
            months,
            weeks,
            days,
            hours,
            minutes,
            seconds: rest,
            negative: seconds < 0,
            ..Self::default()
        }
    }

    fn units(&self) -> [(u64, &'static str); 10] {
        [
            (self.years, "year"),
            (self.months, "month"),
            (self.weeks, "week"),
            (self.days, "day"),
            (self.hours, "hour"),
            (self.minutes, "minute"),
            (self.seconds, "second"),
            (self.milliseconds, "millisecond"),
            (self.microseconds, "microsecond"),
            (self.nanoseconds, "nanosecond"),
        ]
    }

    /// Returns true if every unit is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.units().iter().all(|(value, _)| *value == 0)
    }

    /// Renders the non-zero units in descending order, e.g.
    /// `"1 day, 2 hours and 1 minute"`.
    ///
    /// `max_units` keeps only the first N non-zero units. A zero duration
    /// renders `"0 seconds"`. The sign is not rendered.
    #[must_use]
    pub fn to_human_string(&self, max_units: Option<usize>) -> String {
        let parts: Vec<String> = self
            .units()
            .iter()
            .filter(|(value, _)| *value != 0)
            .take(max_units.unwrap_or(usize::MAX))
            .map(|(value, unit)| pluralize(*value, unit))
            .collect();
        match parts.as_slice() {
            [] => String::from("0 seconds"),
            [only] => only.clone(),
            [init @ .., last] => format!("{} and {last}", init.join(", ")),
        }
    }

    /// Renders an ISO 8601 duration such as `P1DT2H0.5S`.
    ///
    /// With `use_i_for_minutes` the minutes are designated `I` so that they
    /// cannot be confused with months.
    #[must_use]
    pub fn to_machine_string(&self, use_i_for_minutes: bool) -> String {
        MachineDuration {
            duration: self,
            minute_designator: if use_i_for_minutes { 'I' } else { 'M' },
        }
        .write_to_string()
        .into_owned()
    }
}

/// Formats `value` with `unit`, adding an `s` unless the value is one.
pub(crate) fn pluralize(value: u64, unit: &str) -> String {
    if value == 1 {
        format!("{value} {unit}")
    } else {
        format!("{value} {unit}s")
    }
}

struct MachineDuration<'a> {
    duration: &'a HumanDuration,
    minute_designator: char,
}

impl Writeable for MachineDuration<'_> {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        let d = self.duration;
        let subsecond = u128::from(d.milliseconds) * 1_000_000
            + u128::from(d.microseconds) * 1_000
            + u128::from(d.nanoseconds);
        let seconds = u128::from(d.seconds) + subsecond / 1_000_000_000;
        let fraction = (subsecond % 1_000_000_000) as u32;

        if d.negative && !d.is_zero() {
            sink.write_char('-')?;
        }
        sink.write_char('P')?;
        for (value, designator) in [(d.years, 'Y'), (d.months, 'M'), (d.weeks, 'W'), (d.days, 'D')]
        {
            if value != 0 {
                value.write_to(sink)?;
                sink.write_char(designator)?;
            }
        }

        let has_time = d.hours != 0 || d.minutes != 0 || seconds != 0 || fraction != 0;
        let has_date = d.years != 0 || d.months != 0 || d.weeks != 0 || d.days != 0;
        if !has_time && has_date {
            return Ok(());
        }
        sink.write_char('T')?;
        if d.hours != 0 {
            d.hours.write_to(sink)?;
            sink.write_char('H')?;
        }
        if d.minutes != 0 {
            d.minutes.write_to(sink)?;
            sink.write_char(self.minute_designator)?;
        }
        if seconds != 0 || fraction != 0 || !has_time {
            seconds.write_to(sink)?;
            if fraction != 0 {
                sink.write_char('.')?;
                let mut digits = fraction;
                let mut width = 9;
                while digits % 10 == 0 {
                    digits /= 10;
                    width -= 1;
                }
                let len = digits.checked_ilog10().map_or(1, |d| d + 1);
                for _ in len..width {
                    sink.write_char('0')?;
                }
                digits.write_to(sink)?;
            }
            sink.write_char('S')?;
        }
        Ok(())
    }
}

impl_display_with_writeable!(MachineDuration<'_>);
