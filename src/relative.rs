//! Relative time phrases and re-render cadence.

use alloc::{format, string::String};
use core::time::Duration;

use crate::{
    duration::{
        pluralize, HumanDuration, SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE,
        SECONDS_PER_MONTH, SECONDS_PER_WEEK, SECONDS_PER_YEAR,
    },
    options::{RelativeStyle, RelativeTimeOptions},
};

const BUCKETS: [(u64, &str); 6] = [
    (SECONDS_PER_YEAR, "year"),
    (SECONDS_PER_MONTH, "month"),
    (SECONDS_PER_WEEK, "week"),
    (SECONDS_PER_DAY, "day"),
    (SECONDS_PER_HOUR, "hour"),
    (SECONDS_PER_MINUTE, "minute"),
];

/// Whole seconds from `then` to `now`, floored. Positive in the past.
#[must_use]
pub fn delta_seconds(now_milliseconds: i64, then_milliseconds: i64) -> i64 {
    (i128::from(now_milliseconds) - i128::from(then_milliseconds)).div_euclid(1000) as i64
}

/// Renders `delta` seconds (positive in the past) as a phrase in the
/// largest bucket it reaches: `"3 hours ago"`, `"in 1 minute"`, `"now"`.
#[must_use]
pub fn relative_phrase(delta: i64) -> String {
    let abs = delta.unsigned_abs();
    if abs < 1 {
        return String::from("now");
    }
    let (value, unit) = BUCKETS
        .iter()
        .find(|(size, _)| abs >= *size)
        .map_or((abs, "second"), |(size, unit)| (abs / size, *unit));
    direct(delta, &pluralize(value, unit))
}

/// Renders `delta` seconds with every non-zero unit, as in
/// `"1 day, 2 hours and 5 minutes ago"`.
#[must_use]
pub fn precise_phrase(delta: i64, max_units: Option<usize>) -> String {
    if delta == 0 {
        return String::from("now");
    }
    let duration = HumanDuration::from_seconds(delta);
    direct(delta, &duration.to_human_string(max_units))
}

/// Renders a relative phrase in the shape `options` asks for.
#[must_use]
pub fn relative_time(delta: i64, options: RelativeTimeOptions) -> String {
    match options.style {
        RelativeStyle::Coarse => relative_phrase(delta),
        RelativeStyle::Precise => precise_phrase(delta, options.max_units),
    }
}

fn direct(delta: i64, amount: &str) -> String {
    if delta < 0 {
        format!("in {amount}")
    } else {
        format!("{amount} ago")
    }
}

/// The short phrase of the `R` timestamp style, bucketed into seconds,
/// minutes, hours and days with `"ago"` / `"from now"`.
///
/// `delta_milliseconds` is positive in the past and truncates toward zero.
#[must_use]
pub fn short_relative_phrase(delta_milliseconds: i64) -> String {
    let delta = delta_milliseconds / 1000;
    if delta == 0 {
        return String::from("now");
    }
    let abs = delta.unsigned_abs();
    let amount = if abs < SECONDS_PER_MINUTE {
        pluralize(abs, "second")
    } else if abs < SECONDS_PER_HOUR {
        pluralize(abs / SECONDS_PER_MINUTE, "minute")
    } else if abs < SECONDS_PER_DAY {
        pluralize(abs / SECONDS_PER_HOUR, "hour")
    } else {
        pluralize(abs / SECONDS_PER_DAY, "day")
    };
    let direction = if delta > 0 { "ago" } else { "from now" };
    format!("{amount} {direction}")
}

/// How long a relative phrase stays accurate: 10ms within a second of the
/// instant, then a second, a minute and an hour, and a day beyond one day.
#[must_use]
pub fn refresh_interval(delta_milliseconds: i64) -> Duration {
    let abs = delta_milliseconds.unsigned_abs();
    let seconds = abs / 1000;
    if seconds < 1 {
        Duration::from_millis(10)
    } else if seconds < SECONDS_PER_MINUTE {
        Duration::from_secs(1)
    } else if seconds < SECONDS_PER_HOUR {
        Duration::from_secs(SECONDS_PER_MINUTE)
    } else if seconds < SECONDS_PER_DAY {
        Duration::from_secs(SECONDS_PER_HOUR)
    } else {
        Duration::from_secs(SECONDS_PER_DAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrase_boundaries() {
        assert_eq!(relative_phrase(59), "59 seconds ago");
        assert_eq!(relative_phrase(60), "1 minute ago");
        assert_eq!(relative_phrase(-60), "in 1 minute");
        assert_eq!(relative_phrase(0), "now");
        assert_eq!(relative_phrase(1), "1 second ago");
        assert_eq!(relative_phrase(-7_200), "in 2 hours");
        assert_eq!(relative_phrase(604_800 * 2), "2 weeks ago");
        assert_eq!(relative_phrase(2_629_746), "1 month ago");
        assert_eq!(relative_phrase(31_536_000 * 3 + 5), "3 years ago");
    }

    #[test]
    fn floored_delta() {
        assert_eq!(delta_seconds(1_500, 0), 1);
        assert_eq!(delta_seconds(0, 500), -1);
        assert_eq!(relative_phrase(delta_seconds(0, 500)), "in 1 second");
        assert_eq!(delta_seconds(i64::MIN, i64::MAX), -18_446_744_073_709_552);
    }

    #[test]
    fn precise_phrases() {
        assert_eq!(precise_phrase(93_900, None), "1 day, 2 hours and 5 minutes ago");
        assert_eq!(precise_phrase(-93_900, Some(1)), "in 1 day");
        assert_eq!(precise_phrase(0, None), "now");
        let options = RelativeTimeOptions::precise(Some(2));
        assert_eq!(relative_time(93_900, options), "1 day and 2 hours ago");
        assert_eq!(relative_time(93_900, RelativeTimeOptions::default()), "1 day ago");
    }

    #[test]
    fn short_phrases() {
        assert_eq!(short_relative_phrase(999), "now");
        assert_eq!(short_relative_phrase(-999), "now");
        assert_eq!(short_relative_phrase(1_000), "1 second ago");
        assert_eq!(short_relative_phrase(-45_000), "45 seconds from now");
        assert_eq!(short_relative_phrase(61_000), "1 minute ago");
        assert_eq!(short_relative_phrase(7_200_000), "2 hours ago");
        assert_eq!(short_relative_phrase(-30 * 86_400_000), "30 days from now");
    }

    #[test]
    fn refresh_intervals() {
        assert_eq!(refresh_interval(999), Duration::from_millis(10));
        assert_eq!(refresh_interval(-1_000), Duration::from_secs(1));
        assert_eq!(refresh_interval(59_999), Duration::from_secs(1));
        assert_eq!(refresh_interval(60_000), Duration::from_secs(60));
        assert_eq!(refresh_interval(3_600_000), Duration::from_secs(3_600));
        assert_eq!(refresh_interval(90 * 86_400_000), Duration::from_secs(86_400));
    }
}
