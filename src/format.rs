//! The token based format engine.
//!
//! A pattern is a string of single letter tokens in the manner of PHP's
//! `date()`. Letters that are not tokens pass through unchanged and a
//! backslash makes the next character literal. Bracketed aliases such as
//! `[mysql]` are expanded once before tokenizing; see [`alias::ALIASES`].
//!
//! | Token | Output |
//! |-------|--------|
//! | `d` `j` | day of month, padded / unpadded |
//! | `D` `l` | short / full weekday name |
//! | `N` `w` | ISO weekday (1 = Monday) / weekday (0 = Sunday) |
//! | `S` | English ordinal suffix of the day |
//! | `z` `W` | zero based day of year / ISO week number |
//! | `F` `M` | full / short month name |
//! | `m` `n` `t` | month padded / unpadded, days in month |
//! | `L` `Y` `y` | leap year flag, signed 4 digit year, 2 digit year |
//! | `a` `A` | `am`/`pm`, `AM`/`PM` |
//! | `h` `H` `i` `s` | 12 hour, 24 hour, minutes, seconds |
//! | `v` `u` | milliseconds, microseconds |
//! | `O` `e` | offset as `+0900`, zone identifier |
//! | `B` | Swatch Internet Time |
//!
//! `o` (the ISO week numbering year) is reserved and fails to format.

pub mod alias;

use alloc::{borrow::Cow, format, string::String, vec::Vec};
use core::fmt;

use writeable::{impl_display_with_writeable, Writeable};

use crate::{
    components::DateTimeComponents, equations, names::NameProvider, DatetimeError,
    DatetimeResult, MS_PER_DAY,
};

/// The pattern used by clock displays when none is given.
pub const DEFAULT_CLOCK_PATTERN: &str = "Y-m-d H:i:s";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    DayPadded,
    Day,
    ShortDayName,
    FullDayName,
    IsoWeekday,
    OrdinalSuffix,
    Weekday,
    DayOfYear,
    IsoWeek,
    FullMonthName,
    MonthPadded,
    ShortMonthName,
    Month,
    DaysInMonth,
    LeapYear,
    Year,
    ShortYear,
    LowerMeridiem,
    UpperMeridiem,
    Hour12,
    Hour24,
    Minute,
    Second,
    Offset,
    Microsecond,
    Millisecond,
    Zone,
    Beat,
}

impl Token {
    fn from_char(ch: char) -> DatetimeResult<Option<Self>> {
        let token = match ch {
            'd' => Self::DayPadded,
            'j' => Self::Day,
            'D' => Self::ShortDayName,
            'l' => Self::FullDayName,
            'N' => Self::IsoWeekday,
            'S' => Self::OrdinalSuffix,
            'w' => Self::Weekday,
            'z' => Self::DayOfYear,
            'W' => Self::IsoWeek,
            'F' => Self::FullMonthName,
            'm' => Self::MonthPadded,
            'M' => Self::ShortMonthName,
            'n' => Self::Month,
            't' => Self::DaysInMonth,
            'L' => Self::LeapYear,
            'Y' => Self::Year,
            'y' => Self::ShortYear,
            'a' => Self::LowerMeridiem,
            'A' => Self::UpperMeridiem,
            'h' => Self::Hour12,
            'H' => Self::Hour24,
            'i' => Self::Minute,
            's' => Self::Second,
            'O' => Self::Offset,
            'u' => Self::Microsecond,
            'v' => Self::Millisecond,
            'e' => Self::Zone,
            'B' => Self::Beat,
            'o' => {
                return Err(DatetimeError::format()
                    .with_message("The format token 'o' is not supported."))
            }
            _ => return Ok(None),
        };
        Ok(Some(token))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
    Literal(char),
    Token(Token),
}

/// A tokenized format pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    items: Vec<Item>,
}

impl Pattern {
    /// Expands aliases in `source` and tokenizes it.
    ///
    /// A run of backslashes collapses pairwise into literal backslashes; an
    /// odd run makes the following character literal.
    pub fn parse(source: &str) -> DatetimeResult<Self> {
        let expanded = alias::expand(source)?;
        let mut items = Vec::with_capacity(expanded.len());
        let mut chars = expanded.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch != '\\' {
                items.push(match Token::from_char(ch)? {
                    Some(token) => Item::Token(token),
                    None => Item::Literal(ch),
                });
                continue;
            }
            let mut run = 1;
            while chars.next_if_eq(&'\\').is_some() {
                run += 1;
            }
            items.extend(core::iter::repeat(Item::Literal('\\')).take(run / 2));
            if run % 2 == 1 {
                items.push(Item::Literal(chars.next().unwrap_or('\\')));
            }
        }
        Ok(Self { items })
    }

    /// Binds this pattern to the fields of one value.
    #[must_use]
    pub fn bind<'a>(
        &'a self,
        fields: &'a FormatFields<'a>,
        names: &'a dyn NameProvider,
    ) -> FormattedDatetime<'a> {
        FormattedDatetime {
            pattern: self,
            fields,
            names,
        }
    }
}

/// Everything the tokens read from a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatFields<'a> {
    pub components: DateTimeComponents,
    /// The legacy offset: minutes to add to local time to reach UTC.
    pub offset_minutes: i64,
    pub zone: Cow<'a, str>,
    pub epoch_milliseconds: i64,
}

/// A pattern bound to a value, rendered through `Writeable`.
pub struct FormattedDatetime<'a> {
    pattern: &'a Pattern,
    fields: &'a FormatFields<'a>,
    names: &'a dyn NameProvider,
}

impl fmt::Debug for FormattedDatetime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormattedDatetime")
            .field("pattern", self.pattern)
            .field("fields", self.fields)
            .finish_non_exhaustive()
    }
}

impl Writeable for FormattedDatetime<'_> {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        for item in &self.pattern.items {
            match item {
                Item::Literal(ch) => sink.write_char(*ch)?,
                Item::Token(token) => self.write_token(*token, sink)?,
            }
        }
        Ok(())
    }
}

impl_display_with_writeable!(FormattedDatetime<'_>);

impl FormattedDatetime<'_> {
    fn write_token<W: fmt::Write + ?Sized>(&self, token: Token, sink: &mut W) -> fmt::Result {
        let c = &self.fields.components;
        let month = c.iso_month();
        match token {
            Token::DayPadded => write_padded(sink, c.day.into(), 2),
            Token::Day => c.day.write_to(sink),
            Token::ShortDayName => sink.write_str(self.names.short_day_name(c.weekday)),
            Token::FullDayName => sink.write_str(self.names.full_day_name(c.weekday)),
            Token::IsoWeekday => {
                let weekday = if c.weekday == 0 { 7 } else { c.weekday };
                weekday.write_to(sink)
            }
            Token::OrdinalSuffix => sink.write_str(ordinal_suffix(c.day)),
            Token::Weekday => c.weekday.write_to(sink),
            Token::DayOfYear => equations::day_of_year(c.year, month, c.day).write_to(sink),
            Token::IsoWeek => write_padded(
                sink,
                equations::iso_week_number(c.year, month, c.day).into(),
                2,
            ),
            Token::FullMonthName => sink.write_str(self.names.full_month_name(c.month)),
            Token::MonthPadded => write_padded(sink, month.into(), 2),
            Token::ShortMonthName => sink.write_str(self.names.short_month_name(c.month)),
            Token::Month => month.write_to(sink),
            Token::DaysInMonth => equations::iso_days_in_month(c.year, month).write_to(sink),
            Token::LeapYear => {
                sink.write_char(if equations::is_leap_year(c.year) { '1' } else { '0' })
            }
            Token::Year => {
                if c.year < 0 {
                    sink.write_char('-')?;
                }
                write_padded(sink, c.year.unsigned_abs().into(), 4)
            }
            Token::ShortYear => write_padded(sink, c.year.rem_euclid(100) as u64, 2),
            Token::LowerMeridiem => sink.write_str(if c.hour < 12 { "am" } else { "pm" }),
            Token::UpperMeridiem => sink.write_str(if c.hour < 12 { "AM" } else { "PM" }),
            Token::Hour12 => {
                let hour = match c.hour % 12 {
                    0 => 12,
                    hour => hour,
                };
                write_padded(sink, hour.into(), 2)
            }
            Token::Hour24 => write_padded(sink, c.hour.into(), 2),
            Token::Minute => write_padded(sink, c.minute.into(), 2),
            Token::Second => write_padded(sink, c.second.into(), 2),
            Token::Offset => write_legacy_offset(sink, self.fields.offset_minutes),
            Token::Microsecond => write_padded(
                sink,
                u64::from(c.millisecond) * 1000 + u64::from(c.microsecond),
                6,
            ),
            Token::Millisecond => write_padded(sink, c.millisecond.into(), 3),
            Token::Zone => sink.write_str(&self.fields.zone),
            Token::Beat => write_padded(sink, beat(self.fields.epoch_milliseconds).into(), 3),
        }
    }
}

fn write_padded<W: fmt::Write + ?Sized>(sink: &mut W, value: u64, width: usize) -> fmt::Result {
    let digits = value.checked_ilog10().map_or(1, |d| d as usize + 1);
    for _ in digits..width {
        sink.write_char('0')?;
    }
    value.write_to(sink)
}

/// Writes `±HHMM`; the legacy offset is positive west of UTC, so a
/// positive value is written with `-`.
pub(crate) fn write_legacy_offset<W: fmt::Write + ?Sized>(
    sink: &mut W,
    offset_minutes: i64,
) -> fmt::Result {
    sink.write_char(if offset_minutes > 0 { '-' } else { '+' })?;
    let abs = offset_minutes.unsigned_abs();
    write_padded(sink, abs / 60, 2)?;
    write_padded(sink, abs % 60, 2)
}

/// The English ordinal suffix for a day of the month.
#[must_use]
pub fn ordinal_suffix(day: u8) -> &'static str {
    if (11..=13).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Swatch Internet Time: thousandths of a day on the UTC+1 meridian.
#[must_use]
pub fn beat(epoch_milliseconds: i64) -> u16 {
    let day = i64::from(MS_PER_DAY);
    ((epoch_milliseconds + 3_600_000).rem_euclid(day) / (day / 1000)) as u16
}

/// Groups the digits of `value` into triples separated by underscores,
/// counting from the right.
#[must_use]
pub fn underscore_number(value: i128) -> String {
    let digits = format!("{}", value.unsigned_abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    let lead = match digits.len() % 3 {
        0 => 3,
        n => n,
    };
    out.push_str(&digits[..lead]);
    for group in digits.as_bytes()[lead..].chunks(3) {
        out.push('_');
        out.extend(group.iter().map(|b| char::from(*b)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, names::EnglishNames};

    // 2024-03-01T14:30:50.123456 in Asia/Tokyo, a Friday.
    fn tokyo() -> FormatFields<'static> {
        FormatFields {
            components: DateTimeComponents {
                year: 2024,
                month: 2,
                day: 1,
                weekday: 5,
                hour: 14,
                minute: 30,
                second: 50,
                millisecond: 123,
                microsecond: 456,
                nanosecond: 789,
            },
            offset_minutes: -540,
            zone: Cow::Borrowed("Asia/Tokyo"),
            epoch_milliseconds: 1_709_271_050_123,
        }
    }

    fn render(pattern: &str, fields: &FormatFields<'_>) -> DatetimeResult<String> {
        let pattern = Pattern::parse(pattern)?;
        Ok(pattern.bind(fields, &EnglishNames).write_to_string().into_owned())
    }

    #[test]
    fn date_tokens() {
        let fields = tokyo();
        assert_eq!(render("Y-m-d", &fields).unwrap(), "2024-03-01");
        assert_eq!(render("D, j M y", &fields).unwrap(), "Fri, 1 Mar 24");
        assert_eq!(render("l jS F", &fields).unwrap(), "Friday 1st March");
        assert_eq!(render("N w z W t L n", &fields).unwrap(), "5 5 60 09 31 1 3");
    }

    #[test]
    fn time_tokens() {
        let fields = tokyo();
        assert_eq!(render("H:i:s.v", &fields).unwrap(), "14:30:50.123");
        assert_eq!(render("h a A", &fields).unwrap(), "02 pm PM");
        assert_eq!(render("u", &fields).unwrap(), "123456");
        assert_eq!(render("O e", &fields).unwrap(), "+0900 Asia/Tokyo");
    }

    #[test]
    fn twelve_hour_midnight() {
        let mut fields = tokyo();
        fields.components.hour = 0;
        assert_eq!(render("h A", &fields).unwrap(), "12 AM");
        fields.components.hour = 12;
        assert_eq!(render("h a", &fields).unwrap(), "12 pm");
    }

    #[test]
    fn years() {
        let mut fields = tokyo();
        fields.components.year = 44;
        assert_eq!(render("Y y", &fields).unwrap(), "0044 44");
        fields.components.year = -44;
        assert_eq!(render("Y y", &fields).unwrap(), "-0044 56");
        fields.components.year = 12345;
        assert_eq!(render("Y", &fields).unwrap(), "12345");
    }

    #[test]
    fn escapes() {
        let fields = tokyo();
        assert_eq!(render(r"\Y\-m", &fields).unwrap(), "Y-03");
        assert_eq!(render(r"\\Y", &fields).unwrap(), r"\2024");
        assert_eq!(render(r"\\\Y", &fields).unwrap(), r"\Y");
        assert_eq!(render(r"Y\", &fields).unwrap(), r"2024\");
        assert_eq!(render("Q! Y", &fields).unwrap(), "Q! 2024");
    }

    #[test]
    fn aliases() {
        let fields = tokyo();
        assert_eq!(
            render("[datetime_global_v2]", &fields).unwrap(),
            "Fri Mar 01 2024 14:30:50 UTC+0900 (Asia/Tokyo)"
        );
        assert_eq!(
            render("[header_default]", &fields).unwrap(),
            "Fri, 01 Mar 2024 14:30:50 +0900"
        );
        assert_eq!(render("[ISO8601]", &fields).unwrap(), "2024-03-01T14:30:50+0900");
        assert_eq!(render("[long_date]", &fields).unwrap(), "Friday, March 1, 2024");
        assert_eq!(render("[mysqli]", &fields).unwrap(), "2024-03-01 14:30:50.123");
    }

    #[test]
    fn reserved_and_unknown() {
        let fields = tokyo();
        assert_eq!(render("o", &fields).unwrap_err().kind(), ErrorKind::Format);
        assert_eq!(render(r"\o", &fields).unwrap(), "o");
        assert_eq!(render("[nope]", &fields).unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn ordinal_suffixes() {
        for (day, suffix) in [
            (1, "st"),
            (2, "nd"),
            (3, "rd"),
            (4, "th"),
            (11, "th"),
            (12, "th"),
            (13, "th"),
            (21, "st"),
            (22, "nd"),
            (23, "rd"),
            (31, "st"),
        ] {
            assert_eq!(ordinal_suffix(day), suffix, "day {day}");
        }
    }

    #[test]
    fn beats() {
        // 23:00 UTC is midnight on the UTC+1 meridian.
        assert_eq!(beat(82_800_000), 0);
        assert_eq!(beat(0), 41);
        assert_eq!(beat(82_799_999), 999);
        assert_eq!(beat(-1), 41);
        let fields = tokyo();
        // 05:30:50.123 UTC is 06:30:50.123 BMT.
        assert_eq!(render("[b]", &fields).unwrap(), "@271");

        let mut previous = 0;
        for ms in (82_800_000..82_800_000 + 86_400_000).step_by(60_000) {
            let value = beat(ms);
            assert!(value >= previous && value < 1000);
            previous = value;
        }
    }

    #[test]
    fn underscore_numbers() {
        assert_eq!(underscore_number(0), "0");
        assert_eq!(underscore_number(123), "123");
        assert_eq!(underscore_number(1234), "1_234");
        assert_eq!(underscore_number(-1_234_567), "-1_234_567");
        assert_eq!(underscore_number(100_000), "100_000");
        assert_eq!(
            underscore_number(i128::MIN),
            "-170_141_183_460_469_231_731_687_303_715_884_105_728"
        );
    }

    #[test]
    fn display_matches_writeable() {
        let fields = tokyo();
        let pattern = Pattern::parse("Y").unwrap();
        assert_eq!(pattern.bind(&fields, &EnglishNames).to_string(), "2024");
    }
}
