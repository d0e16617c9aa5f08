//! Configuration options for zone resolution and rendering.

use core::{fmt, str::FromStr};

/// The disambiguation policy for a wall clock time that is ambiguous or
/// skipped in its time zone.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disambiguation {
    /// Earlier offset on a repeated time, forward shifted in a gap.
    #[default]
    Compatible,
    /// Earlier option
    Earlier,
    /// Later option
    Later,
    /// Reject option
    Reject,
}

/// A parsing error on `Disambiguation` options.
#[derive(Debug, Clone, Copy)]
pub struct ParseDisambiguationError;

impl fmt::Display for ParseDisambiguationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid disambiguation value")
    }
}

impl FromStr for Disambiguation {
    type Err = ParseDisambiguationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compatible" => Ok(Self::Compatible),
            "earlier" => Ok(Self::Earlier),
            "later" => Ok(Self::Later),
            "reject" => Ok(Self::Reject),
            _ => Err(ParseDisambiguationError),
        }
    }
}

impl fmt::Display for Disambiguation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compatible => "compatible",
            Self::Earlier => "earlier",
            Self::Later => "later",
            Self::Reject => "reject",
        }
        .fmt(f)
    }
}

/// The Discord style timestamp flags.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscordStyle {
    /// `t`: short time, `H:i`.
    ShortTime,
    /// `T`: long time, `H:i:s`.
    LongTime,
    /// `d`: short date, `Y-m-d`.
    ShortDate,
    /// `D`: long date, `Y F d`.
    LongDate,
    /// `f`: short date time, `Y F d H:i`.
    #[default]
    ShortDateTime,
    /// `F`: long date time, `l, Y F d H:i`.
    LongDateTime,
    /// `R`: relative to now.
    Relative,
}

impl DiscordStyle {
    /// The format engine pattern for this style, `None` for `Relative`.
    #[must_use]
    pub fn pattern(&self) -> Option<&'static str> {
        match self {
            Self::ShortTime => Some("H:i"),
            Self::LongTime => Some("H:i:s"),
            Self::ShortDate => Some("Y-m-d"),
            Self::LongDate => Some("Y F d"),
            Self::ShortDateTime => Some("Y F d H:i"),
            Self::LongDateTime => Some("l, Y F d H:i"),
            Self::Relative => None,
        }
    }

    /// The single letter flag of this style.
    #[must_use]
    pub fn flag(&self) -> char {
        match self {
            Self::ShortTime => 't',
            Self::LongTime => 'T',
            Self::ShortDate => 'd',
            Self::LongDate => 'D',
            Self::ShortDateTime => 'f',
            Self::LongDateTime => 'F',
            Self::Relative => 'R',
        }
    }
}

/// A parsing error on `DiscordStyle` flags.
#[derive(Debug, Clone, Copy)]
pub struct ParseDiscordStyleError;

impl fmt::Display for ParseDiscordStyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid timestamp style")
    }
}

impl FromStr for DiscordStyle {
    type Err = ParseDiscordStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "t" => Ok(Self::ShortTime),
            "T" => Ok(Self::LongTime),
            "d" => Ok(Self::ShortDate),
            "D" => Ok(Self::LongDate),
            "f" => Ok(Self::ShortDateTime),
            "F" => Ok(Self::LongDateTime),
            "R" => Ok(Self::Relative),
            _ => Err(ParseDiscordStyleError),
        }
    }
}

impl fmt::Display for DiscordStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        f.write_char(self.flag())
    }
}

/// The shape of a relative time phrase.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RelativeStyle {
    /// A single unit bucket, e.g. `"3 hours ago"`.
    #[default]
    Coarse,
    /// Every non-zero unit, e.g. `"1 day, 2 hours and 5 minutes ago"`.
    Precise,
}

/// Options for rendering relative time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RelativeTimeOptions {
    /// Caps the number of non-zero units in the `Precise` style.
    pub max_units: Option<usize>,
    pub style: RelativeStyle,
}

impl RelativeTimeOptions {
    #[must_use]
    pub fn precise(max_units: Option<usize>) -> Self {
        Self {
            max_units,
            style: RelativeStyle::Precise,
        }
    }
}
