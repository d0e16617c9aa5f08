//! The `datetime_global` crate is a zoned date-time value that keeps the
//! behavior of the legacy ECMAScript `Date` (overflowing setters, the
//! legacy `toString`, HTML rendering) on top of an instant plus time zone
//! model.
//!
//! ```rust
//! # #[cfg(feature = "compiled_data")] {
//! use datetime_global::{DatetimeValue, TimeZone};
//!
//! let zone = TimeZone::try_from_str("Asia/Tokyo").unwrap();
//! let value = DatetimeValue::from_components_utc(2024, 2, 1, 5, 30, 50, 123, 0, zone);
//!
//! assert_eq!(value.format("Y-m-d H:i").unwrap(), "2024-03-01 14:30");
//! assert_eq!(value.to_iso_string().unwrap(), "2024-03-01T05:30:50.123Z");
//! # }
//! ```
//!
//! Components are always derived from the instant and the zone; setters
//! re-derive the instant and never patch calendar fields directly.
//! Out of range setter arguments carry and borrow into their neighbors
//! under the zone's calendar rules.
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    unused_crate_dependencies,
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::too_many_lines,
    clippy::too_many_arguments,
    clippy::missing_errors_doc,
    clippy::option_if_let_else,

    // Float/integer conversions are range checked by `time_clip` first.
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap,

    clippy::missing_panics_doc,
)]

extern crate alloc;
extern crate core;

#[cfg(feature = "std")]
extern crate std;

pub mod calendar;
pub mod components;
pub mod duration;
pub mod error;
pub mod format;
pub mod host;
pub mod html;
pub mod instant;
pub mod names;
pub mod options;
pub mod parsers;
pub mod provider;
pub mod relative;
pub mod timezone;

#[cfg(feature = "sys")]
pub(crate) mod sys;

mod datetime;
mod mutator;

#[doc(hidden)]
pub(crate) mod equations;

use core::cmp::Ordering;

#[doc(inline)]
pub use error::{DatetimeError, ErrorKind};

/// The `datetime_global` result type
pub type DatetimeResult<T> = Result<T, DatetimeError>;

pub mod time {
    pub use zone_provider::epoch_nanoseconds::EpochNanoseconds;
}

pub use crate::{
    calendar::{CalendarFields, IsoCalendar},
    components::{DateTimeComponents, PartialDateTime},
    datetime::DatetimeValue,
    duration::HumanDuration,
    instant::Instant,
    names::{EnglishNames, LocaleFormatter, NameProvider},
    options::{Disambiguation, DiscordStyle, RelativeTimeOptions},
    timezone::{TimeZone, ZoneName},
};

/// A library specific trait for unwrapping assertions.
pub(crate) trait DatetimeUnwrap {
    type Output;

    /// `datetime_global` based assertion for unwrapping. This will panic in
    /// debug builds, but throws error during runtime.
    fn datetime_unwrap(self) -> DatetimeResult<Self::Output>;
}

impl<T> DatetimeUnwrap for Option<T> {
    type Output = T;

    fn datetime_unwrap(self) -> DatetimeResult<Self::Output> {
        debug_assert!(self.is_some());
        self.ok_or(DatetimeError::assert())
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! datetime_assert {
    ($condition:expr $(,)*) => {
        if !$condition {
            return Err($crate::DatetimeError::assert());
        }
    };
    ($condition:expr, $($args:tt)+) => {
        if !$condition {
            #[cfg(feature = "log")]
            log::error!($($args)+);
            return Err($crate::DatetimeError::assert());
        }
    };
}

/// A general Sign type.
#[repr(i8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Sign {
    #[default]
    Positive = 1,
    Zero = 0,
    Negative = -1,
}

impl From<i8> for Sign {
    fn from(value: i8) -> Self {
        match value.cmp(&0) {
            Ordering::Greater => Self::Positive,
            Ordering::Equal => Self::Zero,
            Ordering::Less => Self::Negative,
        }
    }
}

impl Sign {
    /// The character used for this sign in offset strings; zero renders as `+`.
    pub(crate) fn as_char(&self) -> char {
        match self {
            Self::Negative => '-',
            _ => '+',
        }
    }
}

// Relevant numeric constants
/// Nanoseconds per millisecond.
pub const NS_PER_MS: i128 = 1_000_000;
/// Nanoseconds per minute.
pub const NS_PER_MINUTE: i128 = 60_000_000_000;
/// Milliseconds per day constant: 8.64e+7
pub const MS_PER_DAY: u32 = 24 * 60 * 60 * 1000;
/// The iteration ceiling of the overflow correcting mutator.
pub const PRECAUTION_LIMIT: usize = 800;
