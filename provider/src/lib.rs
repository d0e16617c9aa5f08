//! Data providers for time zone data
//!
//! This crate defines the [`TimeZoneProvider`][provider::TimeZoneProvider]
//! seam used by `datetime_global` to resolve offsets, along with
//! providers backed by `TZif` data when the `tzif` feature is enabled.
//!
//! ```rust
//! # #[cfg(feature = "tzif")] {
//! use zone_provider::{provider::TimeZoneProvider, tzif::CompiledTzdbProvider};
//!
//! let provider = CompiledTzdbProvider::default();
//! // 2024-01-01T00:00:00Z
//! let info = provider
//!     .get_named_tz_offset_nanoseconds("Asia/Tokyo", 1_704_067_200_000_000_000)
//!     .unwrap();
//! assert_eq!(info.offset.0, 9 * 3600);
//! # }
//! ```
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod epoch_nanoseconds;
pub mod provider;

#[cfg(feature = "tzif")]
pub mod tzif;

#[cfg(feature = "tzif")]
pub(crate) mod common;

pub(crate) mod utils;

use alloc::string::String;
use core::fmt;

/// The error returned by time zone providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneProviderError {
    /// The identifier is not known to the provider.
    UnknownIdentifier(String),
    /// The epoch nanoseconds value is outside of the representable range.
    InstantOutOfRange,
    /// The time zone data could not be parsed or was missing a section.
    MalformedData(&'static str),
    /// The provider cannot resolve any named time zone.
    Unavailable,
}

impl fmt::Display for ZoneProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownIdentifier(id) => write!(f, "unknown time zone identifier: {id}"),
            Self::InstantOutOfRange => f.write_str("instant nanoseconds are not within a valid range"),
            Self::MalformedData(msg) => write!(f, "malformed time zone data: {msg}"),
            Self::Unavailable => f.write_str("no time zone data is available"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ZoneProviderError {}
