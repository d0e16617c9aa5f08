//! The time zone data seam.
//!
//! Every zone aware operation has a `*_with_provider` form that takes any
//! [`TimeZoneProvider`]. With `compiled_data` the plain forms use the
//! bundled tzdb provider.

pub use zone_provider::provider::{
    CandidateEpochNanoseconds, EpochNanosecondsAndOffset, GapEntryOffsets, LocalDateTime,
    NeverProvider, TimeZoneProvider, TimeZoneTransitionInfo, UtcOffsetSeconds,
};

#[cfg(feature = "tzdb")]
pub use zone_provider::tzif::{CompiledTzdbProvider, FsTzdbProvider};
