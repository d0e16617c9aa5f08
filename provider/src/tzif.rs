// NOTE: tzif data is computed in glibc's `__tzfile_compute` in `tzfile.c`.
//
// NOTES:
//
// Transitions to DST (in march) + 1. Empty list between 2:00-3:00.
// Transitions to Std (in nov) -1. Two elements 1:00-2:00 is repeated twice.

use std::path::{Path, PathBuf};

use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::cell::RefCell;

use combine::Parser;

use tzif::data::{
    posix::PosixTzString,
    tzif::{DataBlock, TzifData, TzifHeader},
};

use crate::{
    common::resolve_posix_tz_string_for_epoch_seconds,
    epoch_nanoseconds::EpochNanoseconds,
    provider::{
        CandidateEpochNanoseconds, EpochNanosecondsAndOffset, GapEntryOffsets, LocalDateTime,
        TimeZoneProvider, TimeZoneTransitionInfo, UtcOffsetSeconds, ZoneProviderResult,
    },
    utils::SECONDS_PER_DAY,
    ZoneProviderError,
};

const UNIX_ZONEINFO_DIR: &str = "/usr/share/zoneinfo/";

/// The `LocalTimeRecord` result represents the result of searching for a
/// time zone transition without the offset seconds applied to the
/// epoch seconds.
///
/// As a result of the search, it is possible for the resulting search to be either
/// Empty (due to an invalid time being provided that would be in the +1 tz shift)
/// or two time zones (when a time exists in the ambiguous range of a -1 shift).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTimeRecordResult {
    Empty(GapEntryOffsets),
    Single(UtcOffsetSeconds),
    Ambiguous {
        first: UtcOffsetSeconds,
        second: UtcOffsetSeconds,
    },
}

/// `TZif` stands for Time zone information format is laid out by [RFC 8536][rfc8536] and
/// laid out by the [tzdata manual][tzif-manual]
///
/// This type extends the parsed value from the `tzif` [rust crate][tzif-crate]
/// with offset resolution.
///
/// [rfc8536]: https://datatracker.ietf.org/doc/html/rfc8536
/// [tzif-manual]: https://man7.org/linux/man-pages/man5/tzfile.5.html
/// [tzif-crate]: https://docs.rs/tzif/latest/tzif/
#[derive(Debug, Clone)]
pub struct Tzif {
    pub header1: TzifHeader,
    pub data_block1: DataBlock,
    pub header2: Option<TzifHeader>,
    pub data_block2: Option<DataBlock>,
    pub footer: Option<PosixTzString>,
}

impl From<TzifData> for Tzif {
    fn from(value: TzifData) -> Self {
        let TzifData {
            header1,
            data_block1,
            header2,
            data_block2,
            footer,
        } = value;

        Self {
            header1,
            data_block1,
            header2,
            data_block2,
            footer,
        }
    }
}

impl Tzif {
    pub fn from_bytes(data: &[u8]) -> ZoneProviderResult<Self> {
        let Ok((parse_result, _)) = tzif::parse::tzif::tzif().parse(data) else {
            return Err(ZoneProviderError::MalformedData("ill-formed TZif data"));
        };
        Ok(Self::from(parse_result))
    }

    pub fn from_path(path: &Path) -> ZoneProviderResult<Self> {
        tzif::parse_tzif_file(path)
            .map(Into::into)
            .map_err(|_| ZoneProviderError::MalformedData("unable to read TZif file"))
    }

    pub fn posix_tz_string(&self) -> Option<&PosixTzString> {
        self.footer.as_ref()
    }

    /// The 64-bit data block when present, otherwise the legacy block.
    pub fn data_block(&self) -> &DataBlock {
        self.data_block2.as_ref().unwrap_or(&self.data_block1)
    }

    /// Returns the offset in effect at `epoch_seconds`.
    pub fn get(&self, epoch_seconds: i64) -> ZoneProviderResult<TimeZoneTransitionInfo> {
        let db = self.data_block();
        let first_record = db
            .local_time_type_records
            .first()
            .copied()
            .ok_or(ZoneProviderError::MalformedData("no local time type records"))?;

        // Number of transitions that have taken effect by `epoch_seconds`.
        let idx = db
            .transition_times
            .partition_point(|transition| transition.0 <= epoch_seconds);

        // <https://datatracker.ietf.org/doc/html/rfc8536#section-3.2>
        // If there are no transitions, local time for all timestamps is specified by the TZ
        // string in the footer if present and nonempty; otherwise, it is
        // specified by time type 0.
        if db.transition_times.is_empty() {
            return Ok(match self.posix_tz_string() {
                Some(posix) => resolve_posix_tz_string_for_epoch_seconds(posix, epoch_seconds),
                None => TimeZoneTransitionInfo {
                    transition_epoch: None,
                    offset: first_record.into(),
                },
            });
        }

        if idx == 0 {
            return Ok(TimeZoneTransitionInfo {
                transition_epoch: None,
                offset: first_record.into(),
            });
        }

        if idx == db.transition_times.len() {
            if let Some(posix) = self.posix_tz_string() {
                // The time provided is beyond the transition table, so the
                // time zone is resolved with the POSIX tz string.
                let mut info = resolve_posix_tz_string_for_epoch_seconds(posix, epoch_seconds);
                let last_transition = db.transition_times[idx - 1].0;
                info.transition_epoch = Some(
                    info.transition_epoch
                        .map_or(last_transition, |t| t.max(last_transition)),
                );
                return Ok(info);
            }
        }

        Ok(get_timezone_offset(db, idx - 1))
    }

    /// Determines the offsets that could apply to a wall-clock value.
    ///
    /// Basically, if someone provides a DateTime 2017-11-05T01:30:00 in
    /// America/New_York, there is no way of knowing whether the value is in
    /// DST or STD, so both offsets are returned. On the other side of the
    /// year, 2017-03-12T02:30:00 does not exist due to the +1 jump from
    /// 02:00 -> 03:00, so the surrounding offsets are returned instead.
    pub fn get_local_offsets(&self, local_seconds: i64) -> ZoneProviderResult<LocalTimeRecordResult> {
        // No offset exceeds a day, so the offsets a day either side bound
        // every candidate.
        let before = self.get(local_seconds - SECONDS_PER_DAY)?.offset;
        let after = self.get(local_seconds + SECONDS_PER_DAY)?.offset;

        let matches = |offset: UtcOffsetSeconds| -> ZoneProviderResult<bool> {
            Ok(self.get(local_seconds - offset.0)?.offset == offset)
        };

        let before_matches = matches(before)?;
        if before == after {
            if before_matches {
                return Ok(LocalTimeRecordResult::Single(before));
            }
            // A transition pair inside the window; fall back to the offset
            // found at the naive instant.
            let offset = self.get(local_seconds - before.0)?.offset;
            return Ok(LocalTimeRecordResult::Single(offset));
        }

        let after_matches = matches(after)?;
        match (before_matches, after_matches) {
            (true, true) => {
                // The earlier instant is the one with the larger offset.
                let (first, second) = if before.0 > after.0 {
                    (before, after)
                } else {
                    (after, before)
                };
                Ok(LocalTimeRecordResult::Ambiguous { first, second })
            }
            (true, false) => Ok(LocalTimeRecordResult::Single(before)),
            (false, true) => Ok(LocalTimeRecordResult::Single(after)),
            (false, false) => {
                let transition = self.get(local_seconds - before.0)?;
                let transition_epoch = transition
                    .transition_epoch
                    .unwrap_or(local_seconds - before.0);
                Ok(LocalTimeRecordResult::Empty(GapEntryOffsets {
                    offset_before: before,
                    offset_after: after,
                    transition_epoch: EpochNanoseconds::from_seconds(transition_epoch),
                }))
            }
        }
    }

    /// Resolves the candidate instants for a wall-clock value.
    pub fn candidates(&self, local: LocalDateTime) -> ZoneProviderResult<CandidateEpochNanoseconds> {
        let local_ns = local.as_nanoseconds().as_i128();
        let candidate = |offset: UtcOffsetSeconds| EpochNanosecondsAndOffset {
            ns: EpochNanoseconds::from(local_ns - offset.as_nanoseconds()),
            offset,
        };
        Ok(match self.get_local_offsets(local.local_seconds())? {
            LocalTimeRecordResult::Empty(gap) => CandidateEpochNanoseconds::Zero(gap),
            LocalTimeRecordResult::Single(offset) => CandidateEpochNanoseconds::One(candidate(offset)),
            LocalTimeRecordResult::Ambiguous { first, second } => {
                CandidateEpochNanoseconds::Two([candidate(first), candidate(second)])
            }
        })
    }
}

#[inline]
fn get_timezone_offset(db: &DataBlock, idx: usize) -> TimeZoneTransitionInfo {
    // NOTE: Transition type can be empty. If no transition_type exists,
    // then use 0 as the default index of local_time_type_records.
    let record_idx = db.transition_types.get(idx).copied().unwrap_or(0);
    let offset = db
        .local_time_type_records
        .get(record_idx)
        .map(|record| record.utoff.0)
        .unwrap_or_default();
    TimeZoneTransitionInfo {
        transition_epoch: db.transition_times.get(idx).map(|s| s.0),
        offset: UtcOffsetSeconds(offset),
    }
}

/// Shared lookup for the caching providers.
trait TzifSource {
    fn cache(&self) -> &RefCell<BTreeMap<String, Tzif>>;

    fn load(&self, identifier: &str) -> ZoneProviderResult<Tzif>;

    fn with_tzif<R>(
        &self,
        identifier: &str,
        f: impl FnOnce(&Tzif) -> ZoneProviderResult<R>,
    ) -> ZoneProviderResult<R> {
        if let Some(tzif) = self.cache().borrow().get(identifier) {
            return f(tzif);
        }
        let tzif = self.load(identifier)?;
        let result = f(&tzif);
        self.cache().borrow_mut().insert(identifier.to_string(), tzif);
        result
    }
}

/// A provider backed by the tzdb compiled into the binary through
/// the `jiff-tzdb` crate.
#[derive(Debug, Default)]
pub struct CompiledTzdbProvider {
    cache: RefCell<BTreeMap<String, Tzif>>,
}

impl TzifSource for CompiledTzdbProvider {
    fn cache(&self) -> &RefCell<BTreeMap<String, Tzif>> {
        &self.cache
    }

    fn load(&self, identifier: &str) -> ZoneProviderResult<Tzif> {
        let Some((_, data)) = jiff_tzdb::get(identifier) else {
            return Err(ZoneProviderError::UnknownIdentifier(identifier.to_string()));
        };
        Tzif::from_bytes(data)
    }
}

impl TimeZoneProvider for CompiledTzdbProvider {
    fn normalize_identifier(&self, ident: &'_ [u8]) -> ZoneProviderResult<Cow<'_, str>> {
        let identifier = core::str::from_utf8(ident)
            .map_err(|_| ZoneProviderError::UnknownIdentifier(String::from_utf8_lossy(ident).into_owned()))?;
        jiff_tzdb::get(identifier)
            .map(|(canonical, _)| Cow::Borrowed(canonical))
            .ok_or_else(|| ZoneProviderError::UnknownIdentifier(identifier.to_string()))
    }

    fn get_named_tz_epoch_nanoseconds(
        &self,
        identifier: &str,
        local_datetime: LocalDateTime,
    ) -> ZoneProviderResult<CandidateEpochNanoseconds> {
        self.with_tzif(identifier, |tzif| tzif.candidates(local_datetime))
    }

    fn get_named_tz_offset_nanoseconds(
        &self,
        identifier: &str,
        epoch_nanoseconds: i128,
    ) -> ZoneProviderResult<TimeZoneTransitionInfo> {
        let seconds = EpochNanoseconds::from(epoch_nanoseconds).epoch_seconds();
        self.with_tzif(identifier, |tzif| tzif.get(seconds))
    }
}

/// A provider that reads `TZif` files from a zoneinfo directory.
#[derive(Debug)]
pub struct FsTzdbProvider {
    root: PathBuf,
    cache: RefCell<BTreeMap<String, Tzif>>,
}

impl Default for FsTzdbProvider {
    fn default() -> Self {
        Self::new(PathBuf::from(UNIX_ZONEINFO_DIR))
    }
}

impl FsTzdbProvider {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            cache: RefCell::default(),
        }
    }

    fn path_for(&self, identifier: &str) -> ZoneProviderResult<PathBuf> {
        let valid = !identifier.is_empty()
            && identifier.split('/').all(|part| {
                !part.is_empty()
                    && part != "."
                    && part != ".."
                    && part
                        .bytes()
                        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'+'))
            });
        if !valid {
            return Err(ZoneProviderError::UnknownIdentifier(identifier.to_string()));
        }
        let path = self.root.join(identifier);
        if !path.is_file() {
            return Err(ZoneProviderError::UnknownIdentifier(identifier.to_string()));
        }
        Ok(path)
    }
}

impl TzifSource for FsTzdbProvider {
    fn cache(&self) -> &RefCell<BTreeMap<String, Tzif>> {
        &self.cache
    }

    fn load(&self, identifier: &str) -> ZoneProviderResult<Tzif> {
        Tzif::from_path(&self.path_for(identifier)?)
    }
}

impl TimeZoneProvider for FsTzdbProvider {
    fn normalize_identifier(&self, ident: &'_ [u8]) -> ZoneProviderResult<Cow<'_, str>> {
        let identifier = core::str::from_utf8(ident)
            .map_err(|_| ZoneProviderError::UnknownIdentifier(String::from_utf8_lossy(ident).into_owned()))?;
        // Zoneinfo file names are case sensitive; take the canonical
        // spelling from the bundled index when it knows the zone.
        let canonical = jiff_tzdb::get(identifier).map_or(identifier, |(canonical, _)| canonical);
        self.path_for(canonical)?;
        Ok(Cow::Owned(canonical.to_string()))
    }

    fn get_named_tz_epoch_nanoseconds(
        &self,
        identifier: &str,
        local_datetime: LocalDateTime,
    ) -> ZoneProviderResult<CandidateEpochNanoseconds> {
        self.with_tzif(identifier, |tzif| tzif.candidates(local_datetime))
    }

    fn get_named_tz_offset_nanoseconds(
        &self,
        identifier: &str,
        epoch_nanoseconds: i128,
    ) -> ZoneProviderResult<TimeZoneTransitionInfo> {
        let seconds = EpochNanoseconds::from(epoch_nanoseconds).epoch_seconds();
        self.with_tzif(identifier, |tzif| tzif.get(seconds))
    }
}
