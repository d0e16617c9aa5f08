use super::DatetimeValue;
use crate::{
    calendar::CalendarFields,
    components::{DateTimeComponents, PartialDateTime},
    error::{DatetimeError, ErrorKind},
    host::HostClock,
    names::{LocaleFormatter, NameProvider},
    options::{DiscordStyle, RelativeTimeOptions},
    provider::NeverProvider,
    time::EpochNanoseconds,
    DatetimeResult, TimeZone,
};
use alloc::{format, string::String};
use icu_locale::Locale;

// 2024-03-01T05:30:50.123Z, a Friday.
const MARCH_1_2024: i64 = 1_709_271_050_123;
// 2024-01-31T10:15:30.250Z, a Wednesday.
const JAN_31_2024: i64 = 1_706_696_130_250;

fn tokyo_offset() -> TimeZone {
    TimeZone::OffsetMinutes(540)
}

fn iso(value: &DatetimeValue) -> String {
    value.to_iso_string().unwrap()
}

#[test]
fn components_constructor() {
    let value = DatetimeValue::from_components_utc(2024, 2, 1, 5, 30, 50, 123, 456_789, TimeZone::utc());
    assert_eq!(value.epoch_nanoseconds().unwrap(), 1_709_271_050_123_456_789);
    assert_eq!(value.get_nanoseconds().unwrap(), 456_789);
    assert_eq!(value.get_utc_day().unwrap(), 5);

    let value = DatetimeValue::from_components_utc(99, 0, 1, 0, 0, 0, 0, 0, TimeZone::utc());
    assert_eq!(value.get_utc_full_year().unwrap(), 1999);

    // Month 14 of 2023 is March 2024.
    let value = DatetimeValue::from_components_utc(2023, 14, 1, 5, 30, 50, 123, 0, TimeZone::utc());
    assert_eq!(value.get_time().unwrap(), MARCH_1_2024);

    let value = DatetimeValue::from_components_utc(275_761, 0, 1, 0, 0, 0, 0, 0, TimeZone::utc());
    assert!(!value.is_valid());
}

#[test]
fn hour_overflow_carries_into_next_day() {
    let provider = &NeverProvider;
    let mut value = DatetimeValue::from_epoch_millis(JAN_31_2024, TimeZone::utc());
    value
        .set_hours_with_provider(25, None, None, None, provider)
        .unwrap();
    assert_eq!(iso(&value), "2024-02-01T01:15:30.250Z");
    assert_eq!(value.get_minutes_with_provider(provider).unwrap(), 15);
    assert_eq!(value.get_seconds_with_provider(provider).unwrap(), 30);
}

#[test]
fn month_and_day_overflow() {
    let provider = &NeverProvider;
    let base = DatetimeValue::from_epoch_millis(JAN_31_2024, TimeZone::utc());

    let mut value = base.clone();
    value.set_month_with_provider(13, None, provider).unwrap();
    assert_eq!(iso(&value), "2025-03-03T10:15:30.250Z");

    let mut value = base.clone();
    value.set_date_with_provider(0, provider).unwrap();
    assert_eq!(iso(&value), "2023-12-31T10:15:30.250Z");

    let mut value = base;
    value
        .set_minutes_with_provider(-1, Some(0), Some(0), provider)
        .unwrap();
    assert_eq!(iso(&value), "2024-01-31T09:59:00.000Z");
}

#[test]
fn setters_read_the_zone() {
    let provider = &NeverProvider;
    let mut value = DatetimeValue::from_epoch_millis(JAN_31_2024, TimeZone::OffsetMinutes(-300));
    assert_eq!(value.get_hours_with_provider(provider).unwrap(), 5);
    assert_eq!(value.get_timezone_offset_with_provider(provider).unwrap(), 300);

    value
        .set_hours_with_provider(30, Some(30), None, None, provider)
        .unwrap();
    assert_eq!(iso(&value), "2024-02-01T11:30:30.250Z");
    assert_eq!(value.get_date_with_provider(provider).unwrap(), 1);
}

#[test]
fn calendar_capacities_drive_the_carry() {
    struct ThirtyDayMonths;

    impl CalendarFields for ThirtyDayMonths {
        fn months_in_year(&self, _: i32) -> u8 {
            12
        }

        fn days_in_month(&self, _: i32, _: u8) -> u8 {
            30
        }

        fn hours_in_day(&self, _: i32, _: u8, _: u8) -> u8 {
            24
        }
    }

    let provider = &NeverProvider;
    let value = DatetimeValue::from_epoch_millis(JAN_31_2024, TimeZone::utc());
    let partial = PartialDateTime::new().with_day(35);

    let iso_result = value.with_with_provider(partial, provider).unwrap();
    assert_eq!(iso(&iso_result), "2024-02-04T10:15:30.250Z");

    let thirty = value
        .with_calendar_with_provider(partial, &ThirtyDayMonths, provider)
        .unwrap();
    assert_eq!(iso(&thirty), "2024-02-05T10:15:30.250Z");
}

#[test]
fn utc_setters() {
    let mut value =
        DatetimeValue::from_epoch_nanos(i128::from(JAN_31_2024) * 1_000_000 + 789, TimeZone::utc());

    value.set_utc_hours(-1, None, None, None);
    assert_eq!(iso(&value), "2024-01-30T23:15:30.250Z");
    assert_eq!(value.get_nanoseconds().unwrap(), 789);

    value.set_utc_month(1, Some(30));
    assert_eq!(iso(&value), "2024-03-01T23:15:30.250Z");

    value.set_utc_minutes(60, Some(0), None);
    assert_eq!(iso(&value), "2024-03-02T00:00:00.250Z");

    value.set_utc_milliseconds(-1);
    assert_eq!(iso(&value), "2024-03-01T23:59:59.999Z");

    value.set_utc_full_year(300_000, None, None);
    assert!(!value.is_valid());
}

#[test]
fn invalid_values() {
    let provider = &NeverProvider;
    let mut value = DatetimeValue::from_epoch_millis(8_640_000_000_000_001, TimeZone::utc());
    assert!(!value.is_valid());
    assert!(value.value_of().is_nan());
    assert_eq!(value.get_time().unwrap_err().kind(), ErrorKind::InvalidInstant);
    assert_eq!(value.get_utc_hours().unwrap_err().kind(), ErrorKind::InvalidInstant);
    assert_eq!(
        value.get_hours_with_provider(provider).unwrap_err().kind(),
        ErrorKind::InvalidInstant
    );
    assert_eq!(value.to_iso_string().unwrap_err().kind(), ErrorKind::InvalidInstant);
    assert_eq!(value.to_json(), None);
    assert_eq!(value.to_utc_string().unwrap(), "Invalid Date");
    assert_eq!(
        value.to_string_legacy_with_provider(provider).unwrap(),
        "Invalid Date"
    );
    assert!(value.to_html_utc().is_err());

    value.set_utc_hours(1, None, None, None);
    assert!(!value.is_valid());
    value
        .set_hours_with_provider(1, None, None, None, provider)
        .unwrap();
    assert!(!value.is_valid());

    value.set_utc_full_year(2020, None, None);
    assert_eq!(iso(&value), "2020-01-01T00:00:00.000Z");

    let mut value = DatetimeValue::new(crate::Instant::Invalid, TimeZone::OffsetMinutes(60));
    value
        .set_full_year_with_provider(2020, Some(5), Some(15), provider)
        .unwrap();
    assert_eq!(iso(&value), "2020-06-14T23:00:00.000Z");
}

#[test]
fn legacy_year() {
    let provider = &NeverProvider;
    let mut value = DatetimeValue::from_epoch_millis(JAN_31_2024, TimeZone::utc());
    value.set_year_with_provider(99, provider).unwrap();
    assert_eq!(iso(&value), "1999-01-31T10:15:30.250Z");
    assert_eq!(value.get_year_with_provider(provider).unwrap(), 99);

    value.set_year_with_provider(2001, provider).unwrap();
    assert_eq!(value.get_full_year_with_provider(provider).unwrap(), 2001);
}

#[test]
fn nanoseconds() {
    let mut value = DatetimeValue::from_epoch_millis(JAN_31_2024, TimeZone::utc());
    let err = value.set_nanoseconds(1_000_000).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);

    value.set_nanoseconds(5).unwrap();
    assert_eq!(
        value.epoch_nanoseconds().unwrap(),
        i128::from(JAN_31_2024) * 1_000_000 + 5
    );
    assert_eq!(value.get_time().unwrap(), JAN_31_2024);

    value.set_time(0);
    assert_eq!(value.get_nanoseconds().unwrap(), 0);
}

#[test]
fn legacy_strings() {
    let provider = &NeverProvider;
    let value = DatetimeValue::from_epoch_millis(MARCH_1_2024, tokyo_offset());
    assert_eq!(value.to_utc_string().unwrap(), "Fri, 01 Mar 2024 05:30:50 GMT");
    assert_eq!(
        value.to_string_legacy_with_provider(provider).unwrap(),
        "Fri Mar 01 2024 14:30:50 UTC+0900 (+09:00)"
    );
    assert_eq!(
        value.to_date_string_with_provider(provider).unwrap(),
        "Fri Mar 01 2024"
    );
    assert_eq!(
        value.to_time_string_with_provider(provider).unwrap(),
        "14:30:50 UTC+0900 (+09:00)"
    );
    assert_eq!(value.to_json().unwrap(), "2024-03-01T05:30:50.123Z");

    assert_eq!(DatetimeValue::utc_offset_string(300), "UTC-0500");
    assert_eq!(DatetimeValue::utc_offset_string(-540), "UTC+0900");
    assert_eq!(DatetimeValue::utc_offset_string(0), "UTC+0000");
}

#[test]
fn html_output() {
    let provider = &NeverProvider;
    let value = DatetimeValue::from_epoch_millis(MARCH_1_2024, tokyo_offset());
    assert_eq!(
        value.to_html_utc().unwrap(),
        "<time datetime=\"2024-03-01T05:30:50.123Z\">Fri, 01 Mar 2024 05:30:50 GMT</time>"
    );
    assert_eq!(
        value.to_html_formatted_with_provider("H:i", provider).unwrap(),
        "<time datetime=\"2024-03-01T05:30:50.123Z\">14:30</time>"
    );

    let now = MARCH_1_2024 + 90_000;
    let discord = |style| {
        value
            .to_html_discord_string_with_provider(style, now, provider)
            .unwrap()
    };
    assert_eq!(
        discord(DiscordStyle::ShortTime),
        "<time datetime=\"2024-03-01T05:30:50.123Z\" data-format=\"t\" \
         title=\"Fri Mar 01 2024 14:30:50 UTC+0900 (+09:00)\">14:30</time>"
    );
    assert!(discord(DiscordStyle::LongDateTime).ends_with(">Friday, 2024 March 01 14:30</time>"));
    assert!(discord(DiscordStyle::ShortDate).ends_with(">2024-03-01</time>"));
    assert!(discord(DiscordStyle::Relative).ends_with(">1 minute ago</time>"));

    let err: DatetimeError = "x".parse::<DiscordStyle>().unwrap_err().into();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn format_on_values() {
    struct DutchNames;

    impl NameProvider for DutchNames {
        fn short_day_name(&self, weekday: u8) -> &str {
            ["zo", "ma", "di", "wo", "do", "vr", "za"][usize::from(weekday % 7)]
        }

        fn full_day_name(&self, weekday: u8) -> &str {
            self.short_day_name(weekday)
        }

        fn short_month_name(&self, month: u8) -> &str {
            [
                "jan", "feb", "mrt", "apr", "mei", "jun", "jul", "aug", "sep", "okt", "nov", "dec",
            ][usize::from(month % 12)]
        }

        fn full_month_name(&self, month: u8) -> &str {
            self.short_month_name(month)
        }
    }

    let provider = &NeverProvider;
    let value = DatetimeValue::from_epoch_millis(MARCH_1_2024, tokyo_offset());
    assert_eq!(
        value
            .format_with_provider(r"l jS \of F Y h:i:s A", provider)
            .unwrap(),
        "Friday 1st of March 2024 02:30:50 PM"
    );
    assert_eq!(
        value
            .format_with_names_with_provider("D j M", &DutchNames, provider)
            .unwrap(),
        "vr 1 mrt"
    );
    assert_eq!(
        value.month_name_with_provider(&DutchNames, provider).unwrap(),
        "mrt"
    );

    let err = value.format_with_provider("[nope]", provider).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    let err = value.format_with_provider("o", provider).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn parse_strings() {
    let provider = &NeverProvider;
    let value =
        DatetimeValue::from_str_with_provider("2024-03-01T05:30:50.123Z", TimeZone::utc(), provider)
            .unwrap();
    assert_eq!(value.get_time().unwrap(), MARCH_1_2024);
    assert_eq!(value.timezone(), &TimeZone::utc());

    let original = DatetimeValue::from_epoch_millis(MARCH_1_2024, tokyo_offset());
    let legacy = original.to_string_legacy_with_provider(provider).unwrap();
    let parsed = DatetimeValue::from_str_with_provider(&legacy, TimeZone::utc(), provider).unwrap();
    assert_eq!(parsed.get_time().unwrap(), MARCH_1_2024 - 123);
    assert_eq!(parsed.timezone(), &tokyo_offset());

    let utc = original.to_utc_string().unwrap();
    let parsed = DatetimeValue::from_str_with_provider(&utc, tokyo_offset(), provider).unwrap();
    assert_eq!(parsed.get_time().unwrap(), MARCH_1_2024 - 123);

    let err = DatetimeValue::from_str_with_provider("yesterday", TimeZone::utc(), provider)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn zone_change_keeps_the_instant() {
    let provider = &NeverProvider;
    let tokyo = DatetimeValue::from_epoch_millis(MARCH_1_2024, tokyo_offset());
    let west = tokyo.to_timezone(TimeZone::OffsetMinutes(-300));

    assert_eq!(tokyo.get_time().unwrap(), west.get_time().unwrap());
    assert_eq!(tokyo.get_hours_with_provider(provider).unwrap(), 14);
    assert_eq!(west.get_hours_with_provider(provider).unwrap(), 0);
    assert_ne!(
        tokyo.to_string_legacy_with_provider(provider).unwrap(),
        west.to_string_legacy_with_provider(provider).unwrap()
    );

    let back = west.with_timezone(tokyo_offset());
    assert_eq!(back, tokyo);

    let err = tokyo
        .to_timezone_identifier_with_provider("Mars/Base", provider)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidZoneId);
}

#[test]
fn host_hooks_and_relative_phrases() {
    let value = DatetimeValue::now_with_host(&(), None, &NeverProvider).unwrap();
    assert_eq!(value.get_time().unwrap(), 0);
    assert_eq!(value.timezone(), &TimeZone::utc());

    assert_eq!(
        value.relative_to(60_000, RelativeTimeOptions::default()).unwrap(),
        "1 minute ago"
    );
    assert_eq!(
        value
            .relative_to(-93_900_000, RelativeTimeOptions::precise(None))
            .unwrap(),
        "in 1 day, 2 hours and 5 minutes"
    );
}

#[test]
fn whole_second_clock_readings() {
    struct FixedClock;

    impl HostClock for FixedClock {
        fn get_host_epoch_nanoseconds(&self) -> DatetimeResult<EpochNanoseconds> {
            Ok(EpochNanoseconds::from(1_709_271_050_123_456_789))
        }
    }

    assert_eq!(DatetimeValue::zero_ms_with_host(&FixedClock).unwrap(), 1_709_271_050_000);
    assert_eq!(
        DatetimeValue::zero_ns_with_host(&FixedClock).unwrap(),
        1_709_271_050_000_000_000
    );
    assert_eq!(DatetimeValue::zero_ms_with_host(&()).unwrap(), 0);
}

#[test]
fn day_number_aliases() {
    // Friday 2024-03-01 in Tokyo.
    let value = DatetimeValue::from_epoch_millis(MARCH_1_2024, tokyo_offset());
    assert_eq!(value.get_day_number_week_with_provider(&NeverProvider).unwrap(), 5);
    assert_eq!(value.get_day_number_with_provider(&NeverProvider).unwrap(), 1);
    assert_eq!(value.get_day_number_month_with_provider(&NeverProvider).unwrap(), 1);
}

#[test]
fn locale_strings_are_delegated() {
    struct Echo;

    impl LocaleFormatter for Echo {
        fn format(
            &self,
            locale: &Locale,
            components: &DateTimeComponents,
            zone: &TimeZone,
        ) -> DatetimeResult<String> {
            Ok(format!(
                "{locale} {}-{} {zone}",
                components.year,
                components.iso_month()
            ))
        }
    }

    let value = DatetimeValue::from_epoch_millis(MARCH_1_2024, tokyo_offset());
    let locale = icu_locale::locale!("de-DE");
    assert_eq!(
        value
            .to_locale_string_with_provider(&Echo, &locale, &NeverProvider)
            .unwrap(),
        "de-DE 2024-3 +09:00"
    );
}

#[cfg(feature = "compiled_data")]
mod compiled {
    use super::*;
    use alloc::string::ToString;

    fn zone(identifier: &str) -> TimeZone {
        TimeZone::try_from_str(identifier).unwrap()
    }

    #[test]
    fn new_york_hours_overflow() {
        // 2024-01-01T05:00:00Z, midnight in New York.
        let mut value = DatetimeValue::from_epoch_millis(1_704_085_200_000, zone("America/New_York"));
        value.set_hours(30, Some(30), None, None).unwrap();
        assert_eq!(value.to_iso_string().unwrap(), "2024-01-02T11:30:00.000Z");
        assert_eq!(value.get_hours().unwrap(), 6);
        assert_eq!(value.get_date().unwrap(), 2);
    }

    #[test]
    fn tokyo_format() {
        let value =
            DatetimeValue::from_components_utc(2024, 2, 1, 5, 30, 50, 123, 0, zone("Asia/Tokyo"));
        assert_eq!(value.format("Y-m-d").unwrap(), "2024-03-01");
        assert_eq!(value.format("Y-m-d H:i").unwrap(), "2024-03-01 14:30");
        assert_eq!(
            value.to_string_legacy().unwrap(),
            "Fri Mar 01 2024 14:30:50 UTC+0900 (Asia/Tokyo)"
        );
        assert_eq!(value.to_string(), "Fri Mar 01 2024 14:30:50 UTC+0900 (Asia/Tokyo)");
        assert_eq!(value.get_timezone_offset().unwrap(), -540);
        assert_eq!(value.day_name().unwrap(), "Fri");
        assert_eq!(value.full_month_name().unwrap(), "March");
        assert_eq!(
            value.to_html_string().unwrap(),
            "<time datetime=\"2024-03-01T05:30:50.123Z\">\
             Fri Mar 01 2024 14:30:50 UTC+0900 (Asia/Tokyo)</time>"
        );
    }

    #[test]
    fn unknown_zone_names_never_reach_a_value() {
        let err = TimeZone::try_from_str("Mars/Base").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidZoneId);
        let err = DatetimeValue::parse("2024-03-01T00:00[Mars/Base]", TimeZone::utc()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidZoneId);

        let value = DatetimeValue::from_epoch_millis(0, TimeZone::utc());
        assert!(value.to_timezone_identifier("Mars/Base").is_err());

        let TimeZone::Named(name) = zone("america/new_york") else {
            panic!("expected a named zone");
        };
        assert_eq!(name.as_str(), "America/New_York");
    }

    #[test]
    fn display_never_fails() {
        let invalid = DatetimeValue::new(crate::Instant::Invalid, zone("Asia/Tokyo"));
        assert_eq!(invalid.to_string(), "Invalid Date");
        let value = DatetimeValue::from_epoch_millis(0, zone("Europe/London"));
        assert_eq!(value.to_string(), "Thu Jan 01 1970 01:00:00 UTC+0100 (Europe/London)");
    }

    #[test]
    fn hours_carry_by_label_across_a_short_day() {
        // 2024-03-10T00:00 in New York; the day has 23 elapsed hours.
        let mut value = DatetimeValue::from_epoch_millis(1_710_046_800_000, zone("America/New_York"));
        value.set_hours(26, None, None, None).unwrap();
        assert_eq!(value.get_date().unwrap(), 11);
        assert_eq!(value.get_hours().unwrap(), 2);
        assert_eq!(value.to_iso_string().unwrap(), "2024-03-11T06:00:00.000Z");
    }

    #[test]
    fn zone_change_purity() {
        let tokyo = DatetimeValue::from_epoch_millis(MARCH_1_2024, zone("Asia/Tokyo"));
        let new_york = tokyo.to_timezone_identifier("America/New_York").unwrap();
        assert_eq!(tokyo.value_of(), new_york.value_of());
        assert_eq!(new_york.get_hours().unwrap(), 0);
        assert_eq!(
            new_york.to_string_legacy().unwrap(),
            "Fri Mar 01 2024 00:30:50 UTC-0500 (America/New_York)"
        );

        let err = tokyo.to_timezone_identifier("Mars/Base").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidZoneId);
    }

    #[test]
    fn wall_clock_round_trip() {
        let new_york = zone("America/New_York");
        for ms in [
            1_705_320_000_123,
            1_720_094_400_000,
            946_702_799_999,
            -2_000_000_000_000,
        ] {
            let value = DatetimeValue::from_epoch_millis(ms, new_york.clone());
            let round_trip = value.with(PartialDateTime::new()).unwrap();
            assert_eq!(round_trip, value, "{ms}");
        }
    }

    #[test]
    fn skipped_hour_moves_forward() {
        // 2017-03-12T12:00:00Z; 02:30 does not exist in New York that day.
        let mut value = DatetimeValue::from_epoch_millis(1_489_320_000_000, zone("America/New_York"));
        value.set_hours(2, Some(30), Some(0), Some(0)).unwrap();
        assert_eq!(value.get_time().unwrap(), 1_489_303_800_000);
        assert_eq!(value.get_hours().unwrap(), 3);
    }

    #[test]
    fn parse_with_named_zones() {
        let value =
            DatetimeValue::parse("2024-03-01T14:30:50.123[Asia/Tokyo]", TimeZone::utc()).unwrap();
        assert_eq!(value.get_time().unwrap(), MARCH_1_2024);
        assert_eq!(value.timezone_id(), "Asia/Tokyo");

        let legacy = value.to_string_legacy().unwrap();
        let parsed = DatetimeValue::parse(&legacy, TimeZone::utc()).unwrap();
        assert_eq!(parsed.get_time().unwrap(), MARCH_1_2024 - 123);
        assert_eq!(parsed.timezone_id(), "Asia/Tokyo");
    }

    #[cfg(feature = "sys")]
    #[test]
    fn from_str_reads_in_the_host_zone() {
        let Ok(host) = TimeZone::host() else {
            return;
        };
        let parsed: DatetimeValue = "2024-03-01T05:30:50.123Z".parse().unwrap();
        assert_eq!(parsed.timezone(), &host);
        assert_eq!(parsed.get_time().unwrap(), MARCH_1_2024);
    }

    #[cfg(not(feature = "sys"))]
    #[test]
    fn from_str_reads_in_utc() {
        let parsed: DatetimeValue = "2024-03-01T05:30:50.123".parse().unwrap();
        assert_eq!(parsed.timezone(), &TimeZone::utc());
        assert_eq!(parsed.get_time().unwrap(), MARCH_1_2024);
    }

    #[cfg(feature = "sys")]
    #[test]
    fn now_is_valid() {
        let value = DatetimeValue::now(Some(TimeZone::utc())).unwrap();
        assert!(value.get_full_year().unwrap() >= 2024);
    }
}
