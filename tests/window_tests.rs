use chrono::{Duration, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use daily_brief::window::{resolve_zone, today_window, window_for};

#[test]
fn window_spans_one_civil_day_in_new_york() {
    let tz: Tz = "America/New_York".parse().unwrap();
    let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();

    let window = window_for(tz, now);

    // EDT is UTC-4 in late August
    assert_eq!(
        window.start,
        Utc.with_ymd_and_hms(2026, 8, 30, 4, 0, 0).unwrap()
    );
    assert_eq!(
        window.end,
        Utc.with_ymd_and_hms(2026, 8, 31, 3, 59, 59).unwrap() + Duration::microseconds(999_999)
    );
    assert!(window.start < window.end);
}

#[test]
fn window_endpoints_are_local_midnight_and_end_of_day() {
    let tz: Tz = "Asia/Tokyo".parse().unwrap();
    let now = Utc.with_ymd_and_hms(2026, 6, 15, 1, 30, 0).unwrap();

    let window = window_for(tz, now);

    let start_local = window.start.with_timezone(&tz);
    let end_local = window.end.with_timezone(&tz);
    assert_eq!(start_local.date_naive(), end_local.date_naive());
    assert_eq!(
        (start_local.hour(), start_local.minute(), start_local.second()),
        (0, 0, 0)
    );
    assert_eq!(
        (end_local.hour(), end_local.minute(), end_local.second()),
        (23, 59, 59)
    );
}

#[test]
fn spring_forward_day_is_an_hour_short() {
    // US DST begins 2026-03-08; the civil day has 23 hours
    let tz: Tz = "America/New_York".parse().unwrap();
    let now = Utc.with_ymd_and_hms(2026, 3, 8, 18, 0, 0).unwrap();

    let window = window_for(tz, now);

    assert!(window.start < window.end);
    assert_eq!(
        window.end - window.start,
        Duration::hours(23) - Duration::microseconds(1)
    );
}

#[test]
fn fall_back_day_is_an_hour_long() {
    // US DST ends 2026-11-01; the civil day has 25 hours
    let tz: Tz = "America/New_York".parse().unwrap();
    let now = Utc.with_ymd_and_hms(2026, 11, 1, 18, 0, 0).unwrap();

    let window = window_for(tz, now);

    assert_eq!(
        window.end - window.start,
        Duration::hours(25) - Duration::microseconds(1)
    );
}

#[test]
fn unknown_zone_falls_back_to_utc_without_panicking() {
    assert_eq!(resolve_zone("Not/AZone"), Tz::UTC);

    let window = today_window("Not/AZone");
    assert!(window.start < window.end);
    assert_eq!(
        window.end - window.start,
        Duration::hours(24) - Duration::microseconds(1)
    );
}
