//! Civil-day time window resolution.
//!
//! The briefing covers "today" in the configured zone: local midnight through
//! local 23:59:59.999999, expressed as UTC instants for the source queries.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

/// Half-open `[start, end)` UTC interval covering one civil day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Parse an IANA zone identifier, falling back to UTC.
///
/// A bad zone must never abort the run, so the fallback is logged and the
/// pipeline continues. The same rule applies everywhere a zone-aware render
/// is requested later (event times, presentation labels).
pub fn resolve_zone(name: &str) -> Tz {
    match name.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            warn!("Unknown timezone '{}', falling back to UTC", name);
            Tz::UTC
        }
    }
}

/// Window for the civil day containing `now_utc` in `tz`.
pub fn window_for(tz: Tz, now_utc: DateTime<Utc>) -> TimeWindow {
    let today = now_utc.with_timezone(&tz).date_naive();
    let start_naive = today.and_time(NaiveTime::MIN);
    let end_naive = start_naive + Duration::days(1) - Duration::microseconds(1);

    TimeWindow {
        start: local_to_utc(tz, start_naive, true),
        end: local_to_utc(tz, end_naive, false),
    }
}

/// Window for today in the configured zone (UTC fallback on a bad name).
pub fn today_window(zone_name: &str) -> TimeWindow {
    window_for(resolve_zone(zone_name), Utc::now())
}

/// Map a local wall-clock time to UTC, resolving DST folds and gaps.
///
/// Ambiguous times take the earliest mapping for a window start and the
/// latest for a window end; times skipped by a spring-forward gap are nudged
/// an hour into the valid range.
fn local_to_utc(tz: Tz, naive: NaiveDateTime, earliest: bool) -> DateTime<Utc> {
    let pick = |resolved: LocalResult<DateTime<Tz>>| {
        if earliest {
            resolved.earliest()
        } else {
            resolved.latest()
        }
    };

    let picked = pick(tz.from_local_datetime(&naive)).or_else(|| {
        let nudge = if earliest {
            Duration::hours(1)
        } else {
            -Duration::hours(1)
        };
        pick(tz.from_local_datetime(&(naive + nudge)))
    });

    match picked {
        Some(local) => local.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&naive),
    }
}
