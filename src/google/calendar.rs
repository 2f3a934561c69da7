//! Google Calendar API v3 source adapter.
//!
//! Fetches today's events from the primary calendar, recurring events
//! expanded, ordered by start time, and normalizes each into a display line
//! for the briefing. The calendar feeds only the rendered context, never the
//! AI corpus.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use super::{GoogleApiError, GoogleAuth};
use crate::config::AppConfig;
use crate::source::SourceData;
use crate::window::TimeWindow;

const EVENTS_URL: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";

/// A calendar event normalized for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    /// `"All-day"`, a local `HH:MM AM/PM`, a `HH:MM UTC` fallback, or `"Time N/A"`.
    pub display_time: String,
    pub title: String,
}

#[async_trait]
pub trait CalendarSource: Send + Sync {
    async fn fetch(&self, window: &TimeWindow) -> SourceData<Vec<CalendarEvent>>;
}

// ============================================================================
// API response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    items: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    summary: Option<String>,
    start: Option<EventTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    /// Set for all-day events (no time-of-day).
    date: Option<String>,
    /// Set for timed events, RFC 3339.
    date_time: Option<String>,
}

// ============================================================================
// Adapter
// ============================================================================

pub struct GoogleCalendarSource {
    access_token: String,
    time_zone: String,
    http: reqwest::Client,
}

impl GoogleCalendarSource {
    pub fn new(auth: &GoogleAuth, config: &AppConfig) -> Self {
        Self {
            access_token: auth.bearer().to_string(),
            time_zone: config.time_zone.clone(),
            http: super::http_client(),
        }
    }

    async fn fetch_events(&self, window: &TimeWindow) -> Result<Vec<RawEvent>, GoogleApiError> {
        let time_min = window.start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let time_max = window.end.to_rfc3339_opts(SecondsFormat::Micros, true);
        info!("Fetching calendar events from {} to {}", time_min, time_max);

        let resp = self
            .http
            .get(EVENTS_URL)
            .bearer_auth(&self.access_token)
            .query(&[
                ("timeMin", time_min.as_str()),
                ("timeMax", time_max.as_str()),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(GoogleApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: EventsResponse = resp.json().await?;
        Ok(body.items)
    }
}

#[async_trait]
impl CalendarSource for GoogleCalendarSource {
    async fn fetch(&self, window: &TimeWindow) -> SourceData<Vec<CalendarEvent>> {
        match self.fetch_events(window).await {
            Ok(items) if items.is_empty() => {
                info!("No upcoming events found for today");
                SourceData::Empty
            }
            Ok(items) => {
                info!("Found {} calendar events", items.len());
                let events = items
                    .iter()
                    .map(|event| normalize_event(event, &self.time_zone))
                    .collect();
                SourceData::Ready(events)
            }
            Err(e) => {
                warn!("Calendar fetch failed: {}", e);
                log_auth_hint(&e);
                SourceData::Failed(e.to_string())
            }
        }
    }
}

fn normalize_event(event: &RawEvent, zone_name: &str) -> CalendarEvent {
    let display_time = event
        .start
        .as_ref()
        .map(|start| format_event_time(start, zone_name))
        .unwrap_or_else(|| "Time N/A".to_string());
    let title = event
        .summary
        .clone()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "No Title".to_string());

    CalendarEvent {
        display_time,
        title,
    }
}

/// Format an event start for display.
///
/// All-day events carry a bare `date`; timed events carry an RFC 3339
/// `dateTime` rendered as `HH:MM AM/PM` in `zone_name`, or as `HH:MM UTC`
/// when the zone identifier does not resolve.
fn format_event_time(start: &EventTime, zone_name: &str) -> String {
    if start.date.is_some() {
        return "All-day".to_string();
    }

    let Some(instant_str) = &start.date_time else {
        return "Time N/A".to_string();
    };

    match DateTime::parse_from_rfc3339(instant_str) {
        Ok(instant) => match zone_name.parse::<chrono_tz::Tz>() {
            Ok(tz) => instant.with_timezone(&tz).format("%I:%M %p").to_string(),
            Err(_) => {
                warn!(
                    "Unknown timezone '{}' formatting event time, falling back to UTC",
                    zone_name
                );
                instant.with_timezone(&Utc).format("%H:%M UTC").to_string()
            }
        },
        Err(e) => {
            warn!("Unparseable event time '{}': {}", instant_str, e);
            "Time N/A".to_string()
        }
    }
}

fn log_auth_hint(error: &GoogleApiError) {
    if let GoogleApiError::Api { status, .. } = error {
        match status {
            401 => warn!("Suggestion: authentication error; try deleting the token file and re-running"),
            403 => warn!("Suggestion: ensure the Google Calendar API is enabled in your GCP project"),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed(instant: &str) -> EventTime {
        EventTime {
            date: None,
            date_time: Some(instant.to_string()),
        }
    }

    #[test]
    fn all_day_events_have_no_clock_time() {
        let start = EventTime {
            date: Some("2026-08-30".to_string()),
            date_time: None,
        };
        assert_eq!(format_event_time(&start, "America/New_York"), "All-day");
    }

    #[test]
    fn timed_events_render_in_the_target_zone() {
        // 13:30 UTC is 09:30 in New York (EDT)
        let start = timed("2026-08-30T13:30:00Z");
        assert_eq!(format_event_time(&start, "America/New_York"), "09:30 AM");
    }

    #[test]
    fn unknown_zone_falls_back_to_utc_rendering() {
        let start = timed("2026-08-30T13:30:00Z");
        assert_eq!(format_event_time(&start, "Mars/Olympus"), "13:30 UTC");
    }

    #[test]
    fn missing_fields_yield_placeholder() {
        let start = EventTime {
            date: None,
            date_time: None,
        };
        assert_eq!(format_event_time(&start, "America/New_York"), "Time N/A");
    }

    #[test]
    fn untitled_events_get_a_default_title() {
        let event = RawEvent {
            summary: None,
            start: Some(timed("2026-08-30T13:30:00Z")),
        };
        let normalized = normalize_event(&event, "America/New_York");
        assert_eq!(normalized.title, "No Title");
        assert_eq!(normalized.display_time, "09:30 AM");
    }
}
