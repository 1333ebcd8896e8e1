//! Google Calendar integration.
//!
//! Reads the timed events of a calendar and creates focus blocks through the
//! Calendar v3 REST API. Requests run on a private current-thread runtime so
//! callers stay synchronous. The bearer token is taken as given; obtaining
//! and refreshing it is left to the user's tooling.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local, Utc};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;
use tracing::{debug, warn};

use super::traits::{CalendarDirectory, CalendarEntry, EventInserter, EventSource};
use crate::error::{ConfigError, CoreError, Result};
use crate::schedule::{Event, EventKind};
use crate::storage::GoogleConfig;

const SERVICE: &str = "google";

/// Google Calendar client.
#[derive(Clone)]
pub struct GoogleCalendar {
    client: Client,
    runtime: Arc<Runtime>,
    api_base: String,
    access_token: String,
}

impl std::fmt::Debug for GoogleCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCalendar")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsPage {
    #[serde(default)]
    items: Vec<ApiEvent>,
    next_page_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEvent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event_type: Option<String>,
    start: ApiEventTime,
    end: ApiEventTime,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_time: Option<DateTime<FixedOffset>>,
    /// All-day events only carry a date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CalendarListPage {
    #[serde(default)]
    items: Vec<CalendarEntry>,
}

impl ApiEvent {
    fn from_event(event: &Event) -> Self {
        let local = |t: DateTime<Utc>| t.with_timezone(&Local).fixed_offset();
        Self {
            id: event.id.clone(),
            summary: event.summary.clone(),
            description: event.description.clone(),
            event_type: Some(event.kind.as_str().to_string()),
            start: ApiEventTime {
                date_time: Some(local(event.start_time)),
                date: None,
            },
            end: ApiEventTime {
                date_time: Some(local(event.end_time)),
                date: None,
            },
        }
    }

    /// Timed events only; all-day and malformed entries yield `None`.
    fn into_event(self) -> Option<Event> {
        let (Some(start), Some(end)) = (self.start.date_time, self.end.date_time) else {
            debug!(id = %self.id, summary = %self.summary, "skipping all-day event");
            return None;
        };

        match Event::new(
            self.id.clone(),
            self.summary,
            start.with_timezone(&Utc),
            end.with_timezone(&Utc),
        ) {
            Ok(event) => {
                let kind = self
                    .event_type
                    .as_deref()
                    .map_or(EventKind::Default, EventKind::from_api);
                Some(event.with_description(self.description).with_kind(kind))
            }
            Err(e) => {
                warn!(id = %self.id, error = %e, "skipping event with invalid time range");
                None
            }
        }
    }
}

impl GoogleCalendar {
    /// Create a client against `api_base` (e.g. `https://www.googleapis.com/calendar/v3`).
    ///
    /// # Errors
    /// Returns an error if the request runtime cannot be started.
    pub fn new(api_base: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            client: Client::new(),
            runtime: Arc::new(runtime),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    /// Create a client from the `[google]` config section, reading the token
    /// from the environment variable it names.
    pub fn from_config(config: &GoogleConfig) -> Result<Self> {
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingKey(config.token_env.clone()))?;
        Self::new(config.api_base.clone(), token)
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.api_base,
            urlencoding::encode(calendar_id)
        )
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Fetch timed events inside the window, following pagination until
    /// `max_results` events were collected (or the calendar is exhausted).
    pub fn fetch_events(
        &self,
        calendar_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        max_results: Option<usize>,
    ) -> Result<Vec<Event>> {
        let url = self.events_url(calendar_id);
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("timeMin", window_start.to_rfc3339()),
                ("timeMax", window_end.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
                ("showDeleted", "false".to_string()),
            ];
            if let Some(max) = max_results {
                query.push(("maxResults", max.to_string()));
            }
            if let Some(token) = page_token.take() {
                query.push(("pageToken", token));
            }

            let request = self
                .client
                .get(&url)
                .bearer_auth(&self.access_token)
                .query(&query);
            let page: EventsPage = self.block_on(send_json(request))?;

            events.extend(page.items.into_iter().filter_map(ApiEvent::into_event));

            let reached_limit = max_results.is_some_and(|max| events.len() >= max);
            match page.next_page_token {
                Some(token) if !reached_limit => page_token = Some(token),
                _ => break,
            }
        }

        if let Some(max) = max_results {
            events.truncate(max);
        }
        debug!(calendar_id, count = events.len(), "fetched events");
        Ok(events)
    }
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CoreError::integration(
            SERVICE,
            format!("Google Calendar API returned {status}: {}", body.trim()),
        ));
    }
    Ok(response.json().await?)
}

impl EventSource for GoogleCalendar {
    fn list_events(
        &self,
        calendar_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<Event>> {
        self.fetch_events(calendar_id, window_start, window_end, None)
    }
}

impl EventInserter for GoogleCalendar {
    fn insert_event(&self, calendar_id: &str, event: &Event) -> Result<Event> {
        let request = self
            .client
            .post(self.events_url(calendar_id))
            .bearer_auth(&self.access_token)
            .json(&ApiEvent::from_event(event));
        let created: ApiEvent = self.block_on(send_json(request))?;

        if created.id.is_empty() {
            return Err(CoreError::integration(SERVICE, "missing event id in response"));
        }

        created
            .into_event()
            .ok_or_else(|| CoreError::integration(SERVICE, "created event has no start/end time"))
    }
}

impl CalendarDirectory for GoogleCalendar {
    fn list_calendars(&self) -> Result<Vec<CalendarEntry>> {
        let request = self
            .client
            .get(format!("{}/users/me/calendarList", self.api_base))
            .bearer_auth(&self.access_token);
        let page: CalendarListPage = self.block_on(send_json(request))?;
        Ok(page.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn all_day_events_are_skipped() {
        let json = r#"{
            "id": "holiday",
            "summary": "Holiday",
            "start": {"date": "2023-09-24"},
            "end": {"date": "2023-09-25"}
        }"#;
        let api: ApiEvent = serde_json::from_str(json).unwrap();
        assert!(api.into_event().is_none());
    }

    #[test]
    fn timed_event_keeps_offsets_as_instants() {
        let json = r#"{
            "id": "abc",
            "summary": "Sync",
            "eventType": "focusTime",
            "start": {"dateTime": "2023-09-24T10:00:00+02:00"},
            "end": {"dateTime": "2023-09-24T10:30:00+02:00"}
        }"#;
        let api: ApiEvent = serde_json::from_str(json).unwrap();
        let event = api.into_event().unwrap();
        assert_eq!(event.id, "abc");
        assert_eq!(event.kind, EventKind::FocusTime);
        assert_eq!(
            event.start_time,
            Utc.with_ymd_and_hms(2023, 9, 24, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn outgoing_focus_event_has_type_and_no_id() {
        let start = Utc.with_ymd_and_hms(2023, 9, 24, 8, 50, 0).unwrap();
        let event = Event::focus("Focus Time", start, Duration::minutes(45));
        let body = serde_json::to_value(ApiEvent::from_event(&event)).unwrap();

        assert!(body.get("id").is_none());
        assert_eq!(body["eventType"], "focusTime");
        assert_eq!(body["summary"], "Focus Time");
        assert!(body["start"]["dateTime"].is_string());
        assert!(body["start"].get("date").is_none());
    }

    #[test]
    fn calendar_ids_are_escaped() {
        let google = GoogleCalendar::new("https://example.test/v3/", "t").unwrap();
        assert_eq!(
            google.events_url("team@group.calendar.google.com"),
            "https://example.test/v3/calendars/team%40group.calendar.google.com/events"
        );
    }
}
