//! Calendar event types.
//!
//! An [`Event`] with an empty `id` is a proposal that only exists inside a
//! planning session. Events that came from the calendar, or that were
//! committed to it, always carry the id the calendar assigned.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default title used for synthesized focus blocks.
pub const FOCUS_TITLE: &str = "Focus Time";

/// Kind of calendar event.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// Ordinary meeting or appointment
    #[default]
    Default,
    /// Uninterrupted focus block
    FocusTime,
}

impl EventKind {
    /// Calendar API name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::FocusTime => "focusTime",
        }
    }

    /// Parse the calendar API name; unknown kinds fall back to `Default`.
    pub fn from_api(value: &str) -> Self {
        match value {
            "focusTime" => Self::FocusTime,
            _ => Self::Default,
        }
    }
}

/// A timed calendar occurrence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    /// Calendar-assigned id; empty while the event is only proposed.
    #[serde(default)]
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: EventKind,
}

impl Event {
    /// Create an event, rejecting empty or inverted time ranges.
    pub fn new(
        id: impl Into<String>,
        summary: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if start_time >= end_time {
            return Err(ValidationError::InvalidTimeRange {
                start: start_time,
                end: end_time,
            });
        }

        Ok(Self {
            id: id.into(),
            start_time,
            end_time,
            summary: summary.into(),
            description: String::new(),
            kind: EventKind::Default,
        })
    }

    /// Synthesize an unpersisted focus block starting at `start_time`.
    ///
    /// `duration` must be positive; `PlannerConfig` guarantees that for
    /// every block the planner creates.
    pub fn focus(title: &str, start_time: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            id: String::new(),
            start_time,
            end_time: start_time + duration,
            summary: title.to_string(),
            description: title.to_string(),
            kind: EventKind::FocusTime,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_kind(mut self, kind: EventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether the calendar already knows this event.
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 9, 24, hour, minute, 0).unwrap()
    }

    #[test]
    fn new_rejects_inverted_range() {
        let err = Event::new("1", "standup", at(9, 0), at(8, 0)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidTimeRange {
                start: at(9, 0),
                end: at(8, 0),
            }
        );
        assert!(Event::new("1", "zero", at(9, 0), at(9, 0)).is_err());
    }

    #[test]
    fn focus_event_is_unpersisted() {
        let event = Event::focus(FOCUS_TITLE, at(8, 50), Duration::minutes(45));
        assert!(!event.is_persisted());
        assert_eq!(event.kind, EventKind::FocusTime);
        assert_eq!(event.end_time, at(9, 35));
        assert_eq!(event.summary, "Focus Time");
        assert_eq!(event.description, "Focus Time");
        assert_eq!(event.end_time - event.start_time, Duration::minutes(45));
    }

    #[test]
    fn kind_uses_calendar_api_names() {
        assert_eq!(EventKind::FocusTime.as_str(), "focusTime");
        assert_eq!(EventKind::from_api("focusTime"), EventKind::FocusTime);
        assert_eq!(EventKind::from_api("outOfOffice"), EventKind::Default);

        let json = serde_json::to_string(&EventKind::FocusTime).unwrap();
        assert_eq!(json, "\"focusTime\"");
    }

    #[test]
    fn event_serialization() {
        let event = Event::new("abc", "Review", at(10, 0), at(10, 30))
            .unwrap()
            .with_description("weekly");
        let json = serde_json::to_string(&event).unwrap();
        let decoded: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, event);
    }
}
