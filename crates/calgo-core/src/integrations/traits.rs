use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schedule::Event;

/// Read side of a calendar.
pub trait EventSource {
    /// Timed events of `calendar_id` inside `[window_start, window_end]`,
    /// ascending by start time.
    fn list_events(
        &self,
        calendar_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<Event>>;
}

/// Write side of a calendar.
pub trait EventInserter {
    /// Persist `event` (which has an empty id) and return the stored copy,
    /// carrying the id the calendar assigned.
    fn insert_event(&self, calendar_id: &str, event: &Event) -> Result<Event>;
}

/// Yes/no question put to the user before side effects.
pub trait ConfirmPrompt {
    fn ask(&mut self, question: &str, default: bool) -> Result<bool>;
}

/// A calendar the account can see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: String,
    pub summary: String,
    #[serde(default)]
    pub primary: bool,
}

/// Lists the calendars available to the account.
pub trait CalendarDirectory {
    fn list_calendars(&self) -> Result<Vec<CalendarEntry>>;
}

/// Prompt that always gives the same answer without asking.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl ConfirmPrompt for FixedAnswer {
    fn ask(&mut self, _question: &str, _default: bool) -> Result<bool> {
        Ok(self.0)
    }
}
