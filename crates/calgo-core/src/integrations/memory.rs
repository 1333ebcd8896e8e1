//! In-process calendar.
//!
//! Stores events in memory and hands out sequential ids on insert. Useful as
//! a stand-in for the remote calendar wherever no network should be touched.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::traits::{CalendarDirectory, CalendarEntry, EventInserter, EventSource};
use crate::error::{CoreError, Result};
use crate::schedule::Event;

#[derive(Debug, Default)]
struct State {
    calendars: BTreeMap<String, Vec<Event>>,
    next_id: u64,
    inserts: usize,
    fail_on_insert: Option<usize>,
}

/// Calendar store kept in memory.
#[derive(Debug, Default)]
pub struct MemoryCalendar {
    state: Mutex<State>,
}

impl MemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `calendar_id` with already persisted events.
    pub fn with_events(self, calendar_id: &str, events: Vec<Event>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state
                .calendars
                .entry(calendar_id.to_string())
                .or_default()
                .extend(events);
        }
        self
    }

    /// Reject the `nth` insert (1-based) and every later one.
    pub fn failing_from_insert(self, nth: usize) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.fail_on_insert = Some(nth);
        }
        self
    }

    /// Number of insert attempts so far, failed ones included.
    pub fn insert_attempts(&self) -> usize {
        self.state.lock().map(|state| state.inserts).unwrap_or(0)
    }

    /// Everything stored in `calendar_id`, ascending by start time.
    pub fn events(&self, calendar_id: &str) -> Vec<Event> {
        let mut events = self
            .state
            .lock()
            .ok()
            .and_then(|state| state.calendars.get(calendar_id).cloned())
            .unwrap_or_default();
        events.sort_by_key(|e| e.start_time);
        events
    }

    fn poisoned() -> CoreError {
        CoreError::integration("memory", "calendar state lock poisoned")
    }
}

impl EventSource for MemoryCalendar {
    fn list_events(
        &self,
        calendar_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<Event>> {
        let state = self.state.lock().map_err(|_| Self::poisoned())?;
        let calendar = state.calendars.get(calendar_id).ok_or_else(|| {
            CoreError::integration("memory", format!("calendar '{calendar_id}' not found"))
        })?;

        // Same window semantics as the remote API: anything that ends after
        // the window opens and starts before it closes.
        let mut events: Vec<Event> = calendar
            .iter()
            .filter(|e| e.end_time > window_start && e.start_time < window_end)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.start_time);
        Ok(events)
    }
}

impl EventInserter for MemoryCalendar {
    fn insert_event(&self, calendar_id: &str, event: &Event) -> Result<Event> {
        let mut state = self.state.lock().map_err(|_| Self::poisoned())?;
        state.inserts += 1;

        if matches!(state.fail_on_insert, Some(nth) if state.inserts >= nth) {
            return Err(CoreError::integration(
                "memory",
                format!("insert #{} rejected", state.inserts),
            ));
        }

        state.next_id += 1;
        let mut stored = event.clone();
        stored.id = format!("mem-{}", state.next_id);
        state
            .calendars
            .entry(calendar_id.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }
}

impl CalendarDirectory for MemoryCalendar {
    fn list_calendars(&self) -> Result<Vec<CalendarEntry>> {
        let state = self.state.lock().map_err(|_| Self::poisoned())?;
        Ok(state
            .calendars
            .keys()
            .map(|id| CalendarEntry {
                id: id.clone(),
                summary: id.clone(),
                primary: id == "primary",
            })
            .collect())
    }
}
