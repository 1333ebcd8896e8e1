//! Focus time planner.
//!
//! This module fills a day with focus blocks:
//! - Loads the day's existing events from the calendar
//! - Repeatedly asks [`SlotFinder`] for the next free window
//! - Inserts a focus event for every window found
//! - Keeps proposals (empty id) apart from persisted events until commit

mod commit;

pub use commit::{commit, CommitOutcome, COMMIT_QUESTION};

use std::fmt;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::duration::format_duration;
use crate::error::{CoreError, Result, ValidationError};
use crate::integrations::{EventInserter, EventSource};
use crate::schedule::{Event, FOCUS_TITLE};
use crate::timeline::{
    business_day_end, business_day_start, local_date, OrderedEventList, SlotFinder,
};

/// How much focus time to plan and in which block size.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    overall_focus: Duration,
    per_event_focus: Duration,
    focus_title: String,
}

impl PlannerConfig {
    /// # Errors
    /// Rejects a non-positive block size, and an overall budget smaller than
    /// one block (which could never place anything).
    pub fn new(
        overall_focus: Duration,
        per_event_focus: Duration,
    ) -> Result<Self, ValidationError> {
        if per_event_focus <= Duration::zero() {
            return Err(ValidationError::InvalidValue {
                field: "focus_event_duration".to_string(),
                message: format!("must be positive, got {}", format_duration(per_event_focus)),
            });
        }
        if overall_focus < per_event_focus {
            return Err(ValidationError::InvalidValue {
                field: "focus_time".to_string(),
                message: format!(
                    "{} must be greater than or equal to the focus event duration ({})",
                    format_duration(overall_focus),
                    format_duration(per_event_focus)
                ),
            });
        }

        Ok(Self {
            overall_focus,
            per_event_focus,
            focus_title: FOCUS_TITLE.to_string(),
        })
    }

    pub fn with_focus_title(mut self, title: impl Into<String>) -> Self {
        self.focus_title = title.into();
        self
    }
}

/// Lifecycle of a planning session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanState {
    Initialized,
    Planned,
    Committed,
}

impl PlanState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::Planned => "planned",
            Self::Committed => "committed",
        }
    }
}

/// Query window for `date`: the working day, opening no earlier than `now`
/// when `date` is today.
pub fn planning_window(date: NaiveDate, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let day_start = business_day_start(date);
    let day_end = business_day_end(date);
    let start = if local_date(now) == date {
        now.max(day_start).min(day_end)
    } else {
        day_start
    };
    (start, day_end)
}

/// A single planning session for one calendar and one day.
pub struct Planner<'a> {
    calendar_id: String,
    date: NaiveDate,
    now: DateTime<Utc>,
    config: PlannerConfig,
    events: OrderedEventList,
    inserter: &'a dyn EventInserter,
    state: PlanState,
}

impl<'a> Planner<'a> {
    /// Load the day's schedule from `source` and start a session.
    ///
    /// # Errors
    /// `CoreError::EventSource` when the schedule cannot be loaded.
    pub fn new(
        calendar_id: impl Into<String>,
        date: NaiveDate,
        config: PlannerConfig,
        source: &dyn EventSource,
        inserter: &'a dyn EventInserter,
    ) -> Result<Self> {
        Self::new_at(calendar_id, date, config, source, inserter, Utc::now())
    }

    /// Like [`Planner::new`], with an explicit current instant.
    pub fn new_at(
        calendar_id: impl Into<String>,
        date: NaiveDate,
        config: PlannerConfig,
        source: &dyn EventSource,
        inserter: &'a dyn EventInserter,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let calendar_id = calendar_id.into();
        let (window_start, window_end) = planning_window(date, now);

        // Past closing time on today's date nothing is left to load or fill.
        let existing = if window_start >= window_end {
            debug!(calendar_id = %calendar_id, %date, "working day is over, skipping load");
            Vec::new()
        } else {
            source
                .list_events(&calendar_id, window_start, window_end)
                .map_err(|e| CoreError::EventSource {
                    calendar_id: calendar_id.clone(),
                    source: Box::new(e),
                })?
        };
        info!(calendar_id = %calendar_id, %date, count = existing.len(), "loaded existing events");

        Ok(Self::from_events(calendar_id, date, config, existing, inserter).with_now(now))
    }

    /// Start a session from an already loaded schedule.
    pub fn from_events(
        calendar_id: impl Into<String>,
        date: NaiveDate,
        config: PlannerConfig,
        existing: Vec<Event>,
        inserter: &'a dyn EventInserter,
    ) -> Self {
        let mut events = OrderedEventList::new();
        events.add_all(existing);

        Self {
            calendar_id: calendar_id.into(),
            date,
            now: Utc::now(),
            config,
            events,
            inserter,
            state: PlanState::Initialized,
        }
    }

    /// Override the instant used to decide where today's search starts.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Place focus blocks until the budget is spent.
    ///
    /// Every iteration consumes one block's worth of budget, whether or not
    /// a slot was found; unfilled iterations are logged and skipped. Calling
    /// this again plans on top of the blocks already placed.
    pub fn plan(&mut self) {
        let block = self.config.per_event_focus;
        let finder = SlotFinder::new(block);
        let mut remaining = self.config.overall_focus;
        let mut iteration = 0u32;

        while remaining >= block {
            iteration += 1;
            match finder.find_next_slot(&self.events, self.date, self.now) {
                Ok(slot) => {
                    info!(
                        iteration,
                        start = %slot.start_time.with_timezone(&Local).format("%H:%M"),
                        "found a slot"
                    );
                    self.events
                        .insert(Event::focus(&self.config.focus_title, slot.start_time, block));
                }
                Err(e) => warn!(iteration, error = %e, "failed finding slot"),
            }
            remaining = remaining - block;
        }

        self.state = PlanState::Planned;
    }

    /// Proposals from this session, ascending by time.
    pub fn added_events(&self) -> Vec<&Event> {
        self.events.iter().filter(|e| !e.is_persisted()).collect()
    }

    pub fn events(&self) -> &OrderedEventList {
        &self.events
    }

    pub fn state(&self) -> PlanState {
        self.state
    }

    /// Human-readable summary of the day.
    pub fn render(&self) -> String {
        let mut out = format!(
            "Plan for {} {} events\n",
            self.date.format("%a %d %b %Y"),
            self.events.len()
        );
        for event in &self.events {
            let range = format!(
                "{}-{}",
                event.start_time.with_timezone(&Local).format("%H:%M"),
                event.end_time.with_timezone(&Local).format("%H:%M")
            );
            let marker = if event.is_persisted() { "persisted" } else { "new" };
            let title = if event.summary.is_empty() {
                "(No title)"
            } else {
                event.summary.as_str()
            };
            out.push_str(&format!("{range:>17}: {title} [{marker}]\n"));
        }
        out
    }
}

impl fmt::Display for Planner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for Planner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner")
            .field("calendar_id", &self.calendar_id)
            .field("date", &self.date)
            .field("state", &self.state)
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}
