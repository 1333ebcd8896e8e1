//! # calgo Core Library
//!
//! This library provides the core logic for calgo, a focus time planner.
//! Given a calendar and a day, it loads the existing meetings, fills the free
//! working hours with focus blocks and, after confirmation, writes the blocks
//! back to the calendar. The `calgo` binary is a thin CLI over this crate.
//!
//! ## Architecture
//!
//! - **Timeline**: Ordered event list, business day bounds, slot search and
//!   the day expression grammar (`m`, `+1`, `th-f`, ...)
//! - **Scheduler**: Planning session state machine and the commit workflow
//! - **Integrations**: Calendar traits plus Google Calendar and in-memory
//!   implementations
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`OrderedEventList`]: Events kept ascending by start time
//! - [`SlotFinder`]: Greedy earliest-fit search within a working day
//! - [`Planner`]: Plans focus blocks for a day, see also [`commit`]
//! - [`Config`]: Application configuration management

pub mod duration;
pub mod error;
pub mod integrations;
pub mod schedule;
pub mod scheduler;
pub mod storage;
pub mod timeline;

pub use duration::{format_duration, parse_duration};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use integrations::{
    CalendarDirectory, CalendarEntry, ConfirmPrompt, EventInserter, EventSource, FixedAnswer,
    GoogleCalendar, MemoryCalendar,
};
pub use schedule::{Event, EventKind, FOCUS_TITLE};
pub use scheduler::{commit, planning_window, CommitOutcome, PlanState, Planner, PlannerConfig};
pub use storage::Config;
pub use timeline::{
    business_day_end, business_day_start, find_next_slot, parse_date_expression, DateRange,
    OrderedEventList, Slot, SlotFinder,
};
