//! Calendar collaborators.
//!
//! The planner only talks to calendars through the traits in [`traits`];
//! [`google`] implements them over HTTP and [`memory`] in process.

pub mod google;
pub mod memory;
pub mod traits;

pub use google::GoogleCalendar;
pub use memory::MemoryCalendar;
pub use traits::{
    CalendarDirectory, CalendarEntry, ConfirmPrompt, EventInserter, EventSource, FixedAnswer,
};
