//! Timeline primitives for a single working day.
//!
//! This module provides:
//! - Business-day boundaries in local time
//! - An ordered, non-overlapping event list
//! - Greedy free slot search
//! - Day and range expressions

pub mod day;
mod expression;
mod ordered;
mod slot;

pub use day::{business_day_end, business_day_start, local_date};
pub use expression::{parse_date_expression, DateRange};
pub use ordered::OrderedEventList;
pub use slot::{find_next_slot, Slot, SlotFinder};
