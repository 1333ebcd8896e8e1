//! Free slot search within a single working day.
//!
//! The search is greedy and single pass: it walks the ordered events once,
//! keeping a markpoint that starts at the opening of the day (or now, for
//! today) and jumps to the end of every event that leaves no room before
//! it. Overlapping events are not detected and may move the markpoint back.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::day::{business_day_end, business_day_start, local_date};
use super::ordered::OrderedEventList;
use crate::error::{CoreError, Result};

/// A candidate `[start_time, end_time)` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Slot {
    fn at(start_time: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            start_time,
            end_time: start_time + duration,
        }
    }
}

/// Finds the next free window of a fixed length.
#[derive(Debug, Clone, Copy)]
pub struct SlotFinder {
    duration: Duration,
}

impl SlotFinder {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Find the earliest slot on `date` that fits before the next event.
    ///
    /// # Arguments
    /// * `events` - The day's schedule, ascending and non-overlapping
    /// * `date` - Local date to search
    /// * `now` - Current instant; on today's date the search starts no earlier
    ///
    /// # Errors
    /// `CoreError::NoSlotAvailable` when nothing fits before the day closes.
    pub fn find_next_slot(
        &self,
        events: &OrderedEventList,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Slot> {
        let day_start = business_day_start(date);
        let day_end = business_day_end(date);

        let mut markpoint = if local_date(now) == date {
            now.max(day_start)
        } else {
            day_start
        };

        if events.is_empty() && markpoint + self.duration < day_end {
            return Ok(Slot::at(markpoint, self.duration));
        }

        let mut remaining = events.iter().peekable();
        while let Some(event) = remaining.next() {
            if markpoint + self.duration < event.start_time {
                return Ok(Slot::at(markpoint, self.duration));
            }

            markpoint = event.end_time;

            if remaining.peek().is_none() && markpoint + self.duration < day_end {
                return Ok(Slot::at(markpoint, self.duration));
            }
        }

        Err(CoreError::NoSlotAvailable {
            date,
            minutes: self.duration.num_minutes(),
        })
    }
}

/// Convenience function to search with a one-off finder
pub fn find_next_slot(
    events: &OrderedEventList,
    date: NaiveDate,
    now: DateTime<Utc>,
    duration: Duration,
) -> Result<Slot> {
    SlotFinder::new(duration).find_next_slot(events, date, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Event;
    use crate::timeline::day::local_at;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 9, 24).unwrap()
    }

    fn local(hour: u32, minute: i64) -> DateTime<Utc> {
        local_at(day(), hour).with_timezone(&Utc) + Duration::minutes(minute)
    }

    /// An instant well before `day()`, so it is never "today".
    fn earlier() -> DateTime<Utc> {
        local(8, 0) - Duration::days(30)
    }

    fn meeting(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Event {
        Event::new(id, "meeting", start, end).unwrap()
    }

    #[test]
    fn slot_follows_early_meeting() {
        let events: OrderedEventList = vec![meeting("1", local(8, 0), local(8, 50))]
            .into_iter()
            .collect();

        let slot = find_next_slot(&events, day(), earlier(), Duration::minutes(45)).unwrap();
        assert_eq!(slot.start_time, local(8, 50));
        assert_eq!(slot.end_time, local(9, 35));
    }

    #[test]
    fn empty_day_starts_at_opening() {
        let slot = find_next_slot(
            &OrderedEventList::new(),
            day(),
            earlier(),
            Duration::minutes(45),
        )
        .unwrap();
        assert_eq!(slot.start_time, local(8, 0));
    }

    #[test]
    fn fully_booked_day_has_no_slot() {
        let events: OrderedEventList = vec![meeting("1", local(8, 0), local(20, 0))]
            .into_iter()
            .collect();

        let err = find_next_slot(&events, day(), earlier(), Duration::minutes(45)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::NoSlotAvailable { minutes: 45, .. }
        ));
    }

    #[test]
    fn gap_must_be_strictly_longer_than_slot() {
        // 45 minute gap between 08:00 and 08:45 is not enough for 45 minutes
        let events: OrderedEventList = vec![meeting("1", local(8, 45), local(9, 0))]
            .into_iter()
            .collect();

        let slot = find_next_slot(&events, day(), earlier(), Duration::minutes(45)).unwrap();
        assert_eq!(slot.start_time, local(9, 0));

        let slot = find_next_slot(&events, day(), earlier(), Duration::minutes(44)).unwrap();
        assert_eq!(slot.start_time, local(8, 0));
    }

    #[test]
    fn slot_found_between_meetings() {
        let events: OrderedEventList = vec![
            meeting("1", local(8, 0), local(9, 0)),
            meeting("2", local(10, 0), local(11, 0)),
            meeting("3", local(11, 0), local(19, 0)),
        ]
        .into_iter()
        .collect();

        let slot = find_next_slot(&events, day(), earlier(), Duration::minutes(30)).unwrap();
        assert_eq!(slot.start_time, local(9, 0));

        // Too long for the 09:00-10:00 gap and for the tail of the day
        assert!(find_next_slot(&events, day(), earlier(), Duration::minutes(90)).is_err());
    }

    #[test]
    fn today_starts_from_now() {
        let now = local(13, 7);
        let slot = find_next_slot(&OrderedEventList::new(), day(), now, Duration::minutes(45))
            .unwrap();
        assert_eq!(slot.start_time, now);
    }

    #[test]
    fn today_before_opening_uses_opening() {
        let now = local(6, 30);
        let slot = find_next_slot(&OrderedEventList::new(), day(), now, Duration::minutes(45))
            .unwrap();
        assert_eq!(slot.start_time, local(8, 0));
    }

    #[test]
    fn today_after_closing_has_no_slot() {
        let now = local(19, 30);
        assert!(
            find_next_slot(&OrderedEventList::new(), day(), now, Duration::minutes(45)).is_err()
        );
    }
}
