//! Chronologically ordered event list.
//!
//! The list assumes the events it holds never overlap. Under that assumption
//! ordering by start time and by end time agree, and the insertion rule below
//! keeps the list sorted. Overlapping input still produces a deterministic
//! order, just not a meaningful one.

use std::slice;

use serde::Serialize;

use crate::schedule::Event;

/// Events sorted ascending by start time.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct OrderedEventList {
    events: Vec<Event>,
}

impl OrderedEventList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `event` immediately before the first event that starts at or
    /// after `event` ends, or at the back if there is none.
    pub fn insert(&mut self, event: Event) {
        let index = self
            .events
            .iter()
            .position(|existing| existing.start_time >= event.end_time)
            .unwrap_or(self.events.len());
        self.events.insert(index, event);
    }

    /// Insert every event in the given order.
    pub fn add_all<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = Event>,
    {
        for event in events {
            self.insert(event);
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    /// Positions of events that have not been persisted yet.
    pub fn unpersisted_positions(&self) -> Vec<usize> {
        self.events
            .iter()
            .enumerate()
            .filter(|(_, event)| !event.is_persisted())
            .map(|(index, _)| index)
            .collect()
    }

    /// Swap the event at `index` for its persisted copy.
    pub(crate) fn replace(&mut self, index: usize, event: Event) {
        self.events[index] = event;
    }
}

impl FromIterator<Event> for OrderedEventList {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        let mut list = Self::new();
        list.add_all(iter);
        list
    }
}

impl<'a> IntoIterator for &'a OrderedEventList {
    type Item = &'a Event;
    type IntoIter = slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
