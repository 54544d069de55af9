//! Recent-event feed for tickers and logs

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::events::event::WorldEvent;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub id: u64,
    pub text: String,
    pub event: WorldEvent,
}

/// Newest-first log of the most recent events, bounded by `capacity`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventFeed {
    entries: VecDeque<FeedEntry>,
    capacity: usize,
    next_id: u64,
}

impl EventFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 1,
        }
    }

    pub fn push(&mut self, event: WorldEvent) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.entries.push_front(FeedEntry {
            id,
            text: event.to_string(),
            event,
        });
        self.entries.truncate(self.capacity);

        id
    }

    /// Newest first
    pub fn entries(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_is_newest_first_and_bounded() {
        let mut feed = EventFeed::new(30);
        for i in 0..45 {
            feed.push(WorldEvent::attack(format!("A{}", i), "B"));
        }

        assert_eq!(feed.len(), 30);
        let first = feed.entries().next().unwrap();
        assert_eq!(first.id, 45);
        assert_eq!(first.text, "A44 launches a missile at B");
        assert_eq!(feed.entries().last().unwrap().id, 16);
    }
}
