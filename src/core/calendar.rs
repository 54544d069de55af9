//! World calendar: the game-day counter
//!
//! The day is a push-on-change value. Anyone can read the current day or
//! subscribe to changes without knowing what else happens on a tick.

use tokio::sync::watch;

/// Day counter shared between the scheduler and observers
#[derive(Debug)]
pub struct WorldCalendar {
    day: watch::Sender<u64>,
    start_day: u64,
}

impl WorldCalendar {
    pub fn new(start_day: u64) -> Self {
        let (day, _) = watch::channel(start_day);
        Self { day, start_day }
    }

    pub fn current_day(&self) -> u64 {
        *self.day.borrow()
    }

    /// Receiver that wakes whenever the day changes
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.day.subscribe()
    }

    /// Advance by one day and return the new day
    pub fn advance(&self) -> u64 {
        let mut next = 0;
        self.day.send_modify(|day| {
            *day += 1;
            next = *day;
        });
        next
    }

    /// Back to the starting day (new session)
    pub fn reset(&self) {
        let start = self.start_day;
        self.day.send_if_modified(|day| std::mem::replace(day, start) != start);
    }
}

impl Default for WorldCalendar {
    fn default() -> Self {
        Self::new(1)
    }
}
