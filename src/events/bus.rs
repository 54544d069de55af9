//! Event bus
//!
//! Fan-out of [`WorldEvent`]s to every live subscriber. Each subscriber has
//! its own unbounded queue, so nothing published while it is subscribed is
//! ever dropped. New subscribers get no history.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::trace;

use crate::events::event::WorldEvent;

pub type EventReceiver = mpsc::UnboundedReceiver<WorldEvent>;

#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<WorldEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn subscribers(&self) -> MutexGuard<'_, Vec<mpsc::UnboundedSender<WorldEvent>>> {
        // a panicked publisher leaves the list itself intact
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Receive every event published from now on
    pub fn subscribe(&self) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers().push(tx);
        rx
    }

    /// Deliver `event` to all live subscribers; returns how many received it.
    ///
    /// Subscribers whose receiver was dropped are pruned. Zero receivers is
    /// not an error.
    pub fn publish(&self, event: WorldEvent) -> usize {
        let mut subscribers = self.subscribers();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        trace!(
            kind = event.kind(),
            country = %event.target(),
            receivers = subscribers.len(),
            "published event"
        );
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_gets_every_event() {
        let bus = EventBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        for i in 0..1000 {
            bus.publish(WorldEvent::player_direct_attack(format!("C{}", i)));
        }

        for rx in [&mut a, &mut b] {
            let mut n = 0;
            while rx.try_recv().is_ok() {
                n += 1;
            }
            assert_eq!(n, 1000);
        }
    }

    #[test]
    fn test_late_subscriber_sees_no_history() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(WorldEvent::attack("A", "B")), 0);

        let mut late = bus.subscribe();
        assert!(late.try_recv().is_err());

        bus.publish(WorldEvent::attack("B", "A"));
        assert_eq!(late.try_recv().unwrap(), WorldEvent::attack("B", "A"));
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let bus = EventBus::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());

        assert_eq!(bus.publish(WorldEvent::attack("A", "B")), 1);
        assert_eq!(bus.subscriber_count(), 1);
        drop(keep);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
