//! World events, the bus that carries them, and the recent-event feed

pub mod bus;
pub mod event;
pub mod feed;

pub use bus::{EventBus, EventReceiver};
pub use event::WorldEvent;
pub use feed::{EventFeed, FeedEntry};
