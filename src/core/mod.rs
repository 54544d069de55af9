pub mod calendar;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::WorldCalendar;
pub use config::GameConfig;
pub use error::{ActionOutcome, GameError, Rejection, Result};
