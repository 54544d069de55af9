//! Conquest - simulation core of a territorial-conquest game
//!
//! One [`session::GameSession`] owns the world state store, the event bus,
//! the day scheduler, the world event generator, the country status machine
//! and the player's combat resolver.

pub mod combat;
pub mod core;
pub mod events;
pub mod session;
pub mod simulation;
pub mod state;
pub mod status;
pub mod world;

pub use crate::core::{ActionOutcome, GameConfig, GameError, Rejection, Result};
pub use crate::session::GameSession;
