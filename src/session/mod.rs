//! Game session facade

pub mod game;

pub use game::GameSession;
