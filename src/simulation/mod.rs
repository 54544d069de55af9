//! Background timers: the day scheduler and the world event generator

pub mod gate;
pub mod generator;
pub mod scheduler;

pub use gate::RunGate;
pub use generator::{next_delay, plan_attacks, WorldEventGenerator};
pub use scheduler::{DayScheduler, DayTick};
