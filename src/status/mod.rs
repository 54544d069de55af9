//! Per-country status transitions with timed auto-reversion

pub mod machine;

pub use machine::{StatusListener, StatusMachine, Transition, Trigger};
