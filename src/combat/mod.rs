//! Player combat: the counter chain and timed attack resolution

pub mod resolution;
pub mod resolver;

pub use resolution::{apply_counter_chain, attack_force, resolve, AttackReport};
pub use resolver::CombatResolver;
