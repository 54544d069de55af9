//! Authoritative game state: the player, the countries, and the store that
//! serializes every mutation to them.

pub mod country;
pub mod player;
pub mod store;
pub mod world;

pub use country::Country;
pub use player::Player;
pub use store::WorldStore;
pub use world::{PendingAttack, WorldState};
