//! Player record

use serde::{Deserialize, Serialize};

use crate::core::config::PlayerConfig;
use crate::core::types::{Army, Faction, Meter, Resources, Stats};

/// The single human player.
///
/// `owned_countries`, `owned_territories`, `total_population` and `income`
/// are denormalized aggregates over the countries with `Owner::Player`;
/// every ownership change updates them in the same store transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub avatar: String,
    pub level: u32,
    pub army: Army,
    pub resources: Resources,
    pub stats: Stats,
    pub owned_countries: u32,
    pub owned_territories: u32,
    pub total_population: u64,
    /// Sum of daily income over owned countries
    pub income: u64,
    pub influence: u64,
    pub health: Meter,
    pub energy: Meter,
    pub experience: Meter,
    /// `None` until chosen at game start
    pub faction: Option<Faction>,
}

impl Player {
    pub fn from_config(config: &PlayerConfig) -> Self {
        Self {
            id: 1,
            name: config.name.clone(),
            avatar: config.avatar.clone(),
            level: config.level,
            army: config.army,
            resources: config.resources,
            stats: config.stats,
            owned_countries: 0,
            owned_territories: 0,
            total_population: 0,
            income: 0,
            influence: 0,
            health: config.health,
            energy: config.energy,
            experience: config.experience,
            faction: None,
        }
    }

    /// A faction has been chosen
    pub fn is_ready(&self) -> bool {
        self.faction.is_some()
    }

    pub fn money(&self) -> u64 {
        self.resources.money
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::from_config(&PlayerConfig::default())
    }
}
