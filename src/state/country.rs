//! Country record

use serde::{Deserialize, Serialize};

use crate::core::types::{Army, CountryId, CountryStatus, GeoPoint, Owner};

pub const MAX_LOYALTY: u32 = 100;

/// A country on the world map
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    pub owner: Owner,
    pub population: u64,
    /// Always within [0, 100]
    pub loyalty: u32,
    /// Per-day income
    pub income: u64,
    pub status: CountryStatus,
    pub army: Army,
    pub center: Option<GeoPoint>,
    /// Bumped on every status transition; deferred reverts carry the value
    /// they were scheduled under and are dropped when it no longer matches.
    #[serde(skip)]
    status_generation: u64,
}

impl Country {
    pub fn new(id: impl Into<CountryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            owner: Owner::Neutral,
            population: 0,
            loyalty: 50,
            income: 0,
            status: CountryStatus::Idle,
            army: Army::default(),
            center: None,
            status_generation: 0,
        }
    }

    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_population(mut self, population: u64) -> Self {
        self.population = population;
        self
    }

    pub fn with_loyalty(mut self, loyalty: u32) -> Self {
        self.loyalty = loyalty.min(MAX_LOYALTY);
        self
    }

    pub fn with_income(mut self, income: u64) -> Self {
        self.income = income;
        self
    }

    pub fn with_army(mut self, army: Army) -> Self {
        self.army = army;
        self
    }

    pub fn with_center(mut self, center: GeoPoint) -> Self {
        self.center = Some(center);
        self
    }

    pub fn is_player_owned(&self) -> bool {
        self.owner == Owner::Player
    }

    pub fn status_generation(&self) -> u64 {
        self.status_generation
    }

    /// Enter `status` and return the new generation
    pub(crate) fn transition(&mut self, status: CountryStatus) -> u64 {
        self.status = status;
        self.status_generation += 1;
        self.status_generation
    }

    pub(crate) fn raise_loyalty(&mut self, amount: u32) {
        self.loyalty = self.loyalty.saturating_add(amount).min(MAX_LOYALTY);
    }

    pub(crate) fn lower_loyalty(&mut self, amount: u32) {
        self.loyalty = self.loyalty.saturating_sub(amount);
    }
}
