//! WorldState - the player and every country
//!
//! Plain data plus the rules of each mutation. Locking and change
//! notification live in [`crate::state::WorldStore`]; nothing here blocks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combat::resolution::{self, AttackReport};
use crate::core::config::{CombatConfig, EconomyConfig};
use crate::core::error::{ActionOutcome, Rejection};
use crate::core::types::{Army, CountryId, CountryStatus, Faction, Owner};
use crate::state::country::Country;
use crate::state::player::Player;

/// Units already taken from the player, waiting to hit `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAttack {
    pub target: CountryId,
    pub force: Army,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    pub player: Player,
    pub countries: BTreeMap<CountryId, Country>,
}

impl WorldState {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            countries: BTreeMap::new(),
        }
    }

    pub fn country(&self, id: &str) -> Option<&Country> {
        self.countries.get(id)
    }

    pub fn country_ids(&self) -> Vec<CountryId> {
        self.countries.keys().cloned().collect()
    }

    pub fn player_owned(&self) -> impl Iterator<Item = &Country> {
        self.countries.values().filter(|c| c.is_player_owned())
    }

    /// Replace the country collection and rebuild the player's aggregates
    /// from whatever the new collection says the player owns.
    pub fn seed_countries(&mut self, countries: impl IntoIterator<Item = Country>) {
        self.countries = countries.into_iter().map(|c| (c.id.clone(), c)).collect();

        let (count, population, income) = self
            .player_owned()
            .fold((0u32, 0u64, 0u64), |(n, pop, inc), c| {
                (n + 1, pop + c.population, inc + c.income)
            });
        self.player.owned_countries = count;
        self.player.owned_territories = count;
        self.player.total_population = population;
        self.player.income = income;
    }

    /// Take ownership of a country
    pub fn occupy(&mut self, id: &str, economy: &EconomyConfig) -> ActionOutcome {
        let Some(country) = self.countries.get_mut(id) else {
            return Rejection::UnknownCountry.into();
        };
        if country.is_player_owned() {
            return Rejection::AlreadyOwned.into();
        }

        country.owner = Owner::Player;
        country.loyalty = economy.occupy_loyalty;

        let player = &mut self.player;
        player.owned_countries += 1;
        player.owned_territories += 1;
        player.total_population += country.population;
        player.income += country.income;

        ActionOutcome::Applied
    }

    /// One-shot income collection at the cost of loyalty
    pub fn tax(&mut self, id: &str, economy: &EconomyConfig) -> ActionOutcome {
        let Some(country) = self.countries.get_mut(id) else {
            return Rejection::UnknownCountry.into();
        };
        if !country.is_player_owned() {
            return Rejection::NotOwned.into();
        }
        if country.loyalty < economy.min_tax_loyalty {
            return Rejection::InsufficientLoyalty.into();
        }

        country.lower_loyalty(economy.tax_loyalty_cost);
        self.player.resources.money += country.income;

        ActionOutcome::Applied
    }

    /// Spend money to raise loyalty
    pub fn propaganda(&mut self, id: &str, economy: &EconomyConfig) -> ActionOutcome {
        let Some(country) = self.countries.get_mut(id) else {
            return Rejection::UnknownCountry.into();
        };
        if !country.is_player_owned() {
            return Rejection::NotOwned.into();
        }
        if self.player.resources.money < economy.propaganda_cost {
            return Rejection::InsufficientFunds.into();
        }

        country.raise_loyalty(economy.propaganda_loyalty_gain);
        self.player.resources.money -= economy.propaganda_cost;

        ActionOutcome::Applied
    }

    /// Add one day of income from every owned country. Returns the amount.
    pub fn collect_daily_income(&mut self) -> u64 {
        let total: u64 = self.player_owned().map(|c| c.income).sum();
        self.player.resources.money += total;
        total
    }

    /// Set the faction, returning the previous one
    pub fn set_faction(&mut self, faction: Faction) -> Option<Faction> {
        self.player.faction.replace(faction)
    }

    /// Enter `status`; returns the new status generation
    pub fn set_status(&mut self, id: &str, status: CountryStatus) -> Option<u64> {
        self.countries.get_mut(id).map(|c| c.transition(status))
    }

    /// Enter `status` only if no transition happened since `generation`
    pub fn revert_status(&mut self, id: &str, status: CountryStatus, generation: u64) -> bool {
        match self.countries.get_mut(id) {
            Some(c) if c.status_generation() == generation => {
                c.transition(status);
                true
            }
            _ => false,
        }
    }

    /// Reserve the attacking force: validate, then take it from the player.
    pub fn begin_attack(
        &mut self,
        id: &str,
        combat: &CombatConfig,
    ) -> Result<PendingAttack, Rejection> {
        let Some(country) = self.countries.get(id) else {
            return Err(Rejection::UnknownCountry);
        };
        if !self.player.is_ready() {
            return Err(Rejection::PlayerNotReady);
        }

        let force = resolution::attack_force(&self.player.army, &combat.attack_caps);
        if force.is_empty() {
            return Err(Rejection::NoForce);
        }

        self.player.army = self.player.army.saturating_sub(&force);
        Ok(PendingAttack {
            target: country.id.clone(),
            force,
        })
    }

    /// Apply a reserved force to the defender's current army
    pub fn finish_attack(
        &mut self,
        pending: &PendingAttack,
        combat: &CombatConfig,
    ) -> Option<AttackReport> {
        let country = self.countries.get_mut(pending.target.as_str())?;
        let before = country.army;
        let after = resolution::resolve(&before, &pending.force, combat);
        country.army = after;

        Some(AttackReport {
            target: pending.target.clone(),
            force: pending.force,
            defender_before: before,
            defender_after: after,
        })
    }
}
