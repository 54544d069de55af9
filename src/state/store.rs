//! WorldStore - the single source of truth for one game session
//!
//! Backed by a `watch` channel: writers are serialized by the channel's
//! lock, readers always observe a fully applied mutation, and subscribers
//! are woken only when a mutation actually changed something.

use tokio::sync::watch;
use tracing::debug;

use crate::combat::resolution::AttackReport;
use crate::core::config::{CombatConfig, EconomyConfig};
use crate::core::error::{ActionOutcome, Rejection};
use crate::core::types::{CountryId, CountryStatus, Faction};
use crate::state::country::Country;
use crate::state::player::Player;
use crate::state::world::{PendingAttack, WorldState};

#[derive(Debug)]
pub struct WorldStore {
    state: watch::Sender<WorldState>,
    economy: EconomyConfig,
}

impl WorldStore {
    pub fn new(player: Player, economy: EconomyConfig) -> Self {
        let (state, _) = watch::channel(WorldState::new(player));
        Self { state, economy }
    }

    // === READS ===

    /// Run `f` against the current state without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&WorldState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn snapshot(&self) -> WorldState {
        self.state.borrow().clone()
    }

    pub fn player(&self) -> Player {
        self.read(|s| s.player.clone())
    }

    pub fn country(&self, id: &str) -> Option<Country> {
        self.read(|s| s.country(id).cloned())
    }

    pub fn countries(&self) -> Vec<Country> {
        self.read(|s| s.countries.values().cloned().collect())
    }

    pub fn country_ids(&self) -> Vec<CountryId> {
        self.read(WorldState::country_ids)
    }

    pub fn country_count(&self) -> usize {
        self.read(|s| s.countries.len())
    }

    /// Push-on-change view of the whole state
    pub fn subscribe(&self) -> watch::Receiver<WorldState> {
        self.state.subscribe()
    }

    // === MUTATIONS ===

    /// Run one mutation under the write lock. Subscribers are notified only
    /// when `changed` says the result altered the state.
    fn update<R>(
        &self,
        initial: R,
        f: impl FnOnce(&mut WorldState) -> R,
        changed: impl FnOnce(&R) -> bool,
    ) -> R {
        let mut result = initial;
        self.state.send_if_modified(|state| {
            result = f(state);
            changed(&result)
        });
        result
    }

    fn apply(&self, f: impl FnOnce(&mut WorldState) -> ActionOutcome) -> ActionOutcome {
        self.update(
            Rejection::UnknownCountry.into(),
            f,
            ActionOutcome::is_applied,
        )
    }

    pub fn seed_countries(&self, countries: impl IntoIterator<Item = Country>) {
        self.state.send_modify(|state| state.seed_countries(countries));
        debug!(countries = self.country_count(), "seeded countries");
    }

    pub fn occupy(&self, id: &str) -> ActionOutcome {
        let outcome = self.apply(|s| s.occupy(id, &self.economy));
        debug!(country = id, %outcome, "occupy");
        outcome
    }

    pub fn tax(&self, id: &str) -> ActionOutcome {
        let outcome = self.apply(|s| s.tax(id, &self.economy));
        debug!(country = id, %outcome, "tax");
        outcome
    }

    pub fn propaganda(&self, id: &str) -> ActionOutcome {
        let outcome = self.apply(|s| s.propaganda(id, &self.economy));
        debug!(country = id, %outcome, "propaganda");
        outcome
    }

    /// Add a day of income from owned countries. Called by the scheduler.
    pub fn collect_daily_income(&self) -> u64 {
        let amount = self.update(0, WorldState::collect_daily_income, |amount| *amount > 0);
        debug!(amount, "collected daily income");
        amount
    }

    pub fn set_faction(&self, faction: Faction) -> Option<Faction> {
        self.update(None, |s| s.set_faction(faction), |_| true)
    }

    /// Enter `status` now. Returns the generation a deferred revert must carry.
    pub fn set_status(&self, id: &str, status: CountryStatus) -> Option<u64> {
        self.update(None, |s| s.set_status(id, status), Option::is_some)
    }

    /// Apply a deferred revert unless a newer transition superseded it
    pub fn revert_status(&self, id: &str, status: CountryStatus, generation: u64) -> bool {
        let applied = self.update(false, |s| s.revert_status(id, status, generation), |a| *a);
        if !applied {
            debug!(country = id, generation, "dropped stale status revert");
        }
        applied
    }

    pub fn begin_attack(
        &self,
        id: &str,
        combat: &CombatConfig,
    ) -> Result<PendingAttack, Rejection> {
        self.update(
            Err(Rejection::UnknownCountry),
            |s| s.begin_attack(id, combat),
            Result::is_ok,
        )
    }

    pub fn finish_attack(
        &self,
        pending: &PendingAttack,
        combat: &CombatConfig,
    ) -> Option<AttackReport> {
        self.update(None, |s| s.finish_attack(pending, combat), Option::is_some)
    }
}

impl Default for WorldStore {
    fn default() -> Self {
        Self::new(Player::default(), EconomyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Owner;

    fn store() -> WorldStore {
        let store = WorldStore::default();
        store.seed_countries([
            Country::new("C1", "C1").with_population(1_000_000).with_income(300),
            Country::new("C2", "C2").with_owner(Owner::Other).with_income(400),
        ]);
        store
    }

    #[test]
    fn test_rejected_mutation_does_not_notify() {
        let store = store();
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        assert!(!store.tax("C1").is_applied());
        assert!(!rx.has_changed().unwrap());

        assert!(store.occupy("C1").is_applied());
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().player.owned_countries, 1);
    }

    #[test]
    fn test_income_without_owned_countries_does_not_notify() {
        let store = store();
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        assert_eq!(store.collect_daily_income(), 0);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_snapshot_reads() {
        let store = store();
        assert_eq!(store.country_count(), 2);
        assert_eq!(
            store.country_ids(),
            vec![CountryId::from("C1"), CountryId::from("C2")]
        );
        assert_eq!(store.country("C2").unwrap().income, 400);
        assert!(store.country("C3").is_none());
    }

    #[test]
    fn test_concurrent_writers_are_serialized() {
        let store = std::sync::Arc::new(store());
        store.occupy("C1");
        let money = store.player().money();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.collect_daily_income();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.player().money(), money + 8 * 100 * 300);
    }
}
