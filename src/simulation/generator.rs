//! World event generator
//!
//! At a randomized interval, picks a random set of attacker countries and,
//! for each, a random set of other countries to attack. It only publishes
//! `attack` events; interpreting them is the status machine's job.

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::task::JoinHandle;
use tracing::{debug, Instrument};

use crate::core::config::GeneratorConfig;
use crate::core::types::CountryId;
use crate::events::{EventBus, WorldEvent};
use crate::simulation::gate::RunGate;
use crate::state::WorldStore;

/// Plan one firing: one `attack` event per (attacker, target) pair.
///
/// With fewer than two countries nothing happens. Attacker count is drawn
/// from the configured range and capped at the country count; per attacker,
/// the target count is drawn from its range and capped at the number of
/// other countries. Nobody attacks itself.
pub fn plan_attacks<R: Rng>(
    rng: &mut R,
    countries: &[CountryId],
    config: &GeneratorConfig,
) -> Vec<WorldEvent> {
    if countries.len() < 2 {
        return Vec::new();
    }

    let attacker_count = rng
        .gen_range(config.min_attackers..=config.max_attackers)
        .min(countries.len());

    let mut pool = countries.to_vec();
    let (attackers, _) = pool.partial_shuffle(rng, attacker_count);
    let attackers = attackers.to_vec();

    let mut events = Vec::new();
    for attacker in &attackers {
        let mut candidates: Vec<&CountryId> = countries.iter().filter(|c| *c != attacker).collect();
        if candidates.is_empty() {
            continue;
        }

        let target_count = rng
            .gen_range(config.min_targets..=config.max_targets)
            .min(candidates.len());
        let (targets, _) = candidates.partial_shuffle(rng, target_count);

        events.extend(
            targets
                .iter()
                .map(|&target| {
                    WorldEvent::attack(attacker.clone(), target.clone())
                }),
        );
    }
    events
}

/// Delay until the next firing, uniform in the configured window
pub fn next_delay<R: Rng>(rng: &mut R, config: &GeneratorConfig) -> Duration {
    rng.gen_range(config.interval_range())
}

#[derive(Debug)]
pub struct WorldEventGenerator {
    store: Arc<WorldStore>,
    bus: Arc<EventBus>,
    config: GeneratorConfig,
    rng: ChaCha8Rng,
}

impl WorldEventGenerator {
    pub fn new(store: Arc<WorldStore>, bus: Arc<EventBus>, config: GeneratorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            store,
            bus,
            config,
            rng,
        }
    }

    /// Plan and publish one firing. Returns the number of events published.
    pub fn fire(&mut self) -> usize {
        let countries = self.store.country_ids();
        let events = plan_attacks(&mut self.rng, &countries, &self.config);
        let count = events.len();
        for event in events {
            self.bus.publish(event);
        }
        debug!(events = count, countries = countries.len(), "world events fired");
        count
    }

    /// Fire until `gate` closes, re-drawing the delay after every firing
    pub fn spawn(mut self, gate: RunGate, span: tracing::Span) -> JoinHandle<()> {
        tokio::spawn(
            async move {
                loop {
                    let delay = next_delay(&mut self.rng, &self.config);
                    tokio::time::sleep(delay).await;
                    if gate.run(|| self.fire()).is_none() {
                        break;
                    }
                }
            }
            .instrument(span),
        )
    }
}
