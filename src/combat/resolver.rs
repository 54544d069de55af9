//! Player attack resolution over time
//!
//! Submitting an attack reserves the force (the player pays attrition even if
//! the attack does nothing) and announces it on the event bus. After the
//! settling delay the damage is committed to the defender and the country
//! goes back to Idle. The commit runs on its own task, so it lands even if
//! the caller stops waiting. While an attack on a country is settling,
//! further attacks on that country are rejected.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ahash::AHashSet;
use tracing::{debug, info, Instrument};

use crate::combat::resolution::AttackReport;
use crate::core::config::CombatConfig;
use crate::core::error::Rejection;
use crate::core::types::{CountryId, CountryStatus};
use crate::events::{EventBus, WorldEvent};
use crate::state::{PendingAttack, WorldStore};
use crate::status::StatusMachine;

type InFlightSet = Arc<Mutex<AHashSet<CountryId>>>;

fn lock(set: &Mutex<AHashSet<CountryId>>) -> MutexGuard<'_, AHashSet<CountryId>> {
    set.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
pub struct CombatResolver {
    store: Arc<WorldStore>,
    bus: Arc<EventBus>,
    status: Arc<StatusMachine>,
    config: CombatConfig,
    in_flight: InFlightSet,
}

/// Claim on a target; released on drop
struct InFlight {
    set: InFlightSet,
    target: CountryId,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        lock(&self.set).remove(&self.target);
    }
}

impl CombatResolver {
    pub fn new(
        store: Arc<WorldStore>,
        bus: Arc<EventBus>,
        status: Arc<StatusMachine>,
        config: CombatConfig,
    ) -> Self {
        Self {
            store,
            bus,
            status,
            config,
            in_flight: Arc::new(Mutex::new(AHashSet::new())),
        }
    }

    fn claim(&self, target: &CountryId) -> Result<InFlight, Rejection> {
        if !lock(&self.in_flight).insert(target.clone()) {
            return Err(Rejection::AttackInProgress);
        }
        Ok(InFlight {
            set: Arc::clone(&self.in_flight),
            target: target.clone(),
        })
    }

    /// An attack on `target` is waiting for its settling delay
    pub fn is_attacking(&self, target: &CountryId) -> bool {
        lock(&self.in_flight).contains(target)
    }

    /// Attack `target` (the selected country) and wait for the result.
    ///
    /// Rejections leave every piece of state untouched. Once submitted, the
    /// attack settles whether or not this future is polled to completion.
    pub async fn attack(&self, target: Option<&CountryId>) -> Result<AttackReport, Rejection> {
        let target = target.ok_or(Rejection::NoSelection)?;
        let claim = self.claim(target)?;

        let pending = self
            .store
            .begin_attack(target.as_str(), &self.config)
            .inspect_err(|rejection| {
                debug!(country = %target, %rejection, "attack rejected")
            })?;
        debug!(country = %target, force = ?pending.force, "attack submitted");
        self.bus.publish(WorldEvent::player_direct_attack(target.clone()));

        let commit = tokio::spawn(
            settle(
                Arc::clone(&self.store),
                Arc::clone(&self.status),
                self.config.clone(),
                pending,
                claim,
            )
            .instrument(tracing::Span::current()),
        );

        match commit.await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(Rejection::Interrupted),
        }
    }
}

/// Wait out the settling delay, then commit the damage
async fn settle(
    store: Arc<WorldStore>,
    status: Arc<StatusMachine>,
    config: CombatConfig,
    pending: PendingAttack,
    _claim: InFlight,
) -> Result<AttackReport, Rejection> {
    tokio::time::sleep(config.settle_delay).await;

    let report = store
        .finish_attack(&pending, &config)
        .ok_or(Rejection::UnknownCountry)?;
    status.set(&pending.target, CountryStatus::Idle);

    info!(
        country = %pending.target,
        force = ?report.force,
        losses = ?report.defender_losses(),
        "attack resolved"
    );
    Ok(report)
}
