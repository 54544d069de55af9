//! Country status state machine
//!
//! Triggers move a country into a status immediately and may schedule a
//! one-shot revert. Every transition bumps the country's status generation;
//! a revert only lands if the generation it was scheduled under is still
//! current, so a stale timer can never clobber a newer status.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn, Instrument};

use crate::core::config::StatusConfig;
use crate::core::types::{CountryId, CountryStatus};
use crate::events::{EventReceiver, WorldEvent};
use crate::state::WorldStore;

/// Receives every status change, e.g. so a map layer can recolor a country
pub trait StatusListener: Send + Sync {
    fn status_changed(&self, country: &CountryId, status: CountryStatus);
}

impl<F> StatusListener for F
where
    F: Fn(&CountryId, CountryStatus) + Send + Sync,
{
    fn status_changed(&self, country: &CountryId, status: CountryStatus) {
        (self)(country, status)
    }
}

/// What caused a status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Occupied,
    Taxed,
    Propaganda,
    AiAttack,
    PlayerDirectAttack,
    Recovered,
}

/// Immediate status plus an optional delayed follow-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub enter: CountryStatus,
    pub revert: Option<(CountryStatus, Duration)>,
}

impl Trigger {
    pub fn from_event(event: &WorldEvent) -> Self {
        match event {
            WorldEvent::Attack { .. } => Trigger::AiAttack,
            WorldEvent::PlayerDirectAttack { .. } => Trigger::PlayerDirectAttack,
            WorldEvent::Rebel { .. } => Trigger::Taxed,
            WorldEvent::Propaganda { .. } => Trigger::Propaganda,
            WorldEvent::Recover { .. } => Trigger::Recovered,
        }
    }

    pub fn transition(self, config: &StatusConfig) -> Transition {
        use CountryStatus::*;

        let (enter, revert) = match self {
            // Recovering is sticky: nothing reverts it
            Trigger::Occupied => (UnderAttack, Some((Recovering, config.occupy_revert))),
            Trigger::Taxed => (Rebelling, Some((Idle, config.tax_revert))),
            Trigger::Propaganda => (Propaganda, Some((Idle, config.propaganda_revert))),
            Trigger::AiAttack => (UnderAttack, Some((Idle, config.ai_attack_revert))),
            Trigger::PlayerDirectAttack => (UnderAttack, Some((Idle, config.player_attack_revert))),
            Trigger::Recovered => (Recovering, None),
        };
        Transition { enter, revert }
    }
}

pub struct StatusMachine {
    store: Arc<WorldStore>,
    config: StatusConfig,
    listeners: RwLock<Vec<Arc<dyn StatusListener>>>,
}

impl std::fmt::Debug for StatusMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusMachine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl StatusMachine {
    pub fn new(store: Arc<WorldStore>, config: StatusConfig) -> Self {
        Self {
            store,
            config,
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn add_listener(&self, listener: Arc<dyn StatusListener>) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    fn notify(&self, country: &CountryId, status: CountryStatus) {
        let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener.status_changed(country, status);
        }
    }

    /// Enter `status` now with no follow-up; supersedes any pending revert
    pub fn set(&self, country: &CountryId, status: CountryStatus) -> Option<u64> {
        let generation = self.store.set_status(country.as_str(), status)?;
        debug!(%country, %status, generation, "status set");
        self.notify(country, status);
        Some(generation)
    }

    /// Apply `trigger` to `country`, scheduling its revert.
    ///
    /// Returns the generation of the new status, or `None` for an unknown
    /// country. Reverts are spawned on the current tokio runtime.
    pub fn apply(self: &Arc<Self>, country: &CountryId, trigger: Trigger) -> Option<u64> {
        let transition = trigger.transition(&self.config);
        let generation = self.set(country, transition.enter)?;

        if let Some((target, delay)) = transition.revert {
            self.schedule_revert(country.clone(), target, delay, generation);
        }
        Some(generation)
    }

    fn schedule_revert(
        self: &Arc<Self>,
        country: CountryId,
        target: CountryStatus,
        delay: Duration,
        generation: u64,
    ) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(%country, status = %target, "no runtime to schedule status revert on");
            return;
        };

        let machine = Arc::clone(self);
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            machine.revert(&country, target, generation);
        });
    }

    fn revert(&self, country: &CountryId, target: CountryStatus, generation: u64) -> bool {
        let applied = self.store.revert_status(country.as_str(), target, generation);
        if applied {
            debug!(%country, status = %target, "status reverted");
            self.notify(country, target);
        }
        applied
    }

    /// Drive the machine from the event bus until the bus subscription ends
    /// or the task is aborted.
    pub fn spawn_event_listener(
        self: &Arc<Self>,
        mut events: EventReceiver,
        span: tracing::Span,
    ) -> JoinHandle<()> {
        let machine = Arc::clone(self);
        tokio::spawn(
            async move {
                while let Some(event) = events.recv().await {
                    let trigger = Trigger::from_event(&event);
                    if machine.apply(event.target(), trigger).is_none() {
                        debug!(
                            kind = event.kind(),
                            country = %event.target(),
                            "event for unknown country"
                        );
                    }
                }
            }
            .instrument(span),
        )
    }
}
