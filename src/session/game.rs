//! GameSession - one running game
//!
//! Owns the store, the event bus and every background task. Player actions
//! go through here so a store mutation and its status transition always
//! travel together.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, Instrument};

use crate::combat::{AttackReport, CombatResolver};
use crate::core::calendar::WorldCalendar;
use crate::core::config::GameConfig;
use crate::core::error::{ActionOutcome, GameError, Rejection, Result};
use crate::core::types::{CountryId, Faction, SessionId};
use crate::events::{EventBus, EventFeed, EventReceiver, FeedEntry, WorldEvent};
use crate::simulation::{DayScheduler, RunGate, WorldEventGenerator};
use crate::state::{Country, Player, WorldState, WorldStore};
use crate::status::{StatusListener, StatusMachine, Trigger};

/// Background tasks of a started session
#[derive(Debug)]
enum Lifecycle {
    Idle,
    Running {
        gate: RunGate,
        scheduler: JoinHandle<()>,
        generator: JoinHandle<()>,
    },
    Stopped,
}

#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    config: GameConfig,
    store: Arc<WorldStore>,
    bus: Arc<EventBus>,
    calendar: Arc<WorldCalendar>,
    status: Arc<StatusMachine>,
    combat: CombatResolver,
    feed: Arc<Mutex<EventFeed>>,
    selection: Mutex<Option<CountryId>>,
    lifecycle: Mutex<Lifecycle>,
    // status listener and feed writer; live as long as the session
    consumers: Mutex<Vec<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl GameSession {
    /// Build a session from a validated config. Nothing runs until `start`.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(WorldStore::new(
            Player::from_config(&config.player),
            config.economy.clone(),
        ));
        let bus = Arc::new(EventBus::new());
        let calendar = Arc::new(WorldCalendar::new(config.clock.start_day));
        let status = Arc::new(StatusMachine::new(
            Arc::clone(&store),
            config.status.clone(),
        ));
        let combat = CombatResolver::new(
            Arc::clone(&store),
            Arc::clone(&bus),
            Arc::clone(&status),
            config.combat.clone(),
        );
        let feed = Arc::new(Mutex::new(EventFeed::new(config.events.feed_capacity)));

        Ok(Self {
            id: SessionId::new(),
            config,
            store,
            bus,
            calendar,
            status,
            combat,
            feed,
            selection: Mutex::new(None),
            lifecycle: Mutex::new(Lifecycle::Idle),
            consumers: Mutex::new(Vec::new()),
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed_countries(&self, countries: impl IntoIterator<Item = Country>) {
        self.store.seed_countries(countries);
        info!(session = %self.id, countries = self.store.country_count(), "countries seeded");
    }

    // === LIFECYCLE ===

    /// Start the day scheduler, the event generator and the bus consumers.
    ///
    /// A session starts at most once; calling again, even after `stop`,
    /// fails with `AlreadyStarted`.
    pub fn start(&self) -> Result<()> {
        let mut lifecycle = lock(&self.lifecycle);
        if !matches!(*lifecycle, Lifecycle::Idle) {
            return Err(GameError::AlreadyStarted);
        }
        tokio::runtime::Handle::try_current().map_err(|_| GameError::NoRuntime)?;

        let span = info_span!("session", id = %self.id);
        self.calendar.reset();

        let mut consumers = lock(&self.consumers);
        consumers.push(
            self.status
                .spawn_event_listener(self.bus.subscribe(), span.clone()),
        );
        consumers.push(spawn_feed_writer(
            self.bus.subscribe(),
            Arc::clone(&self.feed),
            span.clone(),
        ));

        let gate = RunGate::new();
        let scheduler = Arc::new(DayScheduler::new(
            Arc::clone(&self.store),
            Arc::clone(&self.calendar),
            self.config.clock.day_duration,
        ))
        .spawn(gate.clone(), span.clone());
        let generator = WorldEventGenerator::new(
            Arc::clone(&self.store),
            Arc::clone(&self.bus),
            self.config.generator.clone(),
        )
        .spawn(gate.clone(), span);

        *lifecycle = Lifecycle::Running {
            gate,
            scheduler,
            generator,
        };
        info!(session = %self.id, day = self.calendar.current_day(), "game started");
        Ok(())
    }

    /// Stop producing days and world events. Safe to call at any time and
    /// any number of times. Once it returns no tick or firing is running or
    /// will run. Pending status reverts and settling attacks still land.
    pub fn stop(&self) {
        let mut lifecycle = lock(&self.lifecycle);
        match std::mem::replace(&mut *lifecycle, Lifecycle::Stopped) {
            Lifecycle::Running {
                gate,
                scheduler,
                generator,
            } => {
                gate.close();
                scheduler.abort();
                generator.abort();
                info!(session = %self.id, day = self.calendar.current_day(), "game stopped");
            }
            Lifecycle::Idle => {
                // never started: stay startable
                *lifecycle = Lifecycle::Idle;
                debug!(session = %self.id, "stop without start");
            }
            Lifecycle::Stopped => {}
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(*lock(&self.lifecycle), Lifecycle::Running { .. })
    }

    // === PLAYER ACTIONS ===

    /// Choose (or re-choose) the player's faction
    pub fn choose_faction(&self, faction: Faction) -> Option<Faction> {
        let previous = self.store.set_faction(faction);
        info!(session = %self.id, ?faction, ?previous, "faction chosen");
        previous
    }

    /// Select a country as the target for `attack_selected`. Unknown
    /// countries are refused and leave the selection unchanged.
    pub fn select_country(&self, id: impl Into<CountryId>) -> bool {
        let id = id.into();
        if self.store.country(id.as_str()).is_none() {
            return false;
        }
        *lock(&self.selection) = Some(id);
        true
    }

    pub fn clear_selection(&self) {
        *lock(&self.selection) = None;
    }

    pub fn selected_country(&self) -> Option<CountryId> {
        lock(&self.selection).clone()
    }

    pub fn occupy(&self, id: &CountryId) -> ActionOutcome {
        self.act(id, Trigger::Occupied, |store| store.occupy(id.as_str()))
    }

    pub fn tax(&self, id: &CountryId) -> ActionOutcome {
        self.act(id, Trigger::Taxed, |store| store.tax(id.as_str()))
    }

    pub fn propaganda(&self, id: &CountryId) -> ActionOutcome {
        self.act(id, Trigger::Propaganda, |store| {
            store.propaganda(id.as_str())
        })
    }

    fn act(
        &self,
        id: &CountryId,
        trigger: Trigger,
        f: impl FnOnce(&WorldStore) -> ActionOutcome,
    ) -> ActionOutcome {
        let outcome = f(&self.store);
        if outcome.is_applied() {
            self.status.apply(id, trigger);
        }
        info!(session = %self.id, country = %id, ?trigger, %outcome, "player action");
        outcome
    }

    /// Attack the selected country and wait for the attack to settle
    pub async fn attack_selected(&self) -> std::result::Result<AttackReport, Rejection> {
        let target = self.selected_country();
        self.combat.attack(target.as_ref()).await
    }

    pub fn is_attacking(&self, id: &CountryId) -> bool {
        self.combat.is_attacking(id)
    }

    // === EVENTS ===

    /// Publish an event as if the world produced it
    pub fn push_event(&self, event: WorldEvent) -> usize {
        self.bus.publish(event)
    }

    pub fn subscribe_events(&self) -> EventReceiver {
        self.bus.subscribe()
    }

    pub fn add_status_listener(&self, listener: Arc<dyn StatusListener>) {
        self.status.add_listener(listener);
    }

    /// Recent events, newest first
    pub fn recent_events(&self) -> Vec<FeedEntry> {
        lock(&self.feed).entries().cloned().collect()
    }

    // === READS ===

    pub fn snapshot(&self) -> WorldState {
        self.store.snapshot()
    }

    pub fn player(&self) -> Player {
        self.store.player()
    }

    pub fn country(&self, id: &str) -> Option<Country> {
        self.store.country(id)
    }

    pub fn countries(&self) -> Vec<Country> {
        self.store.countries()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<WorldState> {
        self.store.subscribe()
    }

    pub fn current_day(&self) -> u64 {
        self.calendar.current_day()
    }

    pub fn subscribe_day(&self) -> watch::Receiver<u64> {
        self.calendar.subscribe()
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.stop();
        for task in lock(&self.consumers).drain(..) {
            task.abort();
        }
    }
}

fn spawn_feed_writer(
    mut events: EventReceiver,
    feed: Arc<Mutex<EventFeed>>,
    span: tracing::Span,
) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            while let Some(event) = events.recv().await {
                lock(&feed).push(event);
            }
        }
        .instrument(span),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CountryStatus, Owner};
    use std::time::Duration;

    fn session() -> GameSession {
        let session = GameSession::new(GameConfig::default()).unwrap();
        session.seed_countries([
            Country::new("C1", "C1").with_income(200),
            Country::new("C2", "C2").with_owner(Owner::Player).with_income(300),
        ]);
        session
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice_fails() {
        let s = session();
        s.start().unwrap();
        assert!(matches!(s.start(), Err(GameError::AlreadyStarted)));

        s.stop();
        assert!(matches!(s.start(), Err(GameError::AlreadyStarted)));
    }

    #[test]
    fn test_stop_without_start_is_safe() {
        let s = session();
        s.stop();
        s.stop();
        assert!(!s.is_running());
    }

    #[test]
    fn test_start_needs_runtime() {
        let s = session();
        assert!(matches!(s.start(), Err(GameError::NoRuntime)));
        assert!(!s.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_days_pass_until_stopped() {
        let s = session();
        let money = s.player().money();
        s.start().unwrap();

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(s.current_day(), 3);
        assert_eq!(s.player().money(), money + 600);

        s.stop();
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(s.current_day(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_action_leaves_status_alone() {
        let s = session();
        let c2: CountryId = "C2".into();

        assert_eq!(
            s.occupy(&c2),
            ActionOutcome::Rejected(Rejection::AlreadyOwned)
        );
        assert_eq!(s.country("C2").unwrap().status, CountryStatus::Idle);

        let c1: CountryId = "C1".into();
        assert!(s.occupy(&c1).is_applied());
        assert_eq!(s.country("C1").unwrap().status, CountryStatus::UnderAttack);

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(s.country("C1").unwrap().status, CountryStatus::Recovering);
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection() {
        let s = session();
        assert!(!s.select_country("Nowhere"));
        assert_eq!(s.selected_country(), None);
        assert_eq!(s.attack_selected().await, Err(Rejection::NoSelection));

        assert!(s.select_country("C1"));
        assert_eq!(s.attack_selected().await, Err(Rejection::PlayerNotReady));

        s.choose_faction(Faction::Alliance);
        assert!(s.attack_selected().await.is_ok());

        s.clear_selection();
        assert_eq!(s.selected_country(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pushed_events_reach_feed_and_status() {
        let s = session();
        s.start().unwrap();

        s.push_event(WorldEvent::Rebel {
            country: "C1".into(),
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(s.country("C1").unwrap().status, CountryStatus::Rebelling);
        let feed = s.recent_events();
        assert_eq!(
            feed.first().map(|e| e.event.clone()),
            Some(WorldEvent::Rebel {
                country: "C1".into()
            })
        );
        s.stop();
    }
}
