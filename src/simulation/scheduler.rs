//! Day scheduler
//!
//! One game day passes every `day_duration` of real time. Each day advances
//! the calendar and collects income from the player's countries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, Instrument};

use crate::core::calendar::WorldCalendar;
use crate::simulation::gate::RunGate;
use crate::state::WorldStore;

/// What one day tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayTick {
    pub day: u64,
    pub income: u64,
}

#[derive(Debug)]
pub struct DayScheduler {
    store: Arc<WorldStore>,
    calendar: Arc<WorldCalendar>,
    day_duration: Duration,
}

impl DayScheduler {
    pub fn new(
        store: Arc<WorldStore>,
        calendar: Arc<WorldCalendar>,
        day_duration: Duration,
    ) -> Self {
        Self {
            store,
            calendar,
            day_duration,
        }
    }

    /// Advance one day and collect income
    pub fn tick(&self) -> DayTick {
        let day = self.calendar.advance();
        let income = self.store.collect_daily_income();
        info!(day, income, "new day");
        DayTick { day, income }
    }

    /// Tick every `day_duration`, first tick one period from now, until
    /// `gate` closes.
    ///
    /// A tick has no await point, so aborting the task never leaves a day
    /// half-applied.
    pub fn spawn(self: Arc<Self>, gate: RunGate, span: tracing::Span) -> JoinHandle<()> {
        tokio::spawn(
            async move {
                let period = self.day_duration;
                let mut interval = interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    interval.tick().await;
                    if gate.run(|| self.tick()).is_none() {
                        break;
                    }
                }
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Owner;
    use crate::state::Country;

    fn scheduler() -> Arc<DayScheduler> {
        let store = Arc::new(WorldStore::default());
        store.seed_countries([
            Country::new("Mine", "Mine").with_owner(Owner::Player).with_income(300),
            Country::new("Theirs", "Theirs").with_owner(Owner::Other).with_income(900),
        ]);
        Arc::new(DayScheduler::new(
            store,
            Arc::new(WorldCalendar::new(1)),
            Duration::from_secs(30),
        ))
    }

    #[test]
    fn test_tick_advances_day_and_collects() {
        let s = scheduler();
        let money = s.store.player().money();

        assert_eq!(
            s.tick(),
            DayTick {
                day: 2,
                income: 300
            }
        );
        assert_eq!(s.calendar.current_day(), 2);
        assert_eq!(s.store.player().money(), money + 300);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_scheduler_ticks_each_period() {
        let s = scheduler();
        let money = s.store.player().money();
        let task = Arc::clone(&s).spawn(RunGate::new(), tracing::Span::none());

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(s.calendar.current_day(), 1);

        tokio::time::sleep(Duration::from_secs(62)).await;
        assert_eq!(s.calendar.current_day(), 4);
        assert_eq!(s.store.player().money(), money + 900);

        task.abort();
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(s.calendar.current_day(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_gate_ends_the_loop() {
        let s = scheduler();
        let gate = RunGate::new();
        let task = Arc::clone(&s).spawn(gate.clone(), tracing::Span::none());

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(s.calendar.current_day(), 2);

        gate.close();
        tokio::time::sleep(Duration::from_secs(90)).await;
        assert_eq!(s.calendar.current_day(), 2);
        assert!(task.is_finished());
    }
}
