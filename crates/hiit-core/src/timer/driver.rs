//! Real-time tick producer.
//!
//! The driver owns the only tick stream for a sequencer. It shares the
//! sequencer with the UI through one lock; pause/resume/reset from the UI and
//! ticks from the driver are therefore applied one at a time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use super::engine::{IntervalSequencer, RunState};
use crate::events::EventSink;

/// A sequencer shared between the tick driver and the UI.
pub type SharedSequencer = Arc<Mutex<IntervalSequencer>>;

/// Default period between ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Shortest period the driver will tick at; shorter requests are raised to it.
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

pub fn shared(sequencer: IntervalSequencer) -> SharedSequencer {
    Arc::new(Mutex::new(sequencer))
}

/// Background task delivering one-second ticks to a shared sequencer.
#[derive(Debug)]
pub struct TickDriver {
    handle: JoinHandle<()>,
}

impl TickDriver {
    /// Spawn the tick task on the current tokio runtime.
    ///
    /// The first tick fires one `period` after spawning. The task ends once
    /// the sequencer is completed or has been reset to idle; ticks that land
    /// while paused are absorbed by the sequencer. A `period` below
    /// [`MIN_TICK_PERIOD`] is raised to it.
    pub fn spawn<S>(sequencer: SharedSequencer, period: Duration, mut sink: S) -> Self
    where
        S: EventSink + Send + 'static,
    {
        let period = period.max(MIN_TICK_PERIOD);
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let (events, state) = {
                    let mut seq = sequencer.lock().await;
                    if seq.run_state() == RunState::Idle {
                        debug!("sequencer idle, tick driver stopping");
                        break;
                    }
                    (seq.tick(1), seq.run_state())
                };
                sink.emit_all(&events);
                if state == RunState::Completed {
                    debug!("workout completed, tick driver stopping");
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Wait for the driver to stop on its own.
    pub async fn finished(self) {
        if let Err(e) = self.handle.await {
            if e.is_panic() {
                std::panic::resume_unwind(e.into_panic());
            }
        }
    }

    /// Stop delivering ticks immediately.
    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use crate::timer::{Interval, WorkoutPlan};
    use tokio::sync::mpsc;

    fn plan() -> WorkoutPlan {
        WorkoutPlan::new(2, vec![Interval::new("Work", 3), Interval::new("Rest", 2)])
    }

    async fn started(plan: WorkoutPlan) -> SharedSequencer {
        let seq = shared(IntervalSequencer::with_plan(plan).unwrap());
        seq.lock().await.start().unwrap();
        seq
    }

    #[tokio::test(start_paused = true)]
    async fn drives_workout_to_completion() {
        let seq = started(plan()).await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let driver = TickDriver::spawn(seq.clone(), TICK_PERIOD, tx);
        driver.finished().await;

        let guard = seq.lock().await;
        assert_eq!(guard.run_state(), RunState::Completed);
        assert_eq!(guard.state().total_elapsed_secs, 10);
        drop(guard);

        let mut last = None;
        while let Ok(event) = rx.try_recv() {
            last = Some(event);
        }
        assert_eq!(
            last,
            Some(Event::WorkoutCompleted {
                total_elapsed_secs: 10
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn paused_time_is_not_counted() {
        let seq = started(plan()).await;
        let driver = TickDriver::spawn(seq.clone(), TICK_PERIOD, Vec::<Event>::new());

        tokio::time::sleep(Duration::from_millis(2500)).await;
        seq.lock().await.pause().unwrap();
        let paused_at = seq.lock().await.state();
        assert_eq!(paused_at.total_elapsed_secs, 2);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(seq.lock().await.state(), paused_at);
        assert!(!driver.is_finished());

        seq.lock().await.resume().unwrap();
        driver.finished().await;
        assert_eq!(seq.lock().await.state().total_elapsed_secs, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_stops_the_driver() {
        let seq = started(plan()).await;
        let driver = TickDriver::spawn(seq.clone(), TICK_PERIOD, Vec::<Event>::new());
        tokio::time::sleep(Duration::from_millis(1500)).await;
        seq.lock().await.reset();
        driver.finished().await;

        let guard = seq.lock().await;
        assert_eq!(guard.run_state(), RunState::Idle);
        assert_eq!(guard.state().total_elapsed_secs, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_is_raised_to_minimum() {
        let seq = started(plan()).await;
        let driver = TickDriver::spawn(seq.clone(), Duration::ZERO, Vec::<Event>::new());
        driver.finished().await;

        let guard = seq.lock().await;
        assert_eq!(guard.run_state(), RunState::Completed);
        assert_eq!(guard.state().total_elapsed_secs, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_aborts_ticks() {
        let seq = started(plan()).await;
        let driver = TickDriver::spawn(seq.clone(), TICK_PERIOD, Vec::<Event>::new());
        tokio::time::sleep(Duration::from_millis(1500)).await;
        driver.stop();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(seq.lock().await.state().total_elapsed_secs, 1);
        assert_eq!(seq.lock().await.run_state(), RunState::Running);
    }
}
