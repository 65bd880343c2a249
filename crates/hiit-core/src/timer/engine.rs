//! Interval sequencer implementation.
//!
//! The sequencer is a pure in-memory state machine. It has no thread and no
//! clock of its own: the caller delivers ticks (see [`TickDriver`]) and every
//! command returns the events it produced.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            v
//!        Completed          (reset() returns any state to Idle)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut seq = IntervalSequencer::new();
//! seq.configure(WorkoutPlan::quick_tabata())?;
//! seq.start()?;
//! // Once per second:
//! for event in seq.tick(1) { render(&event); }
//! ```
//!
//! [`TickDriver`]: super::TickDriver

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::plan::{Interval, WorkoutPlan};
use crate::error::SequencerError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
            RunState::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Run-time position within a plan.
///
/// Replaced wholesale by each transition; never mutated in place by callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerState {
    pub current_set_index: u32,
    pub current_interval_index: usize,
    pub time_remaining_secs: u64,
    pub total_elapsed_secs: u64,
    pub run_state: RunState,
}

/// Sequences a [`WorkoutPlan`]'s intervals, set after set.
///
/// Only built through [`IntervalSequencer::configure`], so the plan it holds
/// has always passed [`WorkoutPlan::validate`]. It serializes for status
/// output but is never read back.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntervalSequencer {
    plan: Option<WorkoutPlan>,
    state: SequencerState,
}

impl IntervalSequencer {
    /// Create an idle sequencer with no plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an idle sequencer configured with `plan`.
    ///
    /// # Errors
    /// Returns `InvalidPlan` if the plan is malformed.
    pub fn with_plan(plan: WorkoutPlan) -> Result<Self, SequencerError> {
        let mut seq = Self::new();
        seq.configure(plan)?;
        Ok(seq)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn run_state(&self) -> RunState {
        self.state.run_state
    }

    pub fn plan(&self) -> Option<&WorkoutPlan> {
        self.plan.as_ref()
    }

    /// The interval being counted down, if a workout is under way.
    pub fn current_interval(&self) -> Option<&Interval> {
        match self.state.run_state {
            RunState::Running | RunState::Paused => self
                .plan
                .as_ref()?
                .intervals
                .get(self.state.current_interval_index),
            RunState::Idle | RunState::Completed => None,
        }
    }

    /// 0.0 .. 1.0 progress within the current interval.
    pub fn fraction_complete(&self) -> f64 {
        self.current_interval()
            .map(|i| fraction(self.state.time_remaining_secs, i.duration_secs))
            .unwrap_or(0.0)
    }

    /// Seconds left in the whole workout.
    ///
    /// An idle sequencer reports the full plan; a completed one reports 0.
    pub fn remaining_workout_seconds(&self) -> u64 {
        let Some(plan) = self.plan.as_ref() else {
            return 0;
        };
        match self.state.run_state {
            RunState::Idle => plan.total_duration_secs(),
            RunState::Completed => 0,
            RunState::Running | RunState::Paused => {
                let later_sets = u64::from(plan.sets - self.state.current_set_index - 1);
                self.state.time_remaining_secs
                    + plan.duration_after(self.state.current_interval_index)
                    + plan.set_duration_secs() * later_sets
            }
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::Snapshot {
            state: self.state.run_state,
            set_index: self.state.current_set_index,
            sets: self.plan.as_ref().map(|p| p.sets).unwrap_or(0),
            interval_index: self.state.current_interval_index,
            interval_name: self
                .current_interval()
                .map(|i| i.name.clone())
                .unwrap_or_default(),
            time_remaining_secs: self.state.time_remaining_secs,
            total_elapsed_secs: self.state.total_elapsed_secs,
            remaining_workout_secs: self.remaining_workout_seconds(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Install a plan. Only valid while idle.
    ///
    /// # Errors
    /// `InvalidTransition` outside `Idle`, `InvalidPlan` for a malformed plan.
    /// Either way the previous plan and state are kept.
    pub fn configure(&mut self, plan: WorkoutPlan) -> Result<(), SequencerError> {
        self.require("configure", RunState::Idle)?;
        if let Err(e) = plan.validate() {
            warn!(error = %e, "rejected workout plan");
            return Err(e.into());
        }
        debug!(
            sets = plan.sets,
            intervals = plan.intervals.len(),
            "workout plan configured"
        );
        self.plan = Some(plan);
        self.state = SequencerState::default();
        Ok(())
    }

    /// Begin the first interval of the first set.
    ///
    /// # Errors
    /// `InvalidTransition` outside `Idle` or when no plan is configured.
    pub fn start(&mut self) -> Result<Event, SequencerError> {
        self.require("start", RunState::Idle)?;
        let Some(plan) = self.plan.as_ref() else {
            warn!("start requested without a plan");
            return Err(SequencerError::InvalidTransition {
                operation: "start without a plan",
                state: self.state.run_state,
            });
        };
        let first = &plan.intervals[0];
        self.state = SequencerState {
            current_set_index: 0,
            current_interval_index: 0,
            time_remaining_secs: first.duration_secs,
            total_elapsed_secs: 0,
            run_state: RunState::Running,
        };
        debug!(total_secs = plan.total_duration_secs(), "workout started");
        Ok(interval_started(plan, 0, 0))
    }

    /// Advance the countdown by `delta_secs`.
    ///
    /// Ticks outside `Running` are ignored and return no events, including
    /// after completion. A delta longer than the current interval carries over
    /// into the following ones, emitting each transition in order.
    pub fn tick(&mut self, delta_secs: u64) -> Vec<Event> {
        if self.state.run_state != RunState::Running {
            return Vec::new();
        }
        let Some(plan) = self.plan.as_ref() else {
            return Vec::new();
        };
        let (next, events) = advance(plan, self.state, delta_secs);
        if next.run_state == RunState::Completed {
            info!(total_elapsed_secs = next.total_elapsed_secs, "workout completed");
        }
        self.state = next;
        events
    }

    /// # Errors
    /// `InvalidTransition` unless running.
    pub fn pause(&mut self) -> Result<Event, SequencerError> {
        self.require("pause", RunState::Running)?;
        self.state.run_state = RunState::Paused;
        debug!(remaining = self.state.time_remaining_secs, "paused");
        Ok(Event::Paused {
            time_remaining_secs: self.state.time_remaining_secs,
        })
    }

    /// # Errors
    /// `InvalidTransition` unless paused.
    pub fn resume(&mut self) -> Result<Event, SequencerError> {
        self.require("resume", RunState::Paused)?;
        self.state.run_state = RunState::Running;
        debug!(remaining = self.state.time_remaining_secs, "resumed");
        Ok(Event::Resumed {
            time_remaining_secs: self.state.time_remaining_secs,
        })
    }

    /// Return to `Idle` from any state. The plan is kept; `start()` runs it again.
    pub fn reset(&mut self) -> Event {
        debug!(from = %self.state.run_state, "reset");
        self.state = SequencerState::default();
        Event::Reset
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn require(&self, operation: &'static str, expected: RunState) -> Result<(), SequencerError> {
        if self.state.run_state == expected {
            return Ok(());
        }
        warn!(operation, state = %self.state.run_state, "invalid transition");
        Err(SequencerError::InvalidTransition {
            operation,
            state: self.state.run_state,
        })
    }
}

/// Pure tick transition: consume `delta` seconds starting from `state`.
fn advance(plan: &WorkoutPlan, mut state: SequencerState, delta: u64) -> (SequencerState, Vec<Event>) {
    let mut events = Vec::new();
    let mut left = delta;
    loop {
        let consumed = left.min(state.time_remaining_secs);
        state.time_remaining_secs -= consumed;
        state.total_elapsed_secs += consumed;
        left -= consumed;

        let duration = plan.intervals[state.current_interval_index].duration_secs;
        events.push(Event::Progress {
            time_remaining_secs: state.time_remaining_secs,
            total_elapsed_secs: state.total_elapsed_secs,
            fraction_complete: fraction(state.time_remaining_secs, duration),
        });
        if state.time_remaining_secs > 0 {
            break;
        }

        if state.current_interval_index + 1 < plan.intervals.len() {
            state.current_interval_index += 1;
        } else if state.current_set_index + 1 < plan.sets {
            state.current_set_index += 1;
            state.current_interval_index = 0;
            events.push(Event::SetAdvanced {
                set_index: state.current_set_index,
            });
        } else {
            state.run_state = RunState::Completed;
            events.push(Event::WorkoutCompleted {
                total_elapsed_secs: state.total_elapsed_secs,
            });
            break;
        }

        state.time_remaining_secs = plan.intervals[state.current_interval_index].duration_secs;
        events.push(interval_started(
            plan,
            state.current_set_index,
            state.current_interval_index,
        ));
        if left == 0 {
            break;
        }
    }
    (state, events)
}

fn interval_started(plan: &WorkoutPlan, set_index: u32, interval_index: usize) -> Event {
    let interval = &plan.intervals[interval_index];
    Event::IntervalStarted {
        set_index,
        interval_index,
        name: interval.name.clone(),
        duration_secs: interval.duration_secs,
        rest: interval.is_rest(),
    }
}

fn fraction(remaining: u64, duration: u64) -> f64 {
    if duration == 0 {
        return 0.0;
    }
    1.0 - (remaining as f64 / duration as f64)
}
