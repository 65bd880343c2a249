//! # HIIT Core Library
//!
//! This library provides the core logic of the HIIT interval timer. The CLI
//! binary is a thin host over the same library: it supplies the tick source,
//! renders events, plays cues and persists completed workouts.
//!
//! ## Architecture
//!
//! - **Interval Sequencer**: A pure state machine walking a workout plan's
//!   intervals set after set. The caller delivers ticks.
//! - **Tick Driver**: A tokio task ticking a shared sequencer once per second
//! - **Storage**: TOML-based settings, JSON workout templates and history
//!
//! ## Key Components
//!
//! - [`IntervalSequencer`]: Core sequencing state machine
//! - [`TickDriver`]: Real-time tick producer
//! - [`EventSink`]: Receiver of sequencer events
//! - [`WorkoutStore`] / [`HistoryStore`]: Template and history persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod format;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, PlanError, SequencerError, StorageError};
pub use events::{Event, EventSink};
pub use storage::{Config, HistoryStore, SavedWorkout, WorkoutRecord, WorkoutStore};
pub use timer::{
    Interval, IntervalSequencer, RunState, SequencerState, SharedSequencer, TickDriver,
    WorkoutPlan,
};
