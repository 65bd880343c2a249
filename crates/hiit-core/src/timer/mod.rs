mod driver;
mod engine;
mod plan;

pub use driver::{shared, SharedSequencer, TickDriver, MIN_TICK_PERIOD, TICK_PERIOD};
pub use engine::{IntervalSequencer, RunState, SequencerState};
pub use plan::{Interval, WorkoutPlan};
