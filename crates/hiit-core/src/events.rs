use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::timer::RunState;

/// Every state change of the sequencer produces an Event.
/// Hosts render them and play cues; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    IntervalStarted {
        set_index: u32,
        interval_index: usize,
        name: String,
        duration_secs: u64,
        /// Whether this is a rest interval (drives colour and cue choice).
        rest: bool,
    },
    Progress {
        time_remaining_secs: u64,
        total_elapsed_secs: u64,
        /// 0.0 .. 1.0 within the current interval.
        fraction_complete: f64,
    },
    SetAdvanced {
        set_index: u32,
    },
    WorkoutCompleted {
        total_elapsed_secs: u64,
    },
    Paused {
        time_remaining_secs: u64,
    },
    Resumed {
        time_remaining_secs: u64,
    },
    Reset,
    Snapshot {
        state: RunState,
        set_index: u32,
        sets: u32,
        interval_index: usize,
        interval_name: String,
        time_remaining_secs: u64,
        total_elapsed_secs: u64,
        remaining_workout_secs: u64,
    },
}

/// Receives the events a sequencer emits.
///
/// Implementations must not block: the tick driver calls `emit` from its
/// timer task.
pub trait EventSink {
    fn emit(&mut self, event: &Event);

    fn emit_all(&mut self, events: &[Event]) {
        for event in events {
            self.emit(event);
        }
    }
}

/// Collects events in order.
impl EventSink for Vec<Event> {
    fn emit(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

/// Hands events to whichever task owns the receiving end, typically the UI.
///
/// A dropped receiver means nobody is rendering any more; events are discarded.
impl EventSink for UnboundedSender<Event> {
    fn emit(&mut self, event: &Event) {
        if self.send(event.clone()).is_err() {
            tracing::trace!("event receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let json = serde_json::to_value(Event::SetAdvanced { set_index: 1 }).unwrap();
        assert_eq!(json["type"], "set_advanced");
        assert_eq!(json["set_index"], 1);

        let json = serde_json::to_value(Event::Reset).unwrap();
        assert_eq!(json["type"], "reset");
    }

    #[tokio::test]
    async fn channel_sink_forwards_events() {
        let (mut tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        tx.emit_all(&[Event::Reset, Event::SetAdvanced { set_index: 2 }]);
        assert_eq!(rx.recv().await, Some(Event::Reset));
        assert_eq!(rx.recv().await, Some(Event::SetAdvanced { set_index: 2 }));
    }
}
