use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::format::format_time;

/// One named, timed phase of a set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub name: String,
    /// Duration in seconds.
    #[serde(rename = "duration")]
    pub duration_secs: u64,
}

impl Interval {
    pub fn new(name: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            name: name.into(),
            duration_secs,
        }
    }

    /// Rest intervals are those whose name mentions "rest", in any case.
    pub fn is_rest(&self) -> bool {
        self.name.to_lowercase().contains("rest")
    }
}

/// A workout template: an ordered list of intervals repeated `sets` times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub sets: u32,
    pub intervals: Vec<Interval>,
}

impl WorkoutPlan {
    pub fn new(sets: u32, intervals: Vec<Interval>) -> Self {
        Self { sets, intervals }
    }

    /// Eight rounds of 20s work / 10s rest.
    pub fn quick_tabata() -> Self {
        Self {
            sets: 8,
            intervals: vec![Interval::new("Work", 20), Interval::new("Rest", 10)],
        }
    }

    /// Check the plan can be run by the sequencer.
    ///
    /// # Errors
    /// Returns the first problem found, in interval order.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.intervals.is_empty() {
            return Err(PlanError::NoIntervals);
        }
        if self.sets < 1 {
            return Err(PlanError::NoSets);
        }
        for (index, interval) in self.intervals.iter().enumerate() {
            if interval.name.trim().is_empty() {
                return Err(PlanError::EmptyName { index });
            }
            if interval.duration_secs == 0 {
                return Err(PlanError::ZeroDuration {
                    index,
                    name: interval.name.clone(),
                });
            }
        }
        self.intervals
            .iter()
            .try_fold(0u64, |acc, i| acc.checked_add(i.duration_secs))
            .and_then(|set| set.checked_mul(u64::from(self.sets)))
            .ok_or(PlanError::TooLong)?;
        Ok(())
    }

    /// Seconds in one pass through the intervals.
    pub fn set_duration_secs(&self) -> u64 {
        self.intervals
            .iter()
            .fold(0, |acc, i| acc.saturating_add(i.duration_secs))
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.set_duration_secs().saturating_mul(u64::from(self.sets))
    }

    /// Seconds of the intervals after `interval_index` within one set.
    pub fn duration_after(&self, interval_index: usize) -> u64 {
        self.intervals
            .iter()
            .skip(interval_index + 1)
            .fold(0, |acc, i| acc.saturating_add(i.duration_secs))
    }

    /// Human-readable summary shown before starting a workout.
    pub fn preview(&self) -> String {
        let mut out = String::from("Workout Preview:\n\n");
        out.push_str(&format!("Sets: {}\n", self.sets));
        out.push_str(&format!(
            "Total Time: {}\n\n",
            format_time(self.total_duration_secs())
        ));
        out.push_str("Intervals per set:\n");
        for (i, interval) in self.intervals.iter().enumerate() {
            out.push_str(&format!(
                "{}. {} - {}s\n",
                i + 1,
                interval.name,
                interval.duration_secs
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabata_totals_four_minutes() {
        let plan = WorkoutPlan::quick_tabata();
        assert!(plan.validate().is_ok());
        assert_eq!(plan.set_duration_secs(), 30);
        assert_eq!(plan.total_duration_secs(), 240);
    }

    #[test]
    fn validate_rejects_empty_plan() {
        let plan = WorkoutPlan::new(1, vec![]);
        assert_eq!(plan.validate(), Err(PlanError::NoIntervals));
    }

    #[test]
    fn validate_rejects_zero_sets() {
        let plan = WorkoutPlan::new(0, vec![Interval::new("Work", 10)]);
        assert_eq!(plan.validate(), Err(PlanError::NoSets));
    }

    #[test]
    fn validate_names_offending_interval() {
        let plan = WorkoutPlan::new(
            2,
            vec![
                Interval::new("Work", 10),
                Interval::new("  ", 5),
                Interval::new("Rest", 0),
            ],
        );
        assert_eq!(plan.validate(), Err(PlanError::EmptyName { index: 1 }));

        let plan = WorkoutPlan::new(2, vec![Interval::new("Work", 10), Interval::new("Rest", 0)]);
        assert_eq!(
            plan.validate(),
            Err(PlanError::ZeroDuration {
                index: 1,
                name: "Rest".into()
            })
        );
    }

    #[test]
    fn validate_rejects_totals_past_u64() {
        let plan = WorkoutPlan::new(1, vec![Interval::new("A", u64::MAX), Interval::new("B", 1)]);
        assert_eq!(plan.validate(), Err(PlanError::TooLong));
        assert_eq!(plan.set_duration_secs(), u64::MAX);
        assert_eq!(plan.total_duration_secs(), u64::MAX);

        let plan = WorkoutPlan::new(3, vec![Interval::new("A", u64::MAX / 2)]);
        assert_eq!(plan.validate(), Err(PlanError::TooLong));

        let plan = WorkoutPlan::new(1, vec![Interval::new("A", u64::MAX)]);
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn rest_detection_ignores_case() {
        assert!(Interval::new("Active REST", 10).is_rest());
        assert!(!Interval::new("Burpees", 10).is_rest());
    }

    #[test]
    fn duration_after_skips_current() {
        let plan = WorkoutPlan::new(
            1,
            vec![
                Interval::new("A", 5),
                Interval::new("B", 7),
                Interval::new("C", 11),
            ],
        );
        assert_eq!(plan.duration_after(0), 18);
        assert_eq!(plan.duration_after(2), 0);
    }

    #[test]
    fn serializes_duration_field_name() {
        let json = serde_json::to_value(Interval::new("Work", 20)).unwrap();
        assert_eq!(json["name"], "Work");
        assert_eq!(json["duration"], 20);
    }

    #[test]
    fn preview_lists_intervals() {
        let preview = WorkoutPlan::quick_tabata().preview();
        assert!(preview.contains("Sets: 8"));
        assert!(preview.contains("Total Time: 04:00"));
        assert!(preview.contains("1. Work - 20s"));
        assert!(preview.contains("2. Rest - 10s"));
    }
}
