//! Saved workout templates, keyed by name.
//!
//! Stored as a JSON object at `~/.config/hiit-timer/workouts.json`:
//!
//! ```json
//! { "Tabata": { "name": "Tabata", "sets": 8,
//!               "intervals": [{ "name": "Work", "duration": 20 }, ...],
//!               "created": "2026-01-01T10:00:00Z" } }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{data_dir, read_json_or_default, write_json};
use crate::error::StorageError;
use crate::timer::{Interval, WorkoutPlan};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedWorkout {
    pub name: String,
    pub sets: u32,
    pub intervals: Vec<Interval>,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
}

impl SavedWorkout {
    pub fn plan(&self) -> WorkoutPlan {
        WorkoutPlan::new(self.sets, self.intervals.clone())
    }
}

/// File-backed map of workout name to template.
#[derive(Debug, Clone)]
pub struct WorkoutStore {
    path: PathBuf,
}

impl WorkoutStore {
    /// Store at `~/.config/hiit-timer/workouts.json`.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self::at(data_dir()?.join("workouts.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All saved workouts, ordered by name. A missing file is an empty store.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is malformed.
    pub fn list(&self) -> Result<Vec<SavedWorkout>, StorageError> {
        Ok(self.read()?.into_values().collect())
    }

    /// # Errors
    /// `NotFound` if no workout has this name.
    pub fn load(&self, name: &str) -> Result<SavedWorkout, StorageError> {
        self.read()?
            .remove(name)
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }

    /// Save `plan` under `name`, replacing any workout of the same name.
    ///
    /// # Errors
    /// Rejects blank names and plans the sequencer would refuse.
    pub fn save(&self, name: &str, plan: &WorkoutPlan) -> Result<SavedWorkout, StorageError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::EmptyName);
        }
        plan.validate()?;

        let mut all = self.read()?;
        let workout = SavedWorkout {
            name: name.to_string(),
            sets: plan.sets,
            intervals: plan.intervals.clone(),
            created: Utc::now(),
        };
        all.insert(workout.name.clone(), workout.clone());
        write_json(&self.path, &all)?;
        tracing::info!(name, "workout saved");
        Ok(workout)
    }

    /// Remove a saved workout.
    ///
    /// # Errors
    /// `NotFound` if no workout has this name.
    pub fn delete(&self, name: &str) -> Result<(), StorageError> {
        let mut all = self.read()?;
        if all.remove(name).is_none() {
            return Err(StorageError::NotFound(name.to_string()));
        }
        write_json(&self.path, &all)?;
        tracing::info!(name, "workout deleted");
        Ok(())
    }

    fn read(&self) -> Result<BTreeMap<String, SavedWorkout>, StorageError> {
        read_json_or_default(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> WorkoutStore {
        WorkoutStore::at(dir.path().join("workouts.json"))
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).list().unwrap().is_empty());
        assert!(matches!(
            store(&dir).load("Tabata"),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save("Tabata", &WorkoutPlan::quick_tabata()).unwrap();

        let loaded = store.load("Tabata").unwrap();
        assert_eq!(loaded.plan(), WorkoutPlan::quick_tabata());
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn save_overwrites_same_name() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save("Mine", &WorkoutPlan::quick_tabata()).unwrap();
        let short = WorkoutPlan::new(1, vec![Interval::new("Sprint", 30)]);
        store.save("Mine", &short).unwrap();
        assert_eq!(store.load("Mine").unwrap().plan(), short);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn save_rejects_invalid_input() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(matches!(
            store.save("  ", &WorkoutPlan::quick_tabata()),
            Err(StorageError::EmptyName)
        ));
        assert!(matches!(
            store.save("Empty", &WorkoutPlan::new(1, vec![])),
            Err(StorageError::InvalidPlan(PlanError::NoIntervals))
        ));
        assert!(!store.path().exists());
    }

    #[test]
    fn delete_removes_entry() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save("A", &WorkoutPlan::quick_tabata()).unwrap();
        store.delete("A").unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(matches!(store.delete("A"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn reads_documented_field_names() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        std::fs::write(
            store.path(),
            r#"{"Legs": {"name": "Legs", "sets": 3,
                "intervals": [{"name": "Squat", "duration": 40}, {"name": "Rest", "duration": 20}]}}"#,
        )
        .unwrap();
        let legs = store.load("Legs").unwrap();
        assert_eq!(legs.sets, 3);
        assert_eq!(legs.intervals[0], Interval::new("Squat", 40));
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        std::fs::write(store.path(), "[1, 2").unwrap();
        assert!(matches!(store.list(), Err(StorageError::Malformed { .. })));
    }
}
