//! Completed-workout history.
//!
//! An append-only JSON array at `~/.config/hiit-timer/history.json`.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{data_dir, read_json_or_default, write_json};
use crate::error::StorageError;
use crate::format::format_time;
use crate::timer::{Interval, WorkoutPlan};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub timestamp: DateTime<Utc>,
    pub sets: u32,
    pub intervals: Vec<Interval>,
    pub total_elapsed_seconds: u64,
}

impl WorkoutRecord {
    pub fn new(plan: &WorkoutPlan, total_elapsed_seconds: u64, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            sets: plan.sets,
            intervals: plan.intervals.clone(),
            total_elapsed_seconds,
        }
    }

    /// One-line summary for listings.
    pub fn summary(&self) -> String {
        format!(
            "{} - {} sets, {} intervals, {}",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.sets,
            self.intervals.len(),
            format_time(self.total_elapsed_seconds)
        )
    }
}

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Store at `~/.config/hiit-timer/history.json`.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self::at(data_dir()?.join("history.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records, oldest first. A missing file is an empty history.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is malformed.
    pub fn all(&self) -> Result<Vec<WorkoutRecord>, StorageError> {
        read_json_or_default(&self.path)
    }

    /// Up to `limit` records, newest first.
    ///
    /// # Errors
    /// See [`HistoryStore::all`].
    pub fn recent(&self, limit: usize) -> Result<Vec<WorkoutRecord>, StorageError> {
        Ok(self.all()?.into_iter().rev().take(limit).collect())
    }

    /// # Errors
    /// Returns an error if the existing history cannot be read or the file
    /// cannot be written.
    pub fn append(&self, record: WorkoutRecord) -> Result<(), StorageError> {
        let mut all = self.all()?;
        all.push(record);
        write_json(&self.path, &all)?;
        tracing::info!(entries = all.len(), "workout recorded in history");
        Ok(())
    }

    /// Write a plain-text report of the whole history to `dest`.
    ///
    /// Returns the number of workouts written. An empty history writes
    /// nothing and returns 0.
    ///
    /// # Errors
    /// Returns an error if the history cannot be read or `dest` written.
    pub fn export_text(&self, dest: &Path) -> Result<usize, StorageError> {
        let records = self.all()?;
        if records.is_empty() {
            return Ok(0);
        }
        std::fs::write(dest, render_report(&records)).map_err(|source| StorageError::Io {
            path: dest.to_path_buf(),
            source,
        })?;
        Ok(records.len())
    }
}

fn render_report(records: &[WorkoutRecord]) -> String {
    let rule = "-".repeat(40);
    let mut out = String::from("HIIT Workout History\n");
    let _ = writeln!(out, "{}\n", "=".repeat(40));
    for record in records {
        let _ = writeln!(out, "Date: {}", record.timestamp.format("%Y-%m-%d %H:%M:%S"));
        let _ = writeln!(out, "Sets: {}", record.sets);
        let _ = writeln!(out, "Total Time: {}", format_time(record.total_elapsed_seconds));
        out.push_str("Intervals:\n");
        for interval in &record.intervals {
            let _ = writeln!(out, "  - {}: {}s", interval.name, interval.duration_secs);
        }
        let _ = writeln!(out, "\n{rule}\n");
    }
    out
}
