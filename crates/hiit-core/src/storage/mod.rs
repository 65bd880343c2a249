mod config;
pub mod history;
pub mod workouts;

pub use config::{Config, CuesConfig, TimerConfig, UiConfig};
pub use history::{HistoryStore, WorkoutRecord};
pub use workouts::{SavedWorkout, WorkoutStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns the directory holding settings, templates and history.
///
/// `HIIT_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/hiit-timer[-dev]/`, with `HIIT_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("HIIT_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("HIIT_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("hiit-timer-dev")
            } else {
                base_dir.join("hiit-timer")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Read a JSON store, treating a missing file as `T::default()`.
fn read_json_or_default<T>(path: &std::path::Path) -> Result<T, StorageError>
where
    T: serde::de::DeserializeOwned + Default,
{
    match std::fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(T::default()),
        Ok(content) => serde_json::from_str(&content).map_err(|source| StorageError::Malformed {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "store missing, starting empty");
            Ok(T::default())
        }
        Err(source) => Err(StorageError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_json<T: serde::Serialize>(path: &std::path::Path, value: &T) -> Result<(), StorageError> {
    let content = serde_json::to_string_pretty(value).map_err(|source| StorageError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, content).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })
}
