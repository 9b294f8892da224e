//! Configuration for the pool store

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Longest accepted submission grace period, one year
pub const MAX_LOCK_GRACE_SECS: i64 = 366 * 24 * 60 * 60;

/// Where pool data lives on disk and how submissions are locked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base directory for pool files
    pub data_dir: PathBuf,

    /// Prediction records file, relative to `data_dir`
    pub predictions_file: String,

    /// Directory of per-round result documents, relative to `data_dir`
    pub results_dir: String,

    /// Season race table document, relative to `data_dir`
    pub schedule_file: String,

    /// Seconds after an event's start during which predictions are still accepted
    pub lock_grace_secs: i64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            predictions_file: "predictions.json".to_string(),
            results_dir: "results".to_string(),
            schedule_file: "schedule.json".to_string(),
            lock_grace_secs: 0,
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with custom data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into(), ..Default::default() }
    }

    pub fn predictions_path(&self) -> PathBuf {
        self.data_dir.join(&self.predictions_file)
    }

    pub fn results_path(&self) -> PathBuf {
        self.data_dir.join(&self.results_dir)
    }

    pub fn schedule_path(&self) -> PathBuf {
        self.data_dir.join(&self.schedule_file)
    }

    /// Grace period after an event's start, clamped to `0..=MAX_LOCK_GRACE_SECS`
    pub fn lock_grace(&self) -> chrono::Duration {
        let secs = self.lock_grace_secs.clamp(0, MAX_LOCK_GRACE_SECS);
        chrono::Duration::try_seconds(secs).unwrap_or_else(chrono::Duration::zero)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.predictions_file.trim().is_empty() {
            return Err("predictions_file must not be empty".to_string());
        }

        if self.results_dir.trim().is_empty() {
            return Err("results_dir must not be empty".to_string());
        }

        if self.schedule_file.trim().is_empty() {
            return Err("schedule_file must not be empty".to_string());
        }

        if self.lock_grace_secs < 0 {
            return Err("lock_grace_secs must not be negative".to_string());
        }

        if self.lock_grace_secs > MAX_LOCK_GRACE_SECS {
            return Err(format!("lock_grace_secs must be at most {MAX_LOCK_GRACE_SECS}"));
        }

        Ok(())
    }
}
