//! Prediction storage
//!
//! Predictions are kept as one JSON document. At most one record per
//! `(participant_id, event_id)` is held; an upsert replaces the earlier record.

use chrono::{DateTime, Utc};
use pool_engine::Prediction;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::Result;

/// What an upsert did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

/// Storage backend for predictions
#[async_trait::async_trait]
pub trait PredictionStore: Send + Sync {
    /// Every stored prediction, in insertion order
    async fn load_all(&self) -> Result<Vec<Prediction>>;

    /// Insert a prediction or replace the participant's record for that event
    async fn upsert(&self, prediction: Prediction) -> Result<UpsertOutcome>;

    /// Stored predictions for one event
    async fn for_event(&self, event_id: &str) -> Result<Vec<Prediction>> {
        Ok(self
            .load_all()
            .await?
            .into_iter()
            .filter(|prediction| prediction.event_id == event_id)
            .collect())
    }
}

/// On-disk layout of the predictions file
#[derive(Debug, Default, Serialize, Deserialize)]
struct PredictionsFile {
    last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    predictions: Vec<Prediction>,
}

fn upsert_into(predictions: &mut Vec<Prediction>, prediction: Prediction) -> UpsertOutcome {
    let existing = predictions.iter_mut().find(|stored| {
        stored.participant_id == prediction.participant_id && stored.event_id == prediction.event_id
    });

    match existing {
        Some(stored) => {
            *stored = prediction;
            UpsertOutcome::Replaced
        }
        None => {
            predictions.push(prediction);
            UpsertOutcome::Inserted
        }
    }
}

/// JSON file backend
///
/// Writes go to a sibling temp file which is then renamed over the target, so a
/// crash mid-write leaves the previous document intact.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<PredictionsFile> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No predictions file at {:?}, starting empty", self.path);
                Ok(PredictionsFile::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, file: &PredictionsFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(file)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl PredictionStore for JsonFileStore {
    async fn load_all(&self) -> Result<Vec<Prediction>> {
        let _guard = self.lock.lock().await;
        let file = self.read().await?;
        info!("Loaded {} predictions from: {:?}", file.predictions.len(), self.path);
        Ok(file.predictions)
    }

    async fn upsert(&self, prediction: Prediction) -> Result<UpsertOutcome> {
        let _guard = self.lock.lock().await;
        let mut file = self.read().await?;

        debug!(
            "Storing prediction of {} for {}",
            prediction.participant_id, prediction.event_id
        );
        let outcome = upsert_into(&mut file.predictions, prediction);
        file.last_updated = Some(Utc::now());

        self.write(&file).await?;
        Ok(outcome)
    }
}

/// In-memory backend
#[derive(Default)]
pub struct InMemoryStore {
    predictions: Mutex<Vec<Prediction>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

}

#[async_trait::async_trait]
impl PredictionStore for InMemoryStore {
    async fn load_all(&self) -> Result<Vec<Prediction>> {
        Ok(self.predictions.lock().await.clone())
    }

    async fn upsert(&self, prediction: Prediction) -> Result<UpsertOutcome> {
        let mut predictions = self.predictions.lock().await;
        Ok(upsert_into(&mut predictions, prediction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn prediction(participant: &str, event: &str, first: &str) -> Prediction {
        Prediction::from_names(participant, event, [first, "", ""])
    }

    #[tokio::test]
    async fn missing_file_reads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("predictions.json"));

        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upsert_replaces_same_participant_and_event() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("data").join("predictions.json"));

        let first = store.upsert(prediction("alice", "Bahrain", "Oscar Piastri")).await.unwrap();
        let other = store.upsert(prediction("bob", "Bahrain", "Lando Norris")).await.unwrap();
        let second = store.upsert(prediction("alice", "Bahrain", "George Russell")).await.unwrap();

        assert_eq!(first, UpsertOutcome::Inserted);
        assert_eq!(other, UpsertOutcome::Inserted);
        assert_eq!(second, UpsertOutcome::Replaced);

        let stored = store.load_all().await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].participant_id, "alice");
        assert_eq!(stored[0].pick(1), Some("George Russell"));
    }

    #[tokio::test]
    async fn file_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("predictions.json");

        JsonFileStore::new(&path)
            .upsert(prediction("alice", "Bahrain", "Oscar Piastri"))
            .await
            .unwrap();

        let reopened = JsonFileStore::new(&path);
        let stored = reopened.for_event("Bahrain").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(reopened.for_event("Jeddah").await.unwrap().is_empty());
        assert!(!temp_dir.path().join("predictions.json.tmp").exists());
    }

    #[tokio::test]
    async fn in_memory_store_filters_by_event() {
        let store = InMemoryStore::new();
        store.upsert(prediction("alice", "Bahrain", "Oscar Piastri")).await.unwrap();
        store.upsert(prediction("alice", "Jeddah", "Oscar Piastri")).await.unwrap();
        store.upsert(prediction("bob", "Jeddah", "Max Verstappen")).await.unwrap();

        assert_eq!(store.for_event("Jeddah").await.unwrap().len(), 2);
        assert_eq!(store.for_event("Bahrain").await.unwrap().len(), 1);
    }
}
