//! Official results
//!
//! A provider answers, per scheduled event, with the official classification or with
//! nothing when the event has not been classified yet. "Nothing yet" is `Ok(None)`,
//! never an empty result.

use pool_engine::{EventId, OfficialResult};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::provider::{ProviderDocument, Race};
use crate::schedule::{Schedule, ScheduledEvent};

/// Source of official event results
#[async_trait::async_trait]
pub trait ResultsProvider: Send + Sync {
    /// Fetch the classification for one event, `None` when not yet published
    async fn fetch_result(&self, event: &ScheduledEvent) -> Result<Option<OfficialResult>>;
}

/// Reads one provider document per round from `{results_dir}/{round}.json`
pub struct FileResultsProvider {
    results_dir: PathBuf,
}

impl FileResultsProvider {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self { results_dir: results_dir.into() }
    }

    pub fn path_for(&self, round: u32) -> PathBuf {
        self.results_dir.join(format!("{round}.json"))
    }
}

#[async_trait::async_trait]
impl ResultsProvider for FileResultsProvider {
    async fn fetch_result(&self, event: &ScheduledEvent) -> Result<Option<OfficialResult>> {
        let path = self.path_for(event.round);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No result document for round {} at {:?}", event.round, path);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let document: ProviderDocument = serde_json::from_str(&content)?;
        result_from_document(event, &document)
    }
}

/// Extract one event's classification from a provider document
///
/// A document with no races, or whose race carries no results, means the event has
/// not been classified yet.
pub fn result_from_document(
    event: &ScheduledEvent,
    document: &ProviderDocument,
) -> Result<Option<OfficialResult>> {
    let Some(race) = document.races().first() else {
        return Ok(None);
    };

    if race.round_number()? != event.round {
        return Err(StoreError::provider(format!(
            "document for round {} holds round {}",
            event.round, race.round
        )));
    }

    if race.results.is_empty() {
        return Ok(None);
    }

    let result = classification(&event.event_id, race)?;
    info!("Loaded result for {} with {} finishers", event.event_id, result.len());
    Ok(Some(result))
}

fn classification(event_id: &str, race: &Race) -> Result<OfficialResult> {
    let entries = race
        .results
        .iter()
        .map(|entry| Ok((entry.position_number()?, entry.driver.full_name())))
        .collect::<Result<Vec<_>>>()?;

    Ok(OfficialResult::from_ranked(event_id, entries)?)
}

/// Results held in memory, keyed by event id
#[derive(Debug, Clone, Default)]
pub struct InMemoryResults {
    results: HashMap<EventId, OfficialResult>,
}

impl InMemoryResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, result: OfficialResult) {
        self.results.insert(result.event_id().to_string(), result);
    }
}

#[async_trait::async_trait]
impl ResultsProvider for InMemoryResults {
    async fn fetch_result(&self, event: &ScheduledEvent) -> Result<Option<OfficialResult>> {
        Ok(self.results.get(&event.event_id).cloned())
    }
}

/// Fetch results for every scheduled event, in season order
///
/// `None` means the provider has no classification yet. Any provider failure
/// aborts the collection, so an unreadable document is never mistaken for an
/// unpublished result.
pub async fn collect_results(
    provider: &dyn ResultsProvider,
    schedule: &Schedule,
) -> Result<Vec<(EventId, Option<OfficialResult>)>> {
    let mut results = Vec::with_capacity(schedule.len());

    for event in schedule.events() {
        let result = provider.fetch_result(event).await.map_err(|e| {
            warn!("Could not read result for {}: {}", event.event_id, e);
            e
        })?;
        results.push((event.event_id.clone(), result));
    }

    Ok(results)
}
