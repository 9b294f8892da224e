use chrono::{DateTime, Duration, Utc};
use pool_engine::EventId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{Result, StoreError};
use crate::provider::ProviderDocument;

/// One event on the season calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub round: u32,
    pub event_id: EventId,
    /// Predictions lock at this instant; `None` means never
    pub starts_at: Option<DateTime<Utc>>,
}

impl ScheduledEvent {
    /// Whether a prediction submitted at `now` is still accepted
    pub fn is_open(&self, now: DateTime<Utc>, grace: Duration) -> bool {
        // A lock instant past the representable range never arrives
        match self.starts_at.and_then(|starts_at| starts_at.checked_add_signed(grace)) {
            Some(locks_at) => now < locks_at,
            None => true,
        }
    }
}

/// Season calendar in round order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    events: Vec<ScheduledEvent>,
}

impl Schedule {
    /// Build a schedule, ordering events by round
    pub fn new(mut events: Vec<ScheduledEvent>) -> Result<Self> {
        events.sort_by_key(|event| event.round);

        for pair in events.windows(2) {
            if pair[0].round == pair[1].round {
                return Err(StoreError::provider(format!("round {} appears twice", pair[0].round)));
            }
        }

        let mut names: Vec<&str> = events.iter().map(|event| event.event_id.as_str()).collect();
        names.sort_unstable();
        if let Some(pair) = names.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(StoreError::provider(format!("event {} appears twice", pair[0])));
        }

        Ok(Self { events })
    }

    /// Build a schedule from a provider race table
    pub fn from_document(document: &ProviderDocument) -> Result<Self> {
        let events = document
            .races()
            .iter()
            .map(|race| {
                Ok(ScheduledEvent {
                    round: race.round_number()?,
                    event_id: race.race_name.trim().to_string(),
                    starts_at: race.starts_at()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(events)
    }

    /// Load a schedule from a provider race table on disk
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading season schedule from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await?;
        let document: ProviderDocument = serde_json::from_str(&content)?;
        let schedule = Self::from_document(&document)?;

        info!("Loaded {} events", schedule.len());
        Ok(schedule)
    }

    pub fn events(&self) -> &[ScheduledEvent] {
        &self.events
    }

    /// Event ids in season order
    pub fn event_ids(&self) -> Vec<EventId> {
        self.events.iter().map(|event| event.event_id.clone()).collect()
    }

    pub fn event(&self, event_id: &str) -> Result<&ScheduledEvent> {
        self.events
            .iter()
            .find(|event| event.event_id == event_id)
            .ok_or_else(|| StoreError::UnknownEvent(event_id.to_string()))
    }

    /// First event still open for predictions at `now`
    pub fn next_open(&self, now: DateTime<Utc>, grace: Duration) -> Option<&ScheduledEvent> {
        self.events.iter().find(|event| event.starts_at.is_some() && event.is_open(now, grace))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
