//! Submission checks in front of the prediction store

use chrono::{DateTime, Duration, Utc};
use pool_engine::Prediction;
use tracing::{info, warn};

use crate::error::{Result, StoreError};
use crate::schedule::Schedule;
use crate::store::{PredictionStore, UpsertOutcome};

/// Accepts predictions for scheduled events that have not started yet
#[derive(Debug, Clone)]
pub struct SubmissionDesk {
    slots: usize,
    lock_grace: Duration,
}

impl SubmissionDesk {
    pub fn new(slots: usize, lock_grace: Duration) -> Self {
        Self { slots, lock_grace }
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn lock_grace(&self) -> Duration {
        self.lock_grace
    }

    /// Validate, stamp and store a prediction
    ///
    /// The record's `submitted_at` is overwritten with `now`.
    pub async fn submit(
        &self,
        store: &dyn PredictionStore,
        schedule: &Schedule,
        prediction: Prediction,
        now: DateTime<Utc>,
    ) -> Result<UpsertOutcome> {
        let event = schedule.event(&prediction.event_id)?;

        if !event.is_open(now, self.lock_grace) {
            let locked_at = event.starts_at.map(|start| start + self.lock_grace).unwrap_or(now);
            warn!(
                "Rejected late prediction of {} for {}",
                prediction.participant_id, prediction.event_id
            );
            return Err(StoreError::SubmissionLocked {
                event_id: prediction.event_id,
                locked_at,
            });
        }

        prediction.validate(self.slots)?;

        let prediction = prediction.with_submitted_at(now);
        let participant_id = prediction.participant_id.clone();
        let event_id = prediction.event_id.clone();

        let outcome = store.upsert(prediction).await?;
        info!("Prediction of {} for {}: {:?}", participant_id, event_id, outcome);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ScheduledEvent;
    use crate::store::InMemoryStore;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 13, 15, 0, 0).unwrap()
    }

    fn schedule() -> Schedule {
        Schedule::new(vec![
            ScheduledEvent {
                round: 4,
                event_id: "Bahrain Grand Prix".to_string(),
                starts_at: Some(start()),
            },
            ScheduledEvent { round: 5, event_id: "Saudi Arabian Grand Prix".to_string(), starts_at: None },
        ])
        .unwrap()
    }

    fn picks(event: &str) -> Prediction {
        Prediction::from_names("alice", event, ["Oscar Piastri", "George Russell", "Lando Norris"])
    }

    #[tokio::test]
    async fn accepts_before_start_and_stamps_time() {
        let desk = SubmissionDesk::new(3, Duration::zero());
        let store = InMemoryStore::new();
        let now = start() - Duration::hours(1);

        let outcome =
            desk.submit(&store, &schedule(), picks("Bahrain Grand Prix"), now).await.unwrap();

        assert_eq!(outcome, UpsertOutcome::Inserted);
        let stored = store.load_all().await.unwrap();
        assert_eq!(stored[0].submitted_at, now);
    }

    #[tokio::test]
    async fn resubmission_replaces() {
        let desk = SubmissionDesk::new(3, Duration::zero());
        let store = InMemoryStore::new();
        let now = start() - Duration::hours(2);

        desk.submit(&store, &schedule(), picks("Bahrain Grand Prix"), now).await.unwrap();
        let outcome = desk
            .submit(&store, &schedule(), picks("Bahrain Grand Prix"), now + Duration::minutes(5))
            .await
            .unwrap();

        assert_eq!(outcome, UpsertOutcome::Replaced);
        assert_eq!(store.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_after_start() {
        let desk = SubmissionDesk::new(3, Duration::zero());
        let store = InMemoryStore::new();

        let err = desk
            .submit(&store, &schedule(), picks("Bahrain Grand Prix"), start())
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::SubmissionLocked { locked_at, .. } if locked_at == start()));
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn grace_period_extends_the_window() {
        let desk = SubmissionDesk::new(3, Duration::minutes(10));
        let store = InMemoryStore::new();

        let result = desk
            .submit(&store, &schedule(), picks("Bahrain Grand Prix"), start() + Duration::minutes(5))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn event_without_start_time_stays_open() {
        let desk = SubmissionDesk::new(3, Duration::zero());
        let store = InMemoryStore::new();
        let far_future = start() + Duration::days(365);

        let result =
            desk.submit(&store, &schedule(), picks("Saudi Arabian Grand Prix"), far_future).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn rejects_unknown_event_and_bad_shape() {
        let desk = SubmissionDesk::new(3, Duration::zero());
        let store = InMemoryStore::new();
        let now = start() - Duration::hours(1);

        let unknown = desk.submit(&store, &schedule(), picks("Monaco Grand Prix"), now).await;
        assert!(matches!(unknown, Err(StoreError::UnknownEvent(_))));

        let duplicate = Prediction::from_names(
            "alice",
            "Bahrain Grand Prix",
            ["Oscar Piastri", "Oscar Piastri", "Lando Norris"],
        );
        let invalid = desk.submit(&store, &schedule(), duplicate, now).await;
        assert!(matches!(invalid, Err(StoreError::Engine(_))));

        assert!(store.load_all().await.unwrap().is_empty());
    }
}
