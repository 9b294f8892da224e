//! Wiring between the pool store and the scoring engine

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use pool_engine::{
    EventId, LeaderboardBuilder, LeaderboardOutcome, Prediction, SeasonAggregator, SeasonStandings,
    ScoringConfig,
};
use pool_store::{
    collect_results, FileResultsProvider, JsonFileStore, PredictionStore, ResultsProvider, Schedule,
    ScheduledEvent, StoreConfig, SubmissionDesk, UpsertOutcome,
};
use std::collections::HashMap;
use tracing::info;

/// One season's pool: schedule, prediction records and official results
pub struct Pool {
    schedule: Schedule,
    store: Box<dyn PredictionStore>,
    results: Box<dyn ResultsProvider>,
    desk: SubmissionDesk,
    leaderboards: LeaderboardBuilder,
    aggregator: SeasonAggregator,
}

impl Pool {
    pub fn new(
        schedule: Schedule,
        store: Box<dyn PredictionStore>,
        results: Box<dyn ResultsProvider>,
        scoring: ScoringConfig,
        store_config: &StoreConfig,
    ) -> Self {
        Self {
            schedule,
            store,
            results,
            desk: SubmissionDesk::new(scoring.slots, store_config.lock_grace()),
            leaderboards: LeaderboardBuilder::new(scoring.clone()),
            aggregator: SeasonAggregator::new(scoring),
        }
    }

    /// Open the file-backed pool described by the configuration
    pub async fn open(store_config: &StoreConfig, scoring: ScoringConfig) -> Result<Self> {
        let schedule_path = store_config.schedule_path();
        let schedule = Schedule::load(&schedule_path)
            .await
            .with_context(|| format!("Failed to load schedule from {:?}", schedule_path))?;

        let store = JsonFileStore::new(store_config.predictions_path());
        let results = FileResultsProvider::new(store_config.results_path());

        Ok(Self::new(schedule, Box::new(store), Box::new(results), scoring, store_config))
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn lock_grace(&self) -> Duration {
        self.desk.lock_grace()
    }

    /// Next event still taking predictions at `now`
    pub fn next_open(&self, now: DateTime<Utc>) -> Option<&ScheduledEvent> {
        self.schedule.next_open(now, self.desk.lock_grace())
    }

    pub fn max_event_score(&self) -> u32 {
        self.leaderboards.config().max_event_score()
    }

    /// Submit one participant's picks, padding missing trailing slots with blanks
    pub async fn submit(
        &self,
        participant_id: &str,
        event_id: &str,
        picks: &[String],
        now: DateTime<Utc>,
    ) -> Result<UpsertOutcome> {
        let mut names: Vec<&str> = picks.iter().map(String::as_str).collect();
        if names.len() < self.desk.slots() {
            names.resize(self.desk.slots(), "");
        }

        let prediction = Prediction::from_names(participant_id, event_id, names);
        let outcome =
            self.desk.submit(self.store.as_ref(), &self.schedule, prediction, now).await?;
        Ok(outcome)
    }

    /// Leaderboard for one scheduled event
    pub async fn leaderboard(&self, event_id: &str) -> Result<LeaderboardOutcome> {
        let event = self.schedule.event(event_id)?;
        let result = self
            .results
            .fetch_result(event)
            .await
            .with_context(|| format!("Failed to read result for {event_id}"))?;
        let predictions = self.store.for_event(event_id).await?;

        Ok(self.leaderboards.build(event_id, &predictions, result.as_ref()))
    }

    /// Standings over the whole schedule
    pub async fn standings(&self) -> Result<SeasonStandings> {
        let results = collect_results(self.results.as_ref(), &self.schedule)
            .await
            .context("Failed to collect official results")?;

        let mut by_event: HashMap<EventId, Vec<Prediction>> = HashMap::new();
        for prediction in self.store.load_all().await? {
            by_event.entry(prediction.event_id.clone()).or_default().push(prediction);
        }

        let leaderboards: Vec<LeaderboardOutcome> = results
            .iter()
            .map(|(event_id, result)| {
                let predictions = by_event.get(event_id).map(Vec::as_slice).unwrap_or_default();
                self.leaderboards.build(event_id, predictions, result.as_ref())
            })
            .collect();

        let standings = self.aggregator.build(&self.schedule.event_ids(), &leaderboards);
        info!(
            "Built standings for {} participants over {}/{} events",
            standings.rows.len(),
            standings.events_with_results,
            standings.total_events
        );
        Ok(standings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pool_engine::OfficialResult;
    use pool_store::{InMemoryResults, InMemoryStore, StoreError};
    use tempfile::TempDir;

    fn race_start(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, day, 15, 0, 0).unwrap()
    }

    fn pool() -> Pool {
        let schedule = Schedule::new(vec![
            ScheduledEvent { round: 1, event_id: "Bahrain".to_string(), starts_at: Some(race_start(13)) },
            ScheduledEvent { round: 2, event_id: "Jeddah".to_string(), starts_at: Some(race_start(20)) },
        ])
        .unwrap();

        let mut results = InMemoryResults::new();
        results.insert(
            OfficialResult::from_order("Bahrain", ["Oscar Piastri", "George Russell", "Lando Norris"])
                .unwrap(),
        );

        let scoring = ScoringConfig { slots: 3, ..Default::default() };
        Pool::new(
            schedule,
            Box::new(InMemoryStore::new()),
            Box::new(results),
            scoring,
            &StoreConfig::default(),
        )
    }

    fn picks(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[tokio::test]
    async fn submit_then_score_event() {
        let pool = pool();
        let before = race_start(13) - Duration::hours(1);

        pool.submit("alice", "Bahrain", &picks(&["Oscar Piastri", "George Russell"]), before)
            .await
            .unwrap();
        pool.submit("bob", "Bahrain", &picks(&["Lando Norris"]), before).await.unwrap();

        let outcome = pool.leaderboard("Bahrain").await.unwrap();
        let board = outcome.leaderboard().unwrap();

        assert_eq!(board.rows[0].participant_id, "alice");
        assert_eq!(board.rows[0].total_score, 20);
        assert_eq!(board.row_for("bob").unwrap().total_score, 8);
        assert_eq!(board.score_for("bob").unwrap().slots[0].actual_rank, Some(3));
    }

    #[tokio::test]
    async fn late_submission_is_locked() {
        let pool = pool();

        let err = pool
            .submit("alice", "Bahrain", &picks(&["Oscar Piastri"]), race_start(13))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::SubmissionLocked { .. })
        ));
    }

    #[tokio::test]
    async fn standings_cover_the_schedule() {
        let pool = pool();
        let before = race_start(13) - Duration::hours(1);
        pool.submit("alice", "Bahrain", &picks(&["Oscar Piastri"]), before).await.unwrap();
        pool.submit("bob", "Jeddah", &picks(&["Max Verstappen"]), before).await.unwrap();

        assert!(!pool.leaderboard("Jeddah").await.unwrap().is_available());

        let standings = pool.standings().await.unwrap();

        assert_eq!(standings.total_events, 2);
        assert_eq!(standings.events_with_results, 1);
        assert_eq!(standings.rows.len(), 1);
        assert_eq!(standings.rows[0].participant_id, "alice");
        assert_eq!(standings.rows[0].cumulative_points, 25);
        assert_eq!(standings.cumulative_points("alice"), Some(vec![25, 25]));
    }

    #[tokio::test]
    async fn unreadable_result_fails_standings() {
        let temp_dir = TempDir::new().unwrap();
        let results = FileResultsProvider::new(temp_dir.path());
        std::fs::create_dir(results.path_for(1)).unwrap();
        let pool = Pool::new(
            pool().schedule().clone(),
            Box::new(InMemoryStore::new()),
            Box::new(results),
            ScoringConfig::default(),
            &StoreConfig::default(),
        );

        let err = pool.standings().await.unwrap_err();

        assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::Io(_))));
    }

    #[test]
    fn next_open_follows_the_clock() {
        let pool = pool();

        assert_eq!(pool.next_open(race_start(1)).unwrap().event_id, "Bahrain");
        assert_eq!(pool.next_open(race_start(13)).unwrap().event_id, "Jeddah");
        assert!(pool.next_open(race_start(21)).is_none());
        assert_eq!(pool.max_event_score(), 30);
    }

    #[tokio::test]
    async fn unknown_event_is_an_error() {
        let pool = pool();
        assert!(pool.leaderboard("Monaco").await.is_err());
    }
}
