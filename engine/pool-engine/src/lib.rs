//! # Pool Engine
//!
//! Deterministic scoring core for the race prediction pool. Participants submit a
//! predicted top-N finishing order for each event; this crate turns those picks and
//! the official classification into per-event scores, per-event leaderboards with
//! series-style points, and a season standings table.
//!
//! Nothing in here performs I/O. Predictions and results are handed in by the caller
//! (see the `pool-store` crate) and every operation returns a fresh value, so the same
//! inputs always produce the same outputs.
//!
//! ```rust
//! use pool_engine::{build_leaderboard, OfficialResult, Prediction};
//!
//! let result = OfficialResult::from_ranked(
//!     "Bahrain Grand Prix",
//!     vec![(1, "Oscar Piastri"), (2, "George Russell"), (3, "Lando Norris")],
//! )?;
//! let picks = Prediction::from_names("alice", "Bahrain Grand Prix", ["Oscar Piastri", "Lando Norris"]);
//!
//! let outcome = build_leaderboard("Bahrain Grand Prix", &[picks], Some(&result));
//! let board = outcome.leaderboard().expect("result is published");
//! assert_eq!(board.rows[0].total_score, 19);
//! # Ok::<(), pool_engine::PoolError>(())
//! ```

pub mod calculator;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod models;
pub mod standings;


pub use calculator::ScoreCalculator;
pub use config::ScoringConfig;
pub use error::{PoolError, Result};
pub use leaderboard::LeaderboardBuilder;
pub use models::*;
pub use standings::SeasonAggregator;

/// Default number of predicted places per event
pub const DEFAULT_SLOTS: usize = 10;

/// Points for naming a driver in exactly the right place
pub const DEFAULT_EXACT_MATCH_POINTS: u32 = 10;

/// Series points awarded for event places 1..=10
pub const DEFAULT_SERIES_POINTS: [u32; 10] = [25, 18, 15, 12, 10, 8, 6, 4, 2, 1];

/// Places that count as a podium finish
pub const DEFAULT_PODIUM_PLACES: u32 = 3;

/// Score one prediction with the default scoring rules.
pub fn score_prediction(prediction: &Prediction, result: &OfficialResult) -> EventScore {
    ScoreCalculator::new(ScoringConfig::default()).score(prediction, result)
}

/// Build one event's leaderboard with the default scoring rules.
pub fn build_leaderboard(
    event_id: &str,
    predictions: &[Prediction],
    result: Option<&OfficialResult>,
) -> LeaderboardOutcome {
    LeaderboardBuilder::new(ScoringConfig::default()).build(event_id, predictions, result)
}

/// Aggregate event leaderboards into season standings with the default scoring rules.
pub fn build_standings(
    events_in_season: &[EventId],
    leaderboards: &[LeaderboardOutcome],
) -> SeasonStandings {
    SeasonAggregator::new(ScoringConfig::default()).build(events_in_season, leaderboards)
}
