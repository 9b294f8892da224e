//! Per-event leaderboards
//!
//! Scores every current prediction for an event, orders participants by total and
//! converts places into series points. Tied totals share a place and the places
//! they cover are skipped, so scores of 30, 30 and 20 finish 1st, 1st and 3rd.

use crate::calculator::ScoreCalculator;
use crate::config::ScoringConfig;
use crate::models::*;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Builds event leaderboards from predictions and an official result
pub struct LeaderboardBuilder {
    calculator: ScoreCalculator,
}

impl LeaderboardBuilder {
    pub fn new(config: ScoringConfig) -> Self {
        Self { calculator: ScoreCalculator::new(config) }
    }

    pub fn config(&self) -> &ScoringConfig {
        self.calculator.config()
    }

    /// Build the leaderboard for `event_id`
    ///
    /// Returns [`LeaderboardOutcome::Unavailable`] when no result is published.
    /// Participants without a prediction for the event get no row at all.
    pub fn build(
        &self,
        event_id: &str,
        predictions: &[Prediction],
        result: Option<&OfficialResult>,
    ) -> LeaderboardOutcome {
        let Some(result) = result else {
            info!("No result published for {}, leaderboard unavailable", event_id);
            return LeaderboardOutcome::Unavailable { event_id: event_id.to_string() };
        };

        if result.event_id() != event_id {
            warn!("Scoring {} against a result labelled {}", event_id, result.event_id());
        }

        let (current, rejected) = current_predictions(event_id, predictions);

        let mut scores: Vec<EventScore> = current
            .into_iter()
            .map(|prediction| {
                let mut score = self.calculator.score(prediction, result);
                score.event_id = event_id.to_string();
                score
            })
            .collect();

        // Stable sort keeps submission order inside a tie group
        scores.sort_by(|a, b| b.total.cmp(&a.total));

        let rows = self.assign_places(&scores);

        debug!(
            "Built leaderboard for {}: {} rows, {} rejected records",
            event_id,
            rows.len(),
            rejected.len()
        );

        LeaderboardOutcome::Available(EventLeaderboard {
            event_id: event_id.to_string(),
            rows,
            scores,
            rejected,
        })
    }

    /// Assign skip-ranked places and series points to scores sorted by total, descending
    pub fn assign_places(&self, scores: &[EventScore]) -> Vec<LeaderboardRow> {
        let mut rows = Vec::with_capacity(scores.len());
        let mut place = 0;
        let mut previous_total = None;

        for (index, score) in scores.iter().enumerate() {
            if previous_total != Some(score.total) {
                place = index as u32 + 1;
                previous_total = Some(score.total);
            }

            rows.push(LeaderboardRow {
                participant_id: score.participant_id.clone(),
                total_score: score.total,
                place,
                series_points: self.config().points_for_place(place),
            });
        }

        rows
    }
}

impl Default for LeaderboardBuilder {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

/// Keep the latest record per participant for `event_id`
///
/// Participants keep the position of their first record. Among several records
/// the greatest `submitted_at` wins, and on equal timestamps the later record does.
fn current_predictions<'a>(
    event_id: &str,
    predictions: &'a [Prediction],
) -> (Vec<&'a Prediction>, Vec<Rejection>) {
    let mut current: Vec<&Prediction> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut rejected = Vec::new();

    for prediction in predictions {
        if prediction.event_id != event_id {
            rejected.push(Rejection {
                participant_id: prediction.participant_id.clone(),
                reason: RejectionReason::OtherEvent { event_id: prediction.event_id.clone() },
            });
            continue;
        }

        let position = match positions.get(prediction.participant_id.as_str()).copied() {
            Some(position) => position,
            None => {
                positions.insert(prediction.participant_id.as_str(), current.len());
                current.push(prediction);
                continue;
            }
        };

        let existing = current[position];
        let loser = if prediction.submitted_at >= existing.submitted_at {
            current[position] = prediction;
            existing
        } else {
            prediction
        };

        warn!(
            "Duplicate prediction from {} for {}, discarding the one submitted at {}",
            loser.participant_id, event_id, loser.submitted_at
        );
        rejected.push(Rejection {
            participant_id: loser.participant_id.clone(),
            reason: RejectionReason::Superseded { submitted_at: loser.submitted_at },
        });
    }

    (current, rejected)
}
