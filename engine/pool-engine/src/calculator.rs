use crate::config::ScoringConfig;
use crate::models::*;
use tracing::debug;

/// Per-slot accuracy scoring
pub struct ScoreCalculator {
    config: ScoringConfig,
}

impl ScoreCalculator {
    /// Create a new score calculator
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Points for a driver predicted at `slot` who finished at `actual_rank`
    ///
    /// An exact match earns `exact_match_points`; each place of distance in either
    /// direction costs one point, floored at zero.
    pub fn slot_points(&self, slot: u32, actual_rank: u32) -> u32 {
        self.config.exact_match_points.saturating_sub(slot.abs_diff(actual_rank))
    }

    /// Score a prediction against a published result
    ///
    /// Exactly `slots` places are scored. Unset picks and drivers missing from the
    /// classification score zero for their slot.
    pub fn score(&self, prediction: &Prediction, result: &OfficialResult) -> EventScore {
        let slots: Vec<SlotScore> = (1..=self.config.slots)
            .map(|slot| {
                let predicted = prediction.pick(slot);
                let actual_rank = predicted.and_then(|name| result.rank_of(name));
                let points =
                    actual_rank.map(|rank| self.slot_points(slot as u32, rank)).unwrap_or(0);

                SlotScore {
                    slot: slot as u32,
                    predicted: predicted.map(str::to_string),
                    actual_rank,
                    points,
                }
            })
            .collect();

        let total = slots.iter().map(|slot| slot.points).sum();

        debug!(
            "Scored {} for {}: {} points ({} of {} picks classified)",
            prediction.participant_id,
            result.event_id(),
            total,
            slots.iter().filter(|slot| slot.actual_rank.is_some()).count(),
            slots.iter().filter(|slot| slot.predicted.is_some()).count(),
        );

        EventScore {
            participant_id: prediction.participant_id.clone(),
            event_id: result.event_id().to_string(),
            slots,
            total,
        }
    }
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}
