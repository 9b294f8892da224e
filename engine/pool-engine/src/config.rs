//! Configuration for the scoring engine

use crate::error::{PoolError, Result};
use crate::{DEFAULT_EXACT_MATCH_POINTS, DEFAULT_PODIUM_PLACES, DEFAULT_SERIES_POINTS, DEFAULT_SLOTS};
use serde::{Deserialize, Serialize};

/// Scoring rules shared by the calculator, leaderboard builder and season aggregator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Number of predicted places per event (N)
    pub slots: usize,

    /// Points for an exact place match; each place of distance costs one point
    pub exact_match_points: u32,

    /// Series points by event place, index 0 = place 1. Places past the end score 0.
    pub series_points: Vec<u32>,

    /// Event places counted as podium finishes
    pub podium_places: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            slots: DEFAULT_SLOTS,
            exact_match_points: DEFAULT_EXACT_MATCH_POINTS,
            series_points: DEFAULT_SERIES_POINTS.to_vec(),
            podium_places: DEFAULT_PODIUM_PLACES,
        }
    }
}

impl ScoringConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(slots) = std::env::var("POOL_SLOTS") {
            config.slots = slots.parse().unwrap_or(DEFAULT_SLOTS);
        }

        if let Ok(points) = std::env::var("POOL_EXACT_MATCH_POINTS") {
            config.exact_match_points = points.parse().unwrap_or(DEFAULT_EXACT_MATCH_POINTS);
        }

        config.validate()?;
        Ok(config)
    }

    /// Series points for a 1-based event place
    pub fn points_for_place(&self, place: u32) -> u32 {
        if place == 0 {
            return 0;
        }
        self.series_points.get(place as usize - 1).copied().unwrap_or(0)
    }

    /// Maximum total an event score can reach
    pub fn max_event_score(&self) -> u32 {
        self.exact_match_points * self.slots as u32
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.slots == 0 {
            return Err(PoolError::config("slots must be greater than 0"));
        }

        if self.exact_match_points == 0 {
            return Err(PoolError::config("exact_match_points must be greater than 0"));
        }

        if self.series_points.is_empty() {
            return Err(PoolError::config("series_points table must not be empty"));
        }

        if self.series_points.windows(2).any(|pair| pair[1] > pair[0]) {
            return Err(PoolError::config("series_points must not increase with place"));
        }

        if self.podium_places == 0 {
            return Err(PoolError::config("podium_places must be greater than 0"));
        }

        Ok(())
    }
}
