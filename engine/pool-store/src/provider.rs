//! Results provider document format
//!
//! Race tables as published by the series data API. Rounds and positions arrive as
//! strings; conversion into engine types happens in `schedule` and `results`.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Top-level provider response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderDocument {
    #[serde(rename = "MRData")]
    pub mr_data: MrData,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MrData {
    #[serde(rename = "RaceTable")]
    pub race_table: RaceTable,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RaceTable {
    #[serde(default)]
    pub season: Option<String>,

    #[serde(rename = "Races", default)]
    pub races: Vec<Race>,
}

/// One race, with or without its classification
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Race {
    pub round: String,

    #[serde(rename = "raceName")]
    pub race_name: String,

    /// Race day, `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,

    /// Start time, `HH:MM:SSZ`
    #[serde(default)]
    pub time: Option<String>,

    #[serde(rename = "Results", default)]
    pub results: Vec<RaceResult>,
}

/// One classified finisher
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RaceResult {
    pub position: String,

    #[serde(rename = "Driver")]
    pub driver: Driver,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Driver {
    #[serde(rename = "givenName")]
    pub given_name: String,

    #[serde(rename = "familyName")]
    pub family_name: String,
}

impl ProviderDocument {
    pub fn races(&self) -> &[Race] {
        &self.mr_data.race_table.races
    }
}

impl Race {
    pub fn round_number(&self) -> Result<u32> {
        self.round.trim().parse().map_err(|_| {
            StoreError::provider(format!("round '{}' of {} is not a number", self.round, self.race_name))
        })
    }

    /// Scheduled start in UTC
    ///
    /// A race with a date but no time locks at midnight UTC on race day. A race with
    /// no date has no start time.
    pub fn starts_at(&self) -> Result<Option<DateTime<Utc>>> {
        let Some(date) = &self.date else {
            return Ok(None);
        };

        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|e| {
            StoreError::provider(format!("bad date '{}' for {}: {}", date, self.race_name, e))
        })?;

        let time = match &self.time {
            Some(time) => {
                NaiveTime::parse_from_str(time.trim().trim_end_matches('Z'), "%H:%M:%S").map_err(
                    |e| StoreError::provider(format!("bad time '{}' for {}: {}", time, self.race_name, e)),
                )?
            }
            None => NaiveTime::MIN,
        };

        Ok(Some(date.and_time(time).and_utc()))
    }
}

impl RaceResult {
    pub fn position_number(&self) -> Result<u32> {
        self.position.trim().parse().map_err(|_| {
            StoreError::provider(format!(
                "position '{}' of {} is not a number",
                self.position,
                self.driver.full_name()
            ))
        })
    }
}

impl Driver {
    /// Display name used in predictions, e.g. "Lando Norris"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name.trim(), self.family_name.trim())
    }
}
