use crate::error::{PoolError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Stable identity of a pool participant
pub type ParticipantId = String;

/// Identity of one event in the season (e.g. "Bahrain Grand Prix")
pub type EventId = String;

/// One participant's predicted finishing order for one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub participant_id: ParticipantId,
    pub event_id: EventId,
    /// Predicted names for places 1..=N, `None` for an unset slot
    pub picks: Vec<Option<String>>,
    pub submitted_at: DateTime<Utc>,
}

impl Prediction {
    /// Create a new prediction stamped with the current time
    pub fn new(
        participant_id: impl Into<ParticipantId>,
        event_id: impl Into<EventId>,
        picks: Vec<Option<String>>,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            event_id: event_id.into(),
            picks,
            submitted_at: Utc::now(),
        }
    }

    /// Create a prediction from plain names; blank names become unset slots
    pub fn from_names<I, S>(
        participant_id: impl Into<ParticipantId>,
        event_id: impl Into<EventId>,
        names: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let picks = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .map(|name| if name.is_empty() { None } else { Some(name) })
            .collect();
        Self::new(participant_id, event_id, picks)
    }

    pub fn with_submitted_at(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.submitted_at = submitted_at;
        self
    }

    /// Predicted name for a 1-based slot, `None` when unset or blank
    pub fn pick(&self, slot: usize) -> Option<&str> {
        if slot == 0 {
            return None;
        }
        self.picks
            .get(slot - 1)
            .and_then(|pick| pick.as_deref())
            .filter(|name| !name.trim().is_empty())
    }

    /// Check the record shape before it is stored
    pub fn validate(&self, slots: usize) -> Result<()> {
        if self.participant_id.trim().is_empty() {
            return Err(self.invalid("participant id is empty"));
        }

        if self.event_id.trim().is_empty() {
            return Err(self.invalid("event id is empty"));
        }

        if self.picks.len() != slots {
            return Err(
                self.invalid(format!("expected {} slots, got {}", slots, self.picks.len()))
            );
        }

        let mut seen = HashSet::new();
        for slot in 1..=slots {
            if let Some(name) = self.pick(slot) {
                if !seen.insert(name) {
                    return Err(self.invalid(format!("{name} is picked more than once")));
                }
            }
        }

        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> PoolError {
        PoolError::invalid_prediction(&self.participant_id, &self.event_id, reason)
    }
}

/// Official classification for one event
///
/// Ranks run 1..=M with no gaps and each finisher appears once. Both rules are
/// checked by [`OfficialResult::from_ranked`], so lookups never have to resolve
/// a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfficialResult {
    event_id: EventId,
    /// Finisher names, index 0 = rank 1
    finishers: Vec<String>,
    #[serde(skip)]
    ranks: HashMap<String, u32>,
}

impl OfficialResult {
    /// Build a result from `(rank, name)` pairs in any order
    pub fn from_ranked<I, S>(event_id: impl Into<EventId>, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u32, S)>,
        S: AsRef<str>,
    {
        let event_id = event_id.into();
        let mut entries: Vec<(u32, String)> =
            entries.into_iter().map(|(rank, name)| (rank, name.as_ref().to_string())).collect();
        entries.sort_by_key(|(rank, _)| *rank);

        let mut finishers = Vec::with_capacity(entries.len());
        let mut ranks = HashMap::with_capacity(entries.len());

        for (index, (rank, name)) in entries.into_iter().enumerate() {
            let expected = index as u32 + 1;
            if rank != expected {
                return Err(PoolError::invalid_result(
                    &event_id,
                    format!("expected rank {expected}, found rank {rank}"),
                ));
            }

            if name.trim().is_empty() {
                return Err(PoolError::invalid_result(
                    &event_id,
                    format!("rank {rank} has no finisher name"),
                ));
            }

            if ranks.insert(name.clone(), rank).is_some() {
                return Err(PoolError::invalid_result(
                    &event_id,
                    format!("{name} appears more than once"),
                ));
            }

            finishers.push(name);
        }

        Ok(Self { event_id, finishers, ranks })
    }

    /// Build a result from names already in finishing order
    pub fn from_order<I, S>(event_id: impl Into<EventId>, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_ranked(
            event_id,
            names.into_iter().enumerate().map(|(index, name)| (index as u32 + 1, name)),
        )
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    /// Finishing rank of a driver, matched by exact name
    pub fn rank_of(&self, name: &str) -> Option<u32> {
        self.ranks.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.finishers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.finishers.is_empty()
    }
}

/// Score for one predicted slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotScore {
    /// 1-based predicted place
    pub slot: u32,
    pub predicted: Option<String>,
    /// Where the predicted driver actually finished, if classified
    pub actual_rank: Option<u32>,
    pub points: u32,
}

/// One participant's score for one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventScore {
    pub participant_id: ParticipantId,
    pub event_id: EventId,
    pub slots: Vec<SlotScore>,
    pub total: u32,
}

impl EventScore {
    /// Per-slot points in slot order
    pub fn slot_scores(&self) -> Vec<u32> {
        self.slots.iter().map(|slot| slot.points).collect()
    }
}

/// A participant's line on an event leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub participant_id: ParticipantId,
    pub total_score: u32,
    /// 1-based place; tied scores share a place and the next place is skipped
    pub place: u32,
    pub series_points: u32,
}

/// Why a prediction record did not make it onto a leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    /// A later record from the same participant replaced this one
    Superseded { submitted_at: DateTime<Utc> },
    /// The record belongs to a different event
    OtherEvent { event_id: EventId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub participant_id: ParticipantId,
    pub reason: RejectionReason,
}

/// Scored and ranked predictions for one event with a published result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLeaderboard {
    pub event_id: EventId,
    /// Rows ordered by place
    pub rows: Vec<LeaderboardRow>,
    /// Full score breakdown, in the same order as `rows`
    pub scores: Vec<EventScore>,
    pub rejected: Vec<Rejection>,
}

impl EventLeaderboard {
    pub fn row_for(&self, participant_id: &str) -> Option<&LeaderboardRow> {
        self.rows.iter().find(|row| row.participant_id == participant_id)
    }

    /// Slot-by-slot breakdown for one participant
    pub fn score_for(&self, participant_id: &str) -> Option<&EventScore> {
        self.scores.iter().find(|score| score.participant_id == participant_id)
    }
}

/// Leaderboard for one event, or the explicit absence of one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaderboardOutcome {
    Available(EventLeaderboard),
    /// The official result has not been published
    Unavailable { event_id: EventId },
}

impl LeaderboardOutcome {
    pub fn event_id(&self) -> &str {
        match self {
            LeaderboardOutcome::Available(board) => &board.event_id,
            LeaderboardOutcome::Unavailable { event_id } => event_id,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, LeaderboardOutcome::Available(_))
    }

    pub fn leaderboard(&self) -> Option<&EventLeaderboard> {
        match self {
            LeaderboardOutcome::Available(board) => Some(board),
            LeaderboardOutcome::Unavailable { .. } => None,
        }
    }
}

/// A participant's line in the season table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub season_place: u32,
    pub participant_id: ParticipantId,
    pub cumulative_points: u32,
    pub first_place_count: u32,
    pub podium_count: u32,
}

/// Participant × event grid of per-event values; missing cells read as 0
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMatrix {
    /// Column labels in season order
    pub events: Vec<EventId>,
    /// Row labels in standings order
    pub participants: Vec<ParticipantId>,
    pub values: Vec<Vec<u32>>,
}

impl EventMatrix {
    pub(crate) fn zeroed(participants: Vec<ParticipantId>, events: Vec<EventId>) -> Self {
        let values = vec![vec![0; events.len()]; participants.len()];
        Self { events, participants, values }
    }

    pub(crate) fn set(&mut self, row: usize, column: usize, value: u32) {
        self.values[row][column] = value;
    }

    /// Value for one participant at one event
    pub fn get(&self, participant_id: &str, event_id: &str) -> u32 {
        let row = self.participants.iter().position(|p| p == participant_id);
        let column = self.events.iter().position(|e| e == event_id);
        match (row, column) {
            (Some(row), Some(column)) => self.values[row][column],
            _ => 0,
        }
    }

    /// All values for one participant in season order
    pub fn row(&self, participant_id: &str) -> Option<&[u32]> {
        self.participants
            .iter()
            .position(|p| p == participant_id)
            .map(|row| self.values[row].as_slice())
    }
}

/// Season standings table with its supporting per-event grids
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonStandings {
    /// Rows ordered by season place
    pub rows: Vec<StandingsRow>,
    pub points: EventMatrix,
    pub places: EventMatrix,
    pub scores: EventMatrix,
    pub events_with_results: usize,
    pub total_events: usize,
}

impl SeasonStandings {
    /// Share of the season's events that have results, in `[0, 1]`
    pub fn completion_fraction(&self) -> f64 {
        if self.total_events == 0 {
            return 0.0;
        }
        self.events_with_results as f64 / self.total_events as f64
    }

    pub fn row_for(&self, participant_id: &str) -> Option<&StandingsRow> {
        self.rows.iter().find(|row| row.participant_id == participant_id)
    }

    /// Running points total after each event, in season order
    pub fn cumulative_points(&self, participant_id: &str) -> Option<Vec<u32>> {
        let row = self.points.row(participant_id)?;
        let running = row
            .iter()
            .scan(0u32, |total, points| {
                *total += points;
                Some(*total)
            })
            .collect();
        Some(running)
    }
}
