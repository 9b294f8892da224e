//! Season standings
//!
//! Sums series points across every event with a published result and orders
//! participants by points, then event wins, then podiums, then participant id.

use crate::config::ScoringConfig;
use crate::models::*;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Aggregates event leaderboards into the season table
pub struct SeasonAggregator {
    config: ScoringConfig,
}

/// Running totals for one participant
#[derive(Debug)]
struct Tally<'a> {
    participant_id: &'a str,
    points: u32,
    firsts: u32,
    podiums: u32,
}

impl SeasonAggregator {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Build standings for the season so far
    ///
    /// `events_in_season` fixes the column order of the matrices and the denominator
    /// of the completion fraction. Unavailable events add nothing to any total but
    /// still count towards the season length. Leaderboards for events outside the
    /// season are ignored.
    pub fn build(
        &self,
        events_in_season: &[EventId],
        leaderboards: &[LeaderboardOutcome],
    ) -> SeasonStandings {
        let mut events: Vec<EventId> = Vec::with_capacity(events_in_season.len());
        let mut columns: HashMap<&str, usize> = HashMap::new();
        for event_id in events_in_season {
            if columns.contains_key(event_id.as_str()) {
                warn!("Event {} listed twice in the season, keeping the first slot", event_id);
                continue;
            }
            columns.insert(event_id, events.len());
            events.push(event_id.clone());
        }

        let mut boards: Vec<Option<&EventLeaderboard>> = vec![None; events.len()];
        for outcome in leaderboards {
            let Some(&column) = columns.get(outcome.event_id()) else {
                warn!("Ignoring leaderboard for {}, not part of the season", outcome.event_id());
                continue;
            };

            match outcome.leaderboard() {
                Some(board) => {
                    if boards[column].is_some() {
                        warn!("Second leaderboard for {}, replacing the first", board.event_id);
                    }
                    boards[column] = Some(board);
                }
                None => debug!("No result yet for {}, skipping", outcome.event_id()),
            }
        }

        let mut tallies: Vec<Tally> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for board in boards.iter().flatten() {
            for row in &board.rows {
                let slot = *index.entry(row.participant_id.as_str()).or_insert_with(|| {
                    tallies.push(Tally {
                        participant_id: &row.participant_id,
                        points: 0,
                        firsts: 0,
                        podiums: 0,
                    });
                    tallies.len() - 1
                });

                let tally = &mut tallies[slot];
                tally.points += row.series_points;
                if row.place == 1 {
                    tally.firsts += 1;
                }
                if row.place <= self.config.podium_places {
                    tally.podiums += 1;
                }
            }
        }

        tallies.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then(b.firsts.cmp(&a.firsts))
                .then(b.podiums.cmp(&a.podiums))
                .then(a.participant_id.cmp(b.participant_id))
        });

        let rows: Vec<StandingsRow> = tallies
            .iter()
            .enumerate()
            .map(|(position, tally)| StandingsRow {
                season_place: position as u32 + 1,
                participant_id: tally.participant_id.to_string(),
                cumulative_points: tally.points,
                first_place_count: tally.firsts,
                podium_count: tally.podiums,
            })
            .collect();

        let participants: Vec<ParticipantId> =
            rows.iter().map(|row| row.participant_id.clone()).collect();
        let row_of: HashMap<&str, usize> = participants
            .iter()
            .enumerate()
            .map(|(position, participant_id)| (participant_id.as_str(), position))
            .collect();

        let mut points = EventMatrix::zeroed(participants.clone(), events.clone());
        let mut places = EventMatrix::zeroed(participants.clone(), events.clone());
        let mut scores = EventMatrix::zeroed(participants.clone(), events.clone());

        for (column, board) in boards.iter().enumerate() {
            let Some(board) = board else { continue };
            for row in &board.rows {
                let r = row_of[row.participant_id.as_str()];
                points.set(r, column, row.series_points);
                places.set(r, column, row.place);
                scores.set(r, column, row.total_score);
            }
        }

        let events_with_results = boards.iter().filter(|board| board.is_some()).count();

        debug!(
            "Built standings: {} participants, {}/{} events with results",
            rows.len(),
            events_with_results,
            events.len()
        );

        SeasonStandings {
            rows,
            points,
            places,
            scores,
            events_with_results,
            total_events: events.len(),
        }
    }
}

impl Default for SeasonAggregator {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(event_id: &str, rows: &[(&str, u32, u32)]) -> LeaderboardOutcome {
        let config = ScoringConfig::default();
        LeaderboardOutcome::Available(EventLeaderboard {
            event_id: event_id.to_string(),
            rows: rows
                .iter()
                .map(|&(participant_id, total_score, place)| LeaderboardRow {
                    participant_id: participant_id.to_string(),
                    total_score,
                    place,
                    series_points: config.points_for_place(place),
                })
                .collect(),
            scores: vec![],
            rejected: vec![],
        })
    }

    fn season(events: &[&str]) -> Vec<EventId> {
        events.iter().map(|event| event.to_string()).collect()
    }

    #[test]
    fn sums_points_and_counts_finishes() {
        let aggregator = SeasonAggregator::default();
        let leaderboards = vec![
            board("R1", &[("alice", 40, 1), ("bob", 30, 2), ("carol", 20, 3)]),
            board("R2", &[("bob", 50, 1), ("carol", 45, 2), ("alice", 10, 3)]),
        ];

        let standings = aggregator.build(&season(&["R1", "R2", "R3"]), &leaderboards);

        let alice = standings.row_for("alice").unwrap();
        assert_eq!(alice.cumulative_points, 40);
        assert_eq!(alice.first_place_count, 1);
        assert_eq!(alice.podium_count, 2);

        let bob = standings.row_for("bob").unwrap();
        assert_eq!(bob.cumulative_points, 43);
        assert_eq!(bob.season_place, 1);
        assert_eq!(standings.rows[1].participant_id, "alice");
        assert_eq!(standings.rows[2].participant_id, "carol");
        assert_eq!(standings.rows[2].cumulative_points, 33);
    }

    #[test]
    fn unavailable_events_count_towards_completion_only() {
        let aggregator = SeasonAggregator::default();
        let leaderboards = vec![
            board("R1", &[("alice", 40, 1)]),
            LeaderboardOutcome::Unavailable { event_id: "R2".to_string() },
        ];

        let standings = aggregator.build(&season(&["R1", "R2", "R3", "R4"]), &leaderboards);

        assert_eq!(standings.events_with_results, 1);
        assert_eq!(standings.total_events, 4);
        assert!((standings.completion_fraction() - 0.25).abs() < f64::EPSILON);
        assert_eq!(standings.points.row("alice"), Some(&[25, 0, 0, 0][..]));
    }

    #[test]
    fn skipped_events_contribute_zero() {
        let aggregator = SeasonAggregator::default();
        let leaderboards = vec![
            board("R1", &[("alice", 40, 1), ("bob", 30, 2)]),
            board("R2", &[("alice", 40, 1)]),
            board("R3", &[("bob", 40, 1), ("alice", 30, 2)]),
        ];

        let standings = aggregator.build(&season(&["R1", "R2", "R3"]), &leaderboards);

        assert_eq!(standings.row_for("bob").unwrap().cumulative_points, 43);
        assert_eq!(standings.points.get("bob", "R2"), 0);
        assert_eq!(standings.places.get("bob", "R2"), 0);
        assert_eq!(standings.scores.get("bob", "R2"), 0);
        assert_eq!(standings.scores.get("bob", "R3"), 40);
        assert_eq!(standings.places.get("alice", "R3"), 2);
        assert_eq!(standings.cumulative_points("alice"), Some(vec![25, 50, 68]));
        assert_eq!(standings.cumulative_points("nobody"), None);
    }

    #[test]
    fn tie_breaks_on_wins_then_podiums_then_id() {
        let aggregator = SeasonAggregator::default();
        // 25 + 0 versus 15 + 10: equal on points, one has a win
        let wins = vec![
            board("R1", &[("alice", 50, 1), ("zed", 30, 3)]),
            board("R2", &[("zed", 20, 5)]),
        ];
        let standings = aggregator.build(&season(&["R1", "R2"]), &wins);
        assert_eq!(standings.rows[0].participant_id, "alice");

        // 18 + 0 versus 10 + 8: equal on points and wins, one has a podium
        let podiums = vec![
            board("R1", &[("alice", 30, 5), ("zed", 40, 2)]),
            board("R2", &[("alice", 20, 6)]),
        ];
        let standings = aggregator.build(&season(&["R1", "R2"]), &podiums);
        assert_eq!(standings.rows[0].participant_id, "zed");

        // Identical on every key: participant id decides
        let dead_heat = vec![board("R1", &[("zed", 30, 1), ("alice", 30, 1)])];
        let standings = aggregator.build(&season(&["R1"]), &dead_heat);
        let order: Vec<_> = standings.rows.iter().map(|r| (r.participant_id.as_str(), r.season_place)).collect();
        assert_eq!(order, vec![("alice", 1), ("zed", 2)]);
    }

    #[test]
    fn outside_and_duplicate_events_are_ignored() {
        let aggregator = SeasonAggregator::default();
        let leaderboards = vec![board("R1", &[("alice", 40, 1)]), board("Sprint", &[("bob", 40, 1)])];

        let standings = aggregator.build(&season(&["R1", "R1"]), &leaderboards);

        assert_eq!(standings.total_events, 1);
        assert_eq!(standings.rows.len(), 1);
        assert!(standings.row_for("bob").is_none());
        assert_eq!(standings.points.events, vec!["R1".to_string()]);
    }

    #[test]
    fn empty_season() {
        let standings = SeasonAggregator::default().build(&[], &[]);
        assert!(standings.rows.is_empty());
        assert_eq!(standings.completion_fraction(), 0.0);
    }
}
