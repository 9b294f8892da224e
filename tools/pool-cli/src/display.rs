//! Terminal rendering for leaderboards and standings

use colored::*;
use pool_engine::{EventLeaderboard, EventScore, SeasonStandings};

fn place_label(place: u32) -> ColoredString {
    let label = format!("{place:>3}");
    match place {
        1 => label.yellow().bold(),
        2 | 3 => label.cyan(),
        _ => label.normal(),
    }
}

pub fn print_leaderboard(board: &EventLeaderboard) {
    println!("{}", format!("🏁 {}", board.event_id).cyan().bold());
    println!("{:>3}  {:<20} {:>6} {:>6}", "#", "Participant", "Score", "Pts");
    println!("{}", "-".repeat(39));

    for row in &board.rows {
        println!(
            "{}  {:<20} {:>6} {:>6}",
            place_label(row.place),
            row.participant_id,
            row.total_score,
            row.series_points
        );
    }

    if !board.rejected.is_empty() {
        println!();
        println!("{}", format!("{} record(s) not scored", board.rejected.len()).yellow());
    }
}

pub fn print_event_score(score: &EventScore, max_score: u32) {
    println!(
        "{}",
        format!("🏁 {} for {}", score.event_id, score.participant_id).cyan().bold()
    );
    println!("{:>4}  {:<24} {:>6} {:>6}", "Slot", "Predicted", "Actual", "Pts");
    println!("{}", "-".repeat(44));

    for slot in &score.slots {
        let predicted = slot.predicted.as_deref().unwrap_or("-");
        let actual = slot.actual_rank.map(|rank| rank.to_string()).unwrap_or_else(|| "-".into());
        let points = format!("{:>6}", slot.points);
        let points = if slot.points == 0 { points.dimmed() } else { points.green() };
        println!("{:>4}  {:<24} {:>6} {}", slot.slot, predicted, actual, points);
    }

    println!("{}", "-".repeat(44));
    println!("{:<37}{} / {}", "Total", format!("{:>6}", score.total).bold(), max_score);
}

pub fn print_standings(standings: &SeasonStandings, cumulative: bool) {
    println!("{}", "🏆 Season Standings".cyan().bold());
    println!(
        "{} of {} events scored ({:.1}%)",
        standings.events_with_results,
        standings.total_events,
        standings.completion_fraction() * 100.0
    );
    println!();
    println!("{:>3}  {:<20} {:>6} {:>5} {:>7}", "#", "Participant", "Pts", "Wins", "Podiums");
    println!("{}", "-".repeat(45));

    for row in &standings.rows {
        println!(
            "{}  {:<20} {:>6} {:>5} {:>7}",
            place_label(row.season_place),
            row.participant_id,
            row.cumulative_points,
            row.first_place_count,
            row.podium_count
        );
    }

    if cumulative {
        println!();
        println!("{}", "Points after each event".bold());
        for row in &standings.rows {
            if let Some(series) = standings.cumulative_points(&row.participant_id) {
                let series: Vec<String> = series.iter().map(u32::to_string).collect();
                println!("  {:<20} {}", row.participant_id, series.join(" "));
            }
        }
    }
}
