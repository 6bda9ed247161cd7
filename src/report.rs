//! Plain-text rendering of league views for the terminal.

use colored::Colorize;

use crate::domain::{Match, MatchState, MatchdayOverview, Player};
use crate::scoring::{LeaderboardEntry, Leaderboards, StandingRow};

pub fn standings_table(rows: &[StandingRow]) -> String {
    let mut out = format!(
        "{:>3}  {:<20} {:>4} {:>3} {:>3} {:>3} {:>3} {:>7} {:>5}\n",
        "#", "Player", "Pts", "P", "W", "D", "L", "Legs", "Diff"
    );

    for (idx, row) in rows.iter().enumerate() {
        let legs = format!("{}:{}", row.legs_won, row.legs_lost);
        out.push_str(&format!(
            "{:>3}  {:<20} {:>4} {:>3} {:>3} {:>3} {:>3} {:>7} {}\n",
            idx + 1,
            row.name,
            row.points.to_string().bold(),
            row.played,
            row.wins,
            row.draws,
            row.losses,
            legs,
            leg_diff(row.leg_diff)
        ));
    }
    out
}

fn leg_diff(diff: i32) -> String {
    let text = format!("{:>5}", if diff > 0 { format!("+{diff}") } else { diff.to_string() });
    match diff {
        d if d > 0 => text.green().to_string(),
        d if d < 0 => text.red().to_string(),
        _ => text,
    }
}

pub fn leaderboards(boards: &Leaderboards) -> String {
    let mut out = String::new();
    out.push_str(&board("Shortlegs", &boards.shortlegs));
    out.push_str(&board("High finish", &boards.high_finishes));
    out.push_str(&board("180s", &boards.one_eighties));
    out.push_str(&board("Average", &boards.averages));
    out
}

fn board<T: std::fmt::Display>(title: &str, entries: &[LeaderboardEntry<T>]) -> String {
    let mut out = format!("{}\n", title.bold());
    if entries.is_empty() {
        out.push_str("   no data yet\n");
    }
    for (idx, entry) in entries.iter().enumerate() {
        out.push_str(&format!("{:>3}. {:<20} {}\n", idx + 1, entry.name, entry.value));
    }
    out
}

pub fn matchdays(overview: &[MatchdayOverview], players: &[Player]) -> String {
    let name = |id| {
        players
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
            .unwrap_or("Unknown")
    };

    let mut out = String::new();
    for day in overview {
        let md = &day.matchday;
        out.push_str(&format!(
            "{} (id {}, {} to {})\n",
            format!("Week {}", md.week).bold(),
            md.id,
            md.start_date,
            md.end_date
        ));
        for m in &day.matches {
            out.push_str(&format!(
                "  [{}] {} vs {}  {}\n",
                m.id,
                name(m.player_a),
                name(m.player_b),
                match_status(m)
            ));
        }
    }
    out
}

fn match_status(m: &Match) -> String {
    match m.state() {
        MatchState::Confirmed => format!("{}:{}", m.score.legs_a, m.score.legs_b)
            .green()
            .to_string(),
        MatchState::PendingOne(side) => format!("waiting for side {}", side.opponent().as_str())
            .yellow()
            .to_string(),
        MatchState::Mismatch => "reports disagree, admin needed".red().to_string(),
        MatchState::Open => "open".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standings_table_lists_rows_in_order() {
        colored::control::set_override(false);
        let rows = vec![
            StandingRow {
                player_id: 1,
                name: "Anna".to_string(),
                played: 1,
                points: 3,
                wins: 1,
                legs_won: 6,
                legs_lost: 3,
                leg_diff: 3,
                ..StandingRow::default()
            },
            StandingRow {
                player_id: 2,
                name: "Ben".to_string(),
                played: 1,
                losses: 1,
                legs_won: 3,
                legs_lost: 6,
                leg_diff: -3,
                ..StandingRow::default()
            },
        ];

        let table = standings_table(&rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Anna") && lines[1].contains("+3"));
        assert!(lines[2].contains("Ben") && lines[2].contains("-3"));
    }

    #[test]
    fn test_empty_leaderboard_says_so() {
        colored::control::set_override(false);
        let text = leaderboards(&Leaderboards::default());
        assert_eq!(text.matches("no data yet").count(), 4);
    }
}
