use std::collections::HashMap;

use log::debug;

use super::types::StandingRow;
use crate::config::settings::LeagueSettings;
use crate::domain::{Match, Player, PlayerId};

/// Derives the league table from scratch.
///
/// Only confirmed matches count, test accounts get no row, and matches
/// involving a player without a row are ignored. Rows are sorted by points,
/// leg differential and legs won (all descending); remaining ties keep the
/// order of `players`.
pub fn compute_standings(
    players: &[Player],
    matches: &[Match],
    settings: &LeagueSettings,
) -> Vec<StandingRow> {
    let mut rows = build_rows(players);
    let row_index: HashMap<PlayerId, usize> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| (row.player_id, idx))
        .collect();

    for m in matches.iter().filter(|m| m.confirmed) {
        let (Some(&a), Some(&b)) = (row_index.get(&m.player_a), row_index.get(&m.player_b)) else {
            debug!("Skipping match {} with a player outside the table", m.id);
            continue;
        };
        record_result(&mut rows, a, b, m.score.legs_a, m.score.legs_b, settings);
    }

    for row in &mut rows {
        row.leg_diff = row.legs_won - row.legs_lost;
    }

    sort_rows(&mut rows);
    rows
}

fn build_rows(players: &[Player]) -> Vec<StandingRow> {
    players
        .iter()
        .filter(|p| !p.is_test_account)
        .map(|p| StandingRow::new(p.id, &p.name))
        .collect()
}

fn record_result(
    rows: &mut [StandingRow],
    a: usize,
    b: usize,
    legs_a: i32,
    legs_b: i32,
    settings: &LeagueSettings,
) {
    add_legs(&mut rows[a], legs_a, legs_b);
    add_legs(&mut rows[b], legs_b, legs_a);

    if legs_a > legs_b {
        add_win(&mut rows[a], settings);
        rows[b].losses += 1;
    } else if legs_b > legs_a {
        add_win(&mut rows[b], settings);
        rows[a].losses += 1;
    } else {
        add_draw(&mut rows[a], settings);
        add_draw(&mut rows[b], settings);
    }
}

fn add_legs(row: &mut StandingRow, won: i32, lost: i32) {
    row.played += 1;
    row.legs_won += won;
    row.legs_lost += lost;
}

fn add_win(row: &mut StandingRow, settings: &LeagueSettings) {
    row.wins += 1;
    row.points += settings.points_for_win;
}

fn add_draw(row: &mut StandingRow, settings: &LeagueSettings) {
    row.draws += 1;
    row.points += settings.points_for_draw;
}

fn sort_rows(rows: &mut [StandingRow]) {
    // sort_by is stable
    rows.sort_by(|x, y| {
        y.points
            .cmp(&x.points)
            .then(y.leg_diff.cmp(&x.leg_diff))
            .then(y.legs_won.cmp(&x.legs_won))
    });
}
