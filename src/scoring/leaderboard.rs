use std::cmp::Ordering;

use super::types::{LeaderboardEntry, Leaderboards};
use crate::domain::Player;

/// Top `size` players per statistic, computed from the stored player stats.
/// Test accounts and unset (zero) values never qualify.
pub fn compute_leaderboards(players: &[Player], size: usize) -> Leaderboards {
    let ranked: Vec<&Player> = players.iter().filter(|p| !p.is_test_account).collect();

    Leaderboards {
        shortlegs: top_by(&ranked, size, |p| p.stats.shortleg_best, |a, b| a.cmp(b)),
        high_finishes: top_by(&ranked, size, |p| p.stats.high_finish_best, |a, b| b.cmp(a)),
        one_eighties: top_by(&ranked, size, |p| p.stats.one_eighties_total, |a, b| b.cmp(a)),
        averages: top_by(&ranked, size, |p| p.stats.average_best, |a, b| b.total_cmp(a)),
    }
}

fn top_by<T, V, C>(players: &[&Player], size: usize, value: V, compare: C) -> Vec<LeaderboardEntry<T>>
where
    T: Copy + PartialOrd + Default,
    V: Fn(&Player) -> T,
    C: Fn(&T, &T) -> Ordering,
{
    let mut entries: Vec<LeaderboardEntry<T>> = players
        .iter()
        .map(|p| LeaderboardEntry {
            player_id: p.id,
            name: p.name.clone(),
            value: value(p),
        })
        .filter(|e| e.value > T::default())
        .collect();

    entries.sort_by(|x, y| compare(&x.value, &y.value));
    entries.truncate(size);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlayerStats, TopStats};

    fn player(id: i32, shortleg: u32, high_finish: u32, one_eighties: u32, average: f64) -> Player {
        Player {
            id,
            name: format!("Player {id}"),
            email: format!("p{id}@example.com"),
            stats: PlayerStats {
                shortleg_best: shortleg,
                one_eighties_total: one_eighties,
                high_finish_best: high_finish,
                average_best: average,
                ..PlayerStats::default()
            },
            top_stats: TopStats::default(),
            is_admin: false,
            is_test_account: false,
        }
    }

    fn ids<T>(entries: &[LeaderboardEntry<T>]) -> Vec<i32> {
        entries.iter().map(|e| e.player_id).collect()
    }

    #[test]
    fn test_leaderboards_rank_each_statistic() {
        let players = vec![
            player(1, 15, 120, 4, 55.5),
            player(2, 0, 96, 0, 0.0),
            player(3, 12, 170, 7, 61.2),
            player(4, 18, 40, 1, 48.0),
            player(5, 13, 0, 2, 70.1),
        ];

        let boards = compute_leaderboards(&players, 3);

        assert_eq!(ids(&boards.shortlegs), vec![3, 5, 1]);
        assert_eq!(ids(&boards.high_finishes), vec![3, 1, 2]);
        assert_eq!(ids(&boards.one_eighties), vec![3, 1, 5]);
        assert_eq!(ids(&boards.averages), vec![5, 3, 1]);
        assert_eq!(boards.averages[0].value, 70.1);
    }

    #[test]
    fn test_test_accounts_and_empty_values_do_not_qualify() {
        let mut tester = player(1, 9, 170, 20, 99.0);
        tester.is_test_account = true;
        let players = vec![tester, player(2, 0, 0, 0, 0.0)];

        let boards = compute_leaderboards(&players, 3);

        assert!(boards.shortlegs.is_empty());
        assert!(boards.high_finishes.is_empty());
        assert!(boards.one_eighties.is_empty());
        assert!(boards.averages.is_empty());
    }
}
