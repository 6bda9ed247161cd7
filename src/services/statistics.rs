use log::{debug, warn};

use crate::domain::{Match, MatchId, Performance, Player, PlayerId, Score};
use crate::errors::LeagueResult;
use crate::scoring::apply_performance;
use crate::store::LeagueStore;

/// Folds reported performances into player records through the store's atomic units
pub struct StatisticsAggregator<'a, S: LeagueStore> {
    store: &'a S,
}

impl<'a, S: LeagueStore> StatisticsAggregator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Returns whether the player's record was updated. Test accounts and
    /// players that no longer exist are skipped.
    pub fn apply(&self, player_id: PlayerId, performance: &Performance) -> LeagueResult<bool> {
        let mut applied = false;
        let updated = self
            .store
            .update_player(player_id, |player| applied = fold(player, performance))?;

        if updated.is_none() {
            warn!("Player {} vanished before statistics could be applied", player_id);
        }
        Ok(applied)
    }

    /// Confirms the match at `score` and applies each side's claimed
    /// performance to that side's player in the same unit. Returns false
    /// without touching any player when the match was already confirmed.
    pub fn confirm(&self, match_id: MatchId, score: Score) -> LeagueResult<bool> {
        Ok(self.store.confirm_match(match_id, score, fold_claim)?)
    }
}

fn fold_claim(m: &Match, player: &mut Player) -> bool {
    let Some(side) = m.side_of(player.id) else {
        return false;
    };
    let performance = m.claim(side).map(|c| c.performance).unwrap_or_default();
    fold(player, &performance)
}

fn fold(player: &mut Player, performance: &Performance) -> bool {
    if player.is_test_account {
        debug!("Skipping statistics for test account {}", player.id);
        return false;
    }

    apply_performance(player, performance);
    debug!(
        "Applied statistics for player {}: shortleg {}, 180s {}, high finish {}, average {}",
        player.id,
        player.stats.shortleg_best,
        player.stats.one_eighties_total,
        player.stats.high_finish_best,
        player.stats.average_best
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::LeagueSettings;
    use crate::domain::{Claim, MatchState, NewMatch, NewMatchday, NewPlayer, PlayerStats, Side};
    use crate::services::{Submission, SubmissionReconciler};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn register(store: &MemoryStore, name: &str, is_test_account: bool) -> Player {
        store
            .insert_player(&NewPlayer {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                is_admin: false,
                is_test_account,
            })
            .unwrap()
    }

    fn pair(store: &MemoryStore, week: i32, a: PlayerId, b: PlayerId) -> MatchId {
        let matchday = match store.find_matchday_by_week(week).unwrap() {
            Some(md) => md,
            None => store
                .insert_matchday(&NewMatchday {
                    week,
                    start_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                })
                .unwrap(),
        };
        store
            .insert_match(&NewMatch {
                matchday_id: matchday.id,
                player_a: a,
                player_b: b,
            })
            .unwrap()
            .id
    }

    fn report(
        match_id: MatchId,
        player: PlayerId,
        legs: (i32, i32),
        one_eighties: u32,
    ) -> Submission {
        Submission {
            match_id,
            acting_player_id: player,
            legs_self: legs.0,
            legs_opponent: legs.1,
            performance: Performance {
                one_eighties,
                high_finish: 100,
                ..Performance::default()
            },
        }
    }

    #[test]
    fn test_test_account_is_left_untouched() {
        let store = MemoryStore::new();
        let settings = LeagueSettings::default();
        let anna = register(&store, "Anna", false);
        let tester = register(&store, "Tester", true);
        let match_id = pair(&store, 1, anna.id, tester.id);
        let reconciler = SubmissionReconciler::new(&store, &settings);

        reconciler.submit(&report(match_id, anna.id, (6, 2), 3)).unwrap();
        let state = reconciler.submit(&report(match_id, tester.id, (2, 6), 5)).unwrap();

        assert_eq!(state, MatchState::Confirmed);
        assert_eq!(store.get_player(anna.id).unwrap().unwrap().stats.one_eighties_total, 3);
        let tester = store.get_player(tester.id).unwrap().unwrap();
        assert_eq!(tester.stats, PlayerStats::default());
        assert_eq!(tester.top_stats.top_high_finishes, [0, 0, 0]);
    }

    #[test]
    fn test_apply_skips_missing_and_test_accounts() {
        let store = MemoryStore::new();
        let tester = register(&store, "Tester", true);
        let aggregator = StatisticsAggregator::new(&store);
        let performance = Performance {
            one_eighties: 2,
            ..Performance::default()
        };

        assert!(!aggregator.apply(404, &performance).unwrap());
        assert!(!aggregator.apply(tester.id, &performance).unwrap());
        assert_eq!(
            store.get_player(tester.id).unwrap().unwrap().stats.one_eighties_total,
            0
        );
    }

    #[test]
    fn test_confirm_skips_player_without_record() {
        let store = MemoryStore::new();
        let anna = register(&store, "Anna", false);
        let match_id = pair(&store, 1, anna.id, 404);
        let claim = |legs_self, legs_opponent| Claim {
            legs_self,
            legs_opponent,
            performance: Performance {
                one_eighties: 1,
                ..Performance::default()
            },
        };
        assert!(store.record_claim(match_id, Side::A, &claim(6, 4)).unwrap());
        assert!(store.record_claim(match_id, Side::B, &claim(4, 6)).unwrap());

        let aggregator = StatisticsAggregator::new(&store);
        assert!(aggregator.confirm(match_id, Score::new(6, 4)).unwrap());
        assert!(!aggregator.confirm(match_id, Score::new(6, 4)).unwrap());
        assert_eq!(store.get_player(anna.id).unwrap().unwrap().stats.one_eighties_total, 1);
    }

    #[test]
    fn test_overlapping_confirmations_for_one_player_all_count() {
        let store = MemoryStore::new();
        let settings = LeagueSettings::default();
        let anna = register(&store, "Anna", false);
        let opponents: Vec<Player> = (0..4)
            .map(|i| register(&store, &format!("Opponent{i}"), false))
            .collect();
        let matches: Vec<MatchId> = opponents
            .iter()
            .map(|o| pair(&store, 1, anna.id, o.id))
            .collect();
        let reconciler = SubmissionReconciler::new(&store, &settings);

        for &match_id in &matches {
            reconciler.submit(&report(match_id, anna.id, (6, 1), 2)).unwrap();
        }

        std::thread::scope(|scope| {
            for (&match_id, opponent) in matches.iter().zip(&opponents) {
                let reconciler = &reconciler;
                scope.spawn(move || {
                    let state = reconciler
                        .submit(&report(match_id, opponent.id, (1, 6), 0))
                        .unwrap();
                    assert_eq!(state, MatchState::Confirmed);
                });
            }
        });

        let anna = store.get_player(anna.id).unwrap().unwrap();
        assert_eq!(anna.stats.one_eighties_total, 8);
    }
}
