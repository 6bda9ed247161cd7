use anyhow::{Context, Result, bail};
use rusqlite::TransactionBehavior;

use super::connection::{DbConn, DbPool, create_memory_pool, create_pool, get_connection};
use super::{matchdays, matches, players, setup};
use crate::domain::{
    Claim, Match, MatchId, Matchday, MatchdayId, NewMatch, NewMatchday, NewPlayer, Player,
    PlayerId, Score, Side,
};
use crate::store::LeagueStore;

/// [`LeagueStore`] backed by a pooled SQLite database
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    /// Opens the database file, creating missing tables
    pub fn open(database_path: &str) -> Result<Self> {
        let store = Self {
            pool: create_pool(database_path)?,
        };
        setup::ensure_schema(&mut store.conn()?)?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let store = Self {
            pool: create_memory_pool()?,
        };
        setup::ensure_schema(&mut store.conn()?)?;
        Ok(store)
    }

    pub fn reset(&self) -> Result<()> {
        setup::reset_database(&mut self.conn()?)
    }

    fn conn(&self) -> Result<DbConn> {
        get_connection(&self.pool)
    }
}

impl LeagueStore for SqliteStore {
    fn get_player(&self, id: PlayerId) -> Result<Option<Player>> {
        players::find_by_id(&*self.conn()?, id)
    }

    fn insert_player(&self, player: &NewPlayer) -> Result<Player> {
        players::insert_player(&mut self.conn()?, player)
    }

    fn put_player(&self, player: &Player) -> Result<()> {
        players::upsert_player(&*self.conn()?, player)
    }

    fn list_players(&self) -> Result<Vec<Player>> {
        players::list_all(&mut self.conn()?)
    }

    fn update_player<F>(&self, id: PlayerId, update: F) -> Result<Option<Player>>
    where
        F: FnOnce(&mut Player),
    {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to start player update")?;

        let Some(mut player) = players::find_by_id(&tx, id)? else {
            return Ok(None);
        };
        update(&mut player);
        players::upsert_player(&tx, &player)?;

        tx.commit().context("Failed to commit player update")?;
        Ok(Some(player))
    }

    fn get_matchday(&self, id: MatchdayId) -> Result<Option<Matchday>> {
        matchdays::find_by_id(&mut self.conn()?, id)
    }

    fn find_matchday_by_week(&self, week: i32) -> Result<Option<Matchday>> {
        matchdays::find_by_week(&mut self.conn()?, week)
    }

    fn insert_matchday(&self, matchday: &NewMatchday) -> Result<Matchday> {
        let mut conn = self.conn()?;
        if matchdays::find_by_week(&mut conn, matchday.week)?.is_some() {
            bail!("Matchday for week {} already exists", matchday.week);
        }
        matchdays::insert_matchday(&mut conn, matchday)
    }

    fn put_matchday(&self, matchday: &Matchday) -> Result<()> {
        matchdays::upsert_matchday(&mut self.conn()?, matchday)
    }

    fn list_matchdays(&self) -> Result<Vec<Matchday>> {
        matchdays::list_all(&mut self.conn()?)
    }

    fn delete_matchday(&self, id: MatchdayId) -> Result<bool> {
        matchdays::delete_with_matches(&mut self.conn()?, id)
    }

    fn get_match(&self, id: MatchId) -> Result<Option<Match>> {
        matches::find_by_id(&*self.conn()?, id)
    }

    fn insert_match(&self, new_match: &NewMatch) -> Result<Match> {
        matches::insert_match(&mut self.conn()?, new_match)
    }

    fn put_match(&self, m: &Match) -> Result<()> {
        matches::upsert_match(&mut self.conn()?, m)
    }

    fn list_matches(&self) -> Result<Vec<Match>> {
        matches::list_all(&mut self.conn()?)
    }

    fn delete_match(&self, id: MatchId) -> Result<bool> {
        matches::delete_by_id(&mut self.conn()?, id)
    }

    fn record_claim(&self, match_id: MatchId, side: Side, claim: &Claim) -> Result<bool> {
        matches::record_claim(&mut self.conn()?, match_id, side, claim)
    }

    fn overwrite_claims(
        &self,
        match_id: MatchId,
        claim_a: &Claim,
        claim_b: &Claim,
        score: Score,
    ) -> Result<bool> {
        matches::overwrite_claims(&mut self.conn()?, match_id, claim_a, claim_b, score)
    }

    fn confirm_match<F>(&self, match_id: MatchId, score: Score, mut update: F) -> Result<bool>
    where
        F: FnMut(&Match, &mut Player) -> bool,
    {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to start match confirmation")?;

        if !matches::mark_confirmed(&tx, match_id, score)? {
            return Ok(false);
        }
        let Some(confirmed) = matches::find_by_id(&tx, match_id)? else {
            return Ok(false);
        };

        for player_id in [confirmed.player_a, confirmed.player_b] {
            let Some(mut player) = players::find_by_id(&tx, player_id)? else {
                continue;
            };
            if update(&confirmed, &mut player) {
                players::upsert_player(&tx, &player)?;
            }
        }

        tx.commit()
            .with_context(|| format!("Failed to commit confirmation of match {}", match_id))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::LeagueSettings;
    use crate::domain::{MatchState, Performance};
    use crate::services::{Submission, SubmissionReconciler};
    use chrono::NaiveDate;

    fn seeded() -> (SqliteStore, Match) {
        let store = SqliteStore::in_memory().unwrap();
        let anna = store
            .insert_player(&NewPlayer {
                name: "Anna".to_string(),
                email: "anna@example.com".to_string(),
                is_admin: false,
                is_test_account: false,
            })
            .unwrap();
        let ben = store
            .insert_player(&NewPlayer {
                name: "Ben".to_string(),
                email: "ben@example.com".to_string(),
                is_admin: false,
                is_test_account: false,
            })
            .unwrap();
        let matchday = store
            .insert_matchday(&NewMatchday {
                week: 1,
                start_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            })
            .unwrap();
        let m = store
            .insert_match(&NewMatch {
                matchday_id: matchday.id,
                player_a: anna.id,
                player_b: ben.id,
            })
            .unwrap();
        (store, m)
    }

    fn claim(legs_self: i32, legs_opponent: i32, average: u32) -> Claim {
        Claim {
            legs_self,
            legs_opponent,
            performance: Performance {
                average,
                ..Performance::default()
            },
        }
    }

    #[test]
    fn test_new_match_is_open() {
        let (store, m) = seeded();

        let loaded = store.get_match(m.id).unwrap().unwrap();
        assert_eq!(loaded.claim_a, None);
        assert_eq!(loaded.claim_b, None);
        assert!(!loaded.confirmed);
        assert_eq!(loaded.score, Score::default());
    }

    #[test]
    fn test_claims_are_written_per_side() {
        let (store, m) = seeded();

        assert!(store.record_claim(m.id, Side::B, &claim(3, 6, 48)).unwrap());
        assert!(!store.record_claim(m.id, Side::B, &claim(6, 3, 48)).unwrap());
        assert!(store.record_claim(m.id, Side::A, &claim(6, 3, 57)).unwrap());

        let loaded = store.get_match(m.id).unwrap().unwrap();
        assert_eq!(loaded.claim_a, Some(claim(6, 3, 57)));
        assert_eq!(loaded.claim_b, Some(claim(3, 6, 48)));
    }

    #[test]
    fn test_confirmation_is_a_single_transition() {
        let (store, m) = seeded();

        assert!(store.confirm_match(m.id, Score::new(6, 3), |_, _| false).unwrap());
        assert!(!store.confirm_match(m.id, Score::new(6, 3), |_, _| false).unwrap());

        let loaded = store.get_match(m.id).unwrap().unwrap();
        assert!(loaded.confirmed);
        assert_eq!(loaded.score, Score::new(6, 3));
    }

    #[test]
    fn test_put_match_round_trips_claims() {
        let (store, mut m) = seeded();
        m.claim_a = Some(claim(5, 5, 61));
        store.put_match(&m).unwrap();

        assert_eq!(store.get_match(m.id).unwrap().unwrap(), m);

        m.clear();
        store.put_match(&m).unwrap();
        assert_eq!(store.get_match(m.id).unwrap().unwrap().claim_a, None);
    }

    #[test]
    fn test_duplicate_week_is_refused() {
        let (store, _) = seeded();

        let again = store.insert_matchday(&NewMatchday {
            week: 1,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
        });
        assert!(again.is_err());
    }

    #[test]
    fn test_deleting_matchday_cascades() {
        let (store, m) = seeded();

        assert!(store.delete_matchday(m.matchday_id).unwrap());
        assert!(store.get_match(m.id).unwrap().is_none());
        assert!(store.list_matches().unwrap().is_empty());
    }

    #[test]
    fn test_overwriting_claims_keeps_confirmation() {
        let (store, m) = seeded();
        assert!(store.confirm_match(m.id, Score::new(6, 3), |_, _| false).unwrap());

        assert!(store
            .overwrite_claims(m.id, &claim(3, 6, 0), &claim(6, 3, 0), Score::new(3, 6))
            .unwrap());

        let loaded = store.get_match(m.id).unwrap().unwrap();
        assert!(loaded.confirmed);
        assert_eq!(loaded.score, Score::new(3, 6));
        assert_eq!(loaded.agreed_score(), Some(Score::new(3, 6)));
        assert!(!store.confirm_match(m.id, Score::new(3, 6), |_, _| true).unwrap());
        assert!(!store
            .overwrite_claims(999, &claim(6, 0, 0), &claim(0, 6, 0), Score::new(6, 0))
            .unwrap());
    }

    #[test]
    fn test_update_player_is_atomic_across_connections() {
        let path =
            std::env::temp_dir().join(format!("dart_league_update_{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let store = SqliteStore::open(path.to_str().unwrap()).unwrap();
        let anna = store
            .insert_player(&NewPlayer {
                name: "Anna".to_string(),
                email: "anna@example.com".to_string(),
                is_admin: false,
                is_test_account: false,
            })
            .unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..5 {
                        store
                            .update_player(anna.id, |p| p.stats.one_eighties_total += 1)
                            .unwrap();
                    }
                });
            }
        });

        let loaded = store.get_player(anna.id).unwrap().unwrap();
        assert_eq!(loaded.stats.one_eighties_total, 20);
        drop(store);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_failed_statistics_write_leaves_match_unconfirmed() {
        let (store, m) = seeded();
        let settings = LeagueSettings::default();
        let reconciler = SubmissionReconciler::new(&store, &settings);
        let report = |player, legs_self, legs_opponent, one_eighties| Submission {
            match_id: m.id,
            acting_player_id: player,
            legs_self,
            legs_opponent,
            performance: Performance {
                one_eighties,
                ..Performance::default()
            },
        };

        store
            .conn()
            .unwrap()
            .execute_batch(&format!(
                "CREATE TRIGGER refuse_insert BEFORE INSERT ON players WHEN NEW.id = {id}
                 BEGIN SELECT RAISE(ABORT, 'disk full'); END;
                 CREATE TRIGGER refuse_update BEFORE UPDATE ON players WHEN NEW.id = {id}
                 BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
                id = m.player_b
            ))
            .unwrap();

        reconciler.submit(&report(m.player_a, 6, 3, 2)).unwrap();
        assert!(reconciler.submit(&report(m.player_b, 3, 6, 4)).is_err());

        let loaded = store.get_match(m.id).unwrap().unwrap();
        assert!(!loaded.confirmed);
        assert_eq!(loaded.score, Score::default());
        assert_eq!(store.get_player(m.player_a).unwrap().unwrap().stats.one_eighties_total, 0);

        store
            .conn()
            .unwrap()
            .execute_batch("DROP TRIGGER refuse_insert; DROP TRIGGER refuse_update;")
            .unwrap();

        assert_eq!(reconciler.try_confirm(m.id).unwrap(), MatchState::Confirmed);
        assert_eq!(reconciler.try_confirm(m.id).unwrap(), MatchState::Confirmed);
        assert_eq!(store.get_player(m.player_a).unwrap().unwrap().stats.one_eighties_total, 2);
        assert_eq!(store.get_player(m.player_b).unwrap().unwrap().stats.one_eighties_total, 4);
    }
}
