use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, anyhow};

use super::LeagueStore;
use crate::domain::{
    Claim, Match, MatchId, Matchday, MatchdayId, NewMatch, NewMatchday, NewPlayer, Player,
    PlayerId, PlayerStats, Score, Side, TopStats,
};

#[derive(Default)]
struct Tables {
    players: BTreeMap<PlayerId, Player>,
    matchdays: BTreeMap<MatchdayId, Matchday>,
    matches: BTreeMap<MatchId, Match>,
    next_id: i32,
}

impl Tables {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn reserve_id(&mut self, id: i32) {
        self.next_id = self.next_id.max(id);
    }
}

/// In-process store keyed by id, used by tests and dry runs
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))
    }
}

impl LeagueStore for MemoryStore {
    fn get_player(&self, id: PlayerId) -> Result<Option<Player>> {
        Ok(self.lock()?.players.get(&id).cloned())
    }

    fn insert_player(&self, player: &NewPlayer) -> Result<Player> {
        let mut tables = self.lock()?;
        let created = Player {
            id: tables.allocate_id(),
            name: player.name.clone(),
            email: player.email.clone(),
            stats: PlayerStats::default(),
            top_stats: TopStats::default(),
            is_admin: player.is_admin,
            is_test_account: player.is_test_account,
        };
        tables.players.insert(created.id, created.clone());
        Ok(created)
    }

    fn put_player(&self, player: &Player) -> Result<()> {
        let mut tables = self.lock()?;
        tables.reserve_id(player.id);
        tables.players.insert(player.id, player.clone());
        Ok(())
    }

    fn list_players(&self) -> Result<Vec<Player>> {
        Ok(self.lock()?.players.values().cloned().collect())
    }

    fn update_player<F>(&self, id: PlayerId, update: F) -> Result<Option<Player>>
    where
        F: FnOnce(&mut Player),
    {
        let mut tables = self.lock()?;
        let Some(player) = tables.players.get_mut(&id) else {
            return Ok(None);
        };
        update(player);
        Ok(Some(player.clone()))
    }

    fn get_matchday(&self, id: MatchdayId) -> Result<Option<Matchday>> {
        Ok(self.lock()?.matchdays.get(&id).cloned())
    }

    fn find_matchday_by_week(&self, week: i32) -> Result<Option<Matchday>> {
        Ok(self
            .lock()?
            .matchdays
            .values()
            .find(|md| md.week == week)
            .cloned())
    }

    fn insert_matchday(&self, matchday: &NewMatchday) -> Result<Matchday> {
        let mut tables = self.lock()?;
        if tables.matchdays.values().any(|md| md.week == matchday.week) {
            anyhow::bail!("Matchday for week {} already exists", matchday.week);
        }
        let created = Matchday {
            id: tables.allocate_id(),
            week: matchday.week,
            start_date: matchday.start_date,
            end_date: Matchday::end_for(matchday.start_date),
        };
        tables.matchdays.insert(created.id, created.clone());
        Ok(created)
    }

    fn put_matchday(&self, matchday: &Matchday) -> Result<()> {
        let mut tables = self.lock()?;
        tables.reserve_id(matchday.id);
        tables.matchdays.insert(matchday.id, matchday.clone());
        Ok(())
    }

    fn list_matchdays(&self) -> Result<Vec<Matchday>> {
        Ok(self.lock()?.matchdays.values().cloned().collect())
    }

    fn delete_matchday(&self, id: MatchdayId) -> Result<bool> {
        let mut tables = self.lock()?;
        tables.matches.retain(|_, m| m.matchday_id != id);
        Ok(tables.matchdays.remove(&id).is_some())
    }

    fn get_match(&self, id: MatchId) -> Result<Option<Match>> {
        Ok(self.lock()?.matches.get(&id).cloned())
    }

    fn insert_match(&self, new_match: &NewMatch) -> Result<Match> {
        let mut tables = self.lock()?;
        let created = Match {
            id: tables.allocate_id(),
            matchday_id: new_match.matchday_id,
            player_a: new_match.player_a,
            player_b: new_match.player_b,
            claim_a: None,
            claim_b: None,
            confirmed: false,
            score: Score::default(),
        };
        tables.matches.insert(created.id, created.clone());
        Ok(created)
    }

    fn put_match(&self, m: &Match) -> Result<()> {
        let mut tables = self.lock()?;
        tables.reserve_id(m.id);
        tables.matches.insert(m.id, m.clone());
        Ok(())
    }

    fn list_matches(&self) -> Result<Vec<Match>> {
        Ok(self.lock()?.matches.values().cloned().collect())
    }

    fn delete_match(&self, id: MatchId) -> Result<bool> {
        Ok(self.lock()?.matches.remove(&id).is_some())
    }

    fn record_claim(&self, match_id: MatchId, side: Side, claim: &Claim) -> Result<bool> {
        let mut tables = self.lock()?;
        let Some(m) = tables.matches.get_mut(&match_id) else {
            return Ok(false);
        };
        if m.confirmed || m.is_submitted(side) {
            return Ok(false);
        }
        m.set_claim(side, Some(*claim));
        Ok(true)
    }

    fn overwrite_claims(
        &self,
        match_id: MatchId,
        claim_a: &Claim,
        claim_b: &Claim,
        score: Score,
    ) -> Result<bool> {
        let mut tables = self.lock()?;
        let Some(m) = tables.matches.get_mut(&match_id) else {
            return Ok(false);
        };
        m.claim_a = Some(*claim_a);
        m.claim_b = Some(*claim_b);
        m.score = score;
        Ok(true)
    }

    fn confirm_match<F>(&self, match_id: MatchId, score: Score, mut update: F) -> Result<bool>
    where
        F: FnMut(&Match, &mut Player) -> bool,
    {
        let mut tables = self.lock()?;
        let Some(m) = tables.matches.get_mut(&match_id) else {
            return Ok(false);
        };
        if m.confirmed {
            return Ok(false);
        }
        m.confirmed = true;
        m.score = score;

        let confirmed = m.clone();
        for player_id in [confirmed.player_a, confirmed.player_b] {
            if let Some(player) = tables.players.get_mut(&player_id) {
                update(&confirmed, player);
            }
        }
        Ok(true)
    }
}
