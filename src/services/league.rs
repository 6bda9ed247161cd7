use chrono::NaiveDate;
use log::info;

use super::require_admin;
use crate::config::settings::LeagueSettings;
use crate::domain::{
    Match, MatchId, Matchday, MatchdayId, MatchdayOverview, NewMatch, NewMatchday, NewPlayer,
    Player, PlayerId, PlayerStats,
};
use crate::errors::{LeagueError, LeagueResult};
use crate::scoring::{self, Leaderboards, StandingRow};
use crate::store::LeagueStore;

/// Registration, schedule administration and the derived league views
pub struct LeagueService<'a, S: LeagueStore> {
    store: &'a S,
    settings: &'a LeagueSettings,
}

impl<'a, S: LeagueStore> LeagueService<'a, S> {
    pub fn new(store: &'a S, settings: &'a LeagueSettings) -> Self {
        Self { store, settings }
    }

    pub fn register_player(&self, player: &NewPlayer) -> LeagueResult<Player> {
        let created = self.store.insert_player(player)?;
        info!("Registered player {} ({})", created.name, created.id);
        Ok(created)
    }

    /// Replaces a player's stats block; top lists are left alone
    pub fn overwrite_stats(
        &self,
        admin_id: PlayerId,
        player_id: PlayerId,
        stats: PlayerStats,
    ) -> LeagueResult<Player> {
        require_admin(self.store, admin_id)?;
        let player = self
            .store
            .update_player(player_id, |player| player.stats = stats)?
            .ok_or(LeagueError::PlayerNotFound(player_id))?;

        info!("Admin {} overwrote stats of player {}", admin_id, player_id);
        Ok(player)
    }

    pub fn create_matchday(
        &self,
        admin_id: PlayerId,
        week: i32,
        start_date: NaiveDate,
    ) -> LeagueResult<Matchday> {
        require_admin(self.store, admin_id)?;

        if self.store.find_matchday_by_week(week)?.is_some() {
            return Err(LeagueError::DuplicateWeek(week));
        }

        let matchday = self.store.insert_matchday(&NewMatchday { week, start_date })?;
        info!(
            "Created matchday for week {} ({} to {})",
            matchday.week, matchday.start_date, matchday.end_date
        );
        Ok(matchday)
    }

    /// Matchdays with their matches, newest week first
    pub fn list_matchdays(&self) -> LeagueResult<Vec<MatchdayOverview>> {
        let mut matchdays = self.store.list_matchdays()?;
        matchdays.sort_by(|a, b| b.week.cmp(&a.week));

        let matches = self.store.list_matches()?;

        Ok(matchdays
            .into_iter()
            .map(|matchday| MatchdayOverview {
                matches: matches
                    .iter()
                    .filter(|m| m.matchday_id == matchday.id)
                    .cloned()
                    .collect(),
                matchday,
            })
            .collect())
    }

    /// The matchday whose week contains `today`
    pub fn active_matchday(&self, today: NaiveDate) -> LeagueResult<Option<Matchday>> {
        Ok(self
            .store
            .list_matchdays()?
            .into_iter()
            .find(|md| md.contains(today)))
    }

    pub fn delete_matchday(&self, admin_id: PlayerId, matchday_id: MatchdayId) -> LeagueResult<()> {
        require_admin(self.store, admin_id)?;

        if !self.store.delete_matchday(matchday_id)? {
            return Err(LeagueError::MatchdayNotFound(matchday_id));
        }
        info!("Admin {} deleted matchday {} and its matches", admin_id, matchday_id);
        Ok(())
    }

    pub fn create_match(
        &self,
        admin_id: PlayerId,
        matchday_id: MatchdayId,
        player_a: PlayerId,
        player_b: PlayerId,
    ) -> LeagueResult<Match> {
        require_admin(self.store, admin_id)?;

        if player_a == player_b {
            return Err(LeagueError::SamePlayer(player_a));
        }
        if self.store.get_matchday(matchday_id)?.is_none() {
            return Err(LeagueError::MatchdayNotFound(matchday_id));
        }
        self.load_player(player_a)?;
        self.load_player(player_b)?;

        let created = self.store.insert_match(&NewMatch {
            matchday_id,
            player_a,
            player_b,
        })?;
        info!(
            "Created match {} on matchday {}: {} vs {}",
            created.id, matchday_id, player_a, player_b
        );
        Ok(created)
    }

    pub fn delete_match(&self, admin_id: PlayerId, match_id: MatchId) -> LeagueResult<()> {
        require_admin(self.store, admin_id)?;

        if !self.store.delete_match(match_id)? {
            return Err(LeagueError::MatchNotFound(match_id));
        }
        info!("Admin {} deleted match {}", admin_id, match_id);
        Ok(())
    }

    /// Recomputed from the stored matches on every call
    pub fn standings(&self) -> LeagueResult<Vec<StandingRow>> {
        let players = self.store.list_players()?;
        let matches = self.store.list_matches()?;
        Ok(scoring::compute_standings(&players, &matches, self.settings))
    }

    pub fn leaderboards(&self) -> LeagueResult<Leaderboards> {
        let players = self.store.list_players()?;
        Ok(scoring::compute_leaderboards(&players, self.settings.leaderboard_size))
    }

    fn load_player(&self, player_id: PlayerId) -> LeagueResult<Player> {
        self.store
            .get_player(player_id)?
            .ok_or(LeagueError::PlayerNotFound(player_id))
    }
}
