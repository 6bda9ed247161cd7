//! Record-level persistence the league core runs against.
//!
//! Besides plain reads and writes, every implementation provides a few
//! atomic units. [`LeagueStore::record_claim`] fills one side's slot only
//! while it is empty, so two players can submit to the same match at the
//! same time without overwriting each other. [`LeagueStore::confirm_match`]
//! flips the confirmation and rewrites both participants in one unit, so a
//! failed statistics write leaves the match unconfirmed and a confirmation
//! is never counted twice. [`LeagueStore::update_player`] is the
//! read-modify-write for a single player record.

pub mod memory;

use anyhow::Result;

use crate::domain::{
    Claim, Match, MatchId, Matchday, MatchdayId, NewMatch, NewMatchday, NewPlayer, Player,
    PlayerId, Score, Side,
};

pub use memory::MemoryStore;

pub trait LeagueStore {
    fn get_player(&self, id: PlayerId) -> Result<Option<Player>>;
    fn insert_player(&self, player: &NewPlayer) -> Result<Player>;
    /// Upserts the full record under `player.id`
    fn put_player(&self, player: &Player) -> Result<()>;
    fn list_players(&self) -> Result<Vec<Player>>;
    /// Reads, changes and writes one player as a single unit. Returns the
    /// stored record, or `None` when the player does not exist.
    fn update_player<F>(&self, id: PlayerId, update: F) -> Result<Option<Player>>
    where
        F: FnOnce(&mut Player);

    fn get_matchday(&self, id: MatchdayId) -> Result<Option<Matchday>>;
    fn find_matchday_by_week(&self, week: i32) -> Result<Option<Matchday>>;
    fn insert_matchday(&self, matchday: &NewMatchday) -> Result<Matchday>;
    fn put_matchday(&self, matchday: &Matchday) -> Result<()>;
    fn list_matchdays(&self) -> Result<Vec<Matchday>>;
    /// Removes the matchday together with all of its matches
    fn delete_matchday(&self, id: MatchdayId) -> Result<bool>;

    fn get_match(&self, id: MatchId) -> Result<Option<Match>>;
    fn insert_match(&self, new_match: &NewMatch) -> Result<Match>;
    fn put_match(&self, m: &Match) -> Result<()>;
    fn list_matches(&self) -> Result<Vec<Match>>;
    fn delete_match(&self, id: MatchId) -> Result<bool>;

    /// Writes `claim` into the given side's slot only if that slot is empty
    /// and the match is unconfirmed. Returns whether the write happened.
    fn record_claim(&self, match_id: MatchId, side: Side, claim: &Claim) -> Result<bool>;

    /// Rewrites both claims and the score, leaving `confirmed` as stored.
    /// Returns false when the match does not exist.
    fn overwrite_claims(
        &self,
        match_id: MatchId,
        claim_a: &Claim,
        claim_b: &Claim,
        score: Score,
    ) -> Result<bool>;

    /// Sets `confirmed` and the canonical score, then passes each existing
    /// participant through `update` together with the confirmed match, all
    /// in one unit. `update` returns whether it changed the player. Nothing
    /// is written when the match is already confirmed or any write fails.
    /// Returns whether this call performed the transition.
    fn confirm_match<F>(&self, match_id: MatchId, score: Score, update: F) -> Result<bool>
    where
        F: FnMut(&Match, &mut Player) -> bool;
}
