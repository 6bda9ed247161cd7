use thiserror::Error;

use crate::domain::{MatchId, MatchdayId, PlayerId, Side};
use crate::scoring::ValidationError;

/// Failures of league operations. Domain rejections leave stored state
/// unchanged; `Storage` reports a failed store call.
#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("invalid result: {0}")]
    InvalidResult(#[from] ValidationError),

    #[error("side {side} of match {match_id} has already submitted a result")]
    AlreadySubmitted { match_id: MatchId, side: Side },

    #[error("player {player_id} does not play in match {match_id}")]
    NotAParticipant { match_id: MatchId, player_id: PlayerId },

    #[error("player {0} is not an admin")]
    NotAdmin(PlayerId),

    #[error("a player cannot play against themselves (player {0})")]
    SamePlayer(PlayerId),

    #[error("a matchday for week {0} already exists")]
    DuplicateWeek(i32),

    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("match {0} not found")]
    MatchNotFound(MatchId),

    #[error("matchday {0} not found")]
    MatchdayNotFound(MatchdayId),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type LeagueResult<T> = Result<T, LeagueError>;
