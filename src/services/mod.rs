pub mod league;
pub mod reconciler;
pub mod snapshot;
pub mod statistics;

pub use league::LeagueService;
pub use reconciler::{Submission, SubmissionReconciler};
pub use statistics::StatisticsAggregator;

use crate::domain::{Player, PlayerId};
use crate::errors::{LeagueError, LeagueResult};
use crate::store::LeagueStore;

/// Loads the acting player and checks the admin flag
pub(crate) fn require_admin<S: LeagueStore>(store: &S, player_id: PlayerId) -> LeagueResult<Player> {
    let player = store
        .get_player(player_id)?
        .ok_or(LeagueError::PlayerNotFound(player_id))?;

    if !player.is_admin {
        return Err(LeagueError::NotAdmin(player_id));
    }
    Ok(player)
}
