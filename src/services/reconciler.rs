//! Two-sided result reporting.
//!
//! Each participant writes only their own claim slot. Once both slots are
//! filled the claims are compared against a freshly read record: agreement
//! confirms the match and folds each side's performance into that side's
//! statistics, disagreement leaves the match in `Mismatch` until an admin
//! resets or force-sets it.
//!
//! Resetting a confirmed match does not retract statistics that were already
//! applied; statistics only ever grow.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::require_admin;
use super::statistics::StatisticsAggregator;
use crate::config::settings::LeagueSettings;
use crate::domain::{Claim, Match, MatchId, MatchState, Performance, PlayerId, Score, Side};
use crate::errors::{LeagueError, LeagueResult};
use crate::scoring::{check_result, check_submission};
use crate::store::LeagueStore;

/// A participant's report of a played match, from their own perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub match_id: MatchId,
    pub acting_player_id: PlayerId,
    pub legs_self: i32,
    pub legs_opponent: i32,
    #[serde(default)]
    pub performance: Performance,
}

pub struct SubmissionReconciler<'a, S: LeagueStore> {
    store: &'a S,
    settings: &'a LeagueSettings,
}

impl<'a, S: LeagueStore> SubmissionReconciler<'a, S> {
    pub fn new(store: &'a S, settings: &'a LeagueSettings) -> Self {
        Self { store, settings }
    }

    /// Records the acting player's claim and, when it completes the pair,
    /// tries to confirm the match. Returns the resulting state.
    pub fn submit(&self, submission: &Submission) -> LeagueResult<MatchState> {
        let m = self.load_match(submission.match_id)?;

        let side = m
            .side_of(submission.acting_player_id)
            .ok_or(LeagueError::NotAParticipant {
                match_id: m.id,
                player_id: submission.acting_player_id,
            })?;

        if m.is_submitted(side) || m.confirmed {
            return Err(LeagueError::AlreadySubmitted {
                match_id: m.id,
                side,
            });
        }

        check_submission(self.settings, submission.legs_self, submission.legs_opponent)?;

        let claim = Claim {
            legs_self: submission.legs_self,
            legs_opponent: submission.legs_opponent,
            performance: submission.performance,
        };

        // The slot may have been filled since the read above
        if !self.store.record_claim(m.id, side, &claim)? {
            return Err(LeagueError::AlreadySubmitted {
                match_id: m.id,
                side,
            });
        }

        info!(
            "Player {} (side {}) reported {}:{} for match {}",
            submission.acting_player_id,
            side.as_str(),
            claim.legs_self,
            claim.legs_opponent,
            m.id
        );

        self.try_confirm(m.id)
    }

    /// Compares both claims on the latest stored record. On agreement the
    /// match is confirmed and statistics are applied once per side; the
    /// transition itself guards against a second application.
    pub fn try_confirm(&self, match_id: MatchId) -> LeagueResult<MatchState> {
        let m = self.load_match(match_id)?;

        if m.confirmed {
            return Ok(MatchState::Confirmed);
        }
        if !(m.is_submitted(Side::A) && m.is_submitted(Side::B)) {
            return Ok(m.state());
        }

        let Some(score) = m.agreed_score() else {
            warn!(
                "Claims for match {} disagree ({:?} vs {:?}), manual resolution needed",
                m.id,
                m.claim_a.map(|c| (c.legs_self, c.legs_opponent)),
                m.claim_b.map(|c| (c.legs_opponent, c.legs_self))
            );
            return Ok(MatchState::Mismatch);
        };

        if StatisticsAggregator::new(self.store).confirm(m.id, score)? {
            info!("Match {} confirmed at {}:{}", m.id, score.legs_a, score.legs_b);
        }

        Ok(MatchState::Confirmed)
    }

    /// Clears both claims and the confirmation, returning the match to `Open`.
    /// Statistics already applied for a confirmed match stay in place.
    pub fn reset(&self, match_id: MatchId, admin_id: PlayerId) -> LeagueResult<Match> {
        require_admin(self.store, admin_id)?;
        let mut m = self.load_match(match_id)?;

        if m.confirmed {
            warn!(
                "Resetting confirmed match {}; statistics already applied are not retracted",
                m.id
            );
        }

        m.clear();
        self.store.put_match(&m)?;
        info!("Admin {} reset match {}", admin_id, m.id);
        Ok(m)
    }

    /// Writes the canonical score directly. Both claims are rewritten to agree
    /// with it, keeping any performance figures already reported. 0:0 clears
    /// the match like [`Self::reset`].
    pub fn force_set(
        &self,
        match_id: MatchId,
        admin_id: PlayerId,
        legs_a: i32,
        legs_b: i32,
    ) -> LeagueResult<Match> {
        require_admin(self.store, admin_id)?;
        check_result(self.settings, legs_a, legs_b)?;

        let score = Score::new(legs_a, legs_b);
        if score.is_blank() {
            return self.reset(match_id, admin_id);
        }

        let m = self.load_match(match_id)?;
        let agreed = |side: Side, legs_self: i32, legs_opponent: i32| Claim {
            legs_self,
            legs_opponent,
            performance: m.claim(side).map(|c| c.performance).unwrap_or_default(),
        };
        let claim_a = agreed(Side::A, legs_a, legs_b);
        let claim_b = agreed(Side::B, legs_b, legs_a);

        // Never writes `confirmed`; only the guarded transition below sets it
        if !self.store.overwrite_claims(m.id, &claim_a, &claim_b, score)? {
            return Err(LeagueError::MatchNotFound(m.id));
        }
        StatisticsAggregator::new(self.store).confirm(m.id, score)?;

        info!("Admin {} set match {} to {}:{}", admin_id, m.id, legs_a, legs_b);
        self.load_match(m.id)
    }

    fn load_match(&self, match_id: MatchId) -> LeagueResult<Match> {
        self.store
            .get_match(match_id)?
            .ok_or(LeagueError::MatchNotFound(match_id))
    }
}
