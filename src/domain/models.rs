use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type PlayerId = i32;
pub type MatchdayId = i32;
pub type MatchId = i32;

/// Number of slots in every per-player top list
pub const TOP_SLOTS: usize = 3;

/// Days between the first and the last day of a matchday (Monday to Sunday)
pub const MATCHDAY_SPAN_DAYS: i64 = 6;

/// Cumulative statistics of a player, folded from confirmed matches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    /// Fewest darts for a leg; 0 means unset
    pub shortleg_best: u32,
    pub one_eighties_total: u32,
    pub high_finish_best: u32,
    /// Running mean of reported averages (not a maximum)
    pub average_best: f64,
    pub average_total: u64,
    pub average_count: u32,
}

impl PlayerStats {
    pub fn shortleg(&self) -> Option<u32> {
        (self.shortleg_best > 0).then_some(self.shortleg_best)
    }
}

/// Fixed-length, zero-padded personal top lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopStats {
    /// Ascending, best (smallest) first
    pub top_shortlegs: [u32; TOP_SLOTS],
    /// Descending, best (largest) first
    pub top_high_finishes: [u32; TOP_SLOTS],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub email: String,
    pub stats: PlayerStats,
    pub top_stats: TopStats,
    pub is_admin: bool,
    pub is_test_account: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlayer {
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub is_test_account: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matchday {
    pub id: MatchdayId,
    pub week: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Matchday {
    pub fn end_for(start_date: NaiveDate) -> NaiveDate {
        start_date + Duration::days(MATCHDAY_SPAN_DAYS)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewMatchday {
    pub week: i32,
    pub start_date: NaiveDate,
}

/// Per-match figures one player reports about their own play.
/// A zero means "not applicable / not reported".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Performance {
    pub shortlegs: u32,
    pub one_eighties: u32,
    pub high_finish: u32,
    pub average: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Side::A => "a",
            Side::B => "b",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side's independent view of the result, written without seeing the other side's
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub legs_self: i32,
    pub legs_opponent: i32,
    pub performance: Performance,
}

/// Agreed (legs of player A, legs of player B)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub legs_a: i32,
    pub legs_b: i32,
}

impl Score {
    pub fn new(legs_a: i32, legs_b: i32) -> Self {
        Self { legs_a, legs_b }
    }

    pub fn is_blank(&self) -> bool {
        self.legs_a == 0 && self.legs_b == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "side")]
pub enum MatchState {
    Open,
    PendingOne(Side),
    Confirmed,
    Mismatch,
}

impl MatchState {
    pub fn as_str(&self) -> &str {
        match self {
            MatchState::Open => "open",
            MatchState::PendingOne(_) => "pending",
            MatchState::Confirmed => "confirmed",
            MatchState::Mismatch => "mismatch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub matchday_id: MatchdayId,
    pub player_a: PlayerId,
    pub player_b: PlayerId,
    pub claim_a: Option<Claim>,
    pub claim_b: Option<Claim>,
    pub confirmed: bool,
    /// Canonical score; 0:0 until confirmed or force-set
    pub score: Score,
}

impl Match {
    pub fn side_of(&self, player_id: PlayerId) -> Option<Side> {
        if player_id == self.player_a {
            Some(Side::A)
        } else if player_id == self.player_b {
            Some(Side::B)
        } else {
            None
        }
    }

    pub fn player(&self, side: Side) -> PlayerId {
        match side {
            Side::A => self.player_a,
            Side::B => self.player_b,
        }
    }

    pub fn claim(&self, side: Side) -> Option<&Claim> {
        match side {
            Side::A => self.claim_a.as_ref(),
            Side::B => self.claim_b.as_ref(),
        }
    }

    pub fn set_claim(&mut self, side: Side, claim: Option<Claim>) {
        match side {
            Side::A => self.claim_a = claim,
            Side::B => self.claim_b = claim,
        }
    }

    pub fn is_submitted(&self, side: Side) -> bool {
        self.claim(side).is_some()
    }

    /// Canonical score both claims agree on, if both exist and agree.
    /// A's "my legs" must equal B's "opponent legs" and vice versa.
    pub fn agreed_score(&self) -> Option<Score> {
        let (a, b) = (self.claim_a.as_ref()?, self.claim_b.as_ref()?);
        (a.legs_self == b.legs_opponent && a.legs_opponent == b.legs_self)
            .then(|| Score::new(a.legs_self, a.legs_opponent))
    }

    /// Both claims on an unconfirmed match read as `Mismatch`: agreeing
    /// claims are confirmed by the submission that completes the pair.
    pub fn state(&self) -> MatchState {
        if self.confirmed {
            return MatchState::Confirmed;
        }
        match (self.is_submitted(Side::A), self.is_submitted(Side::B)) {
            (false, false) => MatchState::Open,
            (true, false) => MatchState::PendingOne(Side::A),
            (false, true) => MatchState::PendingOne(Side::B),
            (true, true) => MatchState::Mismatch,
        }
    }

    /// Back to the freshly created state: no claims, not confirmed, 0:0
    pub fn clear(&mut self) {
        self.claim_a = None;
        self.claim_b = None;
        self.confirmed = false;
        self.score = Score::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewMatch {
    pub matchday_id: MatchdayId,
    pub player_a: PlayerId,
    pub player_b: PlayerId,
}

/// Matchday together with its matches, for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchdayOverview {
    pub matchday: Matchday,
    pub matches: Vec<Match>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(legs_self: i32, legs_opponent: i32) -> Claim {
        Claim {
            legs_self,
            legs_opponent,
            performance: Performance::default(),
        }
    }

    fn open_match() -> Match {
        Match {
            id: 1,
            matchday_id: 1,
            player_a: 10,
            player_b: 20,
            claim_a: None,
            claim_b: None,
            confirmed: false,
            score: Score::default(),
        }
    }

    #[test]
    fn test_matchday_spans_one_week() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let matchday = Matchday {
            id: 1,
            week: 1,
            start_date: start,
            end_date: Matchday::end_for(start),
        };

        assert_eq!(matchday.end_date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert!(matchday.contains(start));
        assert!(matchday.contains(matchday.end_date));
        assert!(!matchday.contains(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()));
    }

    #[test]
    fn test_state_follows_claims() {
        let mut m = open_match();
        assert_eq!(m.state(), MatchState::Open);

        m.claim_b = Some(claim(6, 3));
        assert_eq!(m.state(), MatchState::PendingOne(Side::B));

        m.claim_a = Some(claim(6, 3));
        assert_eq!(m.state(), MatchState::Mismatch);
        assert_eq!(m.agreed_score(), None);

        m.claim_a = Some(claim(3, 6));
        assert_eq!(m.agreed_score(), Some(Score::new(3, 6)));
    }

    #[test]
    fn test_side_lookup() {
        let m = open_match();
        assert_eq!(m.side_of(10), Some(Side::A));
        assert_eq!(m.side_of(20), Some(Side::B));
        assert_eq!(m.side_of(30), None);
        assert_eq!(m.player(Side::A.opponent()), 20);
    }
}
