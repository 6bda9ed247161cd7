use serde::{Deserialize, Serialize};

use crate::domain::PlayerId;

/// One line of the league table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub player_id: PlayerId,
    pub name: String,
    pub played: i32,
    pub points: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub legs_won: i32,
    pub legs_lost: i32,
    pub leg_diff: i32,
}

impl StandingRow {
    pub fn new(player_id: PlayerId, name: &str) -> Self {
        Self {
            player_id,
            name: name.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry<T> {
    pub player_id: PlayerId,
    pub name: String,
    pub value: T,
}

/// League-wide top players per statistic, best first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboards {
    pub shortlegs: Vec<LeaderboardEntry<u32>>,
    pub high_finishes: Vec<LeaderboardEntry<u32>>,
    pub one_eighties: Vec<LeaderboardEntry<u32>>,
    pub averages: Vec<LeaderboardEntry<f64>>,
}
