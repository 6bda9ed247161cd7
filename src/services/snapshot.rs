use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::{Match, Matchday, Player};
use crate::store::LeagueStore;

/// Every stored record of the league. Standings are derived, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub players: Vec<Player>,
    pub matchdays: Vec<Matchday>,
    pub matches: Vec<Match>,
}

impl Snapshot {
    pub fn capture<S: LeagueStore>(store: &S) -> Result<Self> {
        Ok(Self {
            players: store.list_players()?,
            matchdays: store.list_matchdays()?,
            matches: store.list_matches()?,
        })
    }

    /// Upserts every record by id; players and matchdays go first so matches can reference them
    pub fn restore<S: LeagueStore>(&self, store: &S) -> Result<()> {
        for player in &self.players {
            store.put_player(player)?;
        }
        for matchday in &self.matchdays {
            store.put_matchday(matchday)?;
        }
        for m in &self.matches {
            store.put_match(m)?;
        }
        Ok(())
    }
}

pub fn export_snapshot<S: LeagueStore, P: AsRef<Path>>(store: &S, path: P) -> Result<Snapshot> {
    let snapshot = Snapshot::capture(store)?;
    let file_path = path.as_ref();

    let json = serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?;
    fs::write(file_path, json)
        .with_context(|| format!("Failed to write snapshot file {}", file_path.display()))?;

    info!(
        "Exported {} players, {} matchdays, {} matches to {}",
        snapshot.players.len(),
        snapshot.matchdays.len(),
        snapshot.matches.len(),
        file_path.display()
    );
    Ok(snapshot)
}

pub fn import_snapshot<S: LeagueStore, P: AsRef<Path>>(store: &S, path: P) -> Result<Snapshot> {
    let file_path = path.as_ref();

    let json = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read snapshot file {}", file_path.display()))?;
    let snapshot: Snapshot =
        serde_json::from_str(&json).context("Failed to deserialize snapshot")?;

    snapshot.restore(store)?;

    info!(
        "Imported {} players, {} matchdays, {} matches from {}",
        snapshot.players.len(),
        snapshot.matchdays.len(),
        snapshot.matches.len(),
        file_path.display()
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SqliteStore;
    use crate::domain::{Claim, NewMatch, NewMatchday, NewPlayer, Performance};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn populate<S: LeagueStore>(store: &S) {
        let anna = store
            .insert_player(&NewPlayer {
                name: "Anna".to_string(),
                email: "anna@example.com".to_string(),
                is_admin: true,
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
                week: 3,
                start_date: NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
            })
            .unwrap();
        let mut m = store
            .insert_match(&NewMatch {
                matchday_id: matchday.id,
                player_a: anna.id,
                player_b: ben.id,
            })
            .unwrap();
        m.claim_b = Some(Claim {
            legs_self: 6,
            legs_opponent: 4,
            performance: Performance {
                one_eighties: 2,
                ..Performance::default()
            },
        });
        store.put_match(&m).unwrap();
    }

    #[test]
    fn test_snapshot_moves_league_between_stores() {
        let source = MemoryStore::new();
        populate(&source);
        let path = std::env::temp_dir().join("dart_league_snapshot_test.json");

        let exported = export_snapshot(&source, &path).unwrap();

        let target = SqliteStore::in_memory().unwrap();
        let imported = import_snapshot(&target, &path).unwrap();

        assert_eq!(imported, exported);
        assert_eq!(Snapshot::capture(&target).unwrap(), exported);

        // Cleanup
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let store = MemoryStore::new();
        let path = std::env::temp_dir().join("dart_league_no_such_snapshot.json");

        assert!(import_snapshot(&store, &path).is_err());
    }
}
