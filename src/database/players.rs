use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use super::connection::DbConn;
use crate::domain::{NewPlayer, Player, PlayerId, PlayerStats, TOP_SLOTS, TopStats};

const PLAYER_COLUMNS: &str = "id, name, email, is_admin, is_test_account, shortleg_best, one_eighties_total, high_finish_best, average_best, average_total, average_count, top_shortlegs, top_high_finishes";

pub fn insert_player(conn: &mut DbConn, player: &NewPlayer) -> Result<Player> {
    let sql = format!(
        "INSERT INTO players (name, email, is_admin, is_test_account) VALUES (?1, ?2, ?3, ?4) RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![player.name, player.email, player.is_admin, player.is_test_account],
        parse_player_row,
    )
    .context("Failed to insert new player")
}

/// Writes the whole record, keeping the id
pub fn upsert_player(conn: &Connection, player: &Player) -> Result<()> {
    let sql = "INSERT INTO players (id, name, email, is_admin, is_test_account, shortleg_best, one_eighties_total, high_finish_best, average_best, average_total, average_count, top_shortlegs, top_high_finishes)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            email = excluded.email,
            is_admin = excluded.is_admin,
            is_test_account = excluded.is_test_account,
            shortleg_best = excluded.shortleg_best,
            one_eighties_total = excluded.one_eighties_total,
            high_finish_best = excluded.high_finish_best,
            average_best = excluded.average_best,
            average_total = excluded.average_total,
            average_count = excluded.average_count,
            top_shortlegs = excluded.top_shortlegs,
            top_high_finishes = excluded.top_high_finishes";

    let stats = &player.stats;
    conn.execute(
        sql,
        params![
            player.id,
            player.name,
            player.email,
            player.is_admin,
            player.is_test_account,
            stats.shortleg_best,
            stats.one_eighties_total,
            stats.high_finish_best,
            stats.average_best,
            stats.average_total as i64,
            stats.average_count,
            encode_slots(&player.top_stats.top_shortlegs)?,
            encode_slots(&player.top_stats.top_high_finishes)?,
        ],
    )
    .with_context(|| format!("Failed to write player {}", player.id))?;

    Ok(())
}

pub fn find_by_id(conn: &Connection, id: PlayerId) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    let average_total: i64 = row.get(9)?;

    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        is_admin: row.get(3)?,
        is_test_account: row.get(4)?,
        stats: PlayerStats {
            shortleg_best: row.get(5)?,
            one_eighties_total: row.get(6)?,
            high_finish_best: row.get(7)?,
            average_best: row.get(8)?,
            average_total: average_total.max(0) as u64,
            average_count: row.get(10)?,
        },
        top_stats: TopStats {
            top_shortlegs: decode_slots(row, 11)?,
            top_high_finishes: decode_slots(row, 12)?,
        },
    })
}

fn encode_slots(slots: &[u32; TOP_SLOTS]) -> Result<String> {
    serde_json::to_string(slots).context("Failed to serialize top list")
}

fn decode_slots(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<[u32; TOP_SLOTS]> {
    let json: String = row.get(idx)?;
    serde_json::from_str(&json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::{create_memory_pool, get_connection};
    use crate::database::setup::ensure_schema;

    fn new_player(name: &str) -> NewPlayer {
        NewPlayer {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            is_admin: false,
            is_test_account: false,
        }
    }

    #[test]
    fn test_insert_starts_with_blank_stats() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        ensure_schema(&mut conn).unwrap();

        let player = insert_player(&mut conn, &new_player("Anna")).unwrap();

        assert_eq!(player.name, "Anna");
        assert_eq!(player.stats, PlayerStats::default());
        assert_eq!(player.top_stats.top_shortlegs, [0, 0, 0]);
    }

    #[test]
    fn test_upsert_overwrites_stats() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        ensure_schema(&mut conn).unwrap();

        let mut player = insert_player(&mut conn, &new_player("Ben")).unwrap();
        player.stats.shortleg_best = 13;
        player.stats.average_best = 64.5;
        player.stats.average_total = 129;
        player.stats.average_count = 2;
        player.top_stats.top_high_finishes = [120, 80, 0];
        upsert_player(&conn, &player).unwrap();

        let loaded = find_by_id(&conn, player.id).unwrap().unwrap();
        assert_eq!(loaded, player);
        assert_eq!(list_all(&mut conn).unwrap().len(), 1);
    }
}
