use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, params};

use super::connection::DbConn;
use crate::domain::{Matchday, MatchdayId, NewMatchday};

const MATCHDAY_COLUMNS: &str = "id, week, start_date, end_date";

pub fn insert_matchday(conn: &mut DbConn, matchday: &NewMatchday) -> Result<Matchday> {
    let sql = format!(
        "INSERT INTO matchdays (week, start_date, end_date) VALUES (?1, ?2, ?3) RETURNING {MATCHDAY_COLUMNS}"
    );
    let end_date = Matchday::end_for(matchday.start_date);

    conn.query_row(
        &sql,
        params![matchday.week, matchday.start_date, end_date],
        parse_matchday_row,
    )
    .context("Failed to insert new matchday")
}

pub fn upsert_matchday(conn: &mut DbConn, matchday: &Matchday) -> Result<()> {
    let sql = "INSERT INTO matchdays (id, week, start_date, end_date) VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(id) DO UPDATE SET week = excluded.week, start_date = excluded.start_date, end_date = excluded.end_date";

    conn.execute(
        sql,
        params![matchday.id, matchday.week, matchday.start_date, matchday.end_date],
    )
    .with_context(|| format!("Failed to write matchday {}", matchday.id))?;
    Ok(())
}

pub fn find_by_id(conn: &mut DbConn, id: MatchdayId) -> Result<Option<Matchday>> {
    let sql = format!("SELECT {MATCHDAY_COLUMNS} FROM matchdays WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_matchday_row)
        .optional()
        .context("Failed to query matchday by id")
}

pub fn find_by_week(conn: &mut DbConn, week: i32) -> Result<Option<Matchday>> {
    let sql = format!("SELECT {MATCHDAY_COLUMNS} FROM matchdays WHERE week = ?1");

    conn.query_row(&sql, params![week], parse_matchday_row)
        .optional()
        .context("Failed to query matchday by week")
}

/// Newest week first
pub fn list_all(conn: &mut DbConn) -> Result<Vec<Matchday>> {
    let sql = format!("SELECT {MATCHDAY_COLUMNS} FROM matchdays ORDER BY week DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_matchday_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Deletes the matchday and its matches in one transaction
pub fn delete_with_matches(conn: &mut DbConn, id: MatchdayId) -> Result<bool> {
    let tx = conn
        .transaction()
        .context("Failed to start matchday deletion")?;

    let removed_matches = tx
        .execute("DELETE FROM matches WHERE matchday_id = ?1", params![id])
        .context("Failed to delete matches of matchday")?;
    let removed = tx
        .execute("DELETE FROM matchdays WHERE id = ?1", params![id])
        .context("Failed to delete matchday")?;

    tx.commit().context("Failed to commit matchday deletion")?;

    log::debug!("Deleted matchday {} with {} matches", id, removed_matches);
    Ok(removed > 0)
}

fn parse_matchday_row(row: &rusqlite::Row) -> rusqlite::Result<Matchday> {
    Ok(Matchday {
        id: row.get(0)?,
        week: row.get(1)?,
        start_date: row.get(2)?,
        end_date: row.get(3)?,
    })
}
