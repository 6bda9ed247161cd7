use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use super::connection::DbConn;
use crate::domain::{Claim, Match, MatchId, NewMatch, Performance, Score, Side};

const MATCH_COLUMNS: &str = "id, matchday_id, player_a_id, player_b_id, \
    a_submitted, a_legs_self, a_legs_opponent, a_shortlegs, a_one_eighties, a_high_finish, a_average, \
    b_submitted, b_legs_self, b_legs_opponent, b_shortlegs, b_one_eighties, b_high_finish, b_average, \
    confirmed, legs_a, legs_b";

const CLAIM_A_OFFSET: usize = 4;
const CLAIM_B_OFFSET: usize = 11;

pub fn insert_match(conn: &mut DbConn, new_match: &NewMatch) -> Result<Match> {
    let sql = format!(
        "INSERT INTO matches (matchday_id, player_a_id, player_b_id) VALUES (?1, ?2, ?3) RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![new_match.matchday_id, new_match.player_a, new_match.player_b],
        parse_match_row,
    )
    .context("Failed to insert new match")
}

/// Writes the whole reconciliation record, keeping the id
pub fn upsert_match(conn: &mut DbConn, m: &Match) -> Result<()> {
    let sql = format!(
        "INSERT INTO matches ({MATCH_COLUMNS})
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)
        ON CONFLICT(id) DO UPDATE SET
            matchday_id = excluded.matchday_id,
            player_a_id = excluded.player_a_id,
            player_b_id = excluded.player_b_id,
            a_submitted = excluded.a_submitted,
            a_legs_self = excluded.a_legs_self,
            a_legs_opponent = excluded.a_legs_opponent,
            a_shortlegs = excluded.a_shortlegs,
            a_one_eighties = excluded.a_one_eighties,
            a_high_finish = excluded.a_high_finish,
            a_average = excluded.a_average,
            b_submitted = excluded.b_submitted,
            b_legs_self = excluded.b_legs_self,
            b_legs_opponent = excluded.b_legs_opponent,
            b_shortlegs = excluded.b_shortlegs,
            b_one_eighties = excluded.b_one_eighties,
            b_high_finish = excluded.b_high_finish,
            b_average = excluded.b_average,
            confirmed = excluded.confirmed,
            legs_a = excluded.legs_a,
            legs_b = excluded.legs_b"
    );

    let a = ClaimColumns::from(m.claim_a.as_ref());
    let b = ClaimColumns::from(m.claim_b.as_ref());

    conn.execute(
        &sql,
        params![
            m.id,
            m.matchday_id,
            m.player_a,
            m.player_b,
            a.submitted,
            a.legs_self,
            a.legs_opponent,
            a.shortlegs,
            a.one_eighties,
            a.high_finish,
            a.average,
            b.submitted,
            b.legs_self,
            b.legs_opponent,
            b.shortlegs,
            b.one_eighties,
            b.high_finish,
            b.average,
            m.confirmed,
            m.score.legs_a,
            m.score.legs_b,
        ],
    )
    .with_context(|| format!("Failed to write match {}", m.id))?;

    Ok(())
}

pub fn find_by_id(conn: &Connection, id: MatchId) -> Result<Option<Match>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_match_row)
        .optional()
        .context("Failed to query match by id")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Match>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches ORDER BY id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn delete_by_id(conn: &mut DbConn, id: MatchId) -> Result<bool> {
    let removed = conn
        .execute("DELETE FROM matches WHERE id = ?1", params![id])
        .context("Failed to delete match")?;
    Ok(removed > 0)
}

/// Fills one side's slot; a no-op when the slot is taken or the match is confirmed
pub fn record_claim(conn: &mut DbConn, id: MatchId, side: Side, claim: &Claim) -> Result<bool> {
    let p = side.as_str();
    let sql = format!(
        "UPDATE matches SET {p}_submitted = 1, {p}_legs_self = ?2, {p}_legs_opponent = ?3, \
        {p}_shortlegs = ?4, {p}_one_eighties = ?5, {p}_high_finish = ?6, {p}_average = ?7 \
        WHERE id = ?1 AND {p}_submitted = 0 AND confirmed = 0"
    );
    let perf = &claim.performance;

    let updated = conn
        .execute(
            &sql,
            params![
                id,
                claim.legs_self,
                claim.legs_opponent,
                perf.shortlegs,
                perf.one_eighties,
                perf.high_finish,
                perf.average,
            ],
        )
        .with_context(|| format!("Failed to record claim of side {} for match {}", p, id))?;

    Ok(updated == 1)
}

/// Rewrites both claim slots and the score; `confirmed` is left alone
pub fn overwrite_claims(
    conn: &mut DbConn,
    id: MatchId,
    claim_a: &Claim,
    claim_b: &Claim,
    score: Score,
) -> Result<bool> {
    let sql = "UPDATE matches SET
        a_submitted = ?2, a_legs_self = ?3, a_legs_opponent = ?4,
        a_shortlegs = ?5, a_one_eighties = ?6, a_high_finish = ?7, a_average = ?8,
        b_submitted = ?9, b_legs_self = ?10, b_legs_opponent = ?11,
        b_shortlegs = ?12, b_one_eighties = ?13, b_high_finish = ?14, b_average = ?15,
        legs_a = ?16, legs_b = ?17
        WHERE id = ?1";

    let a = ClaimColumns::from(Some(claim_a));
    let b = ClaimColumns::from(Some(claim_b));

    let updated = conn
        .execute(
            sql,
            params![
                id,
                a.submitted,
                a.legs_self,
                a.legs_opponent,
                a.shortlegs,
                a.one_eighties,
                a.high_finish,
                a.average,
                b.submitted,
                b.legs_self,
                b.legs_opponent,
                b.shortlegs,
                b.one_eighties,
                b.high_finish,
                b.average,
                score.legs_a,
                score.legs_b,
            ],
        )
        .with_context(|| format!("Failed to overwrite claims of match {}", id))?;

    Ok(updated == 1)
}

pub fn mark_confirmed(conn: &Connection, id: MatchId, score: Score) -> Result<bool> {
    let sql = "UPDATE matches SET confirmed = 1, legs_a = ?2, legs_b = ?3 WHERE id = ?1 AND confirmed = 0";

    let updated = conn
        .execute(sql, params![id, score.legs_a, score.legs_b])
        .with_context(|| format!("Failed to confirm match {}", id))?;

    Ok(updated == 1)
}

/// Nullable column values of one side's slot
struct ClaimColumns {
    submitted: bool,
    legs_self: Option<i32>,
    legs_opponent: Option<i32>,
    shortlegs: Option<u32>,
    one_eighties: Option<u32>,
    high_finish: Option<u32>,
    average: Option<u32>,
}

impl From<Option<&Claim>> for ClaimColumns {
    fn from(claim: Option<&Claim>) -> Self {
        Self {
            submitted: claim.is_some(),
            legs_self: claim.map(|c| c.legs_self),
            legs_opponent: claim.map(|c| c.legs_opponent),
            shortlegs: claim.map(|c| c.performance.shortlegs),
            one_eighties: claim.map(|c| c.performance.one_eighties),
            high_finish: claim.map(|c| c.performance.high_finish),
            average: claim.map(|c| c.performance.average),
        }
    }
}

fn parse_claim(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<Option<Claim>> {
    let submitted: bool = row.get(offset)?;
    if !submitted {
        return Ok(None);
    }

    let figure = |idx: usize| -> rusqlite::Result<u32> {
        Ok(row.get::<_, Option<u32>>(offset + idx)?.unwrap_or(0))
    };

    Ok(Some(Claim {
        legs_self: row.get::<_, Option<i32>>(offset + 1)?.unwrap_or(0),
        legs_opponent: row.get::<_, Option<i32>>(offset + 2)?.unwrap_or(0),
        performance: Performance {
            shortlegs: figure(3)?,
            one_eighties: figure(4)?,
            high_finish: figure(5)?,
            average: figure(6)?,
        },
    }))
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        matchday_id: row.get(1)?,
        player_a: row.get(2)?,
        player_b: row.get(3)?,
        claim_a: parse_claim(row, CLAIM_A_OFFSET)?,
        claim_b: parse_claim(row, CLAIM_B_OFFSET)?,
        confirmed: row.get(18)?,
        score: Score::new(row.get(19)?, row.get(20)?),
    })
}
