use anyhow::{Context, Result};

use super::connection::DbConn;

const SCHEMA_SQL: &str = include_str!("schema.sql");

const DROP_SQL: &str = "
    DROP TABLE IF EXISTS matches;
    DROP TABLE IF EXISTS matchdays;
    DROP TABLE IF EXISTS players;
";

/// Drops all league tables and recreates them empty
pub fn reset_database(conn: &mut DbConn) -> Result<()> {
    run_statements(conn, DROP_SQL)?;
    run_statements(conn, SCHEMA_SQL)?;

    log::info!("Database schema reset successfully");
    Ok(())
}

/// Creates missing tables, leaving existing data alone
pub fn ensure_schema(conn: &mut DbConn) -> Result<()> {
    run_statements(conn, SCHEMA_SQL)?;
    log::debug!("Database schema verified");
    Ok(())
}

fn run_statements(conn: &mut DbConn, sql: &str) -> Result<()> {
    let statements = split_sql_statements(sql);

    for (idx, statement) in statements.iter().enumerate() {
        execute_sql(conn, statement)
            .with_context(|| format!("Failed to execute statement {}", idx + 1))?;
    }
    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn execute_sql(conn: &mut DbConn, sql: &str) -> Result<()> {
    conn.execute(sql, [])
        .context("Failed to execute SQL statement")
        .map(|_| ())
}
