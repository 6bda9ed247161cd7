pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod report;
pub mod scoring;
pub mod services;
pub mod store;

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::database::SqliteStore;
use crate::domain::{MatchId, MatchState, NewPlayer, PlayerId, PlayerStats};
use crate::services::snapshot;
use crate::services::{LeagueService, Submission, SubmissionReconciler};
use crate::store::LeagueStore;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn open_store(config: &AppConfig) -> Result<SqliteStore> {
    SqliteStore::open(&config.database_path)
}

pub fn handle_init(config: &AppConfig) -> Result<()> {
    let store = open_store(config)?;
    store.reset()
}

pub fn handle_register(config: &AppConfig, player: NewPlayer) -> Result<()> {
    let store = open_store(config)?;
    let created = LeagueService::new(&store, &config.league).register_player(&player)?;
    println!("Registered {} with id {}", created.name, created.id);
    Ok(())
}

pub fn handle_create_matchday(
    config: &AppConfig,
    admin: PlayerId,
    week: i32,
    start: NaiveDate,
) -> Result<()> {
    let store = open_store(config)?;
    let matchday =
        LeagueService::new(&store, &config.league).create_matchday(admin, week, start)?;
    println!(
        "Matchday {} for week {} runs {} to {}",
        matchday.id, matchday.week, matchday.start_date, matchday.end_date
    );
    Ok(())
}

pub fn handle_list_matchdays(config: &AppConfig) -> Result<()> {
    let store = open_store(config)?;
    let overview = LeagueService::new(&store, &config.league).list_matchdays()?;
    let players = store.list_players()?;
    print!("{}", report::matchdays(&overview, &players));
    Ok(())
}

pub fn handle_delete_matchday(config: &AppConfig, admin: PlayerId, id: i32) -> Result<()> {
    let store = open_store(config)?;
    LeagueService::new(&store, &config.league).delete_matchday(admin, id)?;
    println!("Deleted matchday {id}");
    Ok(())
}

pub fn handle_create_match(
    config: &AppConfig,
    admin: PlayerId,
    matchday: i32,
    player_a: PlayerId,
    player_b: PlayerId,
) -> Result<()> {
    let store = open_store(config)?;
    let created = LeagueService::new(&store, &config.league)
        .create_match(admin, matchday, player_a, player_b)?;
    println!("Created match {}", created.id);
    Ok(())
}

pub fn handle_delete_match(config: &AppConfig, admin: PlayerId, id: MatchId) -> Result<()> {
    let store = open_store(config)?;
    LeagueService::new(&store, &config.league).delete_match(admin, id)?;
    println!("Deleted match {id}");
    Ok(())
}

pub fn handle_submit(config: &AppConfig, submission: &Submission) -> Result<()> {
    let store = open_store(config)?;
    let state = SubmissionReconciler::new(&store, &config.league).submit(submission)?;

    match state {
        MatchState::Confirmed => println!("Result confirmed"),
        MatchState::Mismatch => println!(
            "Reports disagree, an admin has to resolve match {}",
            submission.match_id
        ),
        _ => println!("Result recorded, waiting for the opponent"),
    }
    Ok(())
}

pub fn handle_reset(config: &AppConfig, admin: PlayerId, match_id: MatchId) -> Result<()> {
    let store = open_store(config)?;
    SubmissionReconciler::new(&store, &config.league).reset(match_id, admin)?;
    println!("Match {match_id} reopened");
    Ok(())
}

pub fn handle_force_score(
    config: &AppConfig,
    admin: PlayerId,
    match_id: MatchId,
    legs_a: i32,
    legs_b: i32,
) -> Result<()> {
    let store = open_store(config)?;
    let m = SubmissionReconciler::new(&store, &config.league)
        .force_set(match_id, admin, legs_a, legs_b)?;
    println!(
        "Match {} is {} ({}:{})",
        m.id,
        m.state().as_str(),
        m.score.legs_a,
        m.score.legs_b
    );
    Ok(())
}

pub fn handle_set_stats(
    config: &AppConfig,
    admin: PlayerId,
    player: PlayerId,
    stats: PlayerStats,
) -> Result<()> {
    let store = open_store(config)?;
    let updated =
        LeagueService::new(&store, &config.league).overwrite_stats(admin, player, stats)?;
    println!("Updated stats of {}", updated.name);
    Ok(())
}

pub fn handle_standings(config: &AppConfig) -> Result<()> {
    let store = open_store(config)?;
    let rows = LeagueService::new(&store, &config.league).standings()?;
    print!("{}", report::standings_table(&rows));
    Ok(())
}

pub fn handle_statistics(config: &AppConfig) -> Result<()> {
    let store = open_store(config)?;
    let boards = LeagueService::new(&store, &config.league).leaderboards()?;
    print!("{}", report::leaderboards(&boards));
    Ok(())
}

pub fn handle_export(config: &AppConfig, path: &Path) -> Result<()> {
    let store = open_store(config)?;
    snapshot::export_snapshot(&store, path)?;
    Ok(())
}

pub fn handle_import(config: &AppConfig, path: &Path) -> Result<()> {
    let store = open_store(config)?;
    snapshot::import_snapshot(&store, path)?;
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

/// Stats block for an admin overwrite; a given average restarts the running mean from one sample
pub fn overwritten_stats(
    shortleg_best: u32,
    one_eighties: u32,
    high_finish_best: u32,
    average: f64,
) -> PlayerStats {
    let (average_total, average_count) = if average > 0.0 {
        (average.round() as u64, 1)
    } else {
        (0, 0)
    };

    PlayerStats {
        shortleg_best,
        one_eighties_total: one_eighties,
        high_finish_best,
        average_best: average,
        average_total,
        average_count,
    }
}
