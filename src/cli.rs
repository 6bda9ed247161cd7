use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "dart league result tracking")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Drop and recreate all league tables
    Init,
    /// Register a new player
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        admin: bool,
        /// Exclude the player from statistics and standings
        #[arg(long)]
        test_account: bool,
    },
    /// Create the matchday for a week (start date is the Monday)
    CreateMatchday {
        #[arg(long)]
        admin: i32,
        #[arg(long)]
        week: i32,
        /// First day, YYYY-MM-DD
        #[arg(long)]
        start: NaiveDate,
    },
    /// List matchdays with their matches, newest first
    ListMatchdays,
    /// Delete a matchday together with its matches
    DeleteMatchday {
        #[arg(long)]
        admin: i32,
        #[arg(long)]
        id: i32,
    },
    /// Pair two players on a matchday
    CreateMatch {
        #[arg(long)]
        admin: i32,
        #[arg(long)]
        matchday: i32,
        #[arg(long)]
        player_a: i32,
        #[arg(long)]
        player_b: i32,
    },
    /// Delete a single match
    DeleteMatch {
        #[arg(long)]
        admin: i32,
        #[arg(long)]
        id: i32,
    },
    /// Report a result from the acting player's perspective
    Submit {
        #[arg(long = "match")]
        match_id: i32,
        #[arg(long)]
        player: i32,
        #[arg(long)]
        legs_self: i32,
        #[arg(long)]
        legs_opponent: i32,
        #[arg(long, default_value_t = 0)]
        shortlegs: u32,
        #[arg(long, default_value_t = 0)]
        one_eighties: u32,
        #[arg(long, default_value_t = 0)]
        high_finish: u32,
        #[arg(long, default_value_t = 0)]
        average: u32,
    },
    /// Clear both reports of a match (statistics are not retracted)
    Reset {
        #[arg(long)]
        admin: i32,
        #[arg(long = "match")]
        match_id: i32,
    },
    /// Set the final score directly; 0:0 clears the match
    ForceScore {
        #[arg(long)]
        admin: i32,
        #[arg(long = "match")]
        match_id: i32,
        #[arg(long)]
        legs_a: i32,
        #[arg(long)]
        legs_b: i32,
    },
    /// Overwrite a player's statistics
    SetStats {
        #[arg(long)]
        admin: i32,
        #[arg(long)]
        player: i32,
        #[arg(long, default_value_t = 0)]
        shortleg_best: u32,
        #[arg(long, default_value_t = 0)]
        one_eighties: u32,
        #[arg(long, default_value_t = 0)]
        high_finish_best: u32,
        #[arg(long, default_value_t = 0.0)]
        average: f64,
    },
    /// Print the league table
    Standings,
    /// Print the top players per statistic
    Statistics,
    /// Write all league records to a JSON file
    Export { path: PathBuf },
    /// Load league records from a JSON file
    Import { path: PathBuf },
    /// Print shell completions
    Completions { shell: Shell },
}
