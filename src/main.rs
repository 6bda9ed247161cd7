use anyhow::Result;

use dart_league::cli::Command;
use dart_league::config::settings::AppConfig;
use dart_league::domain::{NewPlayer, Performance};
use dart_league::services::Submission;
use dart_league::*;

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    let config = AppConfig::new();
    execute_command(&command, &config)
}

fn execute_command(command: &Command, config: &AppConfig) -> Result<()> {
    match command {
        Command::Init => handle_init(config),
        Command::Register {
            name,
            email,
            admin,
            test_account,
        } => handle_register(
            config,
            NewPlayer {
                name: name.clone(),
                email: email.clone(),
                is_admin: *admin,
                is_test_account: *test_account,
            },
        ),
        Command::CreateMatchday { admin, week, start } => {
            handle_create_matchday(config, *admin, *week, *start)
        }
        Command::ListMatchdays => handle_list_matchdays(config),
        Command::DeleteMatchday { admin, id } => handle_delete_matchday(config, *admin, *id),
        Command::CreateMatch {
            admin,
            matchday,
            player_a,
            player_b,
        } => handle_create_match(config, *admin, *matchday, *player_a, *player_b),
        Command::DeleteMatch { admin, id } => handle_delete_match(config, *admin, *id),
        Command::Submit {
            match_id,
            player,
            legs_self,
            legs_opponent,
            shortlegs,
            one_eighties,
            high_finish,
            average,
        } => handle_submit(
            config,
            &Submission {
                match_id: *match_id,
                acting_player_id: *player,
                legs_self: *legs_self,
                legs_opponent: *legs_opponent,
                performance: Performance {
                    shortlegs: *shortlegs,
                    one_eighties: *one_eighties,
                    high_finish: *high_finish,
                    average: *average,
                },
            },
        ),
        Command::Reset { admin, match_id } => handle_reset(config, *admin, *match_id),
        Command::ForceScore {
            admin,
            match_id,
            legs_a,
            legs_b,
        } => handle_force_score(config, *admin, *match_id, *legs_a, *legs_b),
        Command::SetStats {
            admin,
            player,
            shortleg_best,
            one_eighties,
            high_finish_best,
            average,
        } => handle_set_stats(
            config,
            *admin,
            *player,
            overwritten_stats(*shortleg_best, *one_eighties, *high_finish_best, *average),
        ),
        Command::Standings => handle_standings(config),
        Command::Statistics => handle_statistics(config),
        Command::Export { path } => handle_export(config, path),
        Command::Import { path } => handle_import(config, path),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
