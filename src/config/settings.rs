#[derive(Debug, Clone, PartialEq)]
pub struct LeagueSettings {
    pub legs_to_win: i32,
    pub draw_legs: i32,
    pub points_for_win: i32,
    pub points_for_draw: i32,
    pub leaderboard_size: usize,
}

impl Default for LeagueSettings {
    fn default() -> Self {
        Self {
            legs_to_win: 6,
            draw_legs: 5,
            points_for_win: 3,
            points_for_draw: 1,
            leaderboard_size: 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub league: LeagueSettings,
    pub database_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            league: LeagueSettings::default(),
            database_path: database_path_from_env(),
        }
    }
}

fn database_path_from_env() -> String {
    std::env::var("DATABASE_PATH").unwrap_or_else(|_| "dart_league.db".to_string())
}
