pub mod leaderboard;
pub mod standings;
pub mod statistics;
pub mod types;
pub mod validator;

pub use leaderboard::compute_leaderboards;
pub use standings::compute_standings;
pub use statistics::apply_performance;
pub use types::{LeaderboardEntry, Leaderboards, StandingRow};
pub use validator::{ValidationError, check_result, check_submission, validate};
