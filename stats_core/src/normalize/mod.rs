//! Pure upstream payload → record transformations.
//!
//! Normalizers are total: malformed or partially populated payloads produce
//! records with absent fields, never errors.

pub mod json;
pub mod stats;

mod game;
mod leaderboard;
mod player;
mod standings;
mod team;

pub use game::{normalize_event, normalize_schedule, normalize_scoreboard};
pub use leaderboard::{apply_ranking_policy, normalize_leaderboard, RankingError};
pub use player::normalize_player;
pub use standings::normalize_standings;
pub use team::{normalize_roster, normalize_team};
