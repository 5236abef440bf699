//! Entity resolution and upstream payload normalization for NBA statistics.

pub mod normalize;
pub mod resolver;
pub mod teams;
pub mod types;

pub use config_manager::RankingPolicy;
pub use normalize::{
    apply_ranking_policy, normalize_event, normalize_leaderboard, normalize_player,
    normalize_roster, normalize_schedule, normalize_scoreboard, normalize_standings,
    normalize_team, RankingError,
};
pub use resolver::{
    normalize_identifier, AliasConflict, AliasTable, EntityResolver, IdPattern, ResolveError,
    ResolvedEntity,
};
pub use teams::{
    nba_alias_table, nba_team_resolver, player_resolver, with_extra_aliases, ExtraAliasError,
};
pub use types::*;
