mod leaders;
mod matchup;
mod player_stats;
mod scoreboard;
mod standings;
mod team_profile;

pub use leaders::{LeaderStat, LeagueLeaders, LeagueLeadersEntrypoint, LeagueLeadersInput};
pub use matchup::{Matchup, MatchupEntrypoint, MatchupInput};
pub use player_stats::{PlayerStatsEntrypoint, PlayerStatsInput};
pub use scoreboard::{ScoreboardEntrypoint, ScoreboardInput};
pub use standings::{Conference, StandingsEntrypoint, StandingsInput, StandingsOutput};
pub use team_profile::{TeamProfile, TeamProfileEntrypoint, TeamProfileInput};
