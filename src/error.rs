use thiserror::Error;

use crate::bracket::PlayoffRound;
use crate::config::ConfigError;
use crate::game::{GameId, SeasonType};
use crate::team::{Conference, TeamId};

/// Boxed error returned by external game sources.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum StandingsError {
    #[error("unknown conference `{0}`")]
    UnknownConference(String),

    #[error("unknown game status `{0}`")]
    UnknownStatus(String),

    #[error("invalid season type {0}; expected 1 (preseason), 2 (regular) or 3 (postseason)")]
    InvalidSeasonType(u8),

    #[error("{season_type} games cannot be used for standings or seeding")]
    UnsupportedSeasonType { season_type: SeasonType },

    #[error("game {game_id} is marked completed but has no final score")]
    MissingScore { game_id: GameId },

    #[error("game {game_id} lists team {team_id} as both home and away")]
    SelfMatch { game_id: GameId, team_id: TeamId },

    #[error("team {team_id} appears as both `{first}` and `{second}`")]
    InconsistentTeam {
        team_id: TeamId,
        first: String,
        second: String,
    },

    #[error("game {game_id} belongs to {found}, expected {expected}")]
    MixedSeasons {
        game_id: GameId,
        expected: String,
        found: String,
    },

    #[error("point totals for team {team_id} overflow")]
    PointsOverflow { team_id: TeamId },

    #[error("{conference} {round} round is missing seed {seed}")]
    MissingSeed {
        conference: Conference,
        round: PlayoffRound,
        seed: u8,
    },

    #[error("team {team_id} plays in the {round} round but holds no playoff seed")]
    UnseededTeam { team_id: TeamId, round: PlayoffRound },

    #[error("{conference} {round} round has {teams} surviving teams, which cannot be paired")]
    UnpairableRound {
        conference: Conference,
        round: PlayoffRound,
        teams: usize,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to load games for season {season_year}: {source}")]
    Source {
        season_year: u16,
        #[source]
        source: SourceError,
    },

    #[error("failed to serialize bracket: {0}")]
    Serialize(#[from] serde_json::Error),
}
