//! Standings Core - regular-season standings, playoff seeding and brackets.
//!
//! This library turns a season's game results into win-loss standings,
//! breaks ties between teams, seeds each conference and builds the playoff
//! bracket. Python bindings via PyO3 are available behind the `python` feature.

pub mod bracket;
pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod projection;
pub mod record;
pub mod refresh;
pub mod season;
pub mod seeding;
pub mod standings;
pub mod team;
pub mod tiebreak;

#[cfg(feature = "python")]
mod python;

#[cfg(test)]
mod fixtures;

pub use bracket::{build_bracket, BracketRound, PlayoffBracket, PlayoffMatchup, PlayoffRound, PostseasonGame};
pub use config::{ConfigError, LeagueConfig};
pub use constants::{DIVISIONS_PER_CONFERENCE, PLAYOFF_TEAMS_PER_CONFERENCE, WILD_CARD_PAIRINGS};
pub use error::{SourceError, StandingsError};
pub use game::{GameId, GameRecord, GameStatus, SeasonType};
pub use projection::ProjectedBracketBuilder;
pub use record::{Outcome, Record};
pub use refresh::{RefreshTrigger, SeasonSource, StandingsRefresher};
pub use season::{SeasonReport, SeasonSnapshot};
pub use seeding::{
    apply_seeds, assign_seeds, division_standings, select_wild_cards, ConferenceSeeds, DivisionTable, SeedMap,
    SeededTeam,
};
pub use standings::{compute_standings, try_compute_standings, TeamStanding};
pub use team::{Conference, TeamId, TeamRef};
pub use tiebreak::{TieBreakContext, TieBreakMetric, TieBreakOrdering};
