use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StandingsError;
use crate::record::Outcome;
use crate::team::TeamRef;

pub type GameId = u64;

/// Season phase discriminator, numbered the way the schedule feed numbers it.
#[cfg_attr(feature = "python", pyo3::pyclass(eq, eq_int))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonType {
    Preseason = 1,
    Regular = 2,
    Postseason = 3,
}

impl SeasonType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for SeasonType {
    type Error = StandingsError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(SeasonType::Preseason),
            2 => Ok(SeasonType::Regular),
            3 => Ok(SeasonType::Postseason),
            other => Err(StandingsError::InvalidSeasonType(other)),
        }
    }
}

impl fmt::Display for SeasonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeasonType::Preseason => "preseason",
            SeasonType::Regular => "regular-season",
            SeasonType::Postseason => "postseason",
        };
        f.write_str(name)
    }
}

#[cfg_attr(feature = "python", pyo3::pyclass(eq, eq_int))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Completed,
    Postponed,
    Canceled,
}

impl FromStr for GameStatus {
    type Err = StandingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(GameStatus::Scheduled),
            "in_progress" | "in progress" | "inprogress" => Ok(GameStatus::InProgress),
            "completed" | "final" => Ok(GameStatus::Completed),
            "postponed" => Ok(GameStatus::Postponed),
            "canceled" | "cancelled" => Ok(GameStatus::Canceled),
            _ => Err(StandingsError::UnknownStatus(s.to_string())),
        }
    }
}

/// One game of the schedule as supplied by the data layer.
#[cfg_attr(feature = "python", pyo3::pyclass(get_all))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    pub season_year: u16,
    pub season_type: SeasonType,
    pub week: u8,
    pub home: TeamRef,
    pub away: TeamRef,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub status: GameStatus,
}

impl GameRecord {
    pub fn is_completed(&self) -> bool {
        self.status == GameStatus::Completed
    }

    /// Final (home, away) score of a completed game.
    pub fn final_score(&self) -> Result<(u32, u32), StandingsError> {
        match (self.home_score, self.away_score) {
            (Some(home), Some(away)) => Ok((home, away)),
            _ => Err(StandingsError::MissingScore { game_id: self.id }),
        }
    }

    /// Outcome for the home team, if the game is completed and scored.
    pub fn home_outcome(&self) -> Option<Outcome> {
        if !self.is_completed() {
            return None;
        }
        self.final_score()
            .ok()
            .map(|(home, away)| Outcome::from_scores(home, away))
    }

    /// Human-readable season label, e.g. "2024 regular-season".
    pub fn season_label(&self) -> String {
        format!("{} {}", self.season_year, self.season_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{game, scheduled};

    #[test]
    fn test_season_type_from_code() {
        assert_eq!(SeasonType::try_from(2).unwrap(), SeasonType::Regular);
        assert!(matches!(
            SeasonType::try_from(4),
            Err(StandingsError::InvalidSeasonType(4))
        ));
        assert_eq!(SeasonType::Postseason.code(), 3);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Completed".parse::<GameStatus>().unwrap(), GameStatus::Completed);
        assert_eq!("final".parse::<GameStatus>().unwrap(), GameStatus::Completed);
        assert_eq!("cancelled".parse::<GameStatus>().unwrap(), GameStatus::Canceled);
        assert!("halftime".parse::<GameStatus>().is_err());
    }

    #[test]
    fn test_home_outcome_only_for_completed_games() {
        assert_eq!(game(1, 1, 2, 24, 17).home_outcome(), Some(Outcome::Win));
        assert_eq!(scheduled(2, 1, 2).home_outcome(), None);

        let mut unscored = game(3, 1, 2, 0, 0);
        unscored.away_score = None;
        assert_eq!(unscored.home_outcome(), None);
        assert!(unscored.final_score().is_err());
    }
}
