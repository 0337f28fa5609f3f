// League shape configuration, loadable from a `[league]` table in TOML.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{
    BYE_SEEDS, DIVISIONS_PER_CONFERENCE, MIN_WILD_CARD_COMMON_OPPONENTS,
    PLAYOFF_TEAMS_PER_CONFERENCE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

/// Wrapper for the top-level `[league]` table.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    #[serde(default)]
    league: LeagueConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    pub divisions_per_conference: usize,
    pub playoff_teams_per_conference: usize,

    /// Top seeds that skip the wild-card round.
    pub bye_seeds: usize,

    /// Minimum shared opponents before wild-card ordering compares common-opponent records.
    pub min_wild_card_common_opponents: usize,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        LeagueConfig {
            divisions_per_conference: DIVISIONS_PER_CONFERENCE,
            playoff_teams_per_conference: PLAYOFF_TEAMS_PER_CONFERENCE,
            bye_seeds: BYE_SEEDS,
            min_wild_card_common_opponents: MIN_WILD_CARD_COMMON_OPPONENTS,
        }
    }
}

impl LeagueConfig {
    /// Load and validate a league file. Missing keys fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Self::parse(contents, Path::new("<inline>"))
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: LeagueFile = toml::from_str(contents).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
        file.league.validate()?;
        Ok(file.league)
    }

    /// Reject league shapes that cannot produce a single-elimination bracket.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.divisions_per_conference == 0 {
            return Err(invalid("divisions_per_conference", "must be at least 1"));
        }
        if self.playoff_teams_per_conference < self.divisions_per_conference {
            return Err(invalid(
                "playoff_teams_per_conference",
                "must leave room for every division winner",
            ));
        }
        if self.playoff_teams_per_conference > u8::MAX as usize {
            return Err(invalid("playoff_teams_per_conference", "must fit in a seed number"));
        }
        if self.bye_seeds >= self.playoff_teams_per_conference {
            return Err(invalid("bye_seeds", "must be smaller than the playoff field"));
        }

        let wild_card_teams = self.playoff_teams_per_conference - self.bye_seeds;
        if wild_card_teams % 2 != 0 {
            return Err(invalid(
                "bye_seeds",
                "teams playing the wild-card round must pair up evenly",
            ));
        }
        let after_wild_card = self.bye_seeds + wild_card_teams / 2;
        if !after_wild_card.is_power_of_two() {
            return Err(invalid(
                "playoff_teams_per_conference",
                &format!(
                    "{} teams survive the wild-card round; a bracket needs a power of two",
                    after_wild_card
                ),
            ));
        }
        Ok(())
    }

    /// Wild-card slots left once every division winner is seeded.
    pub fn wild_card_slots(&self) -> usize {
        self.playoff_teams_per_conference
            .saturating_sub(self.divisions_per_conference)
    }

    /// Wild-card round pairings (home seed, away seed), best remaining seed against worst.
    pub fn wild_card_pairings(&self) -> Vec<(u8, u8)> {
        let seeds: Vec<u8> = ((self.bye_seeds + 1)..=self.playoff_teams_per_conference)
            .map(|seed| seed as u8)
            .collect();
        seeds
            .iter()
            .zip(seeds.iter().rev())
            .take(seeds.len() / 2)
            .map(|(&home, &away)| (home, away))
            .collect()
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::WILD_CARD_PAIRINGS;

    #[test]
    fn test_default_config_is_valid() {
        let config = LeagueConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.wild_card_slots(), 3);
        assert_eq!(config.wild_card_pairings(), WILD_CARD_PAIRINGS.to_vec());
    }

    #[test]
    fn test_parse_partial_file_uses_defaults() {
        let config = LeagueConfig::from_toml_str(
            r#"
            [league]
            min_wild_card_common_opponents = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.min_wild_card_common_opponents, 5);
        assert_eq!(config.playoff_teams_per_conference, 7);
    }

    #[test]
    fn test_six_team_field_with_two_byes() {
        let config = LeagueConfig::from_toml_str(
            r#"
            [league]
            playoff_teams_per_conference = 6
            bye_seeds = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.wild_card_pairings(), vec![(3, 6), (4, 5)]);
        assert_eq!(config.wild_card_slots(), 2);
    }

    #[test]
    fn test_invalid_shapes_rejected() {
        let odd = LeagueConfig {
            bye_seeds: 2,
            ..LeagueConfig::default()
        };
        assert!(matches!(
            odd.validate(),
            Err(ConfigError::ValidationError { field, .. }) if field == "bye_seeds"
        ));

        let too_small = LeagueConfig {
            playoff_teams_per_conference: 3,
            ..LeagueConfig::default()
        };
        assert!(too_small.validate().is_err());

        assert!(matches!(
            LeagueConfig::from_toml_str("[league]\nbye_seeds = \"one\""),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = LeagueConfig::load(Path::new("/nonexistent/league.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }
}
