use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bracket::{build_bracket, PlayoffBracket, PostseasonGame};
use crate::config::LeagueConfig;
use crate::error::StandingsError;
use crate::game::{GameRecord, SeasonType};
use crate::projection::ProjectedBracketBuilder;
use crate::seeding::{apply_seeds, assign_seeds, division_standings, DivisionTable, SeedMap};
use crate::standings::{try_compute_standings, TeamStanding};

/// Everything derived for one season in a single pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonReport {
    pub season_year: u16,
    /// Standings sorted by team id, carrying their playoff seeds.
    pub standings: Vec<TeamStanding>,
    pub seeds: SeedMap,
    pub bracket: PlayoffBracket,
    /// `None` while the seeds cannot fill a complete bracket.
    pub projected_bracket: Option<PlayoffBracket>,
}

/// One regular season's games plus its postseason, ready to be ranked.
///
/// Games from other years or season types are dropped on construction, so
/// every derived value describes exactly one season.
#[cfg_attr(feature = "python", pyo3::pyclass)]
#[derive(Clone, Debug)]
pub struct SeasonSnapshot {
    season_year: u16,
    games: Vec<GameRecord>,
    postseason: Vec<PostseasonGame>,
    config: LeagueConfig,
}

impl SeasonSnapshot {
    /// # Arguments
    /// * `season_year` - Season whose games are kept
    /// * `season_type` - Must be [`SeasonType::Regular`]; seeding other phases is meaningless
    /// * `games` - Regular-season games, possibly mixed with other seasons
    /// * `postseason` - Playoff games, possibly mixed with other seasons
    /// * `config` - League shape, validated here
    pub fn new(
        season_year: u16,
        season_type: SeasonType,
        mut games: Vec<GameRecord>,
        mut postseason: Vec<PostseasonGame>,
        config: LeagueConfig,
    ) -> Result<Self, StandingsError> {
        if season_type != SeasonType::Regular {
            return Err(StandingsError::UnsupportedSeasonType { season_type });
        }
        config.validate()?;

        let received = games.len() + postseason.len();
        games.retain(|g| g.season_year == season_year && g.season_type == season_type);
        postseason.retain(|g| g.season_year == season_year);
        let dropped = received - games.len() - postseason.len();
        if dropped > 0 {
            debug!(season_year, dropped, "dropped games from other seasons");
        }

        Ok(SeasonSnapshot {
            season_year,
            games,
            postseason,
            config,
        })
    }

    pub fn season_year(&self) -> u16 {
        self.season_year
    }

    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    pub fn postseason_games(&self) -> &[PostseasonGame] {
        &self.postseason
    }

    pub fn config(&self) -> &LeagueConfig {
        &self.config
    }

    pub fn standings(&self) -> Result<Vec<TeamStanding>, StandingsError> {
        try_compute_standings(&self.games)
    }

    pub fn seeds(&self) -> Result<SeedMap, StandingsError> {
        let standings = self.standings()?;
        Ok(assign_seeds(&standings, &self.games, &self.config))
    }

    pub fn seeded_standings(&self) -> Result<Vec<TeamStanding>, StandingsError> {
        let standings = self.standings()?;
        let seeds = assign_seeds(&standings, &self.games, &self.config);
        Ok(apply_seeds(&standings, &seeds))
    }

    pub fn division_standings(&self) -> Result<Vec<DivisionTable>, StandingsError> {
        let standings = self.standings()?;
        Ok(division_standings(&standings, &self.games, &self.config))
    }

    /// Bracket from the postseason games played or scheduled so far.
    pub fn bracket(&self) -> Result<PlayoffBracket, StandingsError> {
        let seeds = self.seeds()?;
        Ok(build_bracket(self.season_year, &seeds, &self.postseason, &self.config))
    }

    /// Fully populated "if the season ended today" bracket.
    pub fn projected_bracket(&self) -> Result<PlayoffBracket, StandingsError> {
        let seeds = self.seeds()?;
        ProjectedBracketBuilder::new(self.season_year, &seeds, &self.postseason, &self.config).build()
    }

    /// Standings, seeds and both brackets, computing the standings once.
    pub fn report(&self) -> Result<SeasonReport, StandingsError> {
        let standings = self.standings()?;
        let seeds = assign_seeds(&standings, &self.games, &self.config);
        let bracket = build_bracket(self.season_year, &seeds, &self.postseason, &self.config);

        let projected_bracket =
            match ProjectedBracketBuilder::new(self.season_year, &seeds, &self.postseason, &self.config).build() {
                Ok(bracket) => Some(bracket),
                Err(err) => {
                    warn!(season_year = self.season_year, error = %err, "no projected bracket");
                    None
                }
            };

        Ok(SeasonReport {
            season_year: self.season_year,
            standings: apply_seeds(&standings, &seeds),
            seeds,
            bracket,
            projected_bracket,
        })
    }
}
