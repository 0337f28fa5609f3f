use chrono::NaiveDate;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::path::PathBuf;

use crate::bracket::{
    build_bracket, BracketRound, PlayoffBracket, PlayoffMatchup, PlayoffRound, PostseasonGame,
};
use crate::config::LeagueConfig;
use crate::error::StandingsError;
use crate::game::{GameId, GameRecord, GameStatus, SeasonType};
use crate::projection::ProjectedBracketBuilder;
use crate::seeding::{assign_seeds, ConferenceSeeds, DivisionTable, SeedMap, SeededTeam};
use crate::season::SeasonSnapshot;
use crate::standings::{compute_standings, TeamStanding};
use crate::team::{Conference, TeamId, TeamRef};

impl From<StandingsError> for PyErr {
    fn from(err: StandingsError) -> PyErr {
        match err {
            StandingsError::Source { .. } => PyRuntimeError::new_err(err.to_string()),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

fn league_config(league_file: Option<PathBuf>) -> Result<LeagueConfig, StandingsError> {
    match league_file {
        Some(path) => Ok(LeagueConfig::load(&path)?),
        None => Ok(LeagueConfig::default()),
    }
}

#[pymethods]
impl TeamRef {
    /// `conference` is matched case-insensitively ("AFC", "nfc").
    #[new]
    fn py_new(id: TeamId, name: String, conference: &str, division: String) -> PyResult<Self> {
        Ok(TeamRef::new(id, name, conference.parse()?, division))
    }
}

#[pymethods]
impl GameRecord {
    #[new]
    #[pyo3(signature = (id, season_year, season_type, week, home, away, status, home_score = None, away_score = None))]
    #[allow(clippy::too_many_arguments)]
    fn py_new(
        id: GameId,
        season_year: u16,
        season_type: u8,
        week: u8,
        home: TeamRef,
        away: TeamRef,
        status: &str,
        home_score: Option<u32>,
        away_score: Option<u32>,
    ) -> PyResult<Self> {
        Ok(GameRecord {
            id,
            season_year,
            season_type: SeasonType::try_from(season_type)?,
            week,
            home,
            away,
            home_score,
            away_score,
            status: status.parse::<GameStatus>()?,
        })
    }
}

#[pymethods]
impl PostseasonGame {
    #[new]
    #[pyo3(signature = (id, season_year, conference, round, home_team_id, away_team_id, home_score = None, away_score = None, game_date = None))]
    #[allow(clippy::too_many_arguments)]
    fn py_new(
        id: GameId,
        season_year: u16,
        conference: Option<&str>,
        round: PlayoffRound,
        home_team_id: TeamId,
        away_team_id: TeamId,
        home_score: Option<u32>,
        away_score: Option<u32>,
        game_date: Option<NaiveDate>,
    ) -> PyResult<Self> {
        Ok(PostseasonGame {
            id,
            season_year,
            conference: conference.map(str::parse::<Conference>).transpose()?,
            round,
            home_team_id,
            away_team_id,
            home_score,
            away_score,
            game_date,
        })
    }

    #[getter(winner)]
    fn py_winner(&self) -> Option<TeamId> {
        self.winner()
    }
}

#[pymethods]
impl TeamStanding {
    #[getter(win_pct)]
    fn py_win_pct(&self) -> f64 {
        self.win_pct()
    }

    #[getter(point_differential)]
    fn py_point_differential(&self) -> i64 {
        self.point_differential()
    }
}

#[pymethods]
impl PlayoffBracket {
    #[pyo3(name = "to_json")]
    fn py_to_json(&self) -> PyResult<String> {
        Ok(self.to_json()?)
    }
}

#[pymethods]
impl SeasonSnapshot {
    /// Snapshot of a regular season. `league_file` points at a TOML file with a
    /// `[league]` table; the standard league shape is used without one.
    #[new]
    #[pyo3(signature = (season_year, games, postseason = Vec::new(), league_file = None))]
    fn py_new(
        season_year: u16,
        games: Vec<GameRecord>,
        postseason: Vec<PostseasonGame>,
        league_file: Option<PathBuf>,
    ) -> PyResult<Self> {
        let config = league_config(league_file)?;
        Ok(SeasonSnapshot::new(season_year, SeasonType::Regular, games, postseason, config)?)
    }

    #[getter(season_year)]
    fn py_season_year(&self) -> u16 {
        self.season_year()
    }

    #[pyo3(name = "standings")]
    fn py_standings(&self) -> PyResult<Vec<TeamStanding>> {
        Ok(self.seeded_standings()?)
    }

    #[pyo3(name = "seeds")]
    fn py_seeds(&self) -> PyResult<Vec<ConferenceSeeds>> {
        Ok(self.seeds()?.iter().cloned().collect())
    }

    #[pyo3(name = "division_standings")]
    fn py_division_standings(&self) -> PyResult<Vec<DivisionTable>> {
        Ok(self.division_standings()?)
    }

    #[pyo3(name = "bracket")]
    fn py_bracket(&self) -> PyResult<PlayoffBracket> {
        Ok(self.bracket()?)
    }

    #[pyo3(name = "projected_bracket")]
    fn py_projected_bracket(&self) -> PyResult<PlayoffBracket> {
        Ok(self.projected_bracket()?)
    }
}

/// Standings for one season phase; empty when the games are inconsistent.
#[pyfunction]
#[pyo3(name = "compute_standings")]
fn py_compute_standings(games: Vec<GameRecord>) -> Vec<TeamStanding> {
    compute_standings(&games)
}

#[pyfunction]
#[pyo3(name = "assign_seeds", signature = (standings, games, league_file = None))]
fn py_assign_seeds(
    standings: Vec<TeamStanding>,
    games: Vec<GameRecord>,
    league_file: Option<PathBuf>,
) -> PyResult<Vec<ConferenceSeeds>> {
    let config = league_config(league_file)?;
    Ok(assign_seeds(&standings, &games, &config).iter().cloned().collect())
}

#[pyfunction]
#[pyo3(name = "build_bracket", signature = (season_year, seeds, games, league_file = None))]
fn py_build_bracket(
    season_year: u16,
    seeds: Vec<ConferenceSeeds>,
    games: Vec<PostseasonGame>,
    league_file: Option<PathBuf>,
) -> PyResult<PlayoffBracket> {
    let config = league_config(league_file)?;
    Ok(build_bracket(season_year, &SeedMap::from_conferences(seeds), &games, &config))
}

#[pyfunction]
#[pyo3(name = "build_projected_bracket", signature = (season_year, seeds, games, league_file = None))]
fn py_build_projected_bracket(
    season_year: u16,
    seeds: Vec<ConferenceSeeds>,
    games: Vec<PostseasonGame>,
    league_file: Option<PathBuf>,
) -> PyResult<PlayoffBracket> {
    let config = league_config(league_file)?;
    let seeds = SeedMap::from_conferences(seeds);
    Ok(ProjectedBracketBuilder::new(season_year, &seeds, &games, &config).build()?)
}

/// Python module definition
#[pymodule]
fn standings_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Classes
    m.add_class::<Conference>()?;
    m.add_class::<SeasonType>()?;
    m.add_class::<GameStatus>()?;
    m.add_class::<PlayoffRound>()?;
    m.add_class::<TeamRef>()?;
    m.add_class::<GameRecord>()?;
    m.add_class::<PostseasonGame>()?;
    m.add_class::<TeamStanding>()?;
    m.add_class::<SeededTeam>()?;
    m.add_class::<ConferenceSeeds>()?;
    m.add_class::<DivisionTable>()?;
    m.add_class::<PlayoffMatchup>()?;
    m.add_class::<BracketRound>()?;
    m.add_class::<PlayoffBracket>()?;
    m.add_class::<SeasonSnapshot>()?;

    // Functions
    m.add_function(wrap_pyfunction!(py_compute_standings, m)?)?;
    m.add_function(wrap_pyfunction!(py_assign_seeds, m)?)?;
    m.add_function(wrap_pyfunction!(py_build_bracket, m)?)?;
    m.add_function(wrap_pyfunction!(py_build_projected_bracket, m)?)?;

    // Constants
    m.add("PLAYOFF_TEAMS_PER_CONFERENCE", crate::constants::PLAYOFF_TEAMS_PER_CONFERENCE)?;
    m.add("DIVISIONS_PER_CONFERENCE", crate::constants::DIVISIONS_PER_CONFERENCE)?;

    Ok(())
}
