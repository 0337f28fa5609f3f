//! Recomputation of standings and brackets when games change.
//!
//! The refresher owns no state beyond the seasons it tracks. Every trigger
//! pulls fresh games from the injected [`SeasonSource`] and returns new
//! reports; persisting them is left to the caller.

use rayon::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::bracket::PostseasonGame;
use crate::config::LeagueConfig;
use crate::error::{SourceError, StandingsError};
use crate::game::{GameRecord, SeasonType};
use crate::season::{SeasonReport, SeasonSnapshot};

/// Where season games come from: a database, a feed, or memory in tests.
pub trait SeasonSource: Send + Sync {
    fn regular_season_games(&self, season_year: u16) -> Result<Vec<GameRecord>, SourceError>;

    fn postseason_games(&self, season_year: u16) -> Result<Vec<PostseasonGame>, SourceError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// A game of this season just went final.
    GameFinal { season_year: u16 },
    /// Explicit request for one season.
    Manual { season_year: u16 },
    /// Periodic pass over every tracked season.
    Interval,
}

pub struct StandingsRefresher<S: SeasonSource> {
    source: Arc<S>,
    config: LeagueConfig,
    tracked_seasons: BTreeSet<u16>,
}

impl<S: SeasonSource> StandingsRefresher<S> {
    pub fn new(source: Arc<S>, config: LeagueConfig) -> Self {
        StandingsRefresher {
            source,
            config,
            tracked_seasons: BTreeSet::new(),
        }
    }

    /// Include a season in interval refreshes. Returns false if it was already tracked.
    pub fn track(&mut self, season_year: u16) -> bool {
        self.tracked_seasons.insert(season_year)
    }

    pub fn untrack(&mut self, season_year: u16) -> bool {
        self.tracked_seasons.remove(&season_year)
    }

    pub fn tracked_seasons(&self) -> impl Iterator<Item = u16> + '_ {
        self.tracked_seasons.iter().copied()
    }

    /// Load one season from the source and derive its report.
    pub fn refresh(&self, season_year: u16) -> Result<SeasonReport, StandingsError> {
        let games = self
            .source
            .regular_season_games(season_year)
            .map_err(|source| StandingsError::Source { season_year, source })?;
        let postseason = self
            .source
            .postseason_games(season_year)
            .map_err(|source| StandingsError::Source { season_year, source })?;
        debug!(season_year, games = games.len(), postseason = postseason.len(), "loaded season");

        SeasonSnapshot::new(season_year, SeasonType::Regular, games, postseason, self.config.clone())?.report()
    }

    /// Handle a trigger.
    ///
    /// Single-season triggers fail with that season's error. An interval pass
    /// refreshes tracked seasons in parallel; a season that fails is logged and
    /// left out so the others still come back, in ascending year order.
    pub fn on_trigger(&self, trigger: RefreshTrigger) -> Result<Vec<SeasonReport>, StandingsError> {
        match trigger {
            RefreshTrigger::GameFinal { season_year } | RefreshTrigger::Manual { season_year } => {
                Ok(vec![self.refresh(season_year)?])
            }
            RefreshTrigger::Interval => Ok(self
                .tracked_seasons
                .par_iter()
                .filter_map(|&season_year| match self.refresh(season_year) {
                    Ok(report) => Some(report),
                    Err(err) => {
                        warn!(season_year, error = %err, "season refresh failed");
                        None
                    }
                })
                .collect()),
        }
    }
}
