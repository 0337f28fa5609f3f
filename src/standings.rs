use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::StandingsError;
use crate::game::{GameRecord, SeasonType};
use crate::record::{Outcome, Record};
use crate::team::{Conference, TeamId, TeamRef};

/// A team's record for one season phase.
///
/// Win percentage is always derived from the counters, never stored.
#[cfg_attr(feature = "python", pyo3::pyclass(get_all))]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team_id: TeamId,
    pub team_name: String,
    pub conference: Conference,
    pub division: String,
    pub season_year: u16,
    pub season_type: SeasonType,

    pub wins: u32,
    pub losses: u32,
    pub ties: u32,

    pub points_for: u32,
    pub points_against: u32,

    pub division_wins: u32,
    pub division_losses: u32,
    pub division_ties: u32,

    pub conference_wins: u32,
    pub conference_losses: u32,
    pub conference_ties: u32,

    /// Playoff seed within the conference, 0 until seeds are assigned
    pub playoff_seed: u8,
}

impl TeamStanding {
    pub fn new(team: &TeamRef, season_year: u16, season_type: SeasonType) -> Self {
        TeamStanding {
            team_id: team.id,
            team_name: team.name.clone(),
            conference: team.conference,
            division: team.division.clone(),
            season_year,
            season_type,
            wins: 0,
            losses: 0,
            ties: 0,
            points_for: 0,
            points_against: 0,
            division_wins: 0,
            division_losses: 0,
            division_ties: 0,
            conference_wins: 0,
            conference_losses: 0,
            conference_ties: 0,
            playoff_seed: 0,
        }
    }

    pub fn record(&self) -> Record {
        Record::new(self.wins, self.losses, self.ties)
    }

    pub fn division_record(&self) -> Record {
        Record::new(self.division_wins, self.division_losses, self.division_ties)
    }

    pub fn conference_record(&self) -> Record {
        Record::new(self.conference_wins, self.conference_losses, self.conference_ties)
    }

    pub fn games_played(&self) -> u32 {
        self.record().games()
    }

    pub fn win_pct(&self) -> f64 {
        self.record().win_pct()
    }

    pub fn point_differential(&self) -> i64 {
        self.points_for as i64 - self.points_against as i64
    }

    pub fn division_key(&self) -> String {
        crate::team::division_key(&self.division)
    }

    /// Copy of this standing carrying the given playoff seed.
    pub fn with_seed(&self, seed: u8) -> Self {
        TeamStanding {
            playoff_seed: seed,
            ..self.clone()
        }
    }

    fn apply(
        &mut self,
        opponent: &TeamRef,
        team: &TeamRef,
        scored: u32,
        allowed: u32,
        outcome: Outcome,
    ) -> Result<(), StandingsError> {
        let overflow = || StandingsError::PointsOverflow { team_id: team.id };
        self.points_for = self.points_for.checked_add(scored).ok_or_else(overflow)?;
        self.points_against = self.points_against.checked_add(allowed).ok_or_else(overflow)?;

        let (wins, losses, ties) = match outcome {
            Outcome::Win => (1, 0, 0),
            Outcome::Loss => (0, 1, 0),
            Outcome::Tie => (0, 0, 1),
        };
        self.wins += wins;
        self.losses += losses;
        self.ties += ties;

        if team.same_division(opponent) {
            self.division_wins += wins;
            self.division_losses += losses;
            self.division_ties += ties;
        }
        if team.same_conference(opponent) {
            self.conference_wins += wins;
            self.conference_losses += losses;
            self.conference_ties += ties;
        }
        Ok(())
    }
}

/// Fold games into standings, degrading to an empty list on any error.
///
/// An empty result means the standings could not be computed, not that the
/// league has no teams.
pub fn compute_standings(games: &[GameRecord]) -> Vec<TeamStanding> {
    match try_compute_standings(games) {
        Ok(standings) => standings,
        Err(err) => {
            warn!(error = %err, games = games.len(), "standings could not be computed");
            Vec::new()
        }
    }
}

/// Fold completed games into one standing per team, sorted by team id.
///
/// Games in any status other than completed are skipped entirely.
pub fn try_compute_standings(games: &[GameRecord]) -> Result<Vec<TeamStanding>, StandingsError> {
    let mut table: BTreeMap<TeamId, TeamStanding> = BTreeMap::new();
    let mut season: Option<(u16, SeasonType)> = None;
    let mut skipped = 0usize;

    for game in games {
        if !game.is_completed() {
            skipped += 1;
            continue;
        }

        let (home_score, away_score) = game.final_score()?;
        if game.home.id == game.away.id {
            return Err(StandingsError::SelfMatch {
                game_id: game.id,
                team_id: game.home.id,
            });
        }

        let (season_year, season_type) = *season.get_or_insert((game.season_year, game.season_type));
        if (game.season_year, game.season_type) != (season_year, season_type) {
            return Err(StandingsError::MixedSeasons {
                game_id: game.id,
                expected: format!("{} {}", season_year, season_type),
                found: game.season_label(),
            });
        }

        let home_outcome = Outcome::from_scores(home_score, away_score);
        standing_for(&mut table, &game.home, season_year, season_type)?.apply(
            &game.away,
            &game.home,
            home_score,
            away_score,
            home_outcome,
        )?;
        standing_for(&mut table, &game.away, season_year, season_type)?.apply(
            &game.home,
            &game.away,
            away_score,
            home_score,
            home_outcome.reverse(),
        )?;
    }

    debug!(teams = table.len(), skipped, "computed standings");
    Ok(table.into_values().collect())
}

/// Fetch the team's standing, creating it on first sight and checking that
/// its alignment never changes between games.
fn standing_for<'a>(
    table: &'a mut BTreeMap<TeamId, TeamStanding>,
    team: &TeamRef,
    season_year: u16,
    season_type: SeasonType,
) -> Result<&'a mut TeamStanding, StandingsError> {
    let standing = table
        .entry(team.id)
        .or_insert_with(|| TeamStanding::new(team, season_year, season_type));

    if standing.conference != team.conference || standing.division_key() != team.division_key() {
        return Err(StandingsError::InconsistentTeam {
            team_id: team.id,
            first: format!("{} / {}", standing.conference, standing.division.trim()),
            second: team.alignment(),
        });
    }
    Ok(standing)
}
