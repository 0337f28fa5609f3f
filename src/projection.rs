//! Speculative "if the season ended today" brackets.
//!
//! Every round is filled in: real games are used where they exist, and the
//! remaining teams are paired best seed against worst seed. When a game has no
//! deciding score the lower seed number advances. Missing seed data is an
//! error rather than a shorter bracket.

use tracing::debug;

use crate::bracket::{games_in_round, BracketRound, PlayoffBracket, PlayoffMatchup, PlayoffRound, PostseasonGame};
use crate::config::LeagueConfig;
use crate::error::StandingsError;
use crate::seeding::SeedMap;
use crate::team::{Conference, TeamId};

/// A team still alive in the bracket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Contender {
    team: TeamId,
    seed: u8,
}

impl Contender {
    fn as_pair(self) -> (TeamId, u8) {
        (self.team, self.seed)
    }
}

/// The lower seed number is the favorite.
fn favorite(a: Contender, b: Contender) -> Contender {
    if a.seed <= b.seed {
        a
    } else {
        b
    }
}

pub struct ProjectedBracketBuilder<'a> {
    season_year: u16,
    seeds: &'a SeedMap,
    games: &'a [PostseasonGame],
    config: &'a LeagueConfig,
}

impl<'a> ProjectedBracketBuilder<'a> {
    pub fn new(
        season_year: u16,
        seeds: &'a SeedMap,
        games: &'a [PostseasonGame],
        config: &'a LeagueConfig,
    ) -> Self {
        ProjectedBracketBuilder {
            season_year,
            seeds,
            games,
            config,
        }
    }

    pub fn build(&self) -> Result<PlayoffBracket, StandingsError> {
        self.config.validate()?;

        let (afc_rounds, afc_champion) = self.conference_rounds(Conference::Afc)?;
        let (nfc_rounds, nfc_champion) = self.conference_rounds(Conference::Nfc)?;

        let super_bowl = match games_in_round(self.games, self.season_year, PlayoffRound::SuperBowl, None).first() {
            Some(game) => PlayoffMatchup::from_game(game, self.seeds, 0),
            None => PlayoffMatchup::projected(
                self.season_year,
                PlayoffRound::SuperBowl,
                None,
                afc_champion.as_pair(),
                nfc_champion.as_pair(),
                0,
            ),
        };

        Ok(PlayoffBracket {
            season_year: self.season_year,
            afc_rounds,
            nfc_rounds,
            super_bowl: Some(super_bowl),
        })
    }

    fn conference_rounds(&self, conference: Conference) -> Result<(Vec<BracketRound>, Contender), StandingsError> {
        let mut alive = self.playoff_field(conference)?;
        let mut rounds = Vec::with_capacity(PlayoffRound::CONFERENCE_ROUNDS.len());

        for round in PlayoffRound::CONFERENCE_ROUNDS {
            let (resting, playing): (Vec<Contender>, Vec<Contender>) = alive
                .iter()
                .partition(|c| round == PlayoffRound::Wildcard && (c.seed as usize) <= self.config.bye_seeds);

            let (matchups, winners) = self.play_round(conference, round, &playing)?;
            debug!(%conference, %round, games = matchups.len(), "projected round");

            alive = resting.into_iter().chain(winners).collect();
            alive.sort_by_key(|c| c.seed);
            rounds.push(BracketRound { round, matchups });
        }

        match alive.as_slice() {
            [champion] => Ok((rounds, *champion)),
            _ => Err(StandingsError::UnpairableRound {
                conference,
                round: PlayoffRound::SuperBowl,
                teams: alive.len(),
            }),
        }
    }

    /// Every seed of the conference's playoff field, best first. A missing
    /// seed is reported against the first round it would have played.
    fn playoff_field(&self, conference: Conference) -> Result<Vec<Contender>, StandingsError> {
        let missing = |seed: u8| StandingsError::MissingSeed {
            conference,
            round: if (seed as usize) <= self.config.bye_seeds {
                PlayoffRound::Divisional
            } else {
                PlayoffRound::Wildcard
            },
            seed,
        };
        let seeds = self.seeds.conference(conference).ok_or_else(|| missing(1))?;

        (1..=self.config.playoff_teams_per_conference as u8)
            .map(|seed| {
                seeds
                    .team_for_seed(seed)
                    .map(|team| Contender { team, seed })
                    .ok_or_else(|| missing(seed))
            })
            .collect()
    }

    /// Matchups of one round and the contenders who advance from it.
    fn play_round(
        &self,
        conference: Conference,
        round: PlayoffRound,
        playing: &[Contender],
    ) -> Result<(Vec<PlayoffMatchup>, Vec<Contender>), StandingsError> {
        let mut matchups = Vec::new();
        let mut winners = Vec::new();
        let mut unscheduled: Vec<Contender> = playing.to_vec();

        for game in games_in_round(self.games, self.season_year, round, Some(conference)) {
            let home = self.contender(game.home_team_id, round)?;
            let away = self.contender(game.away_team_id, round)?;
            let winner = match game.winner() {
                Some(team) if team == home.team => home,
                Some(_) => away,
                None => favorite(home, away),
            };

            unscheduled.retain(|c| c.team != home.team && c.team != away.team);
            matchups.push(PlayoffMatchup::from_game(game, self.seeds, matchups.len()));
            winners.push(winner);
        }

        if unscheduled.len() % 2 != 0 {
            return Err(StandingsError::UnpairableRound {
                conference,
                round,
                teams: unscheduled.len(),
            });
        }

        unscheduled.sort_by_key(|c| c.seed);
        let half = unscheduled.len() / 2;
        for (&home, &away) in unscheduled.iter().zip(unscheduled.iter().rev()).take(half) {
            matchups.push(PlayoffMatchup::projected(
                self.season_year,
                round,
                Some(conference),
                home.as_pair(),
                away.as_pair(),
                matchups.len(),
            ));
            winners.push(favorite(home, away));
        }

        Ok((matchups, winners))
    }

    fn contender(&self, team: TeamId, round: PlayoffRound) -> Result<Contender, StandingsError> {
        self.seeds
            .seed_of(team)
            .map(|seed| Contender { team, seed })
            .ok_or(StandingsError::UnseededTeam { team_id: team, round })
    }
}
