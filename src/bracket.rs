use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::config::LeagueConfig;
use crate::error::StandingsError;
use crate::game::GameId;
use crate::record::Outcome;
use crate::seeding::SeedMap;
use crate::team::{Conference, TeamId};

#[cfg_attr(feature = "python", pyo3::pyclass(eq, eq_int))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlayoffRound {
    Wildcard,
    Divisional,
    Conference,
    SuperBowl,
}

impl PlayoffRound {
    /// Rounds played inside each conference, in order.
    pub const CONFERENCE_ROUNDS: [PlayoffRound; 3] = [
        PlayoffRound::Wildcard,
        PlayoffRound::Divisional,
        PlayoffRound::Conference,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PlayoffRound::Wildcard => "Wild Card",
            PlayoffRound::Divisional => "Divisional",
            PlayoffRound::Conference => "Conference Championship",
            PlayoffRound::SuperBowl => "Super Bowl",
        }
    }
}

impl fmt::Display for PlayoffRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A scheduled or completed postseason game, tagged with its round.
///
/// Super Bowl games carry no conference.
#[cfg_attr(feature = "python", pyo3::pyclass(get_all))]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostseasonGame {
    pub id: GameId,
    pub season_year: u16,
    pub conference: Option<Conference>,
    pub round: PlayoffRound,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub game_date: Option<NaiveDate>,
}

impl PostseasonGame {
    /// Winner by score; `None` while either score is missing or the scores are level.
    pub fn winner(&self) -> Option<TeamId> {
        let (home, away) = (self.home_score?, self.away_score?);
        match Outcome::from_scores(home, away) {
            Outcome::Win => Some(self.home_team_id),
            Outcome::Loss => Some(self.away_team_id),
            Outcome::Tie => None,
        }
    }
}

/// One pairing of a bracket. A missing `game_id` marks a projected pairing.
#[cfg_attr(feature = "python", pyo3::pyclass(get_all))]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffMatchup {
    pub game_id: Option<GameId>,
    pub season_year: u16,
    pub round: PlayoffRound,
    pub conference: Option<Conference>,
    pub slot: String,
    pub home_team_id: Option<TeamId>,
    pub away_team_id: Option<TeamId>,
    pub home_seed: Option<u8>,
    pub away_seed: Option<u8>,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub winner_team_id: Option<TeamId>,
    pub game_date: Option<NaiveDate>,
}

impl PlayoffMatchup {
    /// Matchup for a real game; seeds are looked up, the winner comes from the score.
    pub fn from_game(game: &PostseasonGame, seeds: &SeedMap, index: usize) -> Self {
        let home_seed = seeds.seed_of(game.home_team_id);
        let away_seed = seeds.seed_of(game.away_team_id);
        PlayoffMatchup {
            game_id: Some(game.id),
            season_year: game.season_year,
            round: game.round,
            conference: game.conference,
            slot: slot_label(game.round, game.conference, home_seed, away_seed, index),
            home_team_id: Some(game.home_team_id),
            away_team_id: Some(game.away_team_id),
            home_seed,
            away_seed,
            home_score: game.home_score,
            away_score: game.away_score,
            winner_team_id: game.winner(),
            game_date: game.game_date,
        }
    }

    /// Pairing expected from seeds; scores and winner stay empty.
    pub fn projected(
        season_year: u16,
        round: PlayoffRound,
        conference: Option<Conference>,
        home: (TeamId, u8),
        away: (TeamId, u8),
        index: usize,
    ) -> Self {
        PlayoffMatchup {
            game_id: None,
            season_year,
            round,
            conference,
            slot: slot_label(round, conference, Some(home.1), Some(away.1), index),
            home_team_id: Some(home.0),
            away_team_id: Some(away.0),
            home_seed: Some(home.1),
            away_seed: Some(away.1),
            home_score: None,
            away_score: None,
            winner_team_id: None,
            game_date: None,
        }
    }

    pub fn is_projected(&self) -> bool {
        self.game_id.is_none()
    }
}

fn slot_label(
    round: PlayoffRound,
    conference: Option<Conference>,
    home_seed: Option<u8>,
    away_seed: Option<u8>,
    index: usize,
) -> String {
    if round == PlayoffRound::SuperBowl {
        return round.label().to_string();
    }
    let prefix = match conference {
        Some(conference) => format!("{} {}", conference, round.label()),
        None => round.label().to_string(),
    };
    match (home_seed, away_seed) {
        (Some(home), Some(away)) => format!("{}: {} vs {}", prefix, home, away),
        _ => format!("{} Game {}", prefix, index + 1),
    }
}

#[cfg_attr(feature = "python", pyo3::pyclass(get_all))]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketRound {
    pub round: PlayoffRound,
    pub matchups: Vec<PlayoffMatchup>,
}

#[cfg_attr(feature = "python", pyo3::pyclass(get_all))]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffBracket {
    pub season_year: u16,
    pub afc_rounds: Vec<BracketRound>,
    pub nfc_rounds: Vec<BracketRound>,
    pub super_bowl: Option<PlayoffMatchup>,
}

impl PlayoffBracket {
    pub fn rounds(&self, conference: Conference) -> &[BracketRound] {
        match conference {
            Conference::Afc => &self.afc_rounds,
            Conference::Nfc => &self.nfc_rounds,
        }
    }

    pub fn round(&self, conference: Conference, round: PlayoffRound) -> Option<&BracketRound> {
        self.rounds(conference).iter().find(|r| r.round == round)
    }

    pub fn to_json(&self) -> Result<String, StandingsError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Games of one season and round ordered by date then id. A `None`
/// conference matches games of any conference.
pub(crate) fn games_in_round<'g>(
    games: &'g [PostseasonGame],
    season_year: u16,
    round: PlayoffRound,
    conference: Option<Conference>,
) -> Vec<&'g PostseasonGame> {
    let mut selected: Vec<&PostseasonGame> = games
        .iter()
        .filter(|g| g.season_year == season_year && g.round == round)
        .filter(|g| conference.is_none() || g.conference == conference)
        .collect();
    selected.sort_by_key(|g| (g.game_date, g.id));
    selected
}

/// Build the bracket from real games, projecting only the wild-card round.
///
/// Divisional and conference rounds stay empty until their games exist, and
/// the Super Bowl is present only once its game is scheduled.
pub fn build_bracket(
    season_year: u16,
    seeds: &SeedMap,
    games: &[PostseasonGame],
    config: &LeagueConfig,
) -> PlayoffBracket {
    let super_bowl = games_in_round(games, season_year, PlayoffRound::SuperBowl, None)
        .first()
        .map(|game| PlayoffMatchup::from_game(game, seeds, 0));

    PlayoffBracket {
        season_year,
        afc_rounds: conference_rounds(season_year, Conference::Afc, seeds, games, config),
        nfc_rounds: conference_rounds(season_year, Conference::Nfc, seeds, games, config),
        super_bowl,
    }
}

fn conference_rounds(
    season_year: u16,
    conference: Conference,
    seeds: &SeedMap,
    games: &[PostseasonGame],
    config: &LeagueConfig,
) -> Vec<BracketRound> {
    PlayoffRound::CONFERENCE_ROUNDS
        .iter()
        .map(|&round| {
            let played = games_in_round(games, season_year, round, Some(conference));
            let matchups = if !played.is_empty() {
                played
                    .iter()
                    .enumerate()
                    .map(|(i, game)| PlayoffMatchup::from_game(game, seeds, i))
                    .collect()
            } else if round == PlayoffRound::Wildcard {
                project_wild_card(season_year, conference, seeds, config)
            } else {
                Vec::new()
            };
            BracketRound { round, matchups }
        })
        .collect()
}

/// Wild-card pairings from seeds; pairs with an unfilled seed are left out.
fn project_wild_card(
    season_year: u16,
    conference: Conference,
    seeds: &SeedMap,
    config: &LeagueConfig,
) -> Vec<PlayoffMatchup> {
    let Some(conference_seeds) = seeds.conference(conference) else {
        return Vec::new();
    };

    let mut matchups = Vec::new();
    for (home_seed, away_seed) in config.wild_card_pairings() {
        match (
            conference_seeds.team_for_seed(home_seed),
            conference_seeds.team_for_seed(away_seed),
        ) {
            (Some(home), Some(away)) => matchups.push(PlayoffMatchup::projected(
                season_year,
                PlayoffRound::Wildcard,
                Some(conference),
                (home, home_seed),
                (away, away_seed),
                matchups.len(),
            )),
            _ => debug!(%conference, home_seed, away_seed, "seed not filled, skipping projected pairing"),
        }
    }
    matchups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{conference_seeds, full_seed_map, playoff_game, SEASON};

    #[test]
    fn test_projected_wild_card_round() {
        let bracket = build_bracket(SEASON, &full_seed_map(), &[], &LeagueConfig::default());

        let wild_card = bracket.round(Conference::Afc, PlayoffRound::Wildcard).unwrap();
        assert_eq!(wild_card.matchups.len(), 3);

        let pairs: Vec<(Option<u8>, Option<u8>)> = wild_card
            .matchups
            .iter()
            .map(|m| (m.home_seed, m.away_seed))
            .collect();
        assert_eq!(pairs, vec![(Some(2), Some(7)), (Some(3), Some(6)), (Some(4), Some(5))]);

        for matchup in &wild_card.matchups {
            assert!(matchup.is_projected());
            assert_eq!(matchup.home_score, None);
            assert_eq!(matchup.away_score, None);
            assert_eq!(matchup.winner_team_id, None);
        }
        assert_eq!(wild_card.matchups[0].slot, "AFC Wild Card: 2 vs 7");
        assert!(wild_card.matchups.iter().all(|m| m.home_team_id != Some(1)), "seed 1 has a bye");

        for round in [PlayoffRound::Divisional, PlayoffRound::Conference] {
            assert!(bracket.round(Conference::Afc, round).unwrap().matchups.is_empty());
            assert!(bracket.round(Conference::Nfc, round).unwrap().matchups.is_empty());
        }
        assert!(bracket.super_bowl.is_none());
    }

    #[test]
    fn test_sparse_seeds_give_empty_rounds() {
        let seeds = SeedMap::from_conferences(vec![conference_seeds(
            Conference::Afc,
            &[(1, 1, true), (5, 2, true), (9, 3, true)],
        )]);
        let bracket = build_bracket(SEASON, &seeds, &[], &LeagueConfig::default());

        for conference in Conference::ALL {
            let rounds = bracket.rounds(conference);
            assert_eq!(rounds.len(), 3);
            assert!(rounds.iter().all(|r| r.matchups.is_empty()));
        }
    }

    #[test]
    fn test_real_games_replace_projection() {
        let afc = Some(Conference::Afc);
        let games = vec![
            playoff_game(3, afc, PlayoffRound::Wildcard, 4, 5, None),
            playoff_game(1, afc, PlayoffRound::Wildcard, 2, 7, Some((20, 27))),
            playoff_game(2, afc, PlayoffRound::Wildcard, 3, 6, Some((31, 10))),
            playoff_game(9, None, PlayoffRound::SuperBowl, 1, 17, Some((17, 24))),
        ];
        let bracket = build_bracket(SEASON, &full_seed_map(), &games, &LeagueConfig::default());

        let wild_card = bracket.round(Conference::Afc, PlayoffRound::Wildcard).unwrap();
        let ids: Vec<Option<GameId>> = wild_card.matchups.iter().map(|m| m.game_id).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(wild_card.matchups[0].winner_team_id, Some(7));
        assert_eq!(wild_card.matchups[0].away_seed, Some(7));
        assert_eq!(wild_card.matchups[1].winner_team_id, Some(3));
        assert_eq!(wild_card.matchups[2].winner_team_id, None, "unplayed game has no winner");

        // NFC has no games yet and is still projected.
        let nfc = bracket.round(Conference::Nfc, PlayoffRound::Wildcard).unwrap();
        assert!(nfc.matchups.iter().all(PlayoffMatchup::is_projected));

        let super_bowl = bracket.super_bowl.as_ref().unwrap();
        assert_eq!(super_bowl.slot, "Super Bowl");
        assert_eq!(super_bowl.winner_team_id, Some(17));
        assert_eq!((super_bowl.home_seed, super_bowl.away_seed), (Some(1), Some(1)));
    }

    #[test]
    fn test_other_seasons_are_ignored() {
        let mut old = playoff_game(1, Some(Conference::Afc), PlayoffRound::Divisional, 1, 4, Some((10, 3)));
        old.season_year = SEASON - 1;
        let bracket = build_bracket(SEASON, &full_seed_map(), &[old], &LeagueConfig::default());

        assert!(bracket
            .round(Conference::Afc, PlayoffRound::Divisional)
            .unwrap()
            .matchups
            .is_empty());
    }

    #[test]
    fn test_building_twice_is_identical() {
        let games = vec![playoff_game(
            1,
            Some(Conference::Nfc),
            PlayoffRound::Wildcard,
            18,
            23,
            Some((24, 21)),
        )];
        let seeds = full_seed_map();
        let config = LeagueConfig::default();

        let first = build_bracket(SEASON, &seeds, &games, &config).to_json().unwrap();
        let second = build_bracket(SEASON, &seeds, &games, &config).to_json().unwrap();
        assert_eq!(first, second);
        assert!(first.contains("\"WILDCARD\""));
    }

    #[test]
    fn test_level_score_has_no_winner() {
        let game = playoff_game(1, Some(Conference::Afc), PlayoffRound::Wildcard, 2, 7, Some((20, 20)));
        assert_eq!(game.winner(), None);
    }
}
