//! Shared builders for unit tests.
//!
//! The fixture league has 32 teams: ids 1-16 play in the AFC and 17-32 in the
//! NFC, four consecutive ids per division.

use chrono::NaiveDate;

use crate::bracket::{PlayoffRound, PostseasonGame};
use crate::game::{GameId, GameRecord, GameStatus, SeasonType};
use crate::seeding::{ConferenceSeeds, SeedMap, SeededTeam};
use crate::team::{Conference, TeamId, TeamRef};

pub const SEASON: u16 = 2024;

const DIVISIONS: [&str; 4] = ["East", "North", "South", "West"];

pub fn team(id: TeamId) -> TeamRef {
    let conference = if id <= 16 { Conference::Afc } else { Conference::Nfc };
    let division = DIVISIONS[(((id - 1) % 16) / 4) as usize];
    TeamRef::new(
        id,
        format!("Team {}", id),
        conference,
        format!("{} {}", conference, division),
    )
}

pub fn game(id: GameId, home: TeamId, away: TeamId, home_score: u32, away_score: u32) -> GameRecord {
    GameRecord {
        id,
        season_year: SEASON,
        season_type: SeasonType::Regular,
        week: 1,
        home: team(home),
        away: team(away),
        home_score: Some(home_score),
        away_score: Some(away_score),
        status: GameStatus::Completed,
    }
}

pub fn scheduled(id: GameId, home: TeamId, away: TeamId) -> GameRecord {
    GameRecord {
        home_score: None,
        away_score: None,
        status: GameStatus::Scheduled,
        ..game(id, home, away, 0, 0)
    }
}

/// Every team plays its division rivals home and away and every other team in
/// its conference once. The lower id always wins 24-17, so the first team of
/// each division wins it and the wild cards are the second, third and fourth
/// ids of the conference (the fourth beats the sixth on head-to-head at 12-6).
pub fn conference_round_robin() -> Vec<GameRecord> {
    let mut games = Vec::new();
    let mut next_id: GameId = 1;
    let mut play = |games: &mut Vec<GameRecord>, home: TeamId, away: TeamId| {
        let (home_score, away_score) = if home < away { (24, 17) } else { (17, 24) };
        games.push(game(next_id, home, away, home_score, away_score));
        next_id += 1;
    };

    for first in [1, 17] {
        let ids: Vec<TeamId> = (first..first + 16).collect();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                if team(a).same_division(&team(b)) {
                    play(&mut games, a, b);
                    play(&mut games, b, a);
                } else {
                    play(&mut games, a, b);
                }
            }
        }
    }
    games
}

pub fn conference_seeds(conference: Conference, entries: &[(TeamId, u8, bool)]) -> ConferenceSeeds {
    ConferenceSeeds::new(
        conference,
        entries
            .iter()
            .map(|&(team_id, seed, is_division_winner)| SeededTeam {
                team_id,
                seed,
                is_division_winner,
            })
            .collect(),
    )
}

/// Seeds 1-7 in both conferences where the AFC team id equals its seed and
/// the NFC team id is the seed plus 16.
pub fn full_seed_map() -> SeedMap {
    let afc: Vec<(TeamId, u8, bool)> = (1..=7).map(|s| (s as TeamId, s, s <= 4)).collect();
    let nfc: Vec<(TeamId, u8, bool)> = (1..=7).map(|s| (s as TeamId + 16, s, s <= 4)).collect();
    SeedMap::from_conferences(vec![
        conference_seeds(Conference::Afc, &afc),
        conference_seeds(Conference::Nfc, &nfc),
    ])
}

/// Postseason game of the fixture season, dated by id so ordering is stable.
pub fn playoff_game(
    id: GameId,
    conference: Option<Conference>,
    round: PlayoffRound,
    home: TeamId,
    away: TeamId,
    score: Option<(u32, u32)>,
) -> PostseasonGame {
    PostseasonGame {
        id,
        season_year: SEASON,
        conference,
        round,
        home_team_id: home,
        away_team_id: away,
        home_score: score.map(|(home, _)| home),
        away_score: score.map(|(_, away)| away),
        game_date: NaiveDate::from_ymd_opt(2025, 1, 10 + id as u32),
    }
}
