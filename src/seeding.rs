use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::config::LeagueConfig;
use crate::game::GameRecord;
use crate::standings::TeamStanding;
use crate::team::{Conference, TeamId};
use crate::tiebreak::{TieBreakContext, TieBreakOrdering};

/// A playoff qualifier and its seed within the conference.
#[cfg_attr(feature = "python", pyo3::pyclass(get_all))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededTeam {
    pub team_id: TeamId,
    pub seed: u8,
    pub is_division_winner: bool,
}

/// Seeds of one conference, ordered by seed. May hold fewer teams than the
/// playoff field when divisions are empty.
#[cfg_attr(feature = "python", pyo3::pyclass(get_all))]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceSeeds {
    pub conference: Conference,
    pub teams: Vec<SeededTeam>,
}

impl ConferenceSeeds {
    pub fn new(conference: Conference, mut teams: Vec<SeededTeam>) -> Self {
        teams.sort_by_key(|t| t.seed);
        ConferenceSeeds { conference, teams }
    }

    pub fn team_for_seed(&self, seed: u8) -> Option<TeamId> {
        self.teams.iter().find(|t| t.seed == seed).map(|t| t.team_id)
    }

    pub fn seed_of(&self, team_id: TeamId) -> Option<u8> {
        self.teams.iter().find(|t| t.team_id == team_id).map(|t| t.seed)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// Seeds for every conference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedMap {
    conferences: BTreeMap<Conference, ConferenceSeeds>,
}

impl SeedMap {
    pub fn from_conferences(conferences: impl IntoIterator<Item = ConferenceSeeds>) -> Self {
        SeedMap {
            conferences: conferences
                .into_iter()
                .map(|seeds| (seeds.conference, seeds))
                .collect(),
        }
    }

    pub fn conference(&self, conference: Conference) -> Option<&ConferenceSeeds> {
        self.conferences.get(&conference)
    }

    pub fn seed_of(&self, team_id: TeamId) -> Option<u8> {
        self.conferences.values().find_map(|c| c.seed_of(team_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConferenceSeeds> {
        self.conferences.values()
    }

    /// Total number of seeded teams across conferences.
    pub fn len(&self) -> usize {
        self.conferences.values().map(ConferenceSeeds::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One division ordered best first.
#[cfg_attr(feature = "python", pyo3::pyclass(get_all))]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionTable {
    pub conference: Conference,
    pub division: String,
    pub teams: Vec<TeamStanding>,
}

/// Team ids of a conference grouped by division, keyed by normalized division name.
fn divisions(standings: &[TeamStanding], conference: Conference) -> BTreeMap<String, Vec<TeamId>> {
    let mut divisions: BTreeMap<String, Vec<TeamId>> = BTreeMap::new();
    for standing in standings.iter().filter(|s| s.conference == conference) {
        divisions
            .entry(standing.division_key())
            .or_default()
            .push(standing.team_id);
    }
    divisions
}

/// The top team of each division of `conference` under the division ordering.
pub fn division_winners(
    ctx: &TieBreakContext<'_>,
    standings: &[TeamStanding],
    conference: Conference,
) -> Vec<TeamId> {
    divisions(standings, conference)
        .values()
        .filter_map(|teams| ctx.rank(teams, TieBreakOrdering::Division).first().copied())
        .collect()
}

/// Pick up to `slots` wild cards one at a time. The remaining pool is
/// re-ranked after every pick, so common opponents shrink with the group.
pub fn select_wild_cards(ctx: &TieBreakContext<'_>, pool: &[TeamId], slots: usize) -> Vec<TeamId> {
    let mut pool = pool.to_vec();
    let mut picks = Vec::with_capacity(slots);
    while picks.len() < slots {
        let Some(&next) = ctx.rank(&pool, TieBreakOrdering::WildCard).first() else {
            break;
        };
        pool.retain(|&t| t != next);
        picks.push(next);
    }
    picks
}

/// Seed number for the next qualifier, or `None` once the field is full.
fn next_seed(teams: &[SeededTeam], field: usize) -> Option<u8> {
    if teams.len() >= field {
        return None;
    }
    u8::try_from(teams.len() + 1).ok()
}

fn seed_conference(
    ctx: &TieBreakContext<'_>,
    standings: &[TeamStanding],
    conference: Conference,
    config: &LeagueConfig,
) -> ConferenceSeeds {
    let division_count = divisions(standings, conference).len();
    if division_count > config.divisions_per_conference {
        warn!(
            %conference,
            divisions = division_count,
            expected = config.divisions_per_conference,
            "conference has more divisions than the league is configured for"
        );
    }

    let field = config.playoff_teams_per_conference.min(u8::MAX as usize);
    if field < config.playoff_teams_per_conference {
        warn!(
            %conference,
            configured = config.playoff_teams_per_conference,
            seeded = field,
            "playoff field capped at the largest seed number"
        );
    }

    let winners = division_winners(ctx, standings, conference);
    let mut teams: Vec<SeededTeam> = Vec::with_capacity(field);
    for team_id in ctx.rank(&winners, TieBreakOrdering::WildCard) {
        let Some(seed) = next_seed(&teams, field) else {
            break;
        };
        teams.push(SeededTeam {
            team_id,
            seed,
            is_division_winner: true,
        });
    }

    let pool: Vec<TeamId> = standings
        .iter()
        .filter(|s| s.conference == conference && !winners.contains(&s.team_id))
        .map(|s| s.team_id)
        .collect();
    let slots = config.wild_card_slots().min(field.saturating_sub(teams.len()));

    for team_id in select_wild_cards(ctx, &pool, slots) {
        let Some(seed) = next_seed(&teams, field) else {
            break;
        };
        teams.push(SeededTeam {
            team_id,
            seed,
            is_division_winner: false,
        });
    }

    debug!(%conference, seeded = teams.len(), "assigned playoff seeds");
    ConferenceSeeds::new(conference, teams)
}

/// Seed every conference from regular-season standings and the games they came from.
pub fn assign_seeds(standings: &[TeamStanding], games: &[GameRecord], config: &LeagueConfig) -> SeedMap {
    let ctx = TieBreakContext::new(standings, games, config);
    SeedMap::from_conferences(
        Conference::ALL
            .iter()
            .map(|&conference| seed_conference(&ctx, standings, conference, config)),
    )
}

/// New standings carrying their playoff seed (0 for teams that missed out).
pub fn apply_seeds(standings: &[TeamStanding], seeds: &SeedMap) -> Vec<TeamStanding> {
    standings
        .iter()
        .map(|s| s.with_seed(seeds.seed_of(s.team_id).unwrap_or(0)))
        .collect()
}

/// Every division ordered with the same resolver used for seeding.
pub fn division_standings(
    standings: &[TeamStanding],
    games: &[GameRecord],
    config: &LeagueConfig,
) -> Vec<DivisionTable> {
    let ctx = TieBreakContext::new(standings, games, config);
    let mut tables = Vec::new();
    for conference in Conference::ALL {
        for teams in divisions(standings, conference).values() {
            let ordered: Vec<TeamStanding> = ctx
                .rank(teams, TieBreakOrdering::Division)
                .into_iter()
                .filter_map(|id| ctx.standing(id).cloned())
                .collect();
            let Some(first) = ordered.first() else {
                continue;
            };
            tables.push(DivisionTable {
                conference,
                division: first.division.trim().to_string(),
                teams: ordered,
            });
        }
    }
    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{conference_round_robin, game};
    use crate::standings::compute_standings;
    use std::collections::HashSet;

    fn seeded_ids(seeds: &ConferenceSeeds) -> Vec<TeamId> {
        seeds.teams.iter().map(|t| t.team_id).collect()
    }

    #[test]
    fn test_round_robin_seeds() {
        let games = conference_round_robin();
        let standings = compute_standings(&games);
        let seeds = assign_seeds(&standings, &games, &LeagueConfig::default());

        let afc = seeds.conference(Conference::Afc).unwrap();
        assert_eq!(seeded_ids(afc), vec![1, 5, 9, 13, 2, 3, 4]);

        let nfc = seeds.conference(Conference::Nfc).unwrap();
        assert_eq!(seeded_ids(nfc), vec![17, 21, 25, 29, 18, 19, 20]);

        assert_eq!(seeds.len(), 14);
        for conference in seeds.iter() {
            let unique: HashSet<u8> = conference.teams.iter().map(|t| t.seed).collect();
            assert_eq!(unique.len(), conference.len(), "seeds must be unique");
            assert!(conference.teams[0].is_division_winner);
            assert_eq!(conference.teams[0].seed, 1);
            assert_eq!(conference.teams.iter().filter(|t| t.is_division_winner).count(), 4);
        }
        assert_eq!(seeds.seed_of(4), Some(7));
        assert_eq!(seeds.seed_of(6), None);
    }

    #[test]
    fn test_sparse_conference() {
        // Three AFC teams in three different divisions.
        let games = vec![game(1, 1, 5, 10, 7), game(2, 5, 9, 10, 7), game(3, 9, 1, 10, 7)];
        let standings = compute_standings(&games);
        let seeds = assign_seeds(&standings, &games, &LeagueConfig::default());

        let afc = seeds.conference(Conference::Afc).unwrap();
        assert_eq!(afc.len(), 3);
        assert!(afc.teams.iter().all(|t| t.is_division_winner));
        assert!(seeds.conference(Conference::Nfc).unwrap().is_empty());
        assert_eq!(seeds.len(), 3);
    }

    #[test]
    fn test_unvalidated_oversized_field_seeds_consecutively() {
        let games = conference_round_robin();
        let standings = compute_standings(&games);
        let config = LeagueConfig {
            playoff_teams_per_conference: 300,
            ..LeagueConfig::default()
        };
        let seeds = assign_seeds(&standings, &games, &config);

        for conference in seeds.iter() {
            let numbers: Vec<u8> = conference.teams.iter().map(|t| t.seed).collect();
            assert_eq!(numbers, (1..=16).collect::<Vec<u8>>());
        }
        assert_eq!(next_seed(&[], 0), None);
        assert_eq!(next_seed(&[], 1), Some(1));
    }

    #[test]
    fn test_wild_cards_are_reranked_after_each_pick() {
        // 2, 3 and 6 all finish 2-1. As a trio, conference record orders them
        // 2 > 3 > 6. Once 2 is taken, 6 beat 3 head-to-head and moves ahead.
        let games = vec![
            game(1, 6, 3, 10, 7),
            game(2, 2, 9, 10, 7),
            game(3, 2, 10, 10, 7),
            game(4, 17, 2, 10, 7),
            game(5, 3, 11, 10, 7),
            game(6, 3, 12, 10, 7),
            game(7, 13, 6, 10, 7),
            game(8, 6, 18, 10, 7),
        ];
        let standings = compute_standings(&games);
        let ctx = TieBreakContext::new(&standings, &games, &LeagueConfig::default());

        let pool = [2, 3, 6];
        assert_eq!(ctx.rank(&pool, TieBreakOrdering::WildCard), vec![2, 3, 6]);
        assert_eq!(select_wild_cards(&ctx, &pool, 2), vec![2, 6]);
        assert_eq!(select_wild_cards(&ctx, &pool, 5), vec![2, 6, 3]);
    }

    #[test]
    fn test_apply_seeds_returns_new_standings() {
        let games = conference_round_robin();
        let standings = compute_standings(&games);
        let seeds = assign_seeds(&standings, &games, &LeagueConfig::default());
        let seeded = apply_seeds(&standings, &seeds);

        assert!(standings.iter().all(|s| s.playoff_seed == 0));
        let seed_of = |id| seeded.iter().find(|s| s.team_id == id).unwrap().playoff_seed;
        assert_eq!(seed_of(1), 1);
        assert_eq!(seed_of(13), 4);
        assert_eq!(seed_of(16), 0);
    }

    #[test]
    fn test_division_standings_use_division_ordering() {
        let games = conference_round_robin();
        let standings = compute_standings(&games);
        let tables = division_standings(&standings, &games, &LeagueConfig::default());

        assert_eq!(tables.len(), 8);
        let east = &tables[0];
        assert_eq!(east.conference, Conference::Afc);
        assert_eq!(east.division, "AFC East");
        let order: Vec<TeamId> = east.teams.iter().map(|s| s.team_id).collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
    }
}
