//! Deterministic ordering of teams tied on winning percentage.
//!
//! Teams are first bucketed by exact win percentage. Inside a multi-team
//! bucket the metrics of a [`TieBreakOrdering`] are tried in priority order;
//! the first metric that separates the group splits it into sub-groups, and
//! every sub-group is resolved again from the first metric so head-to-head and
//! common-opponent records are recomputed for the smaller group. When every
//! metric ties, ascending team id decides.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::trace;

use crate::config::LeagueConfig;
use crate::constants::quantize;
use crate::game::GameRecord;
use crate::record::{Outcome, Record};
use crate::standings::TeamStanding;
use crate::team::TeamId;

/// A single tie-break criterion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TieBreakMetric {
    HeadToHead,
    DivisionRecord,
    CommonOpponents,
    ConferenceRecord,
    StrengthOfVictory,
    StrengthOfSchedule,
    PointDifferential,
}

/// Which chain of metrics to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TieBreakOrdering {
    /// Ranks teams inside one division.
    Division,
    /// Ranks division winners against each other and picks wild cards.
    WildCard,
}

const DIVISION_METRICS: [TieBreakMetric; 7] = [
    TieBreakMetric::HeadToHead,
    TieBreakMetric::DivisionRecord,
    TieBreakMetric::CommonOpponents,
    TieBreakMetric::ConferenceRecord,
    TieBreakMetric::StrengthOfVictory,
    TieBreakMetric::StrengthOfSchedule,
    TieBreakMetric::PointDifferential,
];

const WILD_CARD_METRICS: [TieBreakMetric; 6] = [
    TieBreakMetric::HeadToHead,
    TieBreakMetric::ConferenceRecord,
    TieBreakMetric::CommonOpponents,
    TieBreakMetric::StrengthOfVictory,
    TieBreakMetric::StrengthOfSchedule,
    TieBreakMetric::PointDifferential,
];

impl TieBreakOrdering {
    pub fn metrics(self) -> &'static [TieBreakMetric] {
        match self {
            TieBreakOrdering::Division => &DIVISION_METRICS,
            TieBreakOrdering::WildCard => &WILD_CARD_METRICS,
        }
    }
}

/// Completed game from one team's side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct GameResult {
    opponent: TeamId,
    outcome: Outcome,
}

/// Read-only view over a season used to evaluate tie-break metrics.
pub struct TieBreakContext<'a> {
    standings: HashMap<TeamId, &'a TeamStanding>,
    results: HashMap<TeamId, Vec<GameResult>>,
    min_wild_card_common_opponents: usize,
}

impl<'a> TieBreakContext<'a> {
    /// Index the standings and every completed, scored game.
    pub fn new(standings: &'a [TeamStanding], games: &[GameRecord], config: &LeagueConfig) -> Self {
        let mut results: HashMap<TeamId, Vec<GameResult>> = HashMap::new();
        for game in games {
            let Some(home_outcome) = game.home_outcome() else {
                continue;
            };
            results.entry(game.home.id).or_default().push(GameResult {
                opponent: game.away.id,
                outcome: home_outcome,
            });
            results.entry(game.away.id).or_default().push(GameResult {
                opponent: game.home.id,
                outcome: home_outcome.reverse(),
            });
        }

        TieBreakContext {
            standings: standings.iter().map(|s| (s.team_id, s)).collect(),
            results,
            min_wild_card_common_opponents: config.min_wild_card_common_opponents,
        }
    }

    pub fn standing(&self, team: TeamId) -> Option<&'a TeamStanding> {
        self.standings.get(&team).copied()
    }

    /// Order teams best first: higher win percentage buckets always come
    /// first, and ties inside a bucket are resolved with `ordering`.
    pub fn rank(&self, teams: &[TeamId], ordering: TieBreakOrdering) -> Vec<TeamId> {
        let mut buckets: BTreeMap<Reverse<i64>, Vec<TeamId>> = BTreeMap::new();
        for &team in teams {
            buckets
                .entry(Reverse(quantize(self.win_pct(team))))
                .or_default()
                .push(team);
        }
        buckets
            .into_values()
            .flat_map(|bucket| self.resolve(&bucket, ordering))
            .collect()
    }

    /// Order a group already tied on win percentage.
    pub fn resolve(&self, tied: &[TeamId], ordering: TieBreakOrdering) -> Vec<TeamId> {
        let mut group = tied.to_vec();
        group.sort_unstable();
        group.dedup();
        if group.len() < 2 {
            return group;
        }

        for &metric in ordering.metrics() {
            let Some(values) = self.metric_values(metric, &group, ordering) else {
                continue;
            };
            if values.iter().all(|v| *v == values[0]) {
                continue;
            }

            trace!(?metric, ?ordering, teams = ?group, "tie broken");
            let mut buckets: BTreeMap<Reverse<i64>, Vec<TeamId>> = BTreeMap::new();
            for (&team, &value) in group.iter().zip(&values) {
                buckets.entry(Reverse(value)).or_default().push(team);
            }
            return buckets
                .into_values()
                .flat_map(|bucket| self.resolve(&bucket, ordering))
                .collect();
        }

        trace!(?ordering, teams = ?group, "all tie-breakers exhausted, ordering by team id");
        group
    }

    /// Quantized value of `metric` for every team in `group` (higher is
    /// better), or `None` when the metric does not apply to this group.
    fn metric_values(
        &self,
        metric: TieBreakMetric,
        group: &[TeamId],
        ordering: TieBreakOrdering,
    ) -> Option<Vec<i64>> {
        let values: Vec<f64> = match metric {
            TieBreakMetric::HeadToHead => self.head_to_head(group, ordering)?,
            TieBreakMetric::DivisionRecord => group
                .iter()
                .map(|&t| self.standing(t).map_or(0.0, |s| s.division_record().win_pct()))
                .collect(),
            TieBreakMetric::CommonOpponents => self.common_opponent_pcts(group, ordering)?,
            TieBreakMetric::ConferenceRecord => group
                .iter()
                .map(|&t| self.standing(t).map_or(0.0, |s| s.conference_record().win_pct()))
                .collect(),
            TieBreakMetric::StrengthOfVictory => {
                group.iter().map(|&t| self.strength_of_victory(t)).collect()
            }
            TieBreakMetric::StrengthOfSchedule => {
                group.iter().map(|&t| self.strength_of_schedule(t)).collect()
            }
            TieBreakMetric::PointDifferential => group
                .iter()
                .map(|&t| self.standing(t).map_or(0.0, |s| s.point_differential() as f64))
                .collect(),
        };
        Some(values.into_iter().map(quantize).collect())
    }

    fn win_pct(&self, team: TeamId) -> f64 {
        self.standing(team).map_or(0.0, |s| s.win_pct())
    }

    fn results(&self, team: TeamId) -> &[GameResult] {
        self.results.get(&team).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Record of `team` against the given opponents.
    fn record_against(&self, team: TeamId, opponents: &BTreeSet<TeamId>) -> Record {
        let mut record = Record::default();
        for result in self.results(team) {
            if opponents.contains(&result.opponent) {
                record.add(result.outcome);
            }
        }
        record
    }

    /// Each team's win percentage against the rest of the group minus the
    /// reverse. Applies only when every team has met the group; wild-card
    /// ordering further restricts it to two teams that played each other.
    pub fn head_to_head(&self, group: &[TeamId], ordering: TieBreakOrdering) -> Option<Vec<f64>> {
        if ordering == TieBreakOrdering::WildCard && group.len() != 2 {
            return None;
        }

        let mut values = Vec::with_capacity(group.len());
        for &team in group {
            let others: BTreeSet<TeamId> = group.iter().copied().filter(|&t| t != team).collect();
            let record = self.record_against(team, &others);
            if record.games() == 0 {
                return None;
            }
            let pct = record.win_pct();
            values.push(pct - (1.0 - pct));
        }
        Some(values)
    }

    /// Opponents every team in the group has played, excluding the group itself.
    pub fn common_opponents(&self, group: &[TeamId]) -> BTreeSet<TeamId> {
        let mut common: Option<BTreeSet<TeamId>> = None;
        for &team in group {
            let opponents: BTreeSet<TeamId> = self.results(team).iter().map(|r| r.opponent).collect();
            common = Some(match common {
                None => opponents,
                Some(acc) => acc.intersection(&opponents).copied().collect(),
            });
        }
        let mut common = common.unwrap_or_default();
        for team in group {
            common.remove(team);
        }
        common
    }

    fn common_opponent_pcts(&self, group: &[TeamId], ordering: TieBreakOrdering) -> Option<Vec<f64>> {
        let common = self.common_opponents(group);
        let minimum = match ordering {
            TieBreakOrdering::Division => 1,
            TieBreakOrdering::WildCard => self.min_wild_card_common_opponents.max(1),
        };
        if common.len() < minimum {
            return None;
        }
        Some(
            group
                .iter()
                .map(|&team| self.record_against(team, &common).win_pct())
                .collect(),
        )
    }

    /// Average win percentage of beaten opponents, counted once per win.
    pub fn strength_of_victory(&self, team: TeamId) -> f64 {
        let beaten: Vec<f64> = self
            .results(team)
            .iter()
            .filter(|r| r.outcome == Outcome::Win)
            .map(|r| self.win_pct(r.opponent))
            .collect();
        average(&beaten)
    }

    /// Average win percentage of every opponent played, counted once per game.
    pub fn strength_of_schedule(&self, team: TeamId) -> f64 {
        let played: Vec<f64> = self
            .results(team)
            .iter()
            .map(|r| self.win_pct(r.opponent))
            .collect();
        average(&played)
    }
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
