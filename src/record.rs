use serde::{Deserialize, Serialize};

/// Result of a single game from one team's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

impl Outcome {
    /// Higher score wins; equal scores tie.
    pub fn from_scores(scored: u32, allowed: u32) -> Self {
        match scored.cmp(&allowed) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Tie,
        }
    }

    /// The same game seen from the opponent's side.
    pub fn reverse(self) -> Self {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
            Outcome::Tie => Outcome::Tie,
        }
    }
}

/// Won/lost/tied tally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl Record {
    pub fn new(wins: u32, losses: u32, ties: u32) -> Self {
        Record { wins, losses, ties }
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// (wins + 0.5 * ties) / games, or 0.0 when no games were played.
    pub fn win_pct(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            return 0.0;
        }
        (self.wins as f64 + 0.5 * self.ties as f64) / games as f64
    }

    pub fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Tie => self.ties += 1,
        }
    }
}
