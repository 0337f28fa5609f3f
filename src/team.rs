use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StandingsError;

pub type TeamId = u32;

/// The two conferences of the league.
#[cfg_attr(feature = "python", pyo3::pyclass(eq, eq_int))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Conference {
    Afc,
    Nfc,
}

impl Conference {
    pub const ALL: [Conference; 2] = [Conference::Afc, Conference::Nfc];

    pub fn as_str(&self) -> &'static str {
        match self {
            Conference::Afc => "AFC",
            Conference::Nfc => "NFC",
        }
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Conference {
    type Err = StandingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("afc") {
            Ok(Conference::Afc)
        } else if trimmed.eq_ignore_ascii_case("nfc") {
            Ok(Conference::Nfc)
        } else {
            Err(StandingsError::UnknownConference(s.to_string()))
        }
    }
}

/// A team together with the alignment used to bucket division and conference games.
#[cfg_attr(feature = "python", pyo3::pyclass(get_all))]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: TeamId,
    pub name: String,
    pub conference: Conference,

    /// Division label, e.g. "AFC East". Compared case-insensitively.
    pub division: String,
}

impl TeamRef {
    pub fn new(
        id: TeamId,
        name: impl Into<String>,
        conference: Conference,
        division: impl Into<String>,
    ) -> Self {
        TeamRef {
            id,
            name: name.into(),
            conference,
            division: division.into(),
        }
    }

    /// Normalized division label used as a grouping key.
    pub fn division_key(&self) -> String {
        division_key(&self.division)
    }

    pub fn same_conference(&self, other: &TeamRef) -> bool {
        self.conference == other.conference
    }

    pub fn same_division(&self, other: &TeamRef) -> bool {
        self.same_conference(other) && self.division_key() == other.division_key()
    }

    /// Human-readable alignment, used in error messages.
    pub fn alignment(&self) -> String {
        format!("{} / {}", self.conference, self.division.trim())
    }
}

pub(crate) fn division_key(division: &str) -> String {
    division.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conference_parse_is_case_insensitive() {
        assert_eq!("AFC".parse::<Conference>().unwrap(), Conference::Afc);
        assert_eq!(" nfc ".parse::<Conference>().unwrap(), Conference::Nfc);
        assert!("XFL".parse::<Conference>().is_err());
    }

    #[test]
    fn test_same_division_ignores_case() {
        let a = TeamRef::new(1, "Bills", Conference::Afc, "AFC East");
        let b = TeamRef::new(2, "Jets", Conference::Afc, "afc east ");
        let c = TeamRef::new(3, "Giants", Conference::Nfc, "AFC East");

        assert!(a.same_division(&b));
        assert!(!a.same_division(&c), "division names only match within a conference");
        assert!(!a.same_conference(&c));
    }
}
