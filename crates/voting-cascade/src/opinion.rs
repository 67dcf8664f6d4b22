//! Parties and opinions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A party a voter can back.
///
/// `Democrat` orders before `Republican`; the engine relies on that order when
/// a voter is a fan of two celebrities at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    /// Party A
    Democrat,
    /// Party B
    Republican,
}

impl Party {
    /// Both parties, in tie-break order.
    pub const ALL: [Party; 2] = [Party::Democrat, Party::Republican];

    /// The other party.
    pub const fn opposite(self) -> Self {
        match self {
            Party::Democrat => Party::Republican,
            Party::Republican => Party::Democrat,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Democrat => f.write_str("democrat"),
            Party::Republican => f.write_str("republican"),
        }
    }
}

impl FromStr for Party {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "democrat" | "dem" | "a" => Ok(Party::Democrat),
            "republican" | "rep" | "b" => Ok(Party::Republican),
            other => Err(Error::config(format!("unknown party '{other}'"))),
        }
    }
}

/// A voter's opinion, either as believed or as expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Opinion {
    #[default]
    Undecided,
    Democrat,
    Republican,
}

impl Opinion {
    /// The party behind this opinion, if any.
    pub const fn party(self) -> Option<Party> {
        match self {
            Opinion::Undecided => None,
            Opinion::Democrat => Some(Party::Democrat),
            Opinion::Republican => Some(Party::Republican),
        }
    }

    pub const fn is_undecided(self) -> bool {
        matches!(self, Opinion::Undecided)
    }

    pub const fn is_decided(self) -> bool {
        !self.is_undecided()
    }
}

impl From<Party> for Opinion {
    fn from(party: Party) -> Self {
        match party {
            Party::Democrat => Opinion::Democrat,
            Party::Republican => Opinion::Republican,
        }
    }
}

impl fmt::Display for Opinion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.party() {
            Some(party) => party.fmt(f),
            None => f.write_str("undecided"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for party in Party::ALL {
            assert_ne!(party.opposite(), party);
            assert_eq!(party.opposite().opposite(), party);
        }
    }

    #[test]
    fn democrat_orders_first() {
        assert!(Party::Democrat < Party::Republican);
        assert_eq!(Party::ALL[0], Party::Democrat);
    }

    #[test]
    fn opinion_party_roundtrip() {
        assert_eq!(Opinion::Undecided.party(), None);
        for party in Party::ALL {
            assert_eq!(Opinion::from(party).party(), Some(party));
            assert!(Opinion::from(party).is_decided());
        }
        assert!(Opinion::default().is_undecided());
    }

    #[test]
    fn parse_party_names() {
        assert_eq!("Democrat".parse::<Party>().unwrap(), Party::Democrat);
        assert_eq!(" rep ".parse::<Party>().unwrap(), Party::Republican);
        assert_eq!("b".parse::<Party>().unwrap(), Party::Republican);
        assert!(matches!(
            "green".parse::<Party>(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn display_matches_serde_names() {
        assert_eq!(Opinion::Undecided.to_string(), "undecided");
        assert_eq!(Opinion::Republican.to_string(), "republican");
        assert_eq!(Party::Democrat.to_string(), "democrat");
    }
}
