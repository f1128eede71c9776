//! Lanes a hero can be drafted into.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One of the five fixed lanes.
///
/// Declaration order is the canonical order: `Ord`, `Role::ALL` and every
/// `BTreeSet<Role>` iterate Top, Jungle, Mid, Adc, Support. The serialized
/// form is the in-game lane label, which is what persisted history records
/// carry; the ASCII codes are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "对抗路", alias = "TOP", alias = "top")]
    Top,
    #[serde(rename = "打野", alias = "JUNGLE", alias = "jungle")]
    Jungle,
    #[serde(rename = "中路", alias = "MID", alias = "mid")]
    Mid,
    #[serde(rename = "发育路", alias = "ADC", alias = "adc")]
    Adc,
    #[serde(rename = "游走", alias = "SUPPORT", alias = "support")]
    Support,
}

/// A set of roles, iterated in canonical order.
pub type RoleSet = BTreeSet<Role>;

impl Role {
    pub const ALL: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Support];

    /// Lane label shown to players.
    pub fn label(self) -> &'static str {
        match self {
            Role::Top => "对抗路",
            Role::Jungle => "打野",
            Role::Mid => "中路",
            Role::Adc => "发育路",
            Role::Support => "游走",
        }
    }

    /// Short ASCII code used on the command line.
    pub fn code(self) -> &'static str {
        match self {
            Role::Top => "top",
            Role::Jungle => "jungle",
            Role::Mid => "mid",
            Role::Adc => "adc",
            Role::Support => "support",
        }
    }

    pub fn all() -> RoleSet {
        Role::ALL.into_iter().collect()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Role::ALL
            .into_iter()
            .find(|r| r.code().eq_ignore_ascii_case(trimmed) || r.label() == trimmed)
            .ok_or_else(|| Error::UnknownRole(trimmed.to_string()))
    }
}
