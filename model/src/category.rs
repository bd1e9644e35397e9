use std::{fmt, str::FromStr};

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Classification of a populated place, ordered from largest to smallest.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    City,
    Town,
    Village,
    Hamlet,
}

impl Category {
    pub fn all() -> Vec<Self> {
        vec![Self::City, Self::Town, Self::Village, Self::Hamlet]
    }

    /// Value of the `place` tag.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Town => "town",
            Self::Village => "village",
            Self::Hamlet => "hamlet",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            Self::City => "cities",
            Self::Town => "towns",
            Self::Village => "villages",
            Self::Hamlet => "hamlets",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::City => write!(f, "Cities"),
            Self::Town => write!(f, "Towns"),
            Self::Village => write!(f, "Villages"),
            Self::Hamlet => write!(f, "Hamlets"),
        }
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "city" => Self::City,
            "town" => Self::Town,
            "village" => Self::Village,
            "hamlet" => Self::Hamlet,
            _ => bail!("Unknown place category: {s}"),
        })
    }
}
