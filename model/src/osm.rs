use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OsmId {
    Node(u64),
    Way(u64),
    Relation(u64),
}

impl OsmId {
    /// Builds an id from an Overpass element's `type` and `id` fields.
    pub fn from_kind(kind: &str, id: u64) -> Option<Self> {
        Some(match kind {
            "node" => Self::Node(id),
            "way" => Self::Way(id),
            "relation" => Self::Relation(id),
            _ => return None,
        })
    }
}

impl fmt::Display for OsmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(x) => write!(f, "node/{x}"),
            Self::Way(x) => write!(f, "way/{x}"),
            Self::Relation(x) => write!(f, "relation/{x}"),
        }
    }
}
