use geo::Point;
use indexmap::IndexMap;
use serde::{de::Error, Deserialize, Deserializer, Serialize};
use serde_with::skip_serializing_none;

use crate::Category;

/// Display names keyed by language code, in source order.
pub type Names = IndexMap<String, String>;

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: Option<u64>,
    #[serde(rename = "name")]
    pub names: Vec<Names>,
    #[serde(default, deserialize_with = "coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "coordinate")]
    pub longitude: Option<f64>,
    #[serde(rename = "type")]
    pub category: Option<Category>,
}

impl Record {
    /// A freshly ingested place that has not been assigned an id yet.
    pub fn new(names: Names, point: Point, category: Category) -> Self {
        Self {
            id: None,
            names: vec![names],
            latitude: Some(point.y()),
            longitude: Some(point.x()),
            category: Some(category),
        }
    }

    pub fn primary_name(&self) -> &str {
        self.names.first().map(primary_name).unwrap_or_default()
    }
}

/// Arabic if present, then English, then whichever language came first.
pub fn primary_name(names: &Names) -> &str {
    names
        .get("ar")
        .or_else(|| names.get("en"))
        .or_else(|| names.values().next())
        .map(String::as_str)
        .unwrap_or_default()
}

/// Decides when a stored coordinate counts as missing and should be
/// backfilled from fresh data.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinatePolicy {
    /// Only an absent coordinate is missing.
    #[default]
    Explicit,
    /// Absent or exactly zero, as older datasets were written.
    Falsy,
}

impl CoordinatePolicy {
    pub fn is_unset(&self, value: Option<f64>) -> bool {
        match (self, value) {
            (_, None) => true,
            (Self::Explicit, Some(_)) => false,
            (Self::Falsy, Some(x)) => x == 0.0,
        }
    }

    pub fn backfill(&self, current: Option<f64>, fresh: Option<f64>) -> Option<f64> {
        if self.is_unset(current) {
            fresh
        } else {
            current
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCoordinate {
    Number(f64),
    Text(String),
}

// older datasets may hold null, "" or numeric strings
fn coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<RawCoordinate>::deserialize(deserializer)? {
        None => None,
        Some(RawCoordinate::Number(x)) => Some(x),
        Some(RawCoordinate::Text(x)) if x.trim().is_empty() => None,
        Some(RawCoordinate::Text(x)) => Some(x.trim().parse().map_err(D::Error::custom)?),
    })
}
