use std::{collections::BTreeMap, sync::LazyLock};

use geo::Point;
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{Category, Error, Names, OsmId, Record, Result};

static ARABIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{Arabic}").expect("hardcoded"));

#[derive(Deserialize)]
struct OverpassResponse {
    elements: Vec<Value>,
}

/// Extracts the `elements` list from an Overpass response. Elements are
/// left undecoded so one malformed entry can't fail the whole batch.
pub fn elements(text: &str) -> Result<Vec<Value>> {
    let response: OverpassResponse =
        serde_json::from_str(text).map_err(|e| Error::ResponseFormat(e.to_string()))?;
    Ok(response.elements)
}

#[derive(Debug, Deserialize)]
pub struct RawElement {
    #[serde(rename = "type")]
    kind: Option<String>,
    id: Option<u64>,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    tags: IndexMap<String, String>,
}

impl RawElement {
    fn osm_id(&self) -> Option<OsmId> {
        OsmId::from_kind(self.kind.as_deref()?, self.id?)
    }

    fn refine(&self, categories: &[Category]) -> Result<Record, &'static str> {
        if self.kind.as_deref() != Some("node") {
            return Err("not a node");
        }
        let (Some(lat), Some(lon)) = (self.lat, self.lon) else {
            return Err("no position");
        };
        let category = self
            .tags
            .get("place")
            .and_then(|x| x.parse::<Category>().ok())
            .filter(|x| categories.contains(x))
            .ok_or("unsupported place")?;
        let name = self.tags.get("name").ok_or("no name tag")?;

        let mut names = Names::new();
        for (key, value) in &self.tags {
            if let Some(language) = key.strip_prefix("name:") {
                if !language.is_empty() && !value.is_empty() {
                    names.insert(language.to_string(), value.clone());
                }
            }
        }

        if names.is_empty() && !name.is_empty() {
            names.insert(infer_language(name).to_string(), name.clone());
        }
        if names.is_empty() {
            return Err("no usable name");
        }

        Ok(Record::new(names, Point::new(lon, lat), category))
    }
}

pub fn infer_language(name: &str) -> &'static str {
    if ARABIC.is_match(name) {
        "ar"
    } else {
        "en"
    }
}

/// Groups usable elements by category. Every requested category gets an
/// entry, even when nothing matched it.
pub fn normalize(
    elements: impl IntoIterator<Item = Value>,
    categories: &[Category],
) -> BTreeMap<Category, Vec<Record>> {
    let mut output: BTreeMap<Category, Vec<Record>> =
        categories.iter().map(|x| (*x, Vec::new())).collect();

    for value in elements {
        let element: RawElement = match serde_json::from_value(value) {
            Ok(x) => x,
            Err(e) => {
                debug!(error = %e, "skipping undecodable element");
                continue;
            }
        };

        match element.refine(categories) {
            Ok(record) => {
                if let Some(category) = record.category {
                    output.entry(category).or_default().push(record);
                }
            }
            Err(reason) => match element.osm_id() {
                Some(id) => debug!(element = %id, reason, "skipping element"),
                None => debug!(reason, "skipping element"),
            },
        }
    }

    output
}
