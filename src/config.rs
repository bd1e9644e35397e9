use std::{
    fs,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{Category, CoordinatePolicy, Error, Result};

/// Where to fetch from and where the datasets live.
///
/// Every field has a default, so a RON file only needs the fields it changes:
///
/// ```ron
/// (
///     area: 3600192758,
///     categories: [city, town],
///     unset_coordinates: Falsy,
/// )
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Overpass interpreter url.
    pub endpoint: String,
    /// Overpass area id of the region (relation id + 3600000000).
    pub area: u64,
    /// Server side query timeout, seconds.
    pub query_timeout: u64,
    /// Client side request timeout, seconds.
    pub http_timeout: u64,
    pub categories: Vec<Category>,
    /// Raw response saved by `fetch` and read by `process`.
    pub input: PathBuf,
    /// Directory holding the per-category datasets and the combined file.
    pub output: PathBuf,
    pub combined: String,
    pub unset_coordinates: CoordinatePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "https://overpass-api.de/api/interpreter".to_string(),
            area: 3600192758,
            query_timeout: 25,
            http_timeout: 30,
            categories: Category::all(),
            input: PathBuf::from("input.json"),
            output: PathBuf::from("libya"),
            combined: "all.json".to_string(),
            unset_coordinates: CoordinatePolicy::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = ron::from_str(&text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(Error::Config("no place categories selected".to_string()));
        }
        if !self.categories.iter().all_unique() {
            return Err(Error::Config("place categories are listed twice".to_string()));
        }
        if self.query_timeout == 0 || self.http_timeout == 0 {
            return Err(Error::Config("timeouts must be positive".to_string()));
        }
        if self.combined.is_empty() {
            return Err(Error::Config("combined file name is empty".to_string()));
        }
        Ok(())
    }

    /// Resolves relative input and output paths against `dir`.
    pub fn rooted(mut self, dir: &Path) -> Self {
        self.input = dir.join(&self.input);
        self.output = dir.join(&self.output);
        self
    }

    pub fn dataset_path(&self, category: Category) -> PathBuf {
        self.output.join(format!("{}.json", category.plural()))
    }

    pub fn combined_path(&self) -> PathBuf {
        self.output.join(&self.combined)
    }

    pub fn query(&self) -> String {
        let nodes = self
            .categories
            .iter()
            .map(|x| format!("node[\"place\"=\"{}\"](area.region);", x.slug()))
            .join("\n");
        format!(
            "[out:json][timeout:{}];\narea({})->.region;\n(\n{nodes}\n);\nout body;",
            self.query_timeout, self.area
        )
    }
}
