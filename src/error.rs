use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to fetch data from {endpoint}")]
    Transport {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("invalid response: {0}")]
    ResponseFormat(String),
    #[error("{} not found, run with \"fetch\" command first", .0.display())]
    MissingInput(PathBuf),
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not a valid dataset", path.display())]
    Dataset {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no ids left to allocate")]
    IdsExhausted,
    #[error("invalid configuration: {0}")]
    Config(String),
}
