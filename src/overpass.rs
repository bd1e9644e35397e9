use std::{io::Read, time::Duration};

use tracing::info;
use ureq::{Agent, AgentBuilder};

use crate::{normalize, utils::spinner, Config, Error, Result};

pub fn agent(config: &Config) -> Agent {
    AgentBuilder::new()
        .timeout(Duration::from_secs(config.http_timeout))
        .user_agent(concat!("gazetteer/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Runs the configured place query and returns the raw response text, once
/// it is known to hold an `elements` list.
pub fn query(config: &Config) -> Result<String> {
    let payload = config.query();
    let transport = |source: Box<dyn std::error::Error + Send + Sync>| Error::Transport {
        endpoint: config.endpoint.clone(),
        source,
    };

    let pb = spinner(format!("Querying {}", config.endpoint));
    let response = agent(config)
        .post(&config.endpoint)
        .send_form(&[("data", payload.as_str())]);
    pb.finish_and_clear();

    // into_string() caps bodies at 10MB, whole regions can be larger
    let mut text = String::new();
    response
        .map_err(|e| transport(Box::new(e)))?
        .into_reader()
        .read_to_string(&mut text)
        .map_err(|e| transport(Box::new(e)))?;

    let elements = normalize::elements(&text)?;
    info!(elements = elements.len(), "received overpass response");
    Ok(text)
}
