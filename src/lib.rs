pub mod config;
pub mod dataset;
mod error;
pub mod normalize;
pub mod overpass;
pub mod partition;
pub mod pipeline;
pub mod reconcile;
mod utils;

pub use _model::{primary_name, Category, CoordinatePolicy, Names, OsmId, Record};
pub use config::Config;
pub use error::{Error, Result};
