mod category;
mod osm;
mod record;

pub use category::Category;
pub use osm::OsmId;
pub use record::{primary_name, CoordinatePolicy, Names, Record};
