mod geojson;

pub use geojson::{features_from_geojson, to_geojson};
