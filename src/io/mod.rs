//! Readers and writers for the text and binary forms PostGIS exchanges geometries in, plus
//! bridges to GeoJSON and to external geometry engines.

pub mod geo;
pub mod geojson;
pub mod wkb;
pub mod wkt;

pub use geojson::GeoJsonOptions;
pub use wkt::WktOptions;

/// How deeply collections may nest inside (E)WKB or (E)WKT input.
pub const MAX_NESTING_DEPTH: usize = 256;
