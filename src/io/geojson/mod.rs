//! Convert geometries to and from [GeoJSON](https://geojson.org/) geometry objects.
//!
//! GeoJSON positions have no M ordinate, so M values are dropped on output.

use serde::{Deserialize, Serialize};

mod reader;
mod writer;

/// Options for reading GeoJSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoJsonOptions {
    /// SRID given to the top-level geometry. GeoJSON coordinates are WGS 84 by definition.
    pub srid: Option<u32>,
}

impl GeoJsonOptions {
    pub fn new(srid: Option<u32>) -> Self {
        Self { srid }
    }
}

impl Default for GeoJsonOptions {
    fn default() -> Self {
        Self::new(Some(4326))
    }
}
