//! Pure Rust PostGIS geometry values.
//!
//! A [`Geometry`] can be built from coordinates, or read from the (E)WKB that PostGIS
//! stores and prints as hex. Geometries read from bytes decode their coordinates and
//! members only when first accessed. Encoded bytes are memoized until the geometry, or
//! any member reachable from it, is modified.
//!
//! ```
//! use pggeo::Geometry;
//!
//! let geom = Geometry::from_hex("0101000020E610000000000000000000000000000000000000")?;
//! assert_eq!(geom.srid(), Some(4326));
//! assert_eq!(geom.ewkt(), "SRID=4326;POINT (0 0)");
//! # Ok::<(), pggeo::error::PgGeoError>(())
//! ```
//!
//! Geometries of the same SRID compose into collections with `+`:
//!
//! ```
//! use pggeo::geometry::{Geometry, GeometryType, Point};
//!
//! let a = Geometry::Point(Point::new(0., 0.));
//! let b = Geometry::Point(Point::new(1., 1.));
//! let multi = (a + b)?;
//! assert_eq!(multi.geometry_type(), GeometryType::MultiPoint);
//! # Ok::<(), pggeo::error::PgGeoError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

pub use error::{PgGeoError, Result};
pub use geometry::{
    Dimension, Geometry, GeometryCollection, GeometryType, LineString, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon,
};
pub use io::{GeoJsonOptions, WktOptions};

pub mod error;
pub mod geometry;
pub mod io;
mod lazy;
#[cfg(test)]
pub(crate) mod test;
