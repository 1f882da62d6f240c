use std::io::Write;

use bytes::Bytes;

use crate::error::Result;
use crate::geometry::{Dimension, Geometry};
use crate::io::wkb::writer::{
    collection_wkb_size, line_string_wkb_size, point_wkb_size, polygon_wkb_size,
    write_collection_as_wkb, write_line_string_as_wkb, write_point_as_wkb, write_polygon_as_wkb,
};

/// The byte length of a WKB geometry without SRID, written with `dim`.
pub fn geometry_wkb_size(geom: &Geometry, dim: Dimension) -> usize {
    match geom {
        Geometry::Point(_) => point_wkb_size(dim),
        Geometry::LineString(g) => line_string_wkb_size(g, dim),
        Geometry::Polygon(g) => polygon_wkb_size(g, dim),
        Geometry::MultiPoint(g) => collection_wkb_size(g, dim),
        Geometry::MultiLineString(g) => collection_wkb_size(g, dim),
        Geometry::MultiPolygon(g) => collection_wkb_size(g, dim),
        Geometry::GeometryCollection(g) => collection_wkb_size(g, dim),
    }
}

/// Write a geometry to a Writer encoded as WKB, with an SRID word when `srid` is given.
pub fn write_geometry_as_wkb<W: Write>(
    writer: &mut W,
    geom: &Geometry,
    dim: Dimension,
    srid: Option<u32>,
) -> Result<()> {
    match geom {
        Geometry::Point(g) => write_point_as_wkb(writer, g, dim, srid),
        Geometry::LineString(g) => write_line_string_as_wkb(writer, g, dim, srid),
        Geometry::Polygon(g) => write_polygon_as_wkb(writer, g, dim, srid),
        Geometry::MultiPoint(g) => write_collection_as_wkb(writer, g, dim, srid),
        Geometry::MultiLineString(g) => write_collection_as_wkb(writer, g, dim, srid),
        Geometry::MultiPolygon(g) => write_collection_as_wkb(writer, g, dim, srid),
        Geometry::GeometryCollection(g) => write_collection_as_wkb(writer, g, dim, srid),
    }
}

impl Geometry {
    /// Little-endian WKB, without SRID.
    pub fn wkb(&self) -> Result<Bytes> {
        self.to_wkb(false)
    }

    /// Little-endian EWKB, with the SRID when one is set.
    pub fn ewkb(&self) -> Result<Bytes> {
        self.to_wkb(true)
    }

    /// Encode as little-endian (E)WKB.
    ///
    /// The bytes are memoized until this geometry, or any member reachable from it, changes.
    pub fn to_wkb(&self, include_srid: bool) -> Result<Bytes> {
        self.meta()
            .memo()
            .get_or_encode(include_srid, self.stamp(), || {
                let srid = self.srid().filter(|_| include_srid);
                let dim = self.dimension();
                let size = geometry_wkb_size(self, dim) + if srid.is_some() { 4 } else { 0 };
                let mut buf = Vec::with_capacity(size);
                write_geometry_as_wkb(&mut buf, self, dim, srid)?;
                tracing::trace!(
                    geometry_type = self.geometry_type().name(),
                    len = buf.len(),
                    include_srid,
                    "encoded WKB"
                );
                Ok(Bytes::from(buf))
            })
    }

    /// Hex-encoded WKB, lowercase.
    pub fn wkb_hex(&self) -> Result<String> {
        Ok(hex::encode(self.wkb()?))
    }

    /// Hex-encoded EWKB, lowercase.
    pub fn ewkb_hex(&self) -> Result<String> {
        Ok(hex::encode(self.ewkb()?))
    }
}
