use bytes::Bytes;

use crate::error::{PgGeoError, Result};
use crate::geometry::{Collection, Geometry, GeometryType, LineString, Point, Polygon};
use crate::io::wkb::reader::validate::validate_body;
use crate::io::wkb::reader::WkbReader;
use crate::lazy::RawBody;

impl Geometry {
    /// Read a geometry from WKB or EWKB, in either byte order.
    ///
    /// Only the header is decoded here. The rest of the buffer is checked for structural
    /// validity, and coordinates and members are decoded the first time they are accessed.
    pub fn from_wkb(buf: impl Into<Bytes>) -> Result<Geometry> {
        let buf: Bytes = buf.into();
        if buf.is_empty() {
            return Err(PgGeoError::Wkb("No WKB provided".to_string()));
        }
        let mut reader = WkbReader::new(&buf);
        let header = reader.read_header()?;
        let offset = reader.position();
        validate_body(&mut reader, &header, 0).map_err(|err| {
            tracing::debug!(offset = reader.position(), %err, "rejected WKB input");
            err
        })?;
        if reader.remaining() > 0 {
            tracing::debug!(
                trailing = reader.remaining(),
                "ignoring bytes after WKB geometry"
            );
        }
        tracing::trace!(
            geometry_type = header.geometry_type.name(),
            srid = ?header.srid,
            len = buf.len(),
            "read WKB header"
        );

        // Validation leaves the reader in the byte order of the last member read.
        let raw = RawBody {
            buf,
            offset,
            byte_order: header.byte_order,
        };
        let (dim, srid) = (header.dim, header.srid);
        let geom: Geometry = match header.geometry_type {
            GeometryType::Point => Point::from_raw(raw, dim, srid).into(),
            GeometryType::LineString => LineString::from_raw(raw, dim, srid).into(),
            GeometryType::Polygon => Polygon::from_raw(raw, dim, srid).into(),
            GeometryType::MultiPoint => Geometry::MultiPoint(Collection::from_raw(raw, dim, srid)),
            GeometryType::MultiLineString => {
                Geometry::MultiLineString(Collection::from_raw(raw, dim, srid))
            }
            GeometryType::MultiPolygon => {
                Geometry::MultiPolygon(Collection::from_raw(raw, dim, srid))
            }
            GeometryType::GeometryCollection => {
                Geometry::GeometryCollection(Collection::from_raw(raw, dim, srid))
            }
        };
        Ok(geom)
    }

    /// Read a geometry from hex-encoded (E)WKB, as PostgreSQL prints geometry values.
    pub fn from_hex(hex: &str) -> Result<Geometry> {
        Self::from_wkb(hex::decode(hex.trim())?)
    }
}
