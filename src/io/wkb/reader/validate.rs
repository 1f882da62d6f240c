use crate::error::{PgGeoError, Result};
use crate::geometry::{Dimension, GeometryType};
use crate::io::wkb::common::WkbHeader;
use crate::io::wkb::reader::collection::check_member_header;
use crate::io::wkb::reader::WkbReader;
use crate::io::MAX_NESTING_DEPTH;

/// Walk the body following `header` without decoding coordinates.
///
/// Checks byte-order markers, type codes and flags of every member, that every count fits in
/// the buffer and that no line, ring or polygon is empty, so that decoding the body later
/// cannot fail. `depth` counts the
/// collections enclosing this geometry.
pub(crate) fn validate_body(
    reader: &mut WkbReader,
    header: &WkbHeader,
    depth: usize,
) -> Result<()> {
    let dim = header.dim;
    match header.geometry_type {
        GeometryType::Point => reader.skip(coord_size(dim)),
        GeometryType::LineString => skip_points(reader, dim),
        GeometryType::Polygon => {
            let num_rings = reader.read_count()?;
            if num_rings == 0 {
                return Err(PgGeoError::Wkb("Polygon has no rings".to_string()));
            }
            for _ in 0..num_rings {
                skip_points(reader, dim)?;
            }
            Ok(())
        }
        collection_type => {
            if depth >= MAX_NESTING_DEPTH {
                return Err(PgGeoError::Wkb(format!(
                    "Collections nested deeper than {MAX_NESTING_DEPTH} levels at offset {}",
                    reader.position()
                )));
            }
            let num_members = reader.read_count()?;
            for _ in 0..num_members {
                let member = reader.read_header()?;
                check_member_header(collection_type, dim, &member)?;
                validate_body(reader, &member, depth + 1)?;
            }
            Ok(())
        }
    }
}

fn coord_size(dim: Dimension) -> usize {
    dim.size() * 8
}

fn skip_points(reader: &mut WkbReader, dim: Dimension) -> Result<()> {
    let num_points = reader.read_count()?;
    if num_points == 0 {
        return Err(PgGeoError::Wkb(format!(
            "LineString or ring without points at offset {}",
            reader.position()
        )));
    }
    let len = num_points
        .checked_mul(coord_size(dim))
        .ok_or_else(|| PgGeoError::Wkb(format!("Point count {num_points} overflows")))?;
    reader.skip(len)
}
