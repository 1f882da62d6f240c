use std::io::Write;

use crate::error::Result;
use crate::geometry::{Dimension, GeometryType, LineString, Point};
use crate::io::wkb::common::write_header;
use crate::io::wkb::writer::point::write_coord;
use crate::io::wkb::writer::write_count;

/// The byte length of a WKBLineString without SRID
pub fn line_string_wkb_size(geom: &LineString, dim: Dimension) -> usize {
    1 + 4 + 4 + geom.len() * dim.size() * 8
}

/// Write a LineString geometry to a Writer encoded as WKB
pub fn write_line_string_as_wkb<W: Write>(
    writer: &mut W,
    geom: &LineString,
    dim: Dimension,
    srid: Option<u32>,
) -> Result<()> {
    write_header(writer, GeometryType::LineString, dim, srid)?;
    write_points(writer, geom.vertices(), dim)
}

/// numPoints followed by the ordinates of every vertex.
pub(crate) fn write_points<W: Write>(
    writer: &mut W,
    vertices: &[Point],
    dim: Dimension,
) -> Result<()> {
    write_count(writer, vertices.len())?;
    for vertex in vertices {
        write_coord(writer, vertex.coord(), dim)?;
    }
    Ok(())
}
