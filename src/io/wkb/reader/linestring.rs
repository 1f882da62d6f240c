use crate::error::Result;
use crate::geometry::{Dimension, Point};
use crate::io::wkb::reader::{read_coord, WkbReader};

/// Read a point count followed by that many positions.
pub(crate) fn read_line_string_body(reader: &mut WkbReader, dim: Dimension) -> Result<Vec<Point>> {
    let num_points = reader.read_count()?;
    let mut vertices = Vec::with_capacity(num_points.min(reader.remaining() / 16));
    for _ in 0..num_points {
        vertices.push(Point::decoded(read_coord(reader, dim)?, dim));
    }
    Ok(vertices)
}
