use crate::error::Result;
use crate::geometry::{Dimension, LineString};
use crate::io::wkb::reader::{read_line_string_body, WkbReader};

/// Read a ring count followed by that many point lists.
pub(crate) fn read_polygon_body(reader: &mut WkbReader, dim: Dimension) -> Result<Vec<LineString>> {
    let num_rings = reader.read_count()?;
    let mut rings = Vec::with_capacity(num_rings.min(reader.remaining() / 4));
    for _ in 0..num_rings {
        let vertices = read_line_string_body(reader, dim)?;
        rings.push(LineString::decoded(vertices, dim));
    }
    Ok(rings)
}
