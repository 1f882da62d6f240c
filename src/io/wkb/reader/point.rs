use crate::error::Result;
use crate::geometry::point::Coord;
use crate::geometry::Dimension;
use crate::io::wkb::reader::WkbReader;

/// Read the ordinates of one position. Ordinates absent from `dim` are zero.
pub(crate) fn read_coord(reader: &mut WkbReader, dim: Dimension) -> Result<Coord> {
    let mut coord = Coord {
        x: reader.read_f64()?,
        y: reader.read_f64()?,
        ..Default::default()
    };
    if dim.has_z() {
        coord.z = reader.read_f64()?;
    }
    if dim.has_m() {
        coord.m = reader.read_f64()?;
    }
    Ok(coord)
}
