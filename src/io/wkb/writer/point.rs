use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::Result;
use crate::geometry::point::Coord;
use crate::geometry::{Dimension, GeometryType, Point};
use crate::io::wkb::common::write_header;

/// The byte length of a WKBPoint without SRID
pub fn point_wkb_size(dim: Dimension) -> usize {
    let header = 1 + 4;
    let coords = dim.size() * 8;
    header + coords
}

/// Write a Point geometry to a Writer encoded as WKB
///
/// Ordinates are written for `dim`, the dimensions of the outermost geometry being written.
pub fn write_point_as_wkb<W: Write>(
    writer: &mut W,
    geom: &Point,
    dim: Dimension,
    srid: Option<u32>,
) -> Result<()> {
    write_header(writer, GeometryType::Point, dim, srid)?;
    write_coord(writer, geom.coord(), dim)
}

pub(crate) fn write_coord<W: Write>(writer: &mut W, coord: &Coord, dim: Dimension) -> Result<()> {
    writer.write_f64::<LittleEndian>(coord.x)?;
    writer.write_f64::<LittleEndian>(coord.y)?;
    if dim.has_z() {
        writer.write_f64::<LittleEndian>(coord.z)?;
    }
    if dim.has_m() {
        writer.write_f64::<LittleEndian>(coord.m)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::point::p0;

    #[test]
    fn round_trip() {
        let point = p0();
        let mut buf = Vec::new();
        write_point_as_wkb(&mut buf, &point, point.dimension(), None).unwrap();
        assert_eq!(buf.len(), point_wkb_size(Dimension::XY));

        let mut expected = vec![1, 1, 0, 0, 0];
        expected.extend_from_slice(&0f64.to_le_bytes());
        expected.extend_from_slice(&1f64.to_le_bytes());
        assert_eq!(buf, expected);
    }

    #[test]
    fn agrees_with_geozero() {
        use geozero::{CoordDimensions, ToWkb};

        let point = p0();
        let mut buf = Vec::new();
        write_point_as_wkb(&mut buf, &point, point.dimension(), None).unwrap();

        let geo_point = geo::Geometry::Point(geo::Point::new(point.x(), point.y()));
        let expected = geo_point.to_wkb(CoordDimensions::xy()).unwrap();
        assert_eq!(buf, expected);
    }
}
