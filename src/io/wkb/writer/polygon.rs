use std::io::Write;

use crate::error::Result;
use crate::geometry::{Dimension, GeometryType, Polygon};
use crate::io::wkb::common::write_header;
use crate::io::wkb::writer::linestring::write_points;
use crate::io::wkb::writer::write_count;

/// The byte length of a WKBPolygon without SRID
pub fn polygon_wkb_size(geom: &Polygon, dim: Dimension) -> usize {
    let rings: usize = geom
        .rings()
        .iter()
        .map(|ring| 4 + ring.len() * dim.size() * 8)
        .sum();
    1 + 4 + 4 + rings
}

/// Write a Polygon geometry to a Writer encoded as WKB
pub fn write_polygon_as_wkb<W: Write>(
    writer: &mut W,
    geom: &Polygon,
    dim: Dimension,
    srid: Option<u32>,
) -> Result<()> {
    write_header(writer, GeometryType::Polygon, dim, srid)?;
    write_count(writer, geom.len())?;
    for ring in geom.rings() {
        write_points(writer, ring.vertices(), dim)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::polygon::p_hole;
    use geozero::{CoordDimensions, ToWkb};

    #[test]
    fn agrees_with_geozero() {
        let polygon = p_hole();
        let mut buf = Vec::new();
        write_polygon_as_wkb(&mut buf, &polygon, polygon.dimension(), None).unwrap();
        assert_eq!(buf.len(), polygon_wkb_size(&polygon, Dimension::XY));

        let exterior = geo::LineString::from(vec![
            (0., 0.),
            (10., 0.),
            (10., 10.),
            (0., 10.),
            (0., 0.),
        ]);
        let interior =
            geo::LineString::from(vec![(1., 1.), (1., 2.), (2., 2.), (2., 1.), (1., 1.)]);
        let geo_polygon = geo::Geometry::Polygon(geo::Polygon::new(exterior, vec![interior]));
        let expected = geo_polygon.to_wkb(CoordDimensions::xy()).unwrap();
        assert_eq!(buf, expected);
    }
}
