use crate::error::{PgGeoError, Result};
use crate::geometry::point::Coord;
use crate::geometry::{
    Dimension, Geometry, GeometryCollection, GeometryType, LineString, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon,
};
use crate::io::MAX_NESTING_DEPTH;

/// Keywords in the order they are tried, so that no keyword shadows a longer one.
const KEYWORDS: [GeometryType; 7] = [
    GeometryType::GeometryCollection,
    GeometryType::MultiLineString,
    GeometryType::MultiPolygon,
    GeometryType::MultiPoint,
    GeometryType::LineString,
    GeometryType::Polygon,
    GeometryType::Point,
];

impl Geometry {
    /// Parse (E)WKT. An `SRID=<srid>;` prefix sets the SRID.
    pub fn from_wkt(text: &str) -> Result<Geometry> {
        Self::from_wkt_with_srid(text, None)
    }

    /// Parse (E)WKT, letting `srid` take precedence over any `SRID=<srid>;` prefix.
    pub fn from_wkt_with_srid(text: &str, srid: Option<u32>) -> Result<Geometry> {
        let mut reader = WktReader::new(text);
        let mut geom = reader.read().map_err(|err| {
            tracing::debug!(position = reader.pos + 1, %err, "rejected WKT input");
            err
        })?;
        geom.meta_mut().srid = srid.or(reader.prefix);
        Ok(geom)
    }
}

/// A recursive-descent parser over uppercased WKT.
///
/// Uppercasing keeps byte offsets, so `pos` is also an offset into the caller's text.
struct WktReader {
    data: String,
    pos: usize,
    prefix: Option<u32>,
    /// GeometryCollections enclosing the geometry being read.
    depth: usize,
}

impl WktReader {
    fn new(text: &str) -> Self {
        Self {
            data: text.to_ascii_uppercase(),
            pos: 0,
            prefix: None,
            depth: 0,
        }
    }

    /// The optional SRID prefix, one geometry, then end of input.
    fn read(&mut self) -> Result<Geometry> {
        self.prefix = self.srid()?;
        let geom = self.geometry(None)?;
        self.finish()?;
        Ok(geom)
    }

    fn rest(&self) -> &str {
        &self.data[self.pos..]
    }

    fn error(&self, expected: &str) -> PgGeoError {
        PgGeoError::wkt(self.pos + 1, format!("expected {expected}"))
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start().len();
        self.pos = self.data.len() - trimmed;
    }

    /// Consume `literal` and surrounding whitespace if the input continues with it.
    fn take(&mut self, literal: &str) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            self.skip_whitespace();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, literal: &str, expected: &str) -> Result<()> {
        if self.take(literal) {
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    fn open(&mut self) -> Result<()> {
        self.expect("(", "opening parenthesis")
    }

    fn close(&mut self) -> Result<()> {
        self.expect(")", "closing parenthesis")
    }

    /// The optional `SRID=<srid>;` prefix.
    fn srid(&mut self) -> Result<Option<u32>> {
        if !self.take("SRID") {
            return Ok(None);
        }
        self.expect("=", "'=' after SRID")?;
        let digits = self.rest().bytes().take_while(u8::is_ascii_digit).count();
        let srid = self.rest()[..digits]
            .parse::<u32>()
            .map_err(|_| self.error("integer SRID"))?;
        self.pos += digits;
        self.expect(";", "';' after SRID")?;
        Ok(Some(srid))
    }

    fn geometry_type(&mut self) -> Result<GeometryType> {
        self.skip_whitespace();
        let ty = KEYWORDS
            .into_iter()
            .find(|ty| self.rest().starts_with(ty.wkt_keyword()))
            .ok_or_else(|| self.error("geometry type"))?;
        self.pos += ty.wkt_keyword().len();
        Ok(ty)
    }

    fn dimension(&mut self) -> Option<Dimension> {
        if self.take("ZM") {
            Some(Dimension::XYZM)
        } else if self.take("Z") {
            Some(Dimension::XYZ)
        } else if self.take("M") {
            Some(Dimension::XYM)
        } else {
            None
        }
    }

    /// A signed decimal number, optionally with an exponent.
    fn number(&mut self) -> Result<f64> {
        self.skip_whitespace();
        let bytes = self.rest().as_bytes();
        let mut len = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
        let int_digits = count_digits(&bytes[len..]);
        if int_digits == 0 {
            return Err(self.error("number"));
        }
        len += int_digits;
        if bytes.get(len) == Some(&b'.') {
            len += 1 + count_digits(&bytes[len + 1..]);
        }
        if bytes.get(len) == Some(&b'E') {
            let sign = usize::from(matches!(bytes.get(len + 1), Some(b'-' | b'+')));
            let exp_digits = count_digits(&bytes[(len + 1 + sign).min(bytes.len())..]);
            if exp_digits > 0 {
                len += 1 + sign + exp_digits;
            }
        }
        let value = lexical_core::parse::<f64>(&bytes[..len]).map_err(|_| self.error("number"))?;
        self.pos += len;
        Ok(value)
    }

    /// One coordinate tuple with exactly as many numbers as `dim` has ordinates.
    fn coord(&mut self, dim: Dimension) -> Result<Coord> {
        let mut coord = Coord {
            x: self.number()?,
            y: self.number()?,
            ..Default::default()
        };
        if dim.has_z() {
            coord.z = self.number()?;
        }
        if dim.has_m() {
            coord.m = self.number()?;
        }
        Ok(coord)
    }

    /// Items separated by commas.
    fn list<T>(&mut self, mut item: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let mut items = vec![item(self)?];
        while self.take(",") {
            items.push(item(self)?);
        }
        Ok(items)
    }

    /// Parenthesized contents.
    fn wrapped<T>(&mut self, item: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.open()?;
        let value = item(self)?;
        self.close()?;
        Ok(value)
    }

    fn points(&mut self, dim: Dimension) -> Result<Vec<Point>> {
        self.list(|reader| Ok(Point::from_coord(reader.coord(dim)?, dim, None)))
    }

    fn line_string(&mut self, dim: Dimension) -> Result<LineString> {
        LineString::from_points(self.points(dim)?, None)
    }

    fn polygon(&mut self, dim: Dimension) -> Result<Polygon> {
        let rings = self.list(|reader| reader.wrapped(|reader| reader.line_string(dim)))?;
        Polygon::from_rings(rings, None)
    }

    /// A complete geometry. Without its own dimension suffix, a geometry takes `inherited`.
    fn geometry(&mut self, inherited: Option<Dimension>) -> Result<Geometry> {
        self.skip_whitespace();
        let start = self.pos;
        let ty = self.geometry_type()?;
        if ty.is_collection() && self.depth >= MAX_NESTING_DEPTH {
            return Err(PgGeoError::wkt(
                start + 1,
                format!("collections nested deeper than {MAX_NESTING_DEPTH} levels"),
            ));
        }
        let dim = self.dimension().or(inherited).unwrap_or_default();

        if self.take("EMPTY") {
            let geom: Geometry = match ty {
                GeometryType::MultiPoint => MultiPoint::empty(dim, None).into(),
                GeometryType::MultiLineString => MultiLineString::empty(dim, None).into(),
                GeometryType::MultiPolygon => MultiPolygon::empty(dim, None).into(),
                GeometryType::GeometryCollection => GeometryCollection::empty(dim, None).into(),
                _ => {
                    return Err(PgGeoError::wkt(
                        self.pos + 1,
                        format!("{} cannot be EMPTY", ty.wkt_keyword()),
                    ))
                }
            };
            return Ok(geom);
        }

        self.wrapped(|reader| {
            let geom: Geometry = match ty {
                GeometryType::Point => Point::from_coord(reader.coord(dim)?, dim, None).into(),
                GeometryType::LineString => reader.line_string(dim)?.into(),
                GeometryType::Polygon => reader.polygon(dim)?.into(),
                GeometryType::MultiPoint => {
                    let members = reader.list(|reader| {
                        reader.wrapped(|reader| {
                            Ok(Point::from_coord(reader.coord(dim)?, dim, None).into())
                        })
                    })?;
                    MultiPoint::try_new(members, None)?.into()
                }
                GeometryType::MultiLineString => {
                    let members = reader.list(|reader| {
                        reader.wrapped(|reader| Ok(reader.line_string(dim)?.into()))
                    })?;
                    MultiLineString::try_new(members, None)?.into()
                }
                GeometryType::MultiPolygon => {
                    let members = reader
                        .list(|reader| reader.wrapped(|reader| Ok(reader.polygon(dim)?.into())))?;
                    MultiPolygon::try_new(members, None)?.into()
                }
                GeometryType::GeometryCollection => {
                    reader.depth += 1;
                    let members = reader.list(|reader| reader.geometry(Some(dim)))?;
                    reader.depth -= 1;
                    GeometryCollection::try_new(members, None)?.into()
                }
            };
            Ok(geom)
        })
    }

    /// Only whitespace may follow the top-level geometry.
    fn finish(&mut self) -> Result<()> {
        self.skip_whitespace();
        if self.pos < self.data.len() {
            return Err(self.error("end of input"));
        }
        Ok(())
    }
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse_err(text: &str) -> PgGeoError {
        Geometry::from_wkt(text).unwrap_err()
    }

    #[test]
    fn point_zm() {
        let geom = Geometry::from_wkt("POINT ZM (1 2 3 4)").unwrap();
        let point = geom.as_point().unwrap();
        assert_eq!(point.dimension(), Dimension::XYZM);
        assert_eq!(point.coordinates(), vec![1., 2., 3., 4.]);
    }

    #[test]
    fn lowercase_and_whitespace() {
        let geom = Geometry::from_wkt("   SRID=123 ; point z (    -1     3      9.3  )").unwrap();
        assert_eq!(geom.srid(), Some(123));
        assert_eq!(geom.as_point().unwrap().coordinates(), vec![-1., 3., 9.3]);
    }

    #[test]
    fn srid_override() {
        let geom = Geometry::from_wkt_with_srid("SRID=4326;POINT (0 0)", Some(1234)).unwrap();
        assert_eq!(geom.srid(), Some(1234));
        let geom = Geometry::from_wkt_with_srid("POINT (0 0)", Some(1234)).unwrap();
        assert_eq!(geom.srid(), Some(1234));
        let geom = Geometry::from_wkt_with_srid("SRID=4326;POINT (0 0)", None).unwrap();
        assert_eq!(geom.srid(), Some(4326));
    }

    #[test]
    fn numbers() {
        let geom = Geometry::from_wkt("POINT (1e3 -2.5E-1)").unwrap();
        let point = geom.as_point().unwrap();
        assert_eq!((point.x(), point.y()), (1000., -0.25));
        let geom = Geometry::from_wkt("POINT (+1 2.0)").unwrap();
        assert_eq!(geom.as_point().unwrap().x(), 1.);
    }

    #[test]
    fn polygon_with_hole() {
        let geom = Geometry::from_wkt(
            "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (1 1, 1 2, 2 2, 2 1, 1 1))",
        )
        .unwrap();
        let polygon = geom.as_polygon().unwrap();
        assert_eq!(polygon.len(), 2);
        assert_eq!(polygon.interiors()[0].len(), 5);
    }

    #[test]
    fn collection_members_inherit_dimensions() {
        let geom =
            Geometry::from_wkt("GEOMETRYCOLLECTION Z (POINT (1 2 3), LINESTRING (0 0 0, 1 1 1))")
                .unwrap();
        assert_eq!(geom.dimension(), Dimension::XYZ);
        let members = geom.members().unwrap();
        assert_eq!(members[1].borrow().dimension(), Dimension::XYZ);
    }

    #[test]
    fn nested_collections() {
        let geom = Geometry::from_wkt(
            "GEOMETRYCOLLECTION (MULTIPOINT ((0 0), (1 1)), POINT (3 4), LINESTRING (2 3, 3 4))",
        )
        .unwrap();
        let members = geom.members().unwrap();
        assert_eq!(members.len(), 3);
        assert_eq!(
            members[0].borrow().geometry_type(),
            GeometryType::MultiPoint
        );
    }

    #[test]
    fn empty_collections() {
        for text in [
            "MULTIPOINT Z EMPTY",
            "MULTILINESTRING EMPTY",
            "MULTIPOLYGON M EMPTY",
            "GEOMETRYCOLLECTION ZM EMPTY",
        ] {
            let geom = Geometry::from_wkt(text).unwrap();
            assert_eq!(geom.members().unwrap().len(), 0);
        }
        let geom = Geometry::from_wkt("MULTIPOINT Z EMPTY").unwrap();
        assert!(geom.dimz());
    }

    #[test]
    fn rejects_malformed_text() {
        for text in [
            "POINT(0 1 1)",
            "POINT ZMX (0 1 1)",
            "POINT EMPTY",
            "LINESTRING EMPTY",
            "HELLO",
            "LINESTRING ((0 0, 1 1))",
            "POLYGON (0 1)",
            "POINT (0 1) extra",
            "LINESTRING ()",
            "POLYGON (())",
            "POINT (0 1",
            "POINT (0 )",
            "SRID=hello;POINT (0 1)",
            "MULTIPOINT (0 0, 1 1)",
        ] {
            assert!(
                matches!(parse_err(text), PgGeoError::Wkt { .. }),
                "{text} should not parse"
            );
        }
    }

    #[test]
    fn error_position() {
        match parse_err("POINT (0 1) extra") {
            PgGeoError::Wkt { position, .. } => assert_eq!(position, 13),
            err => panic!("unexpected error {err}"),
        }
        // Positions count from the start of the input, leading whitespace included.
        match parse_err("  \tPOINT (0 1) extra") {
            PgGeoError::Wkt { position, .. } => assert_eq!(position, 16),
            err => panic!("unexpected error {err}"),
        }
    }

    #[test]
    fn short_lines_and_rings() {
        let geom = Geometry::from_wkt("LINESTRING (0 0)").unwrap();
        assert_eq!(geom.as_line_string().unwrap().len(), 1);
        let geom = Geometry::from_wkt("POLYGON ((0 0, 1 1, 2 2), (1 1))").unwrap();
        let polygon = geom.as_polygon().unwrap();
        assert_eq!(polygon.exterior().unwrap().len(), 3);
        assert_eq!(polygon.interiors()[0].len(), 1);
    }

    #[test]
    fn nesting_depth_limit() {
        let nested = |levels: usize| {
            let mut text = "GEOMETRYCOLLECTION (".repeat(levels - 1);
            text.push_str("GEOMETRYCOLLECTION EMPTY");
            text.push_str(&")".repeat(levels - 1));
            text
        };
        let geom = Geometry::from_wkt(&nested(MAX_NESTING_DEPTH)).unwrap();
        assert_eq!(geom.members().unwrap().len(), 1);

        for levels in [MAX_NESTING_DEPTH + 1, 200_000] {
            assert!(matches!(
                Geometry::from_wkt(&nested(levels)),
                Err(PgGeoError::Wkt { .. })
            ));
        }
    }

    #[test]
    fn mixed_member_dimensions() {
        let err = Geometry::from_wkt("GEOMETRYCOLLECTION (POINT M (0 0 1), POINT (1 1))").unwrap_err();
        assert!(matches!(err, PgGeoError::Dimensionality(_)));
    }
}
