use std::fmt::Write;

use crate::geometry::point::Coord;
use crate::geometry::{Dimension, Geometry, Point};
use crate::io::wkt::WktOptions;

impl Geometry {
    /// WKT with default options.
    pub fn wkt(&self) -> String {
        self.to_wkt(&WktOptions::default())
    }

    /// WKT prefixed with `SRID=<srid>;` when the geometry has an SRID.
    pub fn ewkt(&self) -> String {
        self.to_wkt(&WktOptions {
            include_srid: true,
            ..Default::default()
        })
    }

    pub fn to_wkt(&self, options: &WktOptions) -> String {
        let mut out = String::new();
        if options.include_srid {
            if let Some(srid) = self.srid() {
                let _ = write!(out, "SRID={srid};");
            }
        }
        let dim = self.dimension();
        write_tagged(&mut out, self, dim.wkt_suffix(), dim, options.precision);
        out
    }
}

/// Keyword, dimension suffix and body. Only the outermost geometry carries a suffix.
fn write_tagged(
    out: &mut String,
    geom: &Geometry,
    suffix: &str,
    dim: Dimension,
    precision: Option<usize>,
) {
    out.push_str(geom.geometry_type().wkt_keyword());
    out.push_str(suffix);
    out.push(' ');
    write_body(out, geom, dim, precision);
}

fn write_body(out: &mut String, geom: &Geometry, dim: Dimension, precision: Option<usize>) {
    match geom {
        Geometry::Point(point) => {
            out.push('(');
            write_coord(out, point.coord(), dim, precision);
            out.push(')');
        }
        Geometry::LineString(line) => write_points(out, line.vertices(), dim, precision),
        Geometry::Polygon(polygon) => {
            write_joined(out, polygon.rings(), |out, ring| {
                write_points(out, ring.vertices(), dim, precision)
            });
        }
        Geometry::GeometryCollection(collection) => {
            if collection.is_empty() {
                out.push_str("EMPTY");
            } else {
                write_joined(out, collection.members(), |out, member| {
                    write_tagged(out, &member.borrow(), "", dim, precision)
                });
            }
        }
        collection => {
            let members = collection.members().unwrap_or_default();
            if members.is_empty() {
                out.push_str("EMPTY");
            } else {
                write_joined(out, members, |out, member| {
                    write_body(out, &member.borrow(), dim, precision)
                });
            }
        }
    }
}

fn write_points(
    out: &mut String,
    vertices: &[Point],
    dim: Dimension,
    precision: Option<usize>,
) {
    write_joined(out, vertices, |out, vertex| {
        write_coord(out, vertex.coord(), dim, precision)
    });
}

/// Parenthesized items separated by `", "`.
fn write_joined<T>(out: &mut String, items: &[T], mut write_item: impl FnMut(&mut String, &T)) {
    out.push('(');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_item(out, item);
    }
    out.push(')');
}

fn write_coord(out: &mut String, coord: &Coord, dim: Dimension, precision: Option<usize>) {
    out.push_str(&format_number(coord.x, precision));
    out.push(' ');
    out.push_str(&format_number(coord.y, precision));
    if dim.has_z() {
        out.push(' ');
        out.push_str(&format_number(coord.z, precision));
    }
    if dim.has_m() {
        out.push(' ');
        out.push_str(&format_number(coord.m, precision));
    }
}

/// The shortest decimal text that parses back to `value`, or fixed-point text with
/// `precision` decimals when one is given. Trailing zeros and a trailing decimal point are
/// dropped either way.
fn format_number(value: f64, precision: Option<usize>) -> String {
    let mut text = match precision {
        Some(precision) => format!("{value:.precision$}"),
        None => value.to_string(),
    };
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text.remove(0);
    }
    text
}
