use crate::error::{PgGeoError, Result};
use crate::geometry::{Bounds, Dimension};
use crate::io::wkb::reader::{read_coord, WkbReader};
use crate::lazy::{Lazy, Meta, RawBody};

/// The four ordinates of a point. Z and M are zero when the dimension is absent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Coord {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) z: f64,
    pub(crate) m: f64,
}

/// A single position, with optional Z and M ordinates.
#[derive(Debug, Clone)]
pub struct Point {
    pub(crate) meta: Meta,
    coord: Lazy<Coord>,
}

impl Point {
    /// A 2D point without SRID.
    pub fn new(x: f64, y: f64) -> Self {
        Self::from_coord(
            Coord {
                x,
                y,
                ..Default::default()
            },
            Dimension::XY,
            None,
        )
    }

    /// Build a point from 2 to 4 ordinates.
    ///
    /// `requested` tells how a short tuple is interpreted: with two values the requested
    /// dimensions are filled with zero, with three values the third is M only when M alone is
    /// requested. Four values are always X, Y, Z, M.
    pub fn try_new(coords: &[f64], requested: Dimension, srid: Option<u32>) -> Result<Self> {
        let values: Vec<Option<f64>> = coords.iter().copied().map(Some).collect();
        Self::try_from_values(&values, requested, srid)
    }

    /// Like [`try_new`](Self::try_new), but Z and M may be absent in a four-value tuple.
    pub fn try_from_values(
        values: &[Option<f64>],
        requested: Dimension,
        srid: Option<u32>,
    ) -> Result<Self> {
        if values.len() > 4 {
            return Err(PgGeoError::Dimensionality(format!(
                "Point coordinates have {} values, at most 4 are allowed",
                values.len()
            )));
        }
        let (x, y) = match values {
            [Some(x), Some(y), ..] => (*x, *y),
            _ => {
                return Err(PgGeoError::Coordinate(
                    "Point requires numeric x and y values".to_string(),
                ))
            }
        };
        let mut coord = Coord {
            x,
            y,
            ..Default::default()
        };
        let dim = match values.len() {
            2 => requested,
            3 => {
                let third = values[2].ok_or_else(|| {
                    PgGeoError::Coordinate("Point third value must be numeric".to_string())
                })?;
                if requested == Dimension::XYM {
                    coord.m = third;
                    Dimension::XYM
                } else {
                    coord.z = third;
                    requested.with_z(true)
                }
            }
            _ => {
                coord.z = values[2].unwrap_or_default();
                coord.m = values[3].unwrap_or_default();
                Dimension::from_flags(values[2].is_some(), values[3].is_some())
            }
        };
        Ok(Self::from_coord(coord, dim, srid))
    }

    pub(crate) fn from_coord(coord: Coord, dim: Dimension, srid: Option<u32>) -> Self {
        Self {
            meta: Meta::new(srid, dim),
            coord: Lazy::new(coord),
        }
    }

    /// A point whose ordinates are read from `raw` on first access.
    pub(crate) fn from_raw(raw: RawBody, dim: Dimension, srid: Option<u32>) -> Self {
        Self {
            meta: Meta::new(srid, dim),
            coord: Lazy::pending(raw),
        }
    }

    /// A vertex or member decoded out of a parent's buffer.
    pub(crate) fn decoded(coord: Coord, dim: Dimension) -> Self {
        Self {
            meta: Meta::decoded(dim),
            coord: Lazy::new(coord),
        }
    }

    pub(crate) fn coord(&self) -> &Coord {
        let dim = self.meta.dim;
        self.coord
            .get(|raw| read_coord(&mut WkbReader::at(raw), dim))
    }

    fn coord_mut(&mut self) -> &mut Coord {
        let dim = self.meta.dim;
        self.meta.touch();
        self.coord
            .get_mut(|raw| read_coord(&mut WkbReader::at(raw), dim))
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.coord.is_pending()
    }

    pub fn x(&self) -> f64 {
        self.coord().x
    }

    pub fn y(&self) -> f64 {
        self.coord().y
    }

    /// The Z ordinate, `None` for a point without Z.
    pub fn z(&self) -> Option<f64> {
        self.meta.dim.has_z().then(|| self.coord().z)
    }

    /// The M ordinate, `None` for a point without M.
    pub fn m(&self) -> Option<f64> {
        self.meta.dim.has_m().then(|| self.coord().m)
    }

    pub fn set_x(&mut self, x: f64) {
        self.coord_mut().x = x;
    }

    pub fn set_y(&mut self, y: f64) {
        self.coord_mut().y = y;
    }

    /// Set the Z ordinate. `None` removes the Z dimension.
    pub fn set_z(&mut self, z: Option<f64>) {
        self.coord_mut().z = z.unwrap_or_default();
        self.meta.dim = self.meta.dim.with_z(z.is_some());
    }

    /// Set the M ordinate. `None` removes the M dimension.
    pub fn set_m(&mut self, m: Option<f64>) {
        self.coord_mut().m = m.unwrap_or_default();
        self.meta.dim = self.meta.dim.with_m(m.is_some());
    }

    pub fn srid(&self) -> Option<u32> {
        self.meta.srid
    }

    /// Set the SRID. Like every setter, this decodes a point read from WKB.
    pub fn set_srid(&mut self, srid: Option<u32>) {
        self.coord_mut();
        self.meta.srid = srid;
    }

    pub fn dimension(&self) -> Dimension {
        self.meta.dim
    }

    /// Add or drop the Z dimension. A new Z ordinate starts at zero.
    pub fn set_dimz(&mut self, dimz: bool) {
        if self.meta.dim.has_z() != dimz {
            self.set_z(dimz.then_some(0.0));
        }
    }

    /// Add or drop the M dimension. A new M ordinate starts at zero.
    pub fn set_dimm(&mut self, dimm: bool) {
        if self.meta.dim.has_m() != dimm {
            self.set_m(dimm.then_some(0.0));
        }
    }

    /// The ordinates present in this point, in X, Y, Z, M order.
    pub fn coordinates(&self) -> Vec<f64> {
        let coord = self.coord();
        let mut out = vec![coord.x, coord.y];
        if self.meta.dim.has_z() {
            out.push(coord.z);
        }
        if self.meta.dim.has_m() {
            out.push(coord.m);
        }
        out
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_xy(self.x(), self.y())
    }

    pub(crate) fn stamp(&self) -> u64 {
        self.meta.revision()
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.meta.srid == other.meta.srid
            && self.meta.dim == other.meta.dim
            && self.coordinates() == other.coordinates()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}
