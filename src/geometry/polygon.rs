use crate::error::{PgGeoError, Result};
use crate::geometry::linestring::{check_part_srids, common_dimension};
use crate::geometry::{Bounds, Dimension, LineString};
use crate::io::wkb::reader::{read_polygon_body, WkbReader};
use crate::lazy::{Lazy, Meta, RawBody};

/// A polygon: an exterior ring followed by zero or more interior rings.
#[derive(Debug, Clone)]
pub struct Polygon {
    pub(crate) meta: Meta,
    rings: Lazy<Vec<LineString>>,
}

impl Polygon {
    /// Build a polygon from rings of coordinate tuples.
    pub fn try_new<R, C>(rings: &[R], requested: Dimension, srid: Option<u32>) -> Result<Self>
    where
        R: AsRef<[C]>,
        C: AsRef<[f64]>,
    {
        let rings = rings
            .iter()
            .map(|ring| LineString::try_new(ring.as_ref(), requested, None))
            .collect::<Result<Vec<_>>>()?;
        Self::from_rings(rings, srid)
    }

    /// Build a polygon from rings that share the same dimensions.
    ///
    /// A polygon needs at least one ring. A ring SRID must be absent or equal to `srid`; it is
    /// cleared once accepted.
    pub fn from_rings(rings: Vec<LineString>, srid: Option<u32>) -> Result<Self> {
        let Some(exterior) = rings.first() else {
            return Err(PgGeoError::Coordinate(
                "Polygon requires at least one ring".to_string(),
            ));
        };
        let dim = common_dimension(
            rings.iter().map(LineString::dimension),
            exterior.dimension(),
            "Polygon",
        )?;
        check_part_srids(rings.iter().map(LineString::srid), srid, "Ring")?;
        let rings = rings
            .into_iter()
            .map(|mut ring| {
                ring.meta.srid = None;
                ring
            })
            .collect();
        Ok(Self {
            meta: Meta::new(srid, dim),
            rings: Lazy::new(rings),
        })
    }

    pub(crate) fn from_raw(raw: RawBody, dim: Dimension, srid: Option<u32>) -> Self {
        Self {
            meta: Meta::new(srid, dim),
            rings: Lazy::pending(raw),
        }
    }

    pub(crate) fn decoded(rings: Vec<LineString>, dim: Dimension) -> Self {
        Self {
            meta: Meta::decoded(dim),
            rings: Lazy::new(rings),
        }
    }

    /// All rings, exterior first.
    pub fn rings(&self) -> &[LineString] {
        let dim = self.meta.dim;
        self.rings
            .get(|raw| read_polygon_body(&mut WkbReader::at(raw), dim))
    }

    fn rings_mut(&mut self) -> &mut Vec<LineString> {
        let dim = self.meta.dim;
        self.meta.touch();
        self.rings
            .get_mut(|raw| read_polygon_body(&mut WkbReader::at(raw), dim))
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.rings.is_pending()
    }

    pub fn exterior(&self) -> Option<&LineString> {
        self.rings().first()
    }

    pub fn interiors(&self) -> &[LineString] {
        self.rings().get(1..).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rings().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings().is_empty()
    }

    /// Replace one ring. It must have the dimensions of the polygon.
    pub fn set(&mut self, index: usize, mut ring: LineString) -> Result<()> {
        self.check_ring(&ring)?;
        let len = self.len();
        ring.meta.srid = None;
        let slot = self.rings_mut().get_mut(index).ok_or_else(|| {
            PgGeoError::Collection(format!("Index {index} out of range for {len} rings"))
        })?;
        *slot = ring;
        Ok(())
    }

    /// Append one ring. It must have the dimensions of the polygon.
    pub fn push(&mut self, mut ring: LineString) -> Result<()> {
        self.check_ring(&ring)?;
        ring.meta.srid = None;
        self.rings_mut().push(ring);
        Ok(())
    }

    fn check_ring(&self, ring: &LineString) -> Result<()> {
        if let Some(ring_srid) = ring.srid() {
            if Some(ring_srid) != self.meta.srid {
                return Err(PgGeoError::Collection(format!(
                    "Ring SRID {ring_srid} does not match Polygon SRID {:?}",
                    self.meta.srid
                )));
            }
        }
        if ring.dimension() != self.meta.dim {
            return Err(PgGeoError::Dimensionality(format!(
                "Ring is {} but the Polygon is {}",
                ring.dimension(),
                self.meta.dim
            )));
        }
        Ok(())
    }

    /// Ordinates of every vertex of every ring.
    pub fn coordinates(&self) -> Vec<Vec<Vec<f64>>> {
        self.rings().iter().map(LineString::coordinates).collect()
    }

    pub fn srid(&self) -> Option<u32> {
        self.meta.srid
    }

    pub fn set_srid(&mut self, srid: Option<u32>) {
        self.rings_mut();
        self.meta.srid = srid;
    }

    pub fn dimension(&self) -> Dimension {
        self.meta.dim
    }

    pub fn set_dimz(&mut self, dimz: bool) {
        self.rings_mut()
            .iter_mut()
            .for_each(|ring| ring.set_dimz(dimz));
        self.meta.dim = self.meta.dim.with_z(dimz);
    }

    pub fn set_dimm(&mut self, dimm: bool) {
        self.rings_mut()
            .iter_mut()
            .for_each(|ring| ring.set_dimm(dimm));
        self.meta.dim = self.meta.dim.with_m(dimm);
    }

    /// Bounds of the exterior ring.
    pub fn bounds(&self) -> Option<Bounds> {
        self.exterior().and_then(LineString::bounds)
    }

    pub(crate) fn stamp(&self) -> u64 {
        self.meta.revision()
    }
}

impl PartialEq for Polygon {
    fn eq(&self, other: &Self) -> bool {
        self.meta.srid == other.meta.srid
            && self.meta.dim == other.meta.dim
            && self.rings() == other.rings()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::polygon::{p_hole, p0};

    #[test]
    fn rings() {
        let polygon = p_hole();
        assert_eq!(polygon.len(), 2);
        assert_eq!(polygon.exterior().unwrap().len(), 5);
        assert_eq!(polygon.interiors().len(), 1);
        assert!(p0().interiors().is_empty());
    }

    #[test]
    fn bounds_follow_exterior() {
        let bounds = p_hole().bounds().unwrap();
        assert_eq!(<[f64; 4]>::from(bounds), [0., 0., 10., 10.]);
    }

    #[test]
    fn ring_dimensions() {
        let mut polygon = p0();
        let ring = LineString::try_new(&[[0., 0., 1.], [1., 1., 1.]], Dimension::XY, None).unwrap();
        assert!(matches!(
            polygon.push(ring),
            Err(PgGeoError::Dimensionality(_))
        ));
        polygon.set_dimz(true);
        assert_eq!(polygon.coordinates()[0][0], vec![0., 0., 0.]);
    }

    #[test]
    fn ring_srid() {
        let ring = || {
            LineString::try_new(&[[0., 0.], [1., 1.]], Dimension::XY, Some(4326)).unwrap()
        };
        let polygon = Polygon::from_rings(vec![ring()], Some(4326)).unwrap();
        assert_eq!(polygon.exterior().unwrap().srid(), None);

        let err = Polygon::from_rings(vec![ring()], Some(3857)).unwrap_err();
        assert!(matches!(err, PgGeoError::Srid(_)));
        let err = Polygon::from_rings(vec![ring()], None).unwrap_err();
        assert!(matches!(err, PgGeoError::Srid(_)));

        let mut polygon = p0();
        assert!(matches!(polygon.push(ring()), Err(PgGeoError::Collection(_))));
    }

    #[test]
    fn requires_a_ring() {
        let err = Polygon::from_rings(vec![], None).unwrap_err();
        assert!(matches!(err, PgGeoError::Coordinate(_)));
    }
}
