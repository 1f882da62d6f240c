use crate::error::{PgGeoError, Result};
use crate::geometry::{Bounds, Dimension, Point};
use crate::io::wkb::reader::{read_line_string_body, WkbReader};
use crate::lazy::{Lazy, Meta, RawBody};

/// An ordered sequence of vertices.
#[derive(Debug, Clone)]
pub struct LineString {
    pub(crate) meta: Meta,
    vertices: Lazy<Vec<Point>>,
}

impl LineString {
    /// Build a line from coordinate tuples, each following the [`Point::try_new`] rules.
    pub fn try_new<C: AsRef<[f64]>>(
        coords: &[C],
        requested: Dimension,
        srid: Option<u32>,
    ) -> Result<Self> {
        let vertices = coords
            .iter()
            .map(|coord| Point::try_new(coord.as_ref(), requested, None))
            .collect::<Result<Vec<_>>>()?;
        Self::from_points(vertices, srid)
    }

    /// Build a line from points that share the same dimensions.
    ///
    /// A line needs at least one vertex. A vertex SRID must be absent or equal to `srid`; it
    /// is cleared once accepted.
    pub fn from_points(vertices: Vec<Point>, srid: Option<u32>) -> Result<Self> {
        let Some(first) = vertices.first() else {
            return Err(PgGeoError::Coordinate(
                "LineString requires at least one vertex".to_string(),
            ));
        };
        let dim = common_dimension(
            vertices.iter().map(Point::dimension),
            first.dimension(),
            "LineString",
        )?;
        check_part_srids(vertices.iter().map(Point::srid), srid, "Vertex")?;
        let vertices = vertices
            .into_iter()
            .map(|mut vertex| {
                vertex.meta.srid = None;
                vertex
            })
            .collect();
        Ok(Self {
            meta: Meta::new(srid, dim),
            vertices: Lazy::new(vertices),
        })
    }

    pub(crate) fn from_raw(raw: RawBody, dim: Dimension, srid: Option<u32>) -> Self {
        Self {
            meta: Meta::new(srid, dim),
            vertices: Lazy::pending(raw),
        }
    }

    pub(crate) fn decoded(vertices: Vec<Point>, dim: Dimension) -> Self {
        Self {
            meta: Meta::decoded(dim),
            vertices: Lazy::new(vertices),
        }
    }

    /// The vertices, decoded on first access.
    pub fn vertices(&self) -> &[Point] {
        let dim = self.meta.dim;
        self.vertices
            .get(|raw| read_line_string_body(&mut WkbReader::at(raw), dim))
    }

    fn vertices_mut(&mut self) -> &mut Vec<Point> {
        let dim = self.meta.dim;
        self.meta.touch();
        self.vertices
            .get_mut(|raw| read_line_string_body(&mut WkbReader::at(raw), dim))
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.vertices.is_pending()
    }

    pub fn len(&self) -> usize {
        self.vertices().len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.vertices().get(index)
    }

    /// Replace one vertex. It must have the dimensions of the line.
    pub fn set(&mut self, index: usize, vertex: Point) -> Result<()> {
        self.check_vertex(&vertex)?;
        let len = self.len();
        let slot = self.vertices_mut().get_mut(index).ok_or_else(|| {
            PgGeoError::Collection(format!("Index {index} out of range for {len} vertices"))
        })?;
        *slot = vertex;
        slot.meta.srid = None;
        Ok(())
    }

    /// Append one vertex. It must have the dimensions of the line.
    pub fn push(&mut self, mut vertex: Point) -> Result<()> {
        self.check_vertex(&vertex)?;
        vertex.meta.srid = None;
        self.vertices_mut().push(vertex);
        Ok(())
    }

    fn check_vertex(&self, vertex: &Point) -> Result<()> {
        if let Some(vertex_srid) = vertex.srid() {
            if Some(vertex_srid) != self.meta.srid {
                return Err(PgGeoError::Collection(format!(
                    "Vertex SRID {vertex_srid} does not match LineString SRID {:?}",
                    self.meta.srid
                )));
            }
        }
        if vertex.dimension() != self.meta.dim {
            return Err(PgGeoError::Dimensionality(format!(
                "Vertex is {} but the LineString is {}",
                vertex.dimension(),
                self.meta.dim
            )));
        }
        Ok(())
    }

    /// Ordinates of every vertex.
    pub fn coordinates(&self) -> Vec<Vec<f64>> {
        self.vertices().iter().map(Point::coordinates).collect()
    }

    pub fn srid(&self) -> Option<u32> {
        self.meta.srid
    }

    pub fn set_srid(&mut self, srid: Option<u32>) {
        self.vertices_mut();
        self.meta.srid = srid;
    }

    pub fn dimension(&self) -> Dimension {
        self.meta.dim
    }

    /// Add or drop Z on the line and all of its vertices.
    pub fn set_dimz(&mut self, dimz: bool) {
        self.vertices_mut()
            .iter_mut()
            .for_each(|vertex| vertex.set_dimz(dimz));
        self.meta.dim = self.meta.dim.with_z(dimz);
    }

    /// Add or drop M on the line and all of its vertices.
    pub fn set_dimm(&mut self, dimm: bool) {
        self.vertices_mut()
            .iter_mut()
            .for_each(|vertex| vertex.set_dimm(dimm));
        self.meta.dim = self.meta.dim.with_m(dimm);
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::union_all(self.vertices().iter().map(|vertex| Some(vertex.bounds())))
    }

    pub(crate) fn stamp(&self) -> u64 {
        self.meta.revision()
    }
}

impl PartialEq for LineString {
    fn eq(&self, other: &Self) -> bool {
        self.meta.srid == other.meta.srid
            && self.meta.dim == other.meta.dim
            && self.vertices() == other.vertices()
    }
}

/// Every SRID in `srids` must be absent or equal to `container`.
pub(crate) fn check_part_srids(
    srids: impl Iterator<Item = Option<u32>>,
    container: Option<u32>,
    part: &str,
) -> Result<()> {
    for srid in srids.flatten() {
        if Some(srid) != container {
            return Err(PgGeoError::Srid(format!(
                "{part} SRID {srid} does not match SRID {container:?}"
            )));
        }
    }
    Ok(())
}

/// The dimensions shared by every item, or `fallback` when there are none.
pub(crate) fn common_dimension(
    mut dims: impl Iterator<Item = Dimension>,
    fallback: Dimension,
    owner: &str,
) -> Result<Dimension> {
    let Some(first) = dims.next() else {
        return Ok(fallback);
    };
    for dim in dims {
        if dim != first {
            return Err(PgGeoError::Dimensionality(format!(
                "{owner} mixes {first} and {dim} members"
            )));
        }
    }
    Ok(first)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::linestring::{ls0, ls_zm};

    #[test]
    fn from_coordinates() {
        let line = ls0();
        assert_eq!(line.len(), 2);
        assert_eq!(line.dimension(), Dimension::XY);
        assert_eq!(line.coordinates(), vec![vec![0., 0.], vec![1., 1.]]);
    }

    #[test]
    fn mixed_dimensions() {
        let err = LineString::try_new(&[vec![0., 0.], vec![1., 1., 1.]], Dimension::XY, None)
            .unwrap_err();
        assert!(matches!(err, PgGeoError::Dimensionality(_)));
    }

    #[test]
    fn vertex_srid_is_cleared() {
        let vertex = Point::try_new(&[2., 2.], Dimension::XY, Some(4326)).unwrap();
        let line = LineString::from_points(vec![vertex], Some(4326)).unwrap();
        assert_eq!(line.get(0).unwrap().srid(), None);
        assert_eq!(line.srid(), Some(4326));
    }

    #[test]
    fn conflicting_vertex_srid() {
        let vertex = Point::try_new(&[2., 2.], Dimension::XY, Some(4326)).unwrap();
        let err = LineString::from_points(vec![Point::new(0., 0.), vertex.clone()], Some(3857))
            .unwrap_err();
        assert!(matches!(err, PgGeoError::Srid(_)));
        let err = LineString::from_points(vec![vertex], None).unwrap_err();
        assert!(matches!(err, PgGeoError::Srid(_)));
    }

    #[test]
    fn requires_a_vertex() {
        let err = LineString::from_points(vec![], None).unwrap_err();
        assert!(matches!(err, PgGeoError::Coordinate(_)));
        let no_coords: [[f64; 2]; 0] = [];
        assert!(LineString::try_new(&no_coords, Dimension::XY, None).is_err());
    }

    #[test]
    fn dimension_propagates() {
        let mut line = ls_zm();
        line.set_dimz(false);
        assert_eq!(line.dimension(), Dimension::XYM);
        assert!(line
            .vertices()
            .iter()
            .all(|vertex| vertex.dimension() == Dimension::XYM));
        assert!(line.push(Point::new(5., 5.)).is_err());
    }

    #[test]
    fn set_vertex() {
        let mut line = ls0();
        line.set(1, Point::new(4., 4.)).unwrap();
        assert_eq!(line.get(1).unwrap().x(), 4.);
        assert!(matches!(
            line.set(5, Point::new(4., 4.)),
            Err(PgGeoError::Collection(_))
        ));
    }

    #[test]
    fn bounds() {
        let bounds = ls0().bounds().unwrap();
        assert_eq!(<[f64; 4]>::from(bounds), [0., 0., 1., 1.]);
    }
}
