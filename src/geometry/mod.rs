//! Geometry values: points, lines, polygons and their collections.

use std::fmt::Display;

pub use bounds::Bounds;
pub use collection::{
    Collection, CollectionKind, GeometryCollection, GeometryCollectionKind, MultiLineString,
    MultiLineStringKind, MultiPoint, MultiPointKind, MultiPolygon, MultiPolygonKind, Shared,
    SharedMut,
};
pub use dimension::Dimension;
pub use geometry_type::GeometryType;
pub use linestring::LineString;
pub use point::Point;
pub use polygon::Polygon;

use crate::lazy::Meta;

mod bounds;
mod collection;
mod dimension;
mod geometry_type;
pub(crate) mod linestring;
mod ops;
pub(crate) mod point;
mod polygon;

/// Evaluate `$body` with `$geom` bound to the payload of any variant.
macro_rules! dispatch {
    ($self:expr, $geom:ident => $body:expr) => {
        match $self {
            Geometry::Point($geom) => $body,
            Geometry::LineString($geom) => $body,
            Geometry::Polygon($geom) => $body,
            Geometry::MultiPoint($geom) => $body,
            Geometry::MultiLineString($geom) => $body,
            Geometry::MultiPolygon($geom) => $body,
            Geometry::GeometryCollection($geom) => $body,
        }
    };
}

/// A PostGIS geometry of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    pub fn srid(&self) -> Option<u32> {
        self.meta().srid
    }

    /// Set the SRID. This realizes a geometry read from WKB.
    pub fn set_srid(&mut self, srid: Option<u32>) {
        dispatch!(self, geom => geom.set_srid(srid))
    }

    pub fn dimension(&self) -> Dimension {
        self.meta().dim
    }

    pub fn dimz(&self) -> bool {
        self.dimension().has_z()
    }

    pub fn dimm(&self) -> bool {
        self.dimension().has_m()
    }

    /// Add or drop the Z dimension, on this geometry and everything it contains.
    pub fn set_dimz(&mut self, dimz: bool) {
        dispatch!(self, geom => geom.set_dimz(dimz))
    }

    /// Add or drop the M dimension, on this geometry and everything it contains.
    pub fn set_dimm(&mut self, dimm: bool) {
        dispatch!(self, geom => geom.set_dimm(dimm))
    }

    /// The 2D bounding box, `None` for empty geometries.
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Geometry::Point(geom) => Some(geom.bounds()),
            Geometry::LineString(geom) => geom.bounds(),
            Geometry::Polygon(geom) => geom.bounds(),
            Geometry::MultiPoint(geom) => geom.bounds(),
            Geometry::MultiLineString(geom) => geom.bounds(),
            Geometry::MultiPolygon(geom) => geom.bounds(),
            Geometry::GeometryCollection(geom) => geom.bounds(),
        }
    }

    /// The PostGIS column type of this geometry, e.g. `geometry(PointZ,4326)`.
    pub fn postgis_type(&self) -> String {
        let name = format!(
            "{}{}",
            self.geometry_type().name(),
            self.dimension().postgis_suffix()
        );
        match self.srid() {
            Some(srid) => format!("geometry({name},{srid})"),
            None => format!("geometry({name})"),
        }
    }

    /// Whether the body of this geometry is still undecoded WKB.
    pub fn is_pending(&self) -> bool {
        dispatch!(self, geom => geom.is_pending())
    }

    /// An independent copy. Collections copy their members recursively instead of sharing
    /// member handles as [`Clone`] does.
    pub fn deep_copy(&self) -> Geometry {
        match self {
            Geometry::MultiPoint(geom) => Geometry::MultiPoint(geom.deep_copy()),
            Geometry::MultiLineString(geom) => Geometry::MultiLineString(geom.deep_copy()),
            Geometry::MultiPolygon(geom) => Geometry::MultiPolygon(geom.deep_copy()),
            Geometry::GeometryCollection(geom) => Geometry::GeometryCollection(geom.deep_copy()),
            leaf => leaf.clone(),
        }
    }

    /// Wrap this geometry in a handle that collections can share.
    pub fn into_shared(self) -> Shared {
        Shared::new(self)
    }

    /// Member handles, for collection kinds.
    pub fn members(&self) -> Option<&[Shared]> {
        match self {
            Geometry::MultiPoint(geom) => Some(geom.members()),
            Geometry::MultiLineString(geom) => Some(geom.members()),
            Geometry::MultiPolygon(geom) => Some(geom.members()),
            Geometry::GeometryCollection(geom) => Some(geom.members()),
            _ => None,
        }
    }

    pub(crate) fn meta(&self) -> &Meta {
        dispatch!(self, geom => &geom.meta)
    }

    pub(crate) fn meta_mut(&mut self) -> &mut Meta {
        dispatch!(self, geom => &mut geom.meta)
    }

    /// The highest revision anywhere in this geometry.
    pub(crate) fn stamp(&self) -> u64 {
        dispatch!(self, geom => geom.stamp())
    }
}

macro_rules! impl_downcast {
    ($variant:ident, $ty:ty, $as_ref:ident, $as_mut:ident) => {
        impl Geometry {
            pub fn $as_ref(&self) -> Option<&$ty> {
                match self {
                    Geometry::$variant(geom) => Some(geom),
                    _ => None,
                }
            }

            pub fn $as_mut(&mut self) -> Option<&mut $ty> {
                match self {
                    Geometry::$variant(geom) => Some(geom),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Geometry {
            fn from(value: $ty) -> Self {
                Geometry::$variant(value)
            }
        }
    };
}

impl_downcast!(Point, Point, as_point, as_point_mut);
impl_downcast!(LineString, LineString, as_line_string, as_line_string_mut);
impl_downcast!(Polygon, Polygon, as_polygon, as_polygon_mut);
impl_downcast!(MultiPoint, MultiPoint, as_multi_point, as_multi_point_mut);
impl_downcast!(
    MultiLineString,
    MultiLineString,
    as_multi_line_string,
    as_multi_line_string_mut
);
impl_downcast!(MultiPolygon, MultiPolygon, as_multi_polygon, as_multi_polygon_mut);
impl_downcast!(
    GeometryCollection,
    GeometryCollection,
    as_geometry_collection,
    as_geometry_collection_mut
);

/// Formats as hex-encoded EWKB, the textual form PostgreSQL uses for geometry values.
impl Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ewkb = self.ewkb().map_err(|_| std::fmt::Error)?;
        write!(f, "{}", hex::encode(ewkb))
    }
}
