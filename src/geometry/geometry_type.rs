use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The seven PostGIS geometry kinds, numbered by their WKB type code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u32)]
pub enum GeometryType {
    Point = 1,
    LineString = 2,
    Polygon = 3,
    MultiPoint = 4,
    MultiLineString = 5,
    MultiPolygon = 6,
    GeometryCollection = 7,
}

impl GeometryType {
    /// Name as used by PostGIS type modifiers and GeoJSON.
    pub fn name(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        }
    }

    pub(crate) fn wkt_keyword(&self) -> &'static str {
        match self {
            GeometryType::Point => "POINT",
            GeometryType::LineString => "LINESTRING",
            GeometryType::Polygon => "POLYGON",
            GeometryType::MultiPoint => "MULTIPOINT",
            GeometryType::MultiLineString => "MULTILINESTRING",
            GeometryType::MultiPolygon => "MULTIPOLYGON",
            GeometryType::GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }

    /// Case-insensitive lookup by [name](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        ALL.into_iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(name))
    }

    pub fn is_collection(&self) -> bool {
        !matches!(
            self,
            GeometryType::Point | GeometryType::LineString | GeometryType::Polygon
        )
    }

    /// The homogeneous collection holding members of this type.
    pub(crate) fn multi(&self) -> Option<GeometryType> {
        match self {
            GeometryType::Point => Some(GeometryType::MultiPoint),
            GeometryType::LineString => Some(GeometryType::MultiLineString),
            GeometryType::Polygon => Some(GeometryType::MultiPolygon),
            _ => None,
        }
    }

    /// The member type of a homogeneous collection.
    pub(crate) fn member(&self) -> Option<GeometryType> {
        match self {
            GeometryType::MultiPoint => Some(GeometryType::Point),
            GeometryType::MultiLineString => Some(GeometryType::LineString),
            GeometryType::MultiPolygon => Some(GeometryType::Polygon),
            _ => None,
        }
    }
}

const ALL: [GeometryType; 7] = [
    GeometryType::Point,
    GeometryType::LineString,
    GeometryType::Polygon,
    GeometryType::MultiPoint,
    GeometryType::MultiLineString,
    GeometryType::MultiPolygon,
    GeometryType::GeometryCollection,
];
