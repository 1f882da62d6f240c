use serde_json::{Map, Value};

use crate::error::{PgGeoError, Result};
use crate::geometry::{
    Collection, CollectionKind, Dimension, Geometry, GeometryType, LineString, Point, Polygon,
};
use crate::io::geojson::GeoJsonOptions;

impl Geometry {
    /// Build a geometry from a GeoJSON geometry object.
    ///
    /// The top-level geometry gets `options.srid`; members of a GeometryCollection get none.
    pub fn from_geojson(value: &Value, options: &GeoJsonOptions) -> Result<Geometry> {
        read_geometry(value, options.srid)
    }

    /// Parse GeoJSON text and build a geometry from it.
    pub fn from_geojson_str(text: &str, options: &GeoJsonOptions) -> Result<Geometry> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_geojson(&value, options)
    }
}

fn read_geometry(value: &Value, srid: Option<u32>) -> Result<Geometry> {
    let object = value
        .as_object()
        .ok_or_else(|| PgGeoError::GeoJson("geometry must be a JSON object".to_string()))?;
    let name = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| PgGeoError::GeoJson("geometry has no \"type\" string".to_string()))?;
    let geometry_type = GeometryType::from_name(name)
        .ok_or_else(|| PgGeoError::GeoJson(format!("unknown geometry type \"{name}\"")))?;

    let geom: Geometry = match geometry_type {
        GeometryType::Point => read_point(coordinates(object)?, srid)?.into(),
        GeometryType::LineString => read_line_string(coordinates(object)?, srid)?.into(),
        GeometryType::Polygon => read_polygon(coordinates(object)?, srid)?.into(),
        GeometryType::MultiPoint => Geometry::MultiPoint(read_multi(object, srid, |item| {
            Ok(read_point(item, None)?.into())
        })?),
        GeometryType::MultiLineString => {
            Geometry::MultiLineString(read_multi(object, srid, |item| {
                Ok(read_line_string(item, None)?.into())
            })?)
        }
        GeometryType::MultiPolygon => Geometry::MultiPolygon(read_multi(object, srid, |item| {
            Ok(read_polygon(item, None)?.into())
        })?),
        GeometryType::GeometryCollection => {
            let members = object
                .get("geometries")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    PgGeoError::GeoJson("GeometryCollection has no \"geometries\" array".to_string())
                })?
                .iter()
                .map(|member| read_geometry(member, None))
                .collect::<Result<Vec<_>>>()?;
            Geometry::GeometryCollection(Collection::try_new(members, srid)?)
        }
    };
    Ok(geom)
}

fn coordinates(object: &Map<String, Value>) -> Result<&Value> {
    object
        .get("coordinates")
        .ok_or_else(|| PgGeoError::GeoJson("geometry has no \"coordinates\" member".to_string()))
}

/// Nested coordinate arrays below the top level.
fn nested(value: &Value) -> Result<&[Value]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| PgGeoError::Coordinate(format!("expected an array, found {value}")))
}

fn read_point(value: &Value, srid: Option<u32>) -> Result<Point> {
    let values = nested(value)?
        .iter()
        .map(|ordinate| match ordinate {
            Value::Number(number) => number
                .as_f64()
                .map(Some)
                .ok_or_else(|| PgGeoError::Coordinate(format!("{number} is not a float"))),
            Value::Null => Ok(None),
            other => Err(PgGeoError::Coordinate(format!("{other} is not a number"))),
        })
        .collect::<Result<Vec<_>>>()?;
    Point::try_from_values(&values, Dimension::XY, srid)
}

fn read_line_string(value: &Value, srid: Option<u32>) -> Result<LineString> {
    let vertices = nested(value)?
        .iter()
        .map(|position| read_point(position, None))
        .collect::<Result<Vec<_>>>()?;
    LineString::from_points(vertices, srid)
}

fn read_polygon(value: &Value, srid: Option<u32>) -> Result<Polygon> {
    let rings = nested(value)?
        .iter()
        .map(|ring| read_line_string(ring, None))
        .collect::<Result<Vec<_>>>()?;
    Polygon::from_rings(rings, srid)
}

fn read_multi<K: CollectionKind>(
    object: &Map<String, Value>,
    srid: Option<u32>,
    read_member: impl Fn(&Value) -> Result<Geometry>,
) -> Result<Collection<K>> {
    let members = nested(coordinates(object)?)?
        .iter()
        .map(read_member)
        .collect::<Result<Vec<_>>>()?;
    Collection::try_new(members, srid)
}
