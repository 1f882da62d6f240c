use crate::error::{PgGeoError, Result};
use crate::geometry::{
    Collection, Dimension, Geometry, GeometryType, LineString, Point, Polygon, Shared,
};
use crate::io::wkb::common::WkbHeader;
use crate::io::wkb::reader::{read_coord, read_line_string_body, read_polygon_body, WkbReader};

/// Read a member count followed by that many complete member geometries.
pub(crate) fn read_collection_body(
    reader: &mut WkbReader,
    collection_type: GeometryType,
    dim: Dimension,
) -> Result<Vec<Shared>> {
    let num_members = reader.read_count()?;
    let mut members = Vec::with_capacity(num_members.min(reader.remaining() / 5));
    for _ in 0..num_members {
        let header = reader.read_header()?;
        check_member_header(collection_type, dim, &header)?;
        members.push(read_member(reader, &header)?.into_shared());
    }
    Ok(members)
}

/// Fully decode the body of a member whose header was just read.
fn read_member(reader: &mut WkbReader, header: &WkbHeader) -> Result<Geometry> {
    let dim = header.dim;
    let member = match header.geometry_type {
        GeometryType::Point => Point::decoded(read_coord(reader, dim)?, dim).into(),
        GeometryType::LineString => {
            LineString::decoded(read_line_string_body(reader, dim)?, dim).into()
        }
        GeometryType::Polygon => Polygon::decoded(read_polygon_body(reader, dim)?, dim).into(),
        GeometryType::MultiPoint => Geometry::MultiPoint(Collection::decoded(
            read_collection_body(reader, GeometryType::MultiPoint, dim)?,
            dim,
        )),
        GeometryType::MultiLineString => Geometry::MultiLineString(Collection::decoded(
            read_collection_body(reader, GeometryType::MultiLineString, dim)?,
            dim,
        )),
        GeometryType::MultiPolygon => Geometry::MultiPolygon(Collection::decoded(
            read_collection_body(reader, GeometryType::MultiPolygon, dim)?,
            dim,
        )),
        GeometryType::GeometryCollection => Geometry::GeometryCollection(Collection::decoded(
            read_collection_body(reader, GeometryType::GeometryCollection, dim)?,
            dim,
        )),
    };
    Ok(member)
}

/// A member must be of a type the collection accepts and share its dimensions.
pub(crate) fn check_member_header(
    collection_type: GeometryType,
    dim: Dimension,
    member: &WkbHeader,
) -> Result<()> {
    if let Some(expected) = collection_type.member() {
        if member.geometry_type != expected {
            return Err(PgGeoError::Wkb(format!(
                "{} cannot contain a {}",
                collection_type.name(),
                member.geometry_type.name()
            )));
        }
    }
    if member.dim != dim {
        return Err(PgGeoError::Dimensionality(format!(
            "{} member of a {dim} {}",
            member.dim,
            collection_type.name()
        )));
    }
    Ok(())
}
