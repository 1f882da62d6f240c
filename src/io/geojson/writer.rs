use serde_json::{json, Value};

use crate::geometry::{Geometry, Point};

impl Geometry {
    /// The geometry as a GeoJSON geometry object.
    ///
    /// Z is written when the geometry has it. M is dropped and the SRID is not checked.
    pub fn to_geojson(&self) -> Value {
        write_geometry(self, self.dimz())
    }
}

fn write_geometry(geom: &Geometry, dimz: bool) -> Value {
    match geom {
        Geometry::GeometryCollection(collection) => {
            let geometries: Vec<Value> = collection
                .iter()
                .map(|member| write_geometry(&member.borrow(), dimz))
                .collect();
            json!({"type": "GeometryCollection", "geometries": geometries})
        }
        _ => json!({
            "type": geom.geometry_type().name(),
            "coordinates": write_coordinates(geom, dimz),
        }),
    }
}

fn write_coordinates(geom: &Geometry, dimz: bool) -> Value {
    match geom {
        Geometry::Point(point) => write_position(point, dimz),
        Geometry::LineString(line) => write_positions(line.vertices(), dimz),
        Geometry::Polygon(polygon) => polygon
            .rings()
            .iter()
            .map(|ring| write_positions(ring.vertices(), dimz))
            .collect(),
        collection => collection
            .members()
            .unwrap_or_default()
            .iter()
            .map(|member| write_coordinates(&member.borrow(), dimz))
            .collect(),
    }
}

fn write_positions(vertices: &[Point], dimz: bool) -> Value {
    vertices
        .iter()
        .map(|vertex| write_position(vertex, dimz))
        .collect()
}

fn write_position(point: &Point, dimz: bool) -> Value {
    let coord = point.coord();
    let mut position = vec![coord.x, coord.y];
    if dimz {
        position.push(coord.z);
    }
    Value::from(position)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::geojson::GeoJsonOptions;
    use crate::test::collection::{gc0, mp0};
    use crate::test::polygon::p_hole;

    #[test]
    fn point() {
        let geom = Geometry::from_wkt("POINT (0 1)").unwrap();
        assert_eq!(
            geom.to_geojson(),
            json!({"type": "Point", "coordinates": [0.0, 1.0]})
        );
    }

    #[test]
    fn z_kept_and_m_dropped() {
        let geom = Geometry::from_wkt("POINT ZM (1 2 3 4)").unwrap();
        assert_eq!(
            geom.to_geojson(),
            json!({"type": "Point", "coordinates": [1.0, 2.0, 3.0]})
        );
        let geom = Geometry::from_wkt("LINESTRING M (1 2 3, 4 5 6)").unwrap();
        assert_eq!(
            geom.to_geojson(),
            json!({"type": "LineString", "coordinates": [[1.0, 2.0], [4.0, 5.0]]})
        );
    }

    #[test]
    fn polygon() {
        let geom = Geometry::Polygon(p_hole());
        let value = geom.to_geojson();
        assert_eq!(value["type"], "Polygon");
        assert_eq!(value["coordinates"].as_array().unwrap().len(), 2);
        assert_eq!(value["coordinates"][1][1], json!([1.0, 2.0]));
    }

    #[test]
    fn collections() {
        let geom = Geometry::MultiPoint(mp0());
        let value = geom.to_geojson();
        assert_eq!(value["type"], "MultiPoint");
        assert_eq!(value["coordinates"].as_array().unwrap().len(), 2);

        let geom = Geometry::GeometryCollection(gc0());
        let value = geom.to_geojson();
        assert_eq!(value["type"], "GeometryCollection");
        assert_eq!(value["geometries"][0]["type"], "Point");
        assert!(value.get("coordinates").is_none());
    }

    #[test]
    fn round_trip() {
        let text = "MULTIPOLYGON Z (((0 0 1, 1 0 1, 1 1 1, 0 0 1)), ((5 5 2, 6 5 2, 6 6 2, 5 5 2)))";
        let geom = Geometry::from_wkt(text).unwrap();
        let options = GeoJsonOptions::new(None);
        let parsed = Geometry::from_geojson(&geom.to_geojson(), &options).unwrap();
        assert_eq!(parsed, geom);
    }
}
