//! Hand geometries to and from an external geometry engine through EWKB.
//!
//! [`GeoEngine`] bridges to [`geo`] types when the `geozero` feature is enabled.

use crate::error::{PgGeoError, Result};
use crate::geometry::Geometry;

/// An external library with its own geometry type that can read and write EWKB.
pub trait GeometryEngine {
    type Geometry;

    /// Name used in dependency errors.
    const NAME: &'static str;

    fn is_available() -> bool;

    fn import_ewkb(buf: &[u8]) -> Result<Self::Geometry>;

    /// EWKB for `geom`, carrying `srid` when the engine supports it.
    fn export_ewkb(geom: &Self::Geometry, srid: Option<u32>) -> Result<Vec<u8>>;
}

/// The [`geo`] crate, reached through `geozero`'s EWKB support.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoEngine;

impl GeometryEngine for GeoEngine {
    type Geometry = geo::Geometry<f64>;

    const NAME: &'static str = "geozero";

    fn is_available() -> bool {
        cfg!(feature = "geozero")
    }

    #[cfg(feature = "geozero")]
    fn import_ewkb(buf: &[u8]) -> Result<Self::Geometry> {
        use geozero::ToGeo;
        Ok(geozero::wkb::Ewkb(buf.to_vec()).to_geo()?)
    }

    #[cfg(not(feature = "geozero"))]
    fn import_ewkb(_buf: &[u8]) -> Result<Self::Geometry> {
        Err(PgGeoError::Dependency(Self::NAME.to_string()))
    }

    #[cfg(feature = "geozero")]
    fn export_ewkb(geom: &Self::Geometry, srid: Option<u32>) -> Result<Vec<u8>> {
        use geozero::{CoordDimensions, ToWkb};
        let srid = srid
            .map(i32::try_from)
            .transpose()
            .map_err(|_| PgGeoError::Srid(format!("SRID {srid:?} does not fit an i32")))?;
        Ok(geom.to_ewkb(CoordDimensions::xy(), srid)?)
    }

    #[cfg(not(feature = "geozero"))]
    fn export_ewkb(_geom: &Self::Geometry, _srid: Option<u32>) -> Result<Vec<u8>> {
        Err(PgGeoError::Dependency(Self::NAME.to_string()))
    }
}

impl Geometry {
    /// Convert into an engine geometry.
    ///
    /// The engine's own EWKB output is read back to make sure it kept the SRID.
    pub fn to_engine<E: GeometryEngine>(&self) -> Result<E::Geometry> {
        require::<E>()?;
        let geom = E::import_ewkb(&self.ewkb()?)?;
        let echoed = Geometry::from_wkb(E::export_ewkb(&geom, self.srid())?)?;
        check_srid(echoed.srid(), self.srid())?;
        Ok(geom)
    }

    /// Build a geometry from an engine geometry, with `srid` attached.
    pub fn from_engine<E: GeometryEngine>(geom: &E::Geometry, srid: Option<u32>) -> Result<Self> {
        require::<E>()?;
        let out = Geometry::from_wkb(E::export_ewkb(geom, srid)?)?;
        check_srid(out.srid(), srid)?;
        Ok(out)
    }
}

fn require<E: GeometryEngine>() -> Result<()> {
    if E::is_available() {
        Ok(())
    } else {
        Err(PgGeoError::Dependency(E::NAME.to_string()))
    }
}

fn check_srid(found: Option<u32>, expected: Option<u32>) -> Result<()> {
    if found != expected {
        return Err(PgGeoError::Srid(format!(
            "SRID mismatch: {found:?} {expected:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::point::p_srid;

    /// Keeps the EWKB it is given.
    struct BytesEngine;

    impl GeometryEngine for BytesEngine {
        type Geometry = Vec<u8>;
        const NAME: &'static str = "bytes";

        fn is_available() -> bool {
            true
        }

        fn import_ewkb(buf: &[u8]) -> Result<Vec<u8>> {
            Ok(buf.to_vec())
        }

        fn export_ewkb(geom: &Vec<u8>, _srid: Option<u32>) -> Result<Vec<u8>> {
            Ok(geom.clone())
        }
    }

    /// Loses the SRID on import.
    struct PlanarEngine;

    impl GeometryEngine for PlanarEngine {
        type Geometry = Vec<u8>;
        const NAME: &'static str = "planar";

        fn is_available() -> bool {
            true
        }

        fn import_ewkb(buf: &[u8]) -> Result<Vec<u8>> {
            Ok(Geometry::from_wkb(buf.to_vec())?.wkb()?.to_vec())
        }

        fn export_ewkb(geom: &Vec<u8>, _srid: Option<u32>) -> Result<Vec<u8>> {
            Ok(geom.clone())
        }
    }

    struct MissingEngine;

    impl GeometryEngine for MissingEngine {
        type Geometry = ();
        const NAME: &'static str = "missing";

        fn is_available() -> bool {
            false
        }

        fn import_ewkb(_buf: &[u8]) -> Result<()> {
            Ok(())
        }

        fn export_ewkb(_geom: &(), _srid: Option<u32>) -> Result<Vec<u8>> {
            Ok(vec![])
        }
    }

    #[test]
    fn round_trip() {
        let geom = Geometry::Point(p_srid());
        let bytes = geom.to_engine::<BytesEngine>().unwrap();
        assert_eq!(bytes, geom.ewkb().unwrap());
        let back = Geometry::from_engine::<BytesEngine>(&bytes, Some(1000)).unwrap();
        assert_eq!(back, geom);
    }

    #[test]
    fn srid_lost_by_engine() {
        let geom = Geometry::Point(p_srid());
        assert!(matches!(
            geom.to_engine::<PlanarEngine>(),
            Err(PgGeoError::Srid(_))
        ));
        let bytes = geom.wkb().unwrap().to_vec();
        assert!(matches!(
            Geometry::from_engine::<PlanarEngine>(&bytes, Some(4326)),
            Err(PgGeoError::Srid(_))
        ));
        assert!(Geometry::from_engine::<PlanarEngine>(&bytes, None).is_ok());
    }

    #[test]
    fn unavailable_engine() {
        let geom = Geometry::Point(p_srid());
        let err = geom.to_engine::<MissingEngine>().unwrap_err();
        assert!(matches!(&err, PgGeoError::Dependency(name) if name == "missing"));
        assert_eq!(err.to_string(), "Dependency error: missing is not available");
        assert!(matches!(
            Geometry::from_engine::<MissingEngine>(&(), None),
            Err(PgGeoError::Dependency(_))
        ));
    }

    #[cfg(not(feature = "geozero"))]
    #[test]
    fn geo_engine_needs_feature() {
        assert!(!GeoEngine::is_available());
        let geom = Geometry::Point(p_srid());
        assert!(matches!(
            geom.to_engine::<GeoEngine>(),
            Err(PgGeoError::Dependency(_))
        ));
    }

    #[cfg(feature = "geozero")]
    #[test]
    fn geo_engine() {
        let geom = Geometry::from_wkt("SRID=4326;LINESTRING (0 0, 1 2)").unwrap();
        let line = geom.to_engine::<GeoEngine>().unwrap();
        let expected: geo::Geometry<f64> =
            geo::LineString::from(vec![(0., 0.), (1., 2.)]).into();
        assert_eq!(line, expected);

        let back = Geometry::from_engine::<GeoEngine>(&line, Some(4326)).unwrap();
        assert_eq!(back, geom);
    }
}
