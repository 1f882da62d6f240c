//! Composition of geometries into collections.

use std::ops::Add;

use crate::error::{PgGeoError, Result};
use crate::geometry::{
    Collection, CollectionKind, Geometry, GeometryCollection, GeometryType, MultiLineString,
    MultiPoint, MultiPolygon, Shared,
};

impl Geometry {
    /// Combine two geometries into a new collection.
    ///
    /// Two leaves of the same type make the matching Multi* geometry, and a Multi* geometry
    /// combined with its element type or its own type is extended. Anything else makes a
    /// [`GeometryCollection`] in which collection operands are flattened into their members.
    /// Both operands must have the same SRID, and neither is modified. Members of collection
    /// operands are shared with the result, leaves are copied.
    pub fn combine(&self, other: &Geometry) -> Result<Geometry> {
        check_same_srid(self, other)?;
        let srid = self.srid();
        let (left, right) = (self.geometry_type(), other.geometry_type());

        let target = match (left.member(), right.member()) {
            _ if left == right && left.multi().is_some() => left.multi(),
            (Some(member), None) if member == right => Some(left),
            (None, Some(member)) if member == left => Some(right),
            (Some(_), Some(_)) if left == right => Some(left),
            _ => None,
        };
        let mut members = self.to_members();
        members.extend(other.to_members());
        tracing::trace!(
            left = left.name(),
            right = right.name(),
            members = members.len(),
            "combining geometries"
        );

        let combined = match target {
            Some(GeometryType::MultiPoint) => MultiPoint::try_from_shared(members, srid)?.into(),
            Some(GeometryType::MultiLineString) => {
                MultiLineString::try_from_shared(members, srid)?.into()
            }
            Some(GeometryType::MultiPolygon) => {
                MultiPolygon::try_from_shared(members, srid)?.into()
            }
            _ => GeometryCollection::try_from_shared(members, srid)?.into(),
        };
        Ok(combined)
    }

    /// Add `other` to this geometry in place.
    ///
    /// A [`GeometryCollection`] accepts anything, flattening collection operands. A Multi*
    /// geometry accepts its element type or its own type. A leaf becomes the matching Multi*
    /// geometry when `other` has the same type. Every other pairing, and an SRID mismatch, is a
    /// [`PgGeoError::Collection`].
    pub fn append(&mut self, other: &Geometry) -> Result<()> {
        check_same_srid(self, other)?;
        let members = other.to_members();
        match self {
            Geometry::MultiPoint(geom) => extend_homogeneous(geom, other, members),
            Geometry::MultiLineString(geom) => extend_homogeneous(geom, other, members),
            Geometry::MultiPolygon(geom) => extend_homogeneous(geom, other, members),
            Geometry::GeometryCollection(geom) => geom.extend_checked(members),
            leaf if leaf.geometry_type() == other.geometry_type() => {
                *leaf = leaf.combine(other)?;
                Ok(())
            }
            leaf => Err(PgGeoError::Collection(format!(
                "Cannot add {} to {}",
                other.geometry_type().name(),
                leaf.geometry_type().name()
            ))),
        }
    }

    /// The members this geometry contributes to a composition: the member handles of a
    /// collection, or a copy of a leaf.
    fn to_members(&self) -> Vec<Shared> {
        match self.members() {
            Some(members) => members.to_vec(),
            None => {
                let mut copy = self.clone();
                copy.meta_mut().srid = None;
                vec![copy.into_shared()]
            }
        }
    }
}

fn extend_homogeneous<K: CollectionKind>(
    target: &mut Collection<K>,
    other: &Geometry,
    members: Vec<Shared>,
) -> Result<()> {
    let accepted =
        other.geometry_type() == K::TYPE || K::TYPE.member() == Some(other.geometry_type());
    if !accepted {
        return Err(PgGeoError::Collection(format!(
            "Cannot add {} to {}",
            other.geometry_type().name(),
            K::TYPE.name()
        )));
    }
    target.extend_checked(members)
}

fn check_same_srid(left: &Geometry, right: &Geometry) -> Result<()> {
    if left.srid() != right.srid() {
        return Err(PgGeoError::Collection(format!(
            "Cannot combine geometries with SRIDs {:?} and {:?}",
            left.srid(),
            right.srid()
        )));
    }
    Ok(())
}

impl Add for &Geometry {
    type Output = Result<Geometry>;

    fn add(self, rhs: &Geometry) -> Self::Output {
        self.combine(rhs)
    }
}

impl Add for Geometry {
    type Output = Result<Geometry>;

    fn add(self, rhs: Geometry) -> Self::Output {
        self.combine(&rhs)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{Dimension, Point};
    use crate::test::collection::{gc0, mp0};
    use crate::test::linestring::ls0;
    use crate::test::point::{p0, p1, p_srid};
    use crate::test::polygon::p0 as poly0;

    fn len(geom: &Geometry) -> usize {
        geom.members().map_or(0, <[_]>::len)
    }

    #[test]
    fn leaves_of_same_type() {
        let combined = (&Geometry::Point(p0()) + &Geometry::Point(p1())).unwrap();
        assert_eq!(combined.geometry_type(), GeometryType::MultiPoint);
        assert_eq!(len(&combined), 2);

        let lines = (&Geometry::LineString(ls0()) + &Geometry::LineString(ls0())).unwrap();
        assert_eq!(lines.geometry_type(), GeometryType::MultiLineString);

        let polygons = (&Geometry::Polygon(poly0()) + &Geometry::Polygon(poly0())).unwrap();
        assert_eq!(polygons.geometry_type(), GeometryType::MultiPolygon);
    }

    #[test]
    fn point_and_line() {
        let combined = (&Geometry::Point(p0()) + &Geometry::LineString(ls0())).unwrap();
        assert_eq!(combined.geometry_type(), GeometryType::GeometryCollection);
        assert_eq!(len(&combined), 2);
    }

    #[test]
    fn multi_is_extended() {
        let multi = Geometry::MultiPoint(mp0());
        let combined = (&multi + &Geometry::Point(p0())).unwrap();
        assert_eq!(combined.geometry_type(), GeometryType::MultiPoint);
        assert_eq!(len(&combined), 3);
        assert_eq!(len(&multi), 2);

        let both = (&multi + &Geometry::MultiPoint(mp0())).unwrap();
        assert_eq!(both.geometry_type(), GeometryType::MultiPoint);
        assert_eq!(len(&both), 4);

        let reversed = (&Geometry::Point(p1()) + &multi).unwrap();
        assert_eq!(reversed.geometry_type(), GeometryType::MultiPoint);
        assert_eq!(len(&reversed), 3);
    }

    #[test]
    fn mixed_kinds_flatten() {
        let multi = Geometry::MultiPoint(mp0());
        let combined = (&multi + &Geometry::LineString(ls0())).unwrap();
        assert_eq!(combined.geometry_type(), GeometryType::GeometryCollection);
        assert_eq!(len(&combined), 3);

        let collection = Geometry::GeometryCollection(gc0());
        let combined = (&collection + &Geometry::Point(p1())).unwrap();
        assert_eq!(len(&combined), 3);
        let combined = (&Geometry::Point(p1()) + &collection).unwrap();
        assert_eq!(len(&combined), 3);
        assert_eq!(
            combined.members().unwrap()[0].borrow().geometry_type(),
            GeometryType::Point
        );
    }

    #[test]
    fn srid_must_match() {
        let err = (&Geometry::Point(p0()) + &Geometry::Point(p_srid())).unwrap_err();
        assert!(matches!(err, PgGeoError::Collection(_)));

        let combined = (&Geometry::Point(p_srid()) + &Geometry::Point(p_srid())).unwrap();
        assert_eq!(combined.srid(), Some(1000));
        let first = &combined.members().unwrap()[0];
        assert_eq!(first.borrow().srid(), None);
    }

    #[test]
    fn dimensions_must_match() {
        let z = Point::try_new(&[1., 2., 3.], Dimension::XY, None).unwrap();
        let err = (Geometry::Point(p0()) + Geometry::Point(z)).unwrap_err();
        assert!(matches!(err, PgGeoError::Dimensionality(_)));
    }

    #[test]
    fn append_to_collection() {
        let mut collection = Geometry::GeometryCollection(gc0());
        collection.append(&Geometry::Point(p0())).unwrap();
        assert_eq!(len(&collection), 3);
        collection.append(&Geometry::MultiPoint(mp0())).unwrap();
        assert_eq!(len(&collection), 5);
    }

    #[test]
    fn append_to_multi() {
        let mut multi = Geometry::MultiPoint(mp0());
        multi.append(&Geometry::Point(p0())).unwrap();
        multi.append(&Geometry::MultiPoint(mp0())).unwrap();
        assert_eq!(len(&multi), 5);

        let err = multi.append(&Geometry::LineString(ls0())).unwrap_err();
        assert!(matches!(err, PgGeoError::Collection(_)));
        assert_eq!(len(&multi), 5);
    }

    #[test]
    fn append_to_leaf() {
        let mut point = Geometry::Point(p0());
        point.append(&Geometry::Point(p1())).unwrap();
        assert_eq!(point.geometry_type(), GeometryType::MultiPoint);
        assert_eq!(len(&point), 2);

        let mut line = Geometry::LineString(ls0());
        let err = line.append(&Geometry::Point(p0())).unwrap_err();
        assert!(matches!(err, PgGeoError::Collection(_)));
        assert_eq!(line.geometry_type(), GeometryType::LineString);
    }

    #[test]
    fn append_srid_mismatch() {
        let mut collection = Geometry::GeometryCollection(gc0());
        let err = collection.append(&Geometry::Point(p_srid())).unwrap_err();
        assert!(matches!(err, PgGeoError::Collection(_)));
    }

    #[test]
    fn composed_members_are_shared() {
        let multi = mp0();
        let combined = (&Geometry::MultiPoint(multi.clone()) + &Geometry::Point(p0())).unwrap();
        multi[0].borrow_mut().as_point_mut().unwrap().set_x(42.);
        let members = combined.members().unwrap();
        assert_eq!(members[0].borrow().as_point().unwrap().x(), 42.);
    }

    #[test]
    fn leaf_operands_are_copied() {
        let line = ls0();
        let combined = (&Geometry::LineString(line.clone()) + &Geometry::Point(p0())).unwrap();
        let members = combined.members().unwrap();
        assert_eq!(*members[0].borrow(), Geometry::LineString(line));
        members[0]
            .borrow_mut()
            .as_line_string_mut()
            .unwrap()
            .push(Point::new(2., 2.))
            .unwrap();
        assert_eq!(ls0().len(), 2);
    }
}
