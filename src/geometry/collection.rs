use std::cell::{Ref, RefCell, RefMut};
use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut, Index};
use std::rc::Rc;

use crate::error::{PgGeoError, Result};
use crate::geometry::linestring::common_dimension;
use crate::geometry::{Bounds, Dimension, Geometry, GeometryType};
use crate::io::wkb::reader::{read_collection_body, WkbReader};
use crate::lazy::{Lazy, Meta, RawBody};

/// A member handle. Collections hold members by handle, so a geometry placed in a collection
/// can still be mutated by whoever else holds the handle.
///
/// A mutable borrow marks the geometry as modified when it ends, which makes every container
/// holding the handle encode again.
#[derive(Debug, Clone)]
pub struct Shared(Rc<RefCell<Geometry>>);

impl Shared {
    pub fn new(geom: Geometry) -> Self {
        Self(Rc::new(RefCell::new(geom)))
    }

    /// Panics if the geometry is mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, Geometry> {
        self.0.borrow()
    }

    /// Panics if the geometry is already borrowed.
    pub fn borrow_mut(&self) -> SharedMut<'_> {
        SharedMut(self.0.borrow_mut())
    }

    /// Whether both handles point to the same geometry.
    pub fn ptr_eq(&self, other: &Shared) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// A mutable borrow of a [`Shared`] geometry.
pub struct SharedMut<'a>(RefMut<'a, Geometry>);

impl Deref for SharedMut<'_> {
    type Target = Geometry;

    fn deref(&self) -> &Geometry {
        &self.0
    }
}

impl DerefMut for SharedMut<'_> {
    fn deref_mut(&mut self) -> &mut Geometry {
        &mut self.0
    }
}

impl Drop for SharedMut<'_> {
    fn drop(&mut self) {
        // The geometry may have been replaced wholesale, so its own revision is not enough.
        self.0.meta_mut().touch();
    }
}

/// Marker for the kind of a [`Collection`].
pub trait CollectionKind: Debug + Clone + Copy + 'static {
    const TYPE: GeometryType;
}

#[derive(Debug, Clone, Copy)]
pub struct MultiPointKind;

#[derive(Debug, Clone, Copy)]
pub struct MultiLineStringKind;

#[derive(Debug, Clone, Copy)]
pub struct MultiPolygonKind;

#[derive(Debug, Clone, Copy)]
pub struct GeometryCollectionKind;

impl CollectionKind for MultiPointKind {
    const TYPE: GeometryType = GeometryType::MultiPoint;
}

impl CollectionKind for MultiLineStringKind {
    const TYPE: GeometryType = GeometryType::MultiLineString;
}

impl CollectionKind for MultiPolygonKind {
    const TYPE: GeometryType = GeometryType::MultiPolygon;
}

impl CollectionKind for GeometryCollectionKind {
    const TYPE: GeometryType = GeometryType::GeometryCollection;
}

pub type MultiPoint = Collection<MultiPointKind>;
pub type MultiLineString = Collection<MultiLineStringKind>;
pub type MultiPolygon = Collection<MultiPolygonKind>;
pub type GeometryCollection = Collection<GeometryCollectionKind>;

/// An ordered list of member geometries.
///
/// Homogeneous kinds only accept members of their element type; a [`GeometryCollection`]
/// accepts any geometry. All members share the dimensions of the collection and carry no
/// SRID of their own.
///
/// Cloning is shallow: the clone holds the same member handles. Use
/// [`deep_copy`](Self::deep_copy) for an independent copy.
#[derive(Debug)]
pub struct Collection<K: CollectionKind> {
    pub(crate) meta: Meta,
    members: Lazy<Vec<Shared>>,
    kind: PhantomData<K>,
}

impl<K: CollectionKind> Collection<K> {
    /// Build a collection from owned members.
    pub fn try_new(members: Vec<Geometry>, srid: Option<u32>) -> Result<Self> {
        Self::try_from_shared(members.into_iter().map(Geometry::into_shared).collect(), srid)
    }

    /// Build a collection around existing member handles.
    ///
    /// A member's SRID must be absent or equal to `srid`; it is cleared once accepted.
    pub fn try_from_shared(members: Vec<Shared>, srid: Option<u32>) -> Result<Self> {
        for member in &members {
            let member = member.borrow();
            check_kind::<K>(&member)?;
            if let Some(member_srid) = member.srid() {
                if Some(member_srid) != srid {
                    return Err(PgGeoError::Srid(format!(
                        "Member SRID {member_srid} does not match collection SRID {srid:?}"
                    )));
                }
            }
        }
        let dim = common_dimension(
            members.iter().map(|member| member.borrow().dimension()),
            Dimension::XY,
            K::TYPE.name(),
        )?;
        members.iter().for_each(clear_member_srid);
        Ok(Self {
            meta: Meta::new(srid, dim),
            members: Lazy::new(members),
            kind: PhantomData,
        })
    }

    /// A collection without members.
    pub fn empty(dim: Dimension, srid: Option<u32>) -> Self {
        Self {
            meta: Meta::new(srid, dim),
            members: Lazy::new(vec![]),
            kind: PhantomData,
        }
    }

    pub(crate) fn from_raw(raw: RawBody, dim: Dimension, srid: Option<u32>) -> Self {
        Self {
            meta: Meta::new(srid, dim),
            members: Lazy::pending(raw),
            kind: PhantomData,
        }
    }

    pub(crate) fn decoded(members: Vec<Shared>, dim: Dimension) -> Self {
        Self {
            meta: Meta::decoded(dim),
            members: Lazy::new(members),
            kind: PhantomData,
        }
    }

    /// The member handles, decoded on first access.
    pub fn members(&self) -> &[Shared] {
        let dim = self.meta.dim;
        self.members
            .get(|raw| read_collection_body(&mut WkbReader::at(raw), K::TYPE, dim))
    }

    fn members_mut(&mut self) -> &mut Vec<Shared> {
        let dim = self.meta.dim;
        self.meta.touch();
        self.members
            .get_mut(|raw| read_collection_body(&mut WkbReader::at(raw), K::TYPE, dim))
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.members.is_pending()
    }

    pub fn len(&self) -> usize {
        self.members().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members().is_empty()
    }

    /// A handle to the member at `index`.
    pub fn get(&self, index: usize) -> Option<Shared> {
        self.members().get(index).cloned()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shared> {
        self.members().iter()
    }

    /// Replace the member at `index`.
    ///
    /// The member must be of an accepted type, carry no other SRID, and share the dimensions
    /// of the collection unless it replaces the only member.
    pub fn set(&mut self, index: usize, member: Shared) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(PgGeoError::Collection(format!(
                "Index {index} out of range for {len} members"
            )));
        }
        let dim = self.check_member(&member.borrow(), len == 1)?;
        clear_member_srid(&member);
        self.members_mut()[index] = member;
        self.meta.dim = dim;
        Ok(())
    }

    /// Append a member, under the same rules as [`set`](Self::set).
    pub fn push(&mut self, member: Shared) -> Result<()> {
        let dim = self.check_member(&member.borrow(), self.is_empty())?;
        clear_member_srid(&member);
        self.members_mut().push(member);
        self.meta.dim = dim;
        Ok(())
    }

    /// Append several members, all or none.
    pub(crate) fn extend_checked(&mut self, members: Vec<Shared>) -> Result<()> {
        let mut dim = self.meta.dim;
        let mut adopt = self.is_empty();
        for member in &members {
            let member = member.borrow();
            check_kind::<K>(&member).map_err(|_| {
                PgGeoError::Collection(format!(
                    "Cannot add {} to {}",
                    member.geometry_type().name(),
                    K::TYPE.name()
                ))
            })?;
            if adopt {
                dim = member.dimension();
                adopt = false;
            } else if member.dimension() != dim {
                return Err(PgGeoError::Dimensionality(format!(
                    "Cannot add a {} member to a {dim} {}",
                    member.dimension(),
                    K::TYPE.name()
                )));
            }
        }
        members.iter().for_each(clear_member_srid);
        self.members_mut().extend(members);
        self.meta.dim = dim;
        Ok(())
    }

    /// Validate a member for `set` or `push`, returning the resulting dimension.
    fn check_member(&self, member: &Geometry, adopt: bool) -> Result<Dimension> {
        if check_kind::<K>(member).is_err() {
            return Err(PgGeoError::Collection(format!(
                "Cannot assign {} to {}",
                member.geometry_type().name(),
                K::TYPE.name()
            )));
        }
        if let Some(member_srid) = member.srid() {
            if Some(member_srid) != self.meta.srid {
                return Err(PgGeoError::Collection(format!(
                    "Member SRID {member_srid} does not match collection SRID {:?}",
                    self.meta.srid
                )));
            }
        }
        if adopt {
            Ok(member.dimension())
        } else if member.dimension() != self.meta.dim {
            Err(PgGeoError::Dimensionality(format!(
                "Cannot assign a {} member to a {} {}",
                member.dimension(),
                self.meta.dim,
                K::TYPE.name()
            )))
        } else {
            Ok(self.meta.dim)
        }
    }

    pub fn srid(&self) -> Option<u32> {
        self.meta.srid
    }

    pub fn set_srid(&mut self, srid: Option<u32>) {
        self.members_mut();
        self.meta.srid = srid;
    }

    pub fn dimension(&self) -> Dimension {
        self.meta.dim
    }

    /// Add or drop Z on the collection and every member.
    pub fn set_dimz(&mut self, dimz: bool) {
        for member in self.members_mut().iter() {
            member.borrow_mut().set_dimz(dimz);
        }
        self.meta.dim = self.meta.dim.with_z(dimz);
    }

    /// Add or drop M on the collection and every member.
    pub fn set_dimm(&mut self, dimm: bool) {
        for member in self.members_mut().iter() {
            member.borrow_mut().set_dimm(dimm);
        }
        self.meta.dim = self.meta.dim.with_m(dimm);
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::union_all(self.iter().map(|member| member.borrow().bounds()))
    }

    /// An independent copy: every member is copied recursively.
    pub fn deep_copy(&self) -> Self {
        let members = self
            .iter()
            .map(|member| member.borrow().deep_copy().into_shared())
            .collect();
        Self {
            meta: self.meta.clone(),
            members: Lazy::new(members),
            kind: PhantomData,
        }
    }

    /// The highest revision in this subtree.
    pub(crate) fn stamp(&self) -> u64 {
        if self.is_pending() {
            return self.meta.revision();
        }
        self.iter()
            .map(|member| member.borrow().stamp())
            .fold(self.meta.revision(), u64::max)
    }
}

fn check_kind<K: CollectionKind>(member: &Geometry) -> Result<()> {
    match K::TYPE.member() {
        Some(expected) if expected != member.geometry_type() => Err(PgGeoError::Collection(
            format!(
                "{} only accepts {} members, got {}",
                K::TYPE.name(),
                expected.name(),
                member.geometry_type().name()
            ),
        )),
        _ => Ok(()),
    }
}

fn clear_member_srid(member: &Shared) {
    let mut member = member.borrow_mut();
    if member.srid().is_some() {
        let meta = member.meta_mut();
        meta.srid = None;
        meta.touch();
    }
}

impl<K: CollectionKind> Clone for Collection<K> {
    fn clone(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            members: Lazy::new(self.members().to_vec()),
            kind: PhantomData,
        }
    }
}

impl<K: CollectionKind> PartialEq for Collection<K> {
    fn eq(&self, other: &Self) -> bool {
        self.meta.srid == other.meta.srid
            && self.meta.dim == other.meta.dim
            && self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(left, right)| *left.borrow() == *right.borrow())
    }
}

impl<K: CollectionKind> Index<usize> for Collection<K> {
    type Output = Shared;

    fn index(&self, index: usize) -> &Self::Output {
        &self.members()[index]
    }
}

impl<'a, K: CollectionKind> IntoIterator for &'a Collection<K> {
    type Item = &'a Shared;
    type IntoIter = std::slice::Iter<'a, Shared>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
