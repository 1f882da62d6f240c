use std::io::Write;

use crate::error::Result;
use crate::geometry::{Collection, CollectionKind, Dimension};
use crate::io::wkb::common::write_header;
use crate::io::wkb::writer::geometry::{geometry_wkb_size, write_geometry_as_wkb};
use crate::io::wkb::writer::write_count;

/// The byte length of a WKB Multi* geometry or GeometryCollection without SRID
pub fn collection_wkb_size<K: CollectionKind>(geom: &Collection<K>, dim: Dimension) -> usize {
    let mut sum = 1 + 4 + 4;

    for member in geom {
        sum += geometry_wkb_size(&member.borrow(), dim);
    }

    sum
}

/// Write a Multi* geometry or GeometryCollection to a Writer encoded as WKB
///
/// Members are written with full headers, the collection's dimensions and no SRID.
pub fn write_collection_as_wkb<K: CollectionKind, W: Write>(
    writer: &mut W,
    geom: &Collection<K>,
    dim: Dimension,
    srid: Option<u32>,
) -> Result<()> {
    write_header(writer, K::TYPE, dim, srid)?;
    write_count(writer, geom.len())?;

    for member in geom {
        write_geometry_as_wkb(writer, &member.borrow(), dim, None)?;
    }

    Ok(())
}
