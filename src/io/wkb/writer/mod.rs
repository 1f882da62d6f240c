//! Encoding of geometries as little-endian (E)WKB.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{PgGeoError, Result};

pub use collection::{collection_wkb_size, write_collection_as_wkb};
pub use geometry::{geometry_wkb_size, write_geometry_as_wkb};
pub use linestring::{line_string_wkb_size, write_line_string_as_wkb};
pub use point::{point_wkb_size, write_point_as_wkb};
pub use polygon::{polygon_wkb_size, write_polygon_as_wkb};

mod collection;
mod geometry;
mod linestring;
mod point;
mod polygon;

/// Write an element count as a little-endian u32.
fn write_count<W: Write>(writer: &mut W, count: usize) -> Result<()> {
    let count = u32::try_from(count)
        .map_err(|_| PgGeoError::Wkb(format!("{count} elements do not fit in a WKB count")))?;
    writer.write_u32::<LittleEndian>(count)?;
    Ok(())
}
