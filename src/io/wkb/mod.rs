//! Reading and writing PostGIS (E)WKB.
//!
//! EWKB extends ISO WKB with flag bits in the type word: `0x80000000` for Z, `0x40000000` for
//! M and `0x20000000` when an SRID word follows the header. Input may use either byte order;
//! output is always little-endian.

pub(crate) mod common;
pub(crate) mod reader;
pub(crate) mod writer;

pub use common::{Endianness, WkbHeader};
pub use writer::{geometry_wkb_size, write_geometry_as_wkb};
