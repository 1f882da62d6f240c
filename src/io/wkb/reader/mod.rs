//! Decoding of (E)WKB, in either byte order.

use std::io::Cursor;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::error::{PgGeoError, Result};
use crate::io::wkb::common::{Endianness, WkbHeader};
use crate::lazy::RawBody;

pub(crate) use collection::read_collection_body;
pub(crate) use linestring::read_line_string_body;
pub(crate) use point::read_coord;
pub(crate) use polygon::read_polygon_body;

mod collection;
mod geometry;
mod linestring;
mod point;
mod polygon;
mod validate;

/// A cursor over a WKB buffer that reads in the byte order of the current geometry.
pub(crate) struct WkbReader<'a> {
    cursor: Cursor<&'a [u8]>,
    byte_order: Endianness,
}

impl<'a> WkbReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(buf),
            byte_order: Endianness::LittleEndian,
        }
    }

    /// A reader positioned at the start of a deferred body.
    pub(crate) fn at(raw: &'a RawBody) -> Self {
        let mut cursor = Cursor::new(raw.buf.as_ref());
        cursor.set_position(raw.offset as u64);
        Self {
            cursor,
            byte_order: raw.byte_order,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    pub(crate) fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    fn truncated(&self, wanted: usize) -> PgGeoError {
        PgGeoError::Wkb(format!(
            "Unexpected end of WKB: needed {wanted} bytes at offset {}, {} left",
            self.position(),
            self.remaining()
        ))
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        if self.remaining() < 1 {
            return Err(self.truncated(1));
        }
        Ok(self.cursor.read_u8()?)
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32> {
        if self.remaining() < 4 {
            return Err(self.truncated(4));
        }
        let value = match self.byte_order {
            Endianness::BigEndian => self.cursor.read_u32::<BigEndian>()?,
            Endianness::LittleEndian => self.cursor.read_u32::<LittleEndian>()?,
        };
        Ok(value)
    }

    pub(crate) fn read_f64(&mut self) -> Result<f64> {
        if self.remaining() < 8 {
            return Err(self.truncated(8));
        }
        let value = match self.byte_order {
            Endianness::BigEndian => self.cursor.read_f64::<BigEndian>()?,
            Endianness::LittleEndian => self.cursor.read_f64::<LittleEndian>()?,
        };
        Ok(value)
    }

    /// Read an element count.
    pub(crate) fn read_count(&mut self) -> Result<usize> {
        Ok(self.read_u32()? as usize)
    }

    /// Advance past `len` bytes, failing if the buffer is shorter.
    pub(crate) fn skip(&mut self, len: usize) -> Result<()> {
        if self.remaining() < len {
            return Err(self.truncated(len));
        }
        self.cursor.set_position((self.position() + len) as u64);
        Ok(())
    }

    /// Read a byte-order marker, type word and optional SRID.
    ///
    /// The byte order of the reader switches to the one declared by the header.
    pub(crate) fn read_header(&mut self) -> Result<WkbHeader> {
        self.byte_order = Endianness::try_from(self.read_u8()?)?;
        let word = self.read_u32()?;
        let (mut header, has_srid) = WkbHeader::from_word(self.byte_order, word)?;
        if has_srid {
            header.srid = Some(self.read_u32()?);
        }
        Ok(header)
    }
}
