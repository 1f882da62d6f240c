use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{PgGeoError, Result};
use crate::geometry::{Dimension, GeometryType};

/// Bits of the header word holding the geometry type code.
pub(crate) const TYPE_MASK: u32 = 0x1fff_ffff;
pub(crate) const Z_FLAG: u32 = 0x8000_0000;
pub(crate) const M_FLAG: u32 = 0x4000_0000;
pub(crate) const SRID_FLAG: u32 = 0x2000_0000;

/// Endianness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    BigEndian,
    LittleEndian,
}

impl TryFrom<u8> for Endianness {
    type Error = PgGeoError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Endianness::BigEndian),
            1 => Ok(Endianness::LittleEndian),
            other => Err(PgGeoError::Wkb(format!("Unexpected byte order: {other}"))),
        }
    }
}

impl From<Endianness> for u8 {
    fn from(value: Endianness) -> Self {
        use Endianness::*;
        match value {
            BigEndian => 0,
            LittleEndian => 1,
        }
    }
}

/// The decoded byte-order marker, type word and optional SRID of one geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WkbHeader {
    pub byte_order: Endianness,
    pub geometry_type: GeometryType,
    pub dim: Dimension,
    pub srid: Option<u32>,
}

impl WkbHeader {
    /// Split a header word into its type code and flags.
    pub(crate) fn from_word(byte_order: Endianness, word: u32) -> Result<(Self, bool)> {
        let code = word & TYPE_MASK;
        let geometry_type = GeometryType::try_from(code)
            .map_err(|_| PgGeoError::Wkb(format!("Unsupported geometry type code: {code}")))?;
        let dim = Dimension::from_flags(word & Z_FLAG != 0, word & M_FLAG != 0);
        let header = Self {
            byte_order,
            geometry_type,
            dim,
            srid: None,
        };
        Ok((header, word & SRID_FLAG != 0))
    }
}

/// Compose the header word for a geometry.
pub(crate) fn header_word(geometry_type: GeometryType, dim: Dimension, has_srid: bool) -> u32 {
    let mut word: u32 = geometry_type.into();
    if dim.has_z() {
        word |= Z_FLAG;
    }
    if dim.has_m() {
        word |= M_FLAG;
    }
    if has_srid {
        word |= SRID_FLAG;
    }
    word
}

/// Write a little-endian geometry header, with the SRID word when `srid` is given.
pub(crate) fn write_header<W: Write>(
    writer: &mut W,
    geometry_type: GeometryType,
    dim: Dimension,
    srid: Option<u32>,
) -> Result<()> {
    writer.write_u8(Endianness::LittleEndian.into())?;
    writer.write_u32::<LittleEndian>(header_word(geometry_type, dim, srid.is_some()))?;
    if let Some(srid) = srid {
        writer.write_u32::<LittleEndian>(srid)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn header_flags() {
        assert_eq!(
            header_word(GeometryType::Point, Dimension::XYZM, true),
            0xe000_0001
        );
        assert_eq!(
            header_word(GeometryType::MultiPoint, Dimension::XY, true),
            0x2000_0004
        );

        let (header, has_srid) =
            WkbHeader::from_word(Endianness::LittleEndian, 0x4000_0002).unwrap();
        assert_eq!(header.geometry_type, GeometryType::LineString);
        assert_eq!(header.dim, Dimension::XYM);
        assert!(!has_srid);
    }

    #[test]
    fn unknown_type_code() {
        assert!(matches!(
            WkbHeader::from_word(Endianness::LittleEndian, 8),
            Err(PgGeoError::Wkb(_))
        ));
        assert!(Endianness::try_from(2).is_err());
    }

    #[test]
    fn writes_little_endian() {
        let mut buf = Vec::new();
        write_header(&mut buf, GeometryType::Point, Dimension::XY, Some(4326)).unwrap();
        assert_eq!(buf, [1, 1, 0, 0, 0x20, 0xe6, 0x10, 0, 0]);
    }
}
