//! Defines [`PgGeoError`], representing all errors returned by this crate.

use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PgGeoError {
    /// Malformed, truncated or unsupported (E)WKB input.
    #[error("WKB error: {0}")]
    Wkb(String),

    /// WKT text that does not follow the grammar. `position` is 1-based.
    #[error("WKT error at position {position}: {message}")]
    Wkt { position: usize, message: String },

    /// Coordinates or members that do not agree on their Z/M dimensions.
    #[error("Dimensionality error: {0}")]
    Dimensionality(String),

    /// A member carries an SRID that differs from its container.
    #[error("SRID error: {0}")]
    Srid(String),

    /// Composition or indexed assignment that the target collection cannot accept.
    #[error("Collection error: {0}")]
    Collection(String),

    /// Coordinate values that are missing or not numeric.
    #[error("Coordinate error: {0}")]
    Coordinate(String),

    /// A GeoJSON object that cannot be turned into a geometry.
    #[error("GeoJSON error: {0}")]
    GeoJson(String),

    /// The optional geometry engine is not compiled in.
    #[error("Dependency error: {0} is not available")]
    Dependency(String),

    /// [std::io::Error]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),

    /// [hex::FromHexError]
    #[error(transparent)]
    Hex(#[from] hex::FromHexError),

    /// [geozero::error::GeozeroError]
    #[cfg(feature = "geozero")]
    #[error(transparent)]
    GeozeroError(#[from] geozero::error::GeozeroError),
}

impl PgGeoError {
    pub(crate) fn wkt(position: usize, message: impl Into<String>) -> Self {
        Self::Wkt {
            position,
            message: message.into(),
        }
    }
}

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, PgGeoError>;
