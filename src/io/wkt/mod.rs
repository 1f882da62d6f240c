//! Reading and writing (E)WKT.

use serde::{Deserialize, Serialize};

mod reader;
mod writer;

/// Options for writing WKT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WktOptions {
    /// Digits after the decimal point, before trailing zeros are stripped. `None` writes the
    /// shortest text that reads back as the same number.
    pub precision: Option<usize>,

    /// Whether to prefix the text with `SRID=<srid>;` when the geometry has an SRID.
    pub include_srid: bool,
}

impl WktOptions {
    pub fn new(precision: Option<usize>, include_srid: bool) -> Self {
        Self {
            precision,
            include_srid,
        }
    }
}

impl Default for WktOptions {
    fn default() -> Self {
        Self::new(None, false)
    }
}
