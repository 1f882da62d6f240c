//! Deferred decoding of geometry bodies read from (E)WKB, and the memo of encoded bytes.
//!
//! A geometry parsed from WKB keeps the buffer and the offset of its body, and only decodes
//! coordinates or members the first time they are read. Every node carries a revision number
//! drawn from a process-wide counter; a composite's stamp is the highest revision in its
//! subtree, so a member mutated through a shared handle invalidates the encodings memoized by
//! every container that holds it.

use std::cell::{OnceCell, RefCell};
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;

use crate::error::Result;
use crate::geometry::Dimension;
use crate::io::wkb::common::Endianness;

static REVISION: AtomicU64 = AtomicU64::new(1);

/// A revision greater than every revision handed out before.
pub(crate) fn next_revision() -> u64 {
    REVISION.fetch_add(1, Ordering::Relaxed)
}

/// A geometry body that has not been decoded yet.
#[derive(Debug, Clone)]
pub(crate) struct RawBody {
    pub(crate) buf: Bytes,
    /// Offset of the first byte after the geometry header.
    pub(crate) offset: usize,
    pub(crate) byte_order: Endianness,
}

/// A value that is either decoded or still sitting in a WKB buffer.
pub(crate) enum Lazy<T> {
    Decoded(T),
    Pending { raw: RawBody, value: OnceCell<T> },
}

impl<T> Lazy<T> {
    pub(crate) fn new(value: T) -> Self {
        Lazy::Decoded(value)
    }

    pub(crate) fn pending(raw: RawBody) -> Self {
        Lazy::Pending {
            raw,
            value: OnceCell::new(),
        }
    }

    /// Whether the body still has to be decoded.
    pub(crate) fn is_pending(&self) -> bool {
        match self {
            Lazy::Decoded(_) => false,
            Lazy::Pending { value, .. } => value.get().is_none(),
        }
    }

    /// The decoded value, decoding it on first access.
    pub(crate) fn get(&self, decode: impl FnOnce(&RawBody) -> Result<T>) -> &T {
        match self {
            Lazy::Decoded(value) => value,
            Lazy::Pending { raw, value } => value.get_or_init(|| realize(raw, decode)),
        }
    }

    /// Mutable access to the decoded value. The raw buffer is released.
    pub(crate) fn get_mut(&mut self, decode: impl FnOnce(&RawBody) -> Result<T>) -> &mut T {
        if let Lazy::Pending { raw, value } = self {
            let decoded = match value.take() {
                Some(decoded) => decoded,
                None => realize(raw, decode),
            };
            *self = Lazy::Decoded(decoded);
        }
        match self {
            Lazy::Decoded(value) => value,
            Lazy::Pending { .. } => unreachable!("pending value replaced above"),
        }
    }
}

fn realize<T>(raw: &RawBody, decode: impl FnOnce(&RawBody) -> Result<T>) -> T {
    tracing::trace!(offset = raw.offset, len = raw.buf.len(), "decoding deferred WKB body");
    // The whole buffer was validated when the geometry was read, so decoding cannot fail.
    decode(raw).unwrap_or_else(|err| panic!("validated WKB failed to decode: {err}"))
}

impl<T: Clone> Clone for Lazy<T> {
    fn clone(&self) -> Self {
        match self {
            Lazy::Decoded(value) => Lazy::Decoded(value.clone()),
            Lazy::Pending { raw, value } => match value.get() {
                Some(value) => Lazy::Decoded(value.clone()),
                None => Lazy::pending(raw.clone()),
            },
        }
    }
}

impl<T: Debug> Debug for Lazy<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lazy::Decoded(value) => value.fmt(f),
            Lazy::Pending { raw, value } => match value.get() {
                Some(value) => value.fmt(f),
                None => write!(f, "<pending at byte {}>", raw.offset),
            },
        }
    }
}

/// Encoded WKB bytes, remembered per `include_srid` flag.
#[derive(Debug, Default)]
pub(crate) struct WkbMemo {
    slots: RefCell<[Option<Encoded>; 2]>,
}

#[derive(Debug)]
struct Encoded {
    stamp: u64,
    bytes: Bytes,
}

impl WkbMemo {
    /// Return the memoized encoding if it was produced at `stamp`, otherwise encode again.
    pub(crate) fn get_or_encode(
        &self,
        include_srid: bool,
        stamp: u64,
        encode: impl FnOnce() -> Result<Bytes>,
    ) -> Result<Bytes> {
        let slot = usize::from(include_srid);
        if let Some(cached) = &self.slots.borrow()[slot] {
            if cached.stamp == stamp {
                return Ok(cached.bytes.clone());
            }
        }
        let bytes = encode()?;
        self.slots.borrow_mut()[slot] = Some(Encoded {
            stamp,
            bytes: bytes.clone(),
        });
        Ok(bytes)
    }

    pub(crate) fn clear(&mut self) {
        *self.slots.get_mut() = Default::default();
    }

    #[cfg(test)]
    pub(crate) fn is_cached(&self, include_srid: bool) -> bool {
        self.slots.borrow()[usize::from(include_srid)].is_some()
    }
}

impl Clone for WkbMemo {
    fn clone(&self) -> Self {
        Self::default()
    }
}

/// State shared by every geometry node: SRID, dimensions, revision and encoding memo.
#[derive(Debug, Clone)]
pub(crate) struct Meta {
    pub(crate) srid: Option<u32>,
    pub(crate) dim: Dimension,
    revision: u64,
    memo: WkbMemo,
}

impl Meta {
    pub(crate) fn new(srid: Option<u32>, dim: Dimension) -> Self {
        Self {
            srid,
            dim,
            revision: next_revision(),
            memo: WkbMemo::default(),
        }
    }

    /// Metadata for a member decoded out of its container's buffer.
    ///
    /// It starts at revision zero so that decoding does not change the container's stamp.
    pub(crate) fn decoded(dim: Dimension) -> Self {
        Self {
            srid: None,
            dim,
            revision: 0,
            memo: WkbMemo::default(),
        }
    }

    /// Record a mutation: take a fresh revision and drop memoized encodings.
    pub(crate) fn touch(&mut self) {
        self.revision = next_revision();
        self.memo.clear();
    }

    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn memo(&self) -> &WkbMemo {
        &self.memo
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::PgGeoError;

    fn raw() -> RawBody {
        RawBody {
            buf: Bytes::from_static(&[1, 2, 3]),
            offset: 1,
            byte_order: Endianness::LittleEndian,
        }
    }

    #[test]
    fn decodes_once() {
        let lazy: Lazy<u8> = Lazy::pending(raw());
        assert!(lazy.is_pending());
        assert_eq!(*lazy.get(|raw| Ok(raw.buf[raw.offset])), 2);
        assert!(!lazy.is_pending());
        // A second decoder is never invoked.
        assert_eq!(*lazy.get(|_| Err(PgGeoError::Wkb("unused".into()))), 2);
    }

    #[test]
    fn get_mut_releases_buffer() {
        let mut lazy: Lazy<u8> = Lazy::pending(raw());
        *lazy.get_mut(|raw| Ok(raw.buf[raw.offset])) += 10;
        assert!(matches!(lazy, Lazy::Decoded(12)));
    }

    #[test]
    fn memo_respects_stamp() {
        let memo = WkbMemo::default();
        let first = memo
            .get_or_encode(false, 5, || Ok(Bytes::from_static(b"a")))
            .unwrap();
        let cached = memo
            .get_or_encode(false, 5, || Ok(Bytes::from_static(b"b")))
            .unwrap();
        assert_eq!(first, cached);
        assert!(!memo.is_cached(true));

        let refreshed = memo
            .get_or_encode(false, 6, || Ok(Bytes::from_static(b"c")))
            .unwrap();
        assert_eq!(refreshed, Bytes::from_static(b"c"));
    }

    #[test]
    fn touch_clears() {
        let mut meta = Meta::new(None, Dimension::XY);
        let before = meta.revision();
        meta.memo()
            .get_or_encode(true, before, || Ok(Bytes::new()))
            .unwrap();
        meta.touch();
        assert!(meta.revision() > before);
        assert!(!meta.memo().is_cached(true));
    }
}
