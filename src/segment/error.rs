//! Errors raised while decoding inbound segments.

use thiserror::Error;

use super::SegmentKind;

/// Reasons a raw segment could not be decoded.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SegmentError {
    /// The segment carried no bytes at all.
    #[error("empty segment")]
    Empty,
    /// The tag byte does not name a known segment kind.
    #[error("unknown segment kind {0}")]
    UnknownKind(u8),
    /// The segment ended before its fixed header fields.
    #[error("truncated {kind} segment: needed {needed} bytes, found {available}")]
    Truncated {
        /// Kind announced by the tag byte.
        kind: SegmentKind,
        /// Header length required by that kind.
        needed: usize,
        /// Bytes actually present.
        available: usize,
    },
}
