//! Typed view over a single wire segment.
//!
//! A segment is laid out as `[tag][fixed fields][payload]`. Decoding never
//! copies payload bytes: the returned [`Segment`] borrows them from the input.

use super::{SegmentError, SegmentKind};
use crate::{
    ReceiptId,
    byte_order::{split_network_u64, write_network_u64},
};

/// A decoded segment borrowing its payload from the raw bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Largest message the sender is willing to receive.
    Negotiate {
        /// Advertised receiving ceiling in bytes.
        max_receiving_size: u64,
    },
    /// First chunk of a multi-segment message.
    Start {
        /// Size of the whole message in bytes.
        total_size: u64,
        /// Leading message bytes.
        chunk: &'a [u8],
    },
    /// Intermediate chunk.
    Part {
        /// Message bytes carried by this segment.
        chunk: &'a [u8],
    },
    /// Final chunk, or the whole message when it fits one segment.
    Finish {
        /// Identifier to echo back on acceptance.
        receipt: ReceiptId,
        /// Trailing message bytes.
        chunk: &'a [u8],
    },
    /// Acknowledgement of a fully accepted message.
    Received {
        /// Identifier taken from the acknowledged message's `Finish`.
        receipt: ReceiptId,
    },
}

impl<'a> Segment<'a> {
    /// Decode a raw segment.
    ///
    /// Bytes after the fixed fields of `Negotiate` and `Received` segments are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError`] when the input is empty, the tag is unknown,
    /// or the segment ends before its fixed fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use toxext_messages::segment::Segment;
    ///
    /// let segment = Segment::decode(&[2, 0xaa, 0xbb]).expect("valid part");
    /// assert_eq!(segment, Segment::Part { chunk: &[0xaa, 0xbb] });
    /// ```
    pub fn decode(bytes: &'a [u8]) -> Result<Self, SegmentError> {
        let (&tag, rest) = bytes.split_first().ok_or(SegmentError::Empty)?;
        let kind = SegmentKind::try_from(tag).map_err(SegmentError::UnknownKind)?;

        let field = || {
            split_network_u64(rest).ok_or(SegmentError::Truncated {
                kind,
                needed: kind.header_len(),
                available: bytes.len(),
            })
        };

        Ok(match kind {
            SegmentKind::Part => Self::Part { chunk: rest },
            SegmentKind::Negotiate => Self::Negotiate {
                max_receiving_size: field()?.0,
            },
            SegmentKind::Start => {
                let (total_size, chunk) = field()?;
                Self::Start { total_size, chunk }
            }
            SegmentKind::Finish => {
                let (receipt, chunk) = field()?;
                Self::Finish {
                    receipt: ReceiptId::new(receipt),
                    chunk,
                }
            }
            SegmentKind::Received => Self::Received {
                receipt: ReceiptId::new(field()?.0),
            },
        })
    }

    /// Kind of this segment.
    #[must_use]
    pub const fn kind(&self) -> SegmentKind {
        match self {
            Self::Negotiate { .. } => SegmentKind::Negotiate,
            Self::Start { .. } => SegmentKind::Start,
            Self::Part { .. } => SegmentKind::Part,
            Self::Finish { .. } => SegmentKind::Finish,
            Self::Received { .. } => SegmentKind::Received,
        }
    }

    /// Message bytes carried by the segment; empty for control segments.
    #[must_use]
    pub const fn chunk(&self) -> &'a [u8] {
        match self {
            Self::Start { chunk, .. } | Self::Part { chunk } | Self::Finish { chunk, .. } => chunk,
            Self::Negotiate { .. } | Self::Received { .. } => &[],
        }
    }

    /// Number of bytes [`encode_into`](Self::encode_into) appends.
    #[must_use]
    pub const fn encoded_len(&self) -> usize { self.kind().header_len() + self.chunk().len() }

    /// Append the wire form of the segment to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.reserve(self.encoded_len());
        out.push(self.kind().tag());
        match *self {
            Self::Negotiate { max_receiving_size } => {
                out.extend_from_slice(&write_network_u64(max_receiving_size));
            }
            Self::Start { total_size, chunk } => {
                out.extend_from_slice(&write_network_u64(total_size));
                out.extend_from_slice(chunk);
            }
            Self::Part { chunk } => out.extend_from_slice(chunk),
            Self::Finish { receipt, chunk } => {
                out.extend_from_slice(&write_network_u64(receipt.get()));
                out.extend_from_slice(chunk);
            }
            Self::Received { receipt } => {
                out.extend_from_slice(&write_network_u64(receipt.get()));
            }
        }
    }

    /// Encode the segment into a fresh buffer.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out);
        out
    }
}
