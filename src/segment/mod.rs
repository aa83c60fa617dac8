//! Wire segment codec.
//!
//! Each segment handed to or received from the host is a one-byte kind tag,
//! the kind's fixed fields, and payload bytes. [`Segment`] decodes and encodes
//! single segments; [`Chunker`] splits an outbound message into the segment
//! sequence the remote reassembler expects.

pub mod chunker;
pub mod codec;
pub mod error;
pub mod kind;

pub use chunker::{Chunker, MIN_SEGMENT_SIZE, SegmentSize, segment_count};
pub use codec::Segment;
pub use error::SegmentError;
pub use kind::{SegmentKind, TAG_LEN};
