//! Inbound state machine that stitches segments back into messages.
//!
//! [`Reassembler`] mirrors the outbound [`Chunker`](crate::segment::Chunker).
//! It drives one [`PeerState`] per call: a `Start` sizes the peer's buffer,
//! `Part` and `Finish` append to it, and a `Finish` yields the completed
//! message. Every failure degrades to dropping the message in flight; nothing
//! here is fatal to the peer or the instance.

use std::borrow::Cow;

use thiserror::Error;

use crate::{
    peer::{BufferOverflow, PeerState},
    segment::SegmentError,
};

/// Reasons an inbound message was dropped.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReassemblyError {
    /// The segment could not be decoded.
    #[error("malformed segment: {0}")]
    Malformed(#[from] SegmentError),
    /// A `Start` declared more bytes than this instance accepts.
    #[error("declared message size {declared} exceeds limit {limit}")]
    DeclaredTooLarge {
        /// Size announced by the `Start`.
        declared: u64,
        /// Local receiving ceiling.
        limit: u64,
    },
    /// The assembled message exceeds this instance's receiving ceiling.
    #[error("assembled message of {attempted} bytes exceeds limit {limit}")]
    TooLarge {
        /// Length of the completed message.
        attempted: usize,
        /// Local receiving ceiling.
        limit: u64,
    },
    /// A chunk would have overrun the size declared by the `Start`.
    #[error("chunk overruns reassembly buffer: {attempted} bytes > {capacity} bytes")]
    Overflow {
        /// Size declared by the `Start`, or zero without one.
        capacity: usize,
        /// Length the append would have produced.
        attempted: usize,
    },
    /// The reassembly buffer could not be allocated.
    #[error("failed to allocate {requested} bytes for reassembly")]
    Allocation {
        /// Size announced by the `Start`.
        requested: u64,
    },
    /// The `Finish` closed a message that was already being dropped.
    #[error("message was dropped before completion")]
    Dropped,
}

impl ReassemblyError {
    /// Short label used for logs and the dropped-message counter.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed",
            Self::DeclaredTooLarge { .. } | Self::TooLarge { .. } => "too_large",
            Self::Overflow { .. } => "overflow",
            Self::Allocation { .. } => "allocation",
            Self::Dropped => "dropped",
        }
    }
}

impl From<BufferOverflow> for ReassemblyError {
    fn from(overflow: BufferOverflow) -> Self {
        Self::Overflow {
            capacity: overflow.capacity,
            attempted: overflow.attempted,
        }
    }
}

/// Applies inbound segments to peer state under a receiving ceiling.
#[derive(Clone, Copy, Debug)]
pub struct Reassembler {
    max_message_size: u64,
}

impl Reassembler {
    /// Create a reassembler that refuses messages above `max_message_size` bytes.
    #[must_use]
    pub const fn new(max_message_size: u64) -> Self { Self { max_message_size } }

    /// Receiving ceiling in bytes.
    #[must_use]
    pub const fn max_message_size(&self) -> u64 { self.max_message_size }

    /// Begin a new message, discarding anything still in flight.
    ///
    /// The peer's existing allocation is reused when it already holds the
    /// declared size.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError`] when the declared size is over the ceiling,
    /// the buffer cannot be allocated, or the first chunk overruns the
    /// declared size. The rest of the message is then dropped.
    pub fn accept_start(
        &self,
        peer: &mut PeerState,
        total_size: u64,
        chunk: &[u8],
    ) -> Result<(), ReassemblyError> {
        peer.drop_current_message = false;

        if total_size > self.max_message_size {
            peer.abandon_message();
            return Err(ReassemblyError::DeclaredTooLarge {
                declared: total_size,
                limit: self.max_message_size,
            });
        }

        let allocated = usize::try_from(total_size)
            .ok()
            .is_some_and(|total| peer.buffer.reset_to(total).is_ok());
        if !allocated {
            peer.abandon_message();
            return Err(ReassemblyError::Allocation {
                requested: total_size,
            });
        }

        Self::append(peer, chunk)
    }

    /// Continue the message in flight.
    ///
    /// Parts of a message that is being dropped are discarded silently. A
    /// `Part` with no `Start` before it overflows the unsized buffer, so the
    /// `Finish` that follows is dropped rather than delivered as a whole
    /// message holding only the tail.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError::Overflow`] when the chunk overruns the
    /// declared size; the rest of the message is then dropped.
    pub fn accept_part(&self, peer: &mut PeerState, chunk: &[u8]) -> Result<(), ReassemblyError> {
        if peer.drop_current_message {
            peer.buffer.release();
            return Ok(());
        }
        Self::append(peer, chunk)
    }

    /// Complete the message in flight.
    ///
    /// Without a preceding `Start` the `Finish` payload is the whole message
    /// and is returned borrowed. The peer is ready for a new message
    /// afterwards whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ReassemblyError`] when the message was already being
    /// dropped, the final chunk overruns the declared size, or the assembled
    /// message exceeds the ceiling.
    pub fn accept_finish<'a>(
        &self,
        peer: &mut PeerState,
        chunk: &'a [u8],
    ) -> Result<Cow<'a, [u8]>, ReassemblyError> {
        if peer.drop_current_message {
            peer.reset_message();
            return Err(ReassemblyError::Dropped);
        }

        let message = if peer.buffer.capacity() == 0 {
            Cow::Borrowed(chunk)
        } else {
            let appended = peer.buffer.append(chunk);
            let buffered = peer.buffer.take();
            appended?;
            Cow::Owned(buffered)
        };
        peer.reset_message();

        let within_limit =
            u64::try_from(message.len()).is_ok_and(|len| len <= self.max_message_size);
        if !within_limit {
            return Err(ReassemblyError::TooLarge {
                attempted: message.len(),
                limit: self.max_message_size,
            });
        }
        Ok(message)
    }

    /// Clear the peer's buffer after a segment failed to decode.
    ///
    /// A message that was in flight is dropped, so a later `Finish` cannot
    /// complete it with bytes missing. Clearing the buffer alone would let
    /// that `Finish` take the single-segment path and deliver its own chunk
    /// as a truncated message.
    pub fn reject_malformed(&self, peer: &mut PeerState) {
        if peer.in_flight() {
            peer.abandon_message();
        } else {
            peer.reset_message();
        }
    }

    fn append(peer: &mut PeerState, chunk: &[u8]) -> Result<(), ReassemblyError> {
        peer.buffer.append(chunk).map_err(|overflow| {
            peer.abandon_message();
            ReassemblyError::from(overflow)
        })
    }
}
