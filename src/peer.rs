//! Per-peer state: reassembly buffer, drop flag, and negotiated sending limit.
//!
//! [`PeerTable`] keys one [`PeerState`] by [`PeerId`]. Entries are created on
//! first contact and live until the peer is removed or the extension is
//! dropped.

use std::collections::{HashMap, TryReserveError};

use derive_more::{Display, From, Into};

/// Opaque identifier the host assigns to a remote peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("{_0}")]
pub struct PeerId(u32);

impl PeerId {
    /// Create a new identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self { Self(value) }

    /// Return the inner numeric identifier.
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }
}

/// Appending a chunk would exceed the size declared by the message's `Start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferOverflow {
    /// Bytes the buffer was sized for.
    pub capacity: usize,
    /// Bytes the append would have produced.
    pub attempted: usize,
}

/// Accumulator for the chunks of the message currently arriving from a peer.
///
/// `len() <= capacity()` holds at all times: [`append`](Self::append) refuses
/// chunks that would break it.
#[derive(Debug, Default)]
pub struct ReassemblyBuffer {
    bytes: Vec<u8>,
    capacity: usize,
}

impl ReassemblyBuffer {
    /// Prepare the buffer for a message of `total` bytes.
    ///
    /// Any previous contents are discarded; the previous allocation is reused
    /// when it is large enough.
    ///
    /// # Errors
    ///
    /// Returns [`TryReserveError`] when the allocation fails. The buffer is
    /// left empty.
    pub fn reset_to(&mut self, total: usize) -> Result<(), TryReserveError> {
        self.bytes.clear();
        self.capacity = 0;
        if let Err(err) = self.bytes.try_reserve_exact(total) {
            self.release();
            return Err(err);
        }
        self.capacity = total;
        Ok(())
    }

    /// Copy `chunk` onto the end of the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`BufferOverflow`] without writing when the chunk does not fit.
    pub fn append(&mut self, chunk: &[u8]) -> Result<(), BufferOverflow> {
        let attempted = self.bytes.len().saturating_add(chunk.len());
        if attempted > self.capacity {
            return Err(BufferOverflow {
                capacity: self.capacity,
                attempted,
            });
        }
        self.bytes.extend_from_slice(chunk);
        Ok(())
    }

    /// Drop the contents and free the allocation.
    pub fn release(&mut self) {
        self.bytes = Vec::new();
        self.capacity = 0;
    }

    /// Move the accumulated bytes out, leaving the buffer released.
    pub fn take(&mut self) -> Vec<u8> {
        self.capacity = 0;
        std::mem::take(&mut self.bytes)
    }

    /// Bytes accumulated so far.
    #[must_use]
    pub fn len(&self) -> usize { self.bytes.len() }

    /// Whether no bytes have been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.bytes.is_empty() }

    /// Bytes currently allocated, which may exceed [`capacity`](Self::capacity)
    /// after a restart reused a larger buffer.
    #[must_use]
    pub fn allocated(&self) -> usize { self.bytes.capacity() }

    /// Size declared for the message in progress.
    #[must_use]
    pub fn capacity(&self) -> usize { self.capacity }

    /// Borrow the accumulated bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] { &self.bytes }
}

/// Everything tracked for one remote peer.
#[derive(Debug, Default)]
pub struct PeerState {
    /// Chunks of the message in flight.
    pub buffer: ReassemblyBuffer,
    /// Discard segments of the in-flight message until the next `Start` or `Finish`.
    pub drop_current_message: bool,
    /// Largest message the peer accepts; `None` until its `Negotiate` arrives.
    pub max_sending_size: Option<u64>,
}

impl PeerState {
    /// Whether a multi-segment message is partially received or being dropped.
    #[must_use]
    pub fn in_flight(&self) -> bool { self.drop_current_message || self.buffer.capacity() > 0 }

    /// Release the buffer and discard the rest of the in-flight message.
    pub fn abandon_message(&mut self) {
        self.buffer.release();
        self.drop_current_message = true;
    }

    /// Release the buffer and get ready for the next message.
    pub fn reset_message(&mut self) {
        self.buffer.release();
        self.drop_current_message = false;
    }
}

/// Map of peer state keyed by [`PeerId`].
#[derive(Debug, Default)]
pub struct PeerTable {
    peers: HashMap<PeerId, PeerState>,
}

impl PeerTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Borrow the state for `peer`, if known.
    #[must_use]
    pub fn get(&self, peer: PeerId) -> Option<&PeerState> { self.peers.get(&peer) }

    /// Mutably borrow the state for `peer`, if known.
    pub fn get_mut(&mut self, peer: PeerId) -> Option<&mut PeerState> { self.peers.get_mut(&peer) }

    /// Borrow the state for `peer`, inserting a fresh entry on first contact.
    pub fn get_or_insert(&mut self, peer: PeerId) -> &mut PeerState {
        self.peers.entry(peer).or_default()
    }

    /// Forget `peer`, releasing its buffer. Returns whether it was known.
    pub fn remove(&mut self, peer: PeerId) -> bool { self.peers.remove(&peer).is_some() }

    /// Number of known peers.
    #[must_use]
    pub fn len(&self) -> usize { self.peers.len() }

    /// Whether no peer is known.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.peers.is_empty() }
}
