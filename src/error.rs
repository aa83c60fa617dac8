//! Errors surfaced synchronously to callers of the extension.
//!
//! Receive-path failures never reach callers; they are logged and counted by
//! the extension and reported through [`ReassemblyError`](crate::ReassemblyError)
//! only in diagnostics.

use bincode::error::EncodeError;
use thiserror::Error;

use crate::PeerId;

/// Errors returned by send-side operations.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// The peer has not advertised its receiving ceiling yet.
    #[error("peer {peer} has not negotiated a maximum message size")]
    NotNegotiated {
        /// Peer the operation targeted.
        peer: PeerId,
    },
    /// The message is larger than the peer accepts.
    #[error("message of {attempted} bytes exceeds the {limit} byte limit of peer {peer}")]
    MessageTooLarge {
        /// Peer the message was addressed to.
        peer: PeerId,
        /// Length of the rejected message.
        attempted: usize,
        /// Ceiling the peer advertised.
        limit: u64,
    },
    /// Serialising a typed message failed before chunking.
    #[error("failed to encode message: {0}")]
    Encode(#[from] EncodeError),
}

/// Errors returned when registering an extension with the host.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterError {
    /// The host's segment ceiling leaves no room for message bytes.
    #[error("segment size {segment_size} is below the {minimum} byte minimum")]
    SegmentTooSmall {
        /// Ceiling reported by the host.
        segment_size: usize,
        /// Smallest usable ceiling.
        minimum: usize,
    },
    /// The host refused the registration.
    #[error("host rejected registration: {0}")]
    Host(String),
}
