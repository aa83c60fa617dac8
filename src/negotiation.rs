//! Per-peer exchange of maximum acceptable message sizes.
//!
//! Negotiation is asymmetric. When the host reports that a peer runs a
//! compatible extension, this side advertises its own receiving ceiling with a
//! `Negotiate` segment. Sending to the peer unlocks only once the peer's own
//! advertisement arrives, so each direction completes independently.

use crate::{peer::PeerState, segment::Segment};

/// Outcome reported to the caller when negotiation with a peer resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Negotiation {
    /// The peer runs the extension and accepts messages up to this size.
    Compatible {
        /// Largest message this side may send to the peer.
        max_sending_size: u64,
    },
    /// The peer does not run a compatible extension.
    Incompatible,
}

impl Negotiation {
    /// Whether the peer can receive messages.
    #[must_use]
    pub const fn is_compatible(self) -> bool { matches!(self, Self::Compatible { .. }) }

    /// Sending limit, when negotiation succeeded.
    #[must_use]
    pub const fn max_sending_size(self) -> Option<u64> {
        match self {
            Self::Compatible { max_sending_size } => Some(max_sending_size),
            Self::Incompatible => None,
        }
    }
}

/// Segment advertising this side's receiving ceiling.
#[must_use]
pub const fn advertisement(max_receiving_size: u64) -> Segment<'static> {
    Segment::Negotiate { max_receiving_size }
}

/// Record the ceiling a peer advertised, replacing any earlier value.
pub fn record_peer_limit(peer: &mut PeerState, max_sending_size: u64) -> Negotiation {
    peer.max_sending_size = Some(max_sending_size);
    Negotiation::Compatible { max_sending_size }
}

/// Forget the sending limit of a peer that turned out to be incompatible.
pub fn record_incompatible(peer: &mut PeerState) -> Negotiation {
    peer.max_sending_size = None;
    Negotiation::Incompatible
}
