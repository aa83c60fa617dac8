//! Narrow interface to the segment transport that carries this extension.
//!
//! The host owns framing, delivery, encryption, and peer identity. It
//! exchanges bounded segments tagged with an [`ExtensionHandle`] and reports
//! when a peer's capabilities have been resolved. [`Host`] is what the
//! extension calls; [`InboundHandler`] is what the host calls back into.

use std::fmt;

use derive_more::{Display, From, Into};

use crate::{PeerId, RegisterError};

/// Identifier the host uses to route segments to an extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExtensionUuid([u8; 16]);

impl ExtensionUuid {
    /// Wrap raw identifier bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self { Self(bytes) }

    /// Borrow the raw identifier bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] { &self.0 }
}

impl fmt::Display for ExtensionUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Identifier of the large-message extension.
pub const MESSAGES_UUID: ExtensionUuid = ExtensionUuid::from_bytes([
    0x9e, 0x10, 0x03, 0x16, 0xd2, 0x6f, 0x45, 0x39, 0x8c, 0xdb, 0xae, 0x81, 0x00, 0x42, 0xf8, 0x64,
]);

/// Handle the host assigns when an extension registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, From, Into)]
#[display("{_0}")]
pub struct ExtensionHandle(u32);

impl ExtensionHandle {
    /// Create a handle from its numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self { Self(value) }

    /// Return the numeric value.
    #[must_use]
    pub const fn get(self) -> u32 { self.0 }
}

/// Services the extension consumes from its host.
pub trait Host {
    /// Largest segment, in bytes, the host carries.
    fn max_segment_size(&self) -> usize;

    /// Register an extension so segments tagged with `uuid` reach it.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::Host`] when the host cannot accept the
    /// registration.
    fn register(&mut self, uuid: ExtensionUuid) -> Result<ExtensionHandle, RegisterError>;

    /// Ask `peer` whether it runs the extension behind `handle`.
    ///
    /// The answer arrives later through [`InboundHandler::handle_negotiation`].
    fn initiate_negotiation(&mut self, handle: ExtensionHandle, peer: PeerId);
}

/// Outbound batch of segments addressed to a single peer.
///
/// The host flushes batches on its own schedule. Segments appended to one
/// batch reach the peer in append order.
pub trait SegmentBatch {
    /// Append one segment produced by the extension behind `handle`.
    fn append_segment(&mut self, handle: ExtensionHandle, segment: &[u8]);
}

impl SegmentBatch for Vec<Vec<u8>> {
    fn append_segment(&mut self, _handle: ExtensionHandle, segment: &[u8]) {
        self.push(segment.to_vec());
    }
}

/// Entry points the host invokes, one event at a time.
pub trait InboundHandler {
    /// Handle one segment received from `peer`.
    ///
    /// Replies are appended to `response`, a batch addressed to `peer`.
    fn handle_segment(&mut self, peer: PeerId, segment: &[u8], response: &mut dyn SegmentBatch);

    /// Handle the resolution of `peer`'s capabilities.
    ///
    /// Replies are appended to `response`, a batch addressed to `peer`.
    fn handle_negotiation(
        &mut self,
        peer: PeerId,
        compatible: bool,
        response: &mut dyn SegmentBatch,
    );
}
