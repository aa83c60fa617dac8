//! Two extension instances wired through a loopback network.

use toxext_messages::{
    Extension,
    ExtensionConfig,
    ExtensionError,
    ReceiptId,
    loopback::{LoopbackNetwork, PEER_A, PEER_B},
};

use crate::EventLog;

/// Extension instances on both sides of a [`LoopbackNetwork`].
#[derive(Debug)]
pub struct Pair {
    /// The network carrying segments between the two sides.
    pub network: LoopbackNetwork,
    /// Instance on side A, addressing side B as [`PEER_B`].
    pub a: Extension<EventLog>,
    /// Instance on side B, addressing side A as [`PEER_A`].
    pub b: Extension<EventLog>,
}

impl Pair {
    /// Deliver everything queued. Returns the number of segments delivered.
    pub fn pump(&mut self) -> usize { self.network.run_until_idle(&mut self.a, &mut self.b) }

    /// Negotiate both directions and deliver the advertisements.
    pub fn negotiate(&mut self) {
        self.a.negotiate(self.network.host_a(), PEER_B);
        self.b.negotiate(self.network.host_b(), PEER_A);
        self.pump();
    }

    /// Send `message` from A to B and deliver everything.
    ///
    /// # Errors
    ///
    /// Returns whatever [`Extension::send`] reports; nothing is delivered then.
    pub fn send_a_to_b(&mut self, message: &[u8]) -> Result<ReceiptId, ExtensionError> {
        let receipt = self.a.send(self.network.host_a().packets(), PEER_B, message)?;
        self.pump();
        Ok(receipt)
    }

    /// Send `message` from B to A and deliver everything.
    ///
    /// # Errors
    ///
    /// Returns whatever [`Extension::send`] reports; nothing is delivered then.
    pub fn send_b_to_a(&mut self, message: &[u8]) -> Result<ReceiptId, ExtensionError> {
        let receipt = self.b.send(self.network.host_b().packets(), PEER_A, message)?;
        self.pump();
        Ok(receipt)
    }
}

/// Register one instance per side without negotiating.
///
/// # Panics
///
/// Panics if `segment_size` is too small to register.
#[must_use]
pub fn registered_pair(segment_size: usize, max_receive_a: u64, max_receive_b: u64) -> Pair {
    let mut network = LoopbackNetwork::new(segment_size);
    let a = Extension::register(
        network.host_a(),
        ExtensionConfig::default().with_max_receiving_size(max_receive_a),
        EventLog::default(),
    )
    .expect("register side A");
    let b = Extension::register(
        network.host_b(),
        ExtensionConfig::default().with_max_receiving_size(max_receive_b),
        EventLog::default(),
    )
    .expect("register side B");
    Pair { network, a, b }
}

/// Register one instance per side and negotiate both directions.
///
/// The recorded negotiation outcomes are cleared before returning.
///
/// # Panics
///
/// Panics if `segment_size` is too small to register.
#[must_use]
pub fn negotiated_pair(segment_size: usize, max_receive_a: u64, max_receive_b: u64) -> Pair {
    let mut pair = registered_pair(segment_size, max_receive_a, max_receive_b);
    pair.negotiate();
    pair.a.callbacks_mut().clear();
    pair.b.callbacks_mut().clear();
    pair
}
