//! Callbacks that record every notification for later assertions.

use bytes::Bytes;
use toxext_messages::{ExtensionCallbacks, Negotiation, PeerId, ReceiptId};

/// Ordered record of everything an extension instance reported.
#[derive(Debug, Default)]
pub struct EventLog {
    /// Messages received, in delivery order.
    pub messages: Vec<(PeerId, Bytes)>,
    /// Receipts acknowledged, in arrival order.
    pub receipts: Vec<(PeerId, ReceiptId)>,
    /// Negotiation outcomes, in resolution order.
    pub negotiations: Vec<(PeerId, Negotiation)>,
}

impl EventLog {
    /// Payloads of the received messages, without their senders.
    #[must_use]
    pub fn payloads(&self) -> Vec<&[u8]> {
        self.messages.iter().map(|(_, payload)| payload.as_ref()).collect()
    }

    /// Receipt ids acknowledged by any peer.
    #[must_use]
    pub fn receipt_ids(&self) -> Vec<ReceiptId> {
        self.receipts.iter().map(|(_, receipt)| *receipt).collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.receipts.clear();
        self.negotiations.clear();
    }
}

impl ExtensionCallbacks for EventLog {
    fn on_message(&mut self, peer: PeerId, message: &[u8]) {
        self.messages.push((peer, Bytes::copy_from_slice(message)));
    }

    fn on_receipt(&mut self, peer: PeerId, receipt: ReceiptId) {
        self.receipts.push((peer, receipt));
    }

    fn on_negotiated(&mut self, peer: PeerId, outcome: Negotiation) {
        self.negotiations.push((peer, outcome));
    }
}
