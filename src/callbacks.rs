//! Notifications delivered to the owner of an extension instance.
//!
//! All callbacks run synchronously inside the host's dispatch of the inbound
//! event that caused them, exactly once per event.

use crate::{Negotiation, PeerId, ReceiptId};

/// Receiver of message, receipt, and negotiation notifications.
///
/// Only [`on_message`](Self::on_message) is required; the other hooks default
/// to doing nothing.
///
/// # Examples
///
/// ```
/// use toxext_messages::{ExtensionCallbacks, PeerId};
///
/// #[derive(Default)]
/// struct Inbox(Vec<(PeerId, Vec<u8>)>);
///
/// impl ExtensionCallbacks for Inbox {
///     fn on_message(&mut self, peer: PeerId, message: &[u8]) {
///         self.0.push((peer, message.to_vec()));
///     }
/// }
/// ```
pub trait ExtensionCallbacks {
    /// A message from `peer` was fully reassembled and accepted.
    ///
    /// `message` borrows from the inbound segment or the reassembly buffer
    /// and is only valid for the duration of the call.
    fn on_message(&mut self, peer: PeerId, message: &[u8]);

    /// `peer` confirmed full receipt of the message sent as `receipt`.
    fn on_receipt(&mut self, _peer: PeerId, _receipt: ReceiptId) {}

    /// Negotiation with `peer` resolved.
    fn on_negotiated(&mut self, _peer: PeerId, _outcome: Negotiation) {}
}

impl<T: ExtensionCallbacks + ?Sized> ExtensionCallbacks for Box<T> {
    fn on_message(&mut self, peer: PeerId, message: &[u8]) { (**self).on_message(peer, message); }

    fn on_receipt(&mut self, peer: PeerId, receipt: ReceiptId) {
        (**self).on_receipt(peer, receipt);
    }

    fn on_negotiated(&mut self, peer: PeerId, outcome: Negotiation) {
        (**self).on_negotiated(peer, outcome);
    }
}
