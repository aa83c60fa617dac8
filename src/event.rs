//! Channel adapter turning callbacks into a stream of events.
//!
//! [`channel`] pairs an [`EventSender`], installed as the extension's
//! callbacks, with an [`EventStream`] that an async task can poll. Events are
//! queued in dispatch order; the sender never blocks.

use std::{
    pin::Pin,
    task::{Context, Poll},
};

use bytes::Bytes;
use futures::Stream;
use log::debug;
use tokio::sync::mpsc;

use crate::{ExtensionCallbacks, Negotiation, PeerId, ReceiptId};

/// Notification emitted by an extension instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A complete message arrived.
    Message {
        /// Sender of the message.
        peer: PeerId,
        /// Message bytes.
        payload: Bytes,
    },
    /// A sent message was acknowledged.
    Receipt {
        /// Peer that acknowledged.
        peer: PeerId,
        /// Identifier returned by the original send.
        receipt: ReceiptId,
    },
    /// Negotiation with a peer resolved.
    Negotiated {
        /// Peer the negotiation concerned.
        peer: PeerId,
        /// Result of the negotiation.
        outcome: Negotiation,
    },
}

/// Create a connected sender and stream.
///
/// # Examples
///
/// ```
/// use toxext_messages::{ExtensionCallbacks, PeerId, event};
///
/// let (mut sender, _stream) = event::channel();
/// sender.on_message(PeerId::new(1), b"hi");
/// ```
#[must_use]
pub fn channel() -> (EventSender, EventStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, EventStream { rx })
}

/// Callbacks that forward every notification as an [`Event`].
#[derive(Clone, Debug)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<Event>,
}

impl EventSender {
    fn forward(&self, event: Event) {
        if self.tx.send(event).is_err() {
            debug!("event stream closed; discarding extension event");
        }
    }
}

impl ExtensionCallbacks for EventSender {
    fn on_message(&mut self, peer: PeerId, message: &[u8]) {
        self.forward(Event::Message {
            peer,
            payload: Bytes::copy_from_slice(message),
        });
    }

    fn on_receipt(&mut self, peer: PeerId, receipt: ReceiptId) {
        self.forward(Event::Receipt { peer, receipt });
    }

    fn on_negotiated(&mut self, peer: PeerId, outcome: Negotiation) {
        self.forward(Event::Negotiated { peer, outcome });
    }
}

/// Stream of events produced by an [`EventSender`].
///
/// The stream ends once every sender has been dropped and the queue drained.
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventStream {
    /// Receive the next event.
    pub async fn recv(&mut self) -> Option<Event> { self.rx.recv().await }

    /// Take the next queued event without waiting.
    pub fn try_recv(&mut self) -> Option<Event> { self.rx.try_recv().ok() }
}

impl Stream for EventStream {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
