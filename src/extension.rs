//! The extension instance: sender, receipt correlator, and inbound dispatch.
//!
//! An [`Extension`] registers with a [`Host`], negotiates message size limits
//! with peers, splits outbound messages into segments, and drives the
//! reassembly state machine for every inbound segment the host dispatches to
//! it. All work happens synchronously inside the caller's `send`/`negotiate`
//! calls or the host's dispatch; nothing blocks or runs in the background.

use log::{debug, warn};

use crate::{
    ExtensionCallbacks,
    ExtensionConfig,
    ExtensionError,
    Message,
    PeerId,
    ReceiptId,
    RegisterError,
    host::{ExtensionHandle, Host, InboundHandler, MESSAGES_UUID, SegmentBatch},
    metrics::{self, Direction},
    negotiation::{advertisement, record_incompatible, record_peer_limit},
    peer::PeerTable,
    reassembly::{Reassembler, ReassemblyError},
    receipt::ReceiptCounter,
    segment::{Chunker, MIN_SEGMENT_SIZE, Segment, SegmentSize},
};

/// One registration of the large-message extension.
///
/// # Examples
///
/// ```
/// use toxext_messages::{
///     Extension,
///     ExtensionConfig,
///     ExtensionCallbacks,
///     PeerId,
///     loopback::LoopbackNetwork,
/// };
///
/// struct Ignore;
///
/// impl ExtensionCallbacks for Ignore {
///     fn on_message(&mut self, _peer: PeerId, _message: &[u8]) {}
/// }
///
/// let mut network = LoopbackNetwork::new(64);
/// let extension = Extension::register(network.host_a(), ExtensionConfig::default(), Ignore)
///     .expect("registration succeeds");
/// assert_eq!(extension.segment_size(), 64);
/// ```
#[derive(Debug)]
pub struct Extension<C> {
    handle: ExtensionHandle,
    segment_size: SegmentSize,
    reassembler: Reassembler,
    receipts: ReceiptCounter,
    peers: PeerTable,
    callbacks: C,
    scratch: Vec<u8>,
}

impl<C: ExtensionCallbacks> Extension<C> {
    /// Register a new instance with `host`.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::SegmentTooSmall`] when the host's segment
    /// ceiling cannot carry a `Start` header and a payload byte, or the
    /// host's own [`RegisterError`] when it refuses the registration.
    pub fn register(
        host: &mut (impl Host + ?Sized),
        config: ExtensionConfig,
        callbacks: C,
    ) -> Result<Self, RegisterError> {
        let ceiling = host.max_segment_size();
        let Some(segment_size) = SegmentSize::new(ceiling) else {
            return Err(RegisterError::SegmentTooSmall {
                segment_size: ceiling,
                minimum: MIN_SEGMENT_SIZE,
            });
        };

        let handle = host.register(MESSAGES_UUID)?;
        debug!(
            "registered messages extension: handle={handle}, segment_size={ceiling}, \
             max_receiving_size={}",
            config.max_receiving_size
        );

        Ok(Self {
            handle,
            segment_size,
            reassembler: Reassembler::new(config.max_receiving_size),
            receipts: ReceiptCounter::new(),
            peers: PeerTable::new(),
            callbacks,
            scratch: Vec::with_capacity(ceiling),
        })
    }

    /// Handle assigned by the host.
    #[must_use]
    pub fn handle(&self) -> ExtensionHandle { self.handle }

    /// Segment ceiling reported by the host.
    #[must_use]
    pub fn segment_size(&self) -> usize { self.segment_size.get() }

    /// Borrow the installed callbacks.
    #[must_use]
    pub fn callbacks(&self) -> &C { &self.callbacks }

    /// Mutably borrow the installed callbacks.
    pub fn callbacks_mut(&mut self) -> &mut C { &mut self.callbacks }

    /// Ask the host to resolve whether `peer` runs this extension.
    ///
    /// Completion is reported through
    /// [`ExtensionCallbacks::on_negotiated`] once the peer's receiving
    /// ceiling is known, or immediately if the peer is incompatible.
    pub fn negotiate(&self, host: &mut (impl Host + ?Sized), peer: PeerId) {
        debug!("initiating negotiation: peer={peer}");
        host.initiate_negotiation(self.handle, peer);
    }

    /// Split `message` into segments for `peer` and append them to `batch`.
    ///
    /// Returns the receipt id that [`ExtensionCallbacks::on_receipt`] reports
    /// once the peer has accepted the message. No segment is appended when
    /// the call fails.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::NotNegotiated`] before the peer advertised
    /// its ceiling, or [`ExtensionError::MessageTooLarge`] when `message`
    /// exceeds it.
    pub fn send(
        &mut self,
        batch: &mut (impl SegmentBatch + ?Sized),
        peer: PeerId,
        message: &[u8],
    ) -> Result<ReceiptId, ExtensionError> {
        let limit = self.max_sending_size(peer)?;
        let fits = u64::try_from(message.len()).is_ok_and(|len| len <= limit);
        if !fits {
            return Err(ExtensionError::MessageTooLarge {
                peer,
                attempted: message.len(),
                limit,
            });
        }

        let receipt = self.receipts.issue();
        let segments = Chunker::new(message, receipt, self.segment_size);
        for segment in segments {
            emit(self.handle, &mut self.scratch, batch, &segment);
        }
        metrics::inc_sent();
        Ok(receipt)
    }

    /// Encode `message` with bincode and send it to `peer`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::Encode`] when serialisation fails, or any
    /// error [`send`](Self::send) reports.
    pub fn send_message<M: Message>(
        &mut self,
        batch: &mut (impl SegmentBatch + ?Sized),
        peer: PeerId,
        message: &M,
    ) -> Result<ReceiptId, ExtensionError> {
        let bytes = message.to_bytes()?;
        self.send(batch, peer, &bytes)
    }

    /// Largest message this instance accepts.
    #[must_use]
    pub fn max_receiving_size(&self) -> u64 { self.reassembler.max_message_size() }

    /// Largest message `peer` accepts from this instance.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::NotNegotiated`] until the peer's `Negotiate`
    /// segment has been received.
    pub fn max_sending_size(&self, peer: PeerId) -> Result<u64, ExtensionError> {
        self.peers
            .get(peer)
            .and_then(|state| state.max_sending_size)
            .ok_or(ExtensionError::NotNegotiated { peer })
    }

    /// Bytes of the partially received message from `peer`.
    #[must_use]
    pub fn buffered_len(&self, peer: PeerId) -> usize {
        self.peers.get(peer).map_or(0, |state| state.buffer.len())
    }

    /// Whether segments of the message in flight from `peer` are being
    /// discarded.
    #[must_use]
    pub fn is_dropping(&self, peer: PeerId) -> bool {
        self.peers
            .get(peer)
            .is_some_and(|state| state.drop_current_message)
    }

    /// Number of peers with tracked state.
    #[must_use]
    pub fn peer_count(&self) -> usize { self.peers.len() }

    /// Forget everything about `peer`. Returns whether it was known.
    ///
    /// The peer must negotiate again before messages can be sent to it.
    pub fn remove_peer(&mut self, peer: PeerId) -> bool { self.peers.remove(peer) }

    /// Release all peer state and reassembly buffers, returning the callbacks.
    #[must_use]
    pub fn free(self) -> C { self.callbacks }

    fn report_drop(peer: PeerId, err: &ReassemblyError) {
        if let ReassemblyError::Dropped = err {
            debug!("discarded remainder of dropped message: peer={peer}");
            return;
        }
        metrics::inc_dropped(err.reason());
        warn!(
            "dropping inbound message: peer={peer}, reason={}, error={err}",
            err.reason()
        );
    }
}

impl<C: ExtensionCallbacks> InboundHandler for Extension<C> {
    fn handle_segment(&mut self, peer: PeerId, segment: &[u8], response: &mut dyn SegmentBatch) {
        metrics::inc_segments(Direction::Inbound);
        let state = self.peers.get_or_insert(peer);

        let segment = match Segment::decode(segment) {
            Ok(segment) => segment,
            Err(err) => {
                self.reassembler.reject_malformed(state);
                Self::report_drop(peer, &ReassemblyError::from(err));
                return;
            }
        };

        match segment {
            Segment::Negotiate { max_receiving_size } => {
                let outcome = record_peer_limit(state, max_receiving_size);
                debug!("negotiated with peer: peer={peer}, max_sending_size={max_receiving_size}");
                self.callbacks.on_negotiated(peer, outcome);
            }
            Segment::Start { total_size, chunk } => {
                if let Err(err) = self.reassembler.accept_start(state, total_size, chunk) {
                    Self::report_drop(peer, &err);
                }
            }
            Segment::Part { chunk } => {
                if let Err(err) = self.reassembler.accept_part(state, chunk) {
                    Self::report_drop(peer, &err);
                }
            }
            Segment::Finish { receipt, chunk } => {
                match self.reassembler.accept_finish(state, chunk) {
                    Ok(message) => {
                        metrics::inc_delivered();
                        self.callbacks.on_message(peer, &message);
                        emit(
                            self.handle,
                            &mut self.scratch,
                            response,
                            &Segment::Received { receipt },
                        );
                    }
                    Err(err) => Self::report_drop(peer, &err),
                }
            }
            Segment::Received { receipt } => {
                metrics::inc_receipts();
                self.callbacks.on_receipt(peer, receipt);
            }
        }
    }

    fn handle_negotiation(
        &mut self,
        peer: PeerId,
        compatible: bool,
        response: &mut dyn SegmentBatch,
    ) {
        let state = self.peers.get_or_insert(peer);
        if !compatible {
            debug!("peer does not support the messages extension: peer={peer}");
            let outcome = record_incompatible(state);
            self.callbacks.on_negotiated(peer, outcome);
            return;
        }

        // Success is reported when the peer's own advertisement arrives.
        let segment = advertisement(self.reassembler.max_message_size());
        emit(self.handle, &mut self.scratch, response, &segment);
    }
}

fn emit(
    handle: ExtensionHandle,
    scratch: &mut Vec<u8>,
    batch: &mut (impl SegmentBatch + ?Sized),
    segment: &Segment<'_>,
) {
    scratch.clear();
    segment.encode_into(scratch);
    batch.append_segment(handle, scratch);
    metrics::inc_segments(Direction::Outbound);
}
