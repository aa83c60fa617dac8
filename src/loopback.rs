//! In-memory two-node host for tests and the demo binary.
//!
//! [`LoopbackNetwork`] owns one [`LoopbackHost`] per side. Each host
//! implements [`Host`] for the extension registered on it and queues outbound
//! segments in a [`PacketList`] addressed to the other side. Calling
//! [`LoopbackNetwork::run_until_idle`] resolves pending negotiation requests
//! and delivers queued segments to the two [`InboundHandler`]s, in order,
//! until neither side has anything left to send.
//!
//! The node on side A sees its remote as [`PEER_B`]; the node on side B sees
//! its remote as [`PEER_A`].

use std::collections::VecDeque;

use log::{debug, warn};

use crate::{
    PeerId,
    RegisterError,
    host::{ExtensionHandle, ExtensionUuid, Host, InboundHandler, SegmentBatch},
};

/// How side B addresses side A.
pub const PEER_A: PeerId = PeerId::new(0);
/// How side A addresses side B.
pub const PEER_B: PeerId = PeerId::new(1);

/// Segment queued for the remote side, tagged with its extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Datagram {
    /// Extension the segment belongs to.
    pub uuid: ExtensionUuid,
    /// Encoded segment.
    pub bytes: Vec<u8>,
}

/// Outbound segments addressed to a single peer.
#[derive(Debug)]
pub struct PacketList {
    peer: PeerId,
    registered: Vec<ExtensionUuid>,
    datagrams: VecDeque<Datagram>,
    sent: usize,
}

impl PacketList {
    fn new(peer: PeerId) -> Self {
        Self {
            peer,
            registered: Vec::new(),
            datagrams: VecDeque::new(),
            sent: 0,
        }
    }

    /// Peer the list is addressed to.
    #[must_use]
    pub fn peer(&self) -> PeerId { self.peer }

    /// Segments waiting for delivery.
    #[must_use]
    pub fn len(&self) -> usize { self.datagrams.len() }

    /// Whether nothing is waiting for delivery.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.datagrams.is_empty() }

    /// Segments appended since the list was created.
    #[must_use]
    pub fn total_sent(&self) -> usize { self.sent }

    /// Borrow the queued segments in delivery order.
    pub fn iter(&self) -> impl Iterator<Item = &Datagram> { self.datagrams.iter() }

    fn pop(&mut self) -> Option<Datagram> { self.datagrams.pop_front() }
}

impl SegmentBatch for PacketList {
    fn append_segment(&mut self, handle: ExtensionHandle, segment: &[u8]) {
        let uuid = usize::try_from(handle.get())
            .ok()
            .and_then(|index| self.registered.get(index).copied());
        let Some(uuid) = uuid else {
            warn!("segment from unregistered handle discarded: handle={handle}");
            return;
        };
        self.sent += 1;
        self.datagrams.push_back(Datagram {
            uuid,
            bytes: segment.to_vec(),
        });
    }
}

/// One side of a [`LoopbackNetwork`].
#[derive(Debug)]
pub struct LoopbackHost {
    segment_size: usize,
    outbox: PacketList,
    negotiations: VecDeque<(ExtensionHandle, PeerId)>,
}

impl LoopbackHost {
    fn new(segment_size: usize, remote: PeerId) -> Self {
        Self {
            segment_size,
            outbox: PacketList::new(remote),
            negotiations: VecDeque::new(),
        }
    }

    /// Batch of segments addressed to the remote side.
    pub fn packets(&mut self) -> &mut PacketList { &mut self.outbox }

    /// Peer id under which this side addresses the remote side.
    #[must_use]
    pub fn remote(&self) -> PeerId { self.outbox.peer }

    /// Extensions registered on this side, indexed by handle.
    #[must_use]
    pub fn registered(&self) -> &[ExtensionUuid] { &self.outbox.registered }

    fn is_idle(&self) -> bool { self.outbox.is_empty() && self.negotiations.is_empty() }

    fn is_registered(&self, uuid: ExtensionUuid) -> bool { self.outbox.registered.contains(&uuid) }

    fn uuid_of(&self, handle: ExtensionHandle) -> Option<ExtensionUuid> {
        let index = usize::try_from(handle.get()).ok()?;
        self.outbox.registered.get(index).copied()
    }
}

impl Host for LoopbackHost {
    fn max_segment_size(&self) -> usize { self.segment_size }

    fn register(&mut self, uuid: ExtensionUuid) -> Result<ExtensionHandle, RegisterError> {
        if self.is_registered(uuid) {
            return Err(RegisterError::Host(format!("{uuid} is already registered")));
        }
        let handle = u32::try_from(self.outbox.registered.len())
            .map(ExtensionHandle::new)
            .map_err(|_| RegisterError::Host("handle space exhausted".to_owned()))?;
        self.outbox.registered.push(uuid);
        Ok(handle)
    }

    fn initiate_negotiation(&mut self, handle: ExtensionHandle, peer: PeerId) {
        if peer != self.remote() {
            warn!("negotiation with unknown peer ignored: peer={peer}");
            return;
        }
        self.negotiations.push_back((handle, peer));
    }
}

/// Two loopback hosts wired to each other.
///
/// # Examples
///
/// ```
/// use toxext_messages::{
///     Extension,
///     ExtensionCallbacks,
///     ExtensionConfig,
///     PeerId,
///     loopback::{LoopbackNetwork, PEER_A, PEER_B},
/// };
///
/// #[derive(Default)]
/// struct Inbox(Vec<Vec<u8>>);
///
/// impl ExtensionCallbacks for Inbox {
///     fn on_message(&mut self, _peer: PeerId, message: &[u8]) { self.0.push(message.to_vec()); }
/// }
///
/// let mut network = LoopbackNetwork::new(64);
/// let config = ExtensionConfig::default();
/// let mut a = Extension::register(network.host_a(), config, Inbox::default()).unwrap();
/// let mut b = Extension::register(network.host_b(), config, Inbox::default()).unwrap();
/// a.negotiate(network.host_a(), PEER_B);
/// b.negotiate(network.host_b(), PEER_A);
/// network.run_until_idle(&mut a, &mut b);
///
/// a.send(network.host_a().packets(), PEER_B, &[7; 200]).unwrap();
/// network.run_until_idle(&mut a, &mut b);
/// assert_eq!(b.callbacks().0, [vec![7; 200]]);
/// ```
#[derive(Debug)]
pub struct LoopbackNetwork {
    a: LoopbackHost,
    b: LoopbackHost,
}

impl LoopbackNetwork {
    /// Create a network whose hosts carry segments of at most `segment_size` bytes.
    #[must_use]
    pub fn new(segment_size: usize) -> Self {
        Self {
            a: LoopbackHost::new(segment_size, PEER_B),
            b: LoopbackHost::new(segment_size, PEER_A),
        }
    }

    /// Host of side A.
    pub fn host_a(&mut self) -> &mut LoopbackHost { &mut self.a }

    /// Host of side B.
    pub fn host_b(&mut self) -> &mut LoopbackHost { &mut self.b }

    /// Whether no segment or negotiation request is pending.
    #[must_use]
    pub fn is_idle(&self) -> bool { self.a.is_idle() && self.b.is_idle() }

    /// Deliver everything queued on both sides until the network is idle.
    ///
    /// Returns the number of segments delivered.
    pub fn run_until_idle<A, B>(&mut self, a: &mut A, b: &mut B) -> usize
    where
        A: InboundHandler + ?Sized,
        B: InboundHandler + ?Sized,
    {
        let mut delivered = 0;
        while !self.is_idle() {
            resolve_negotiations(&mut self.a, &self.b, a);
            resolve_negotiations(&mut self.b, &self.a, b);
            delivered += deliver(&mut self.a, &mut self.b, b);
            delivered += deliver(&mut self.b, &mut self.a, a);
        }
        debug!("loopback network idle: delivered={delivered}");
        delivered
    }
}

fn resolve_negotiations<H>(local: &mut LoopbackHost, remote: &LoopbackHost, handler: &mut H)
where
    H: InboundHandler + ?Sized,
{
    while let Some((handle, peer)) = local.negotiations.pop_front() {
        let compatible = local
            .uuid_of(handle)
            .is_some_and(|uuid| remote.is_registered(uuid));
        handler.handle_negotiation(peer, compatible, &mut local.outbox);
    }
}

fn deliver<H>(from: &mut LoopbackHost, to: &mut LoopbackHost, handler: &mut H) -> usize
where
    H: InboundHandler + ?Sized,
{
    let sender = to.remote();
    let mut delivered = 0;
    while let Some(datagram) = from.outbox.pop() {
        if !to.is_registered(datagram.uuid) {
            debug!("segment for unregistered extension discarded: uuid={}", datagram.uuid);
            continue;
        }
        handler.handle_segment(sender, &datagram.bytes, &mut to.outbox);
        delivered += 1;
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MESSAGES_UUID;

    #[derive(Default)]
    struct Recorder {
        segments: Vec<(PeerId, Vec<u8>)>,
        negotiations: Vec<(PeerId, bool)>,
    }

    impl InboundHandler for Recorder {
        fn handle_segment(&mut self, peer: PeerId, segment: &[u8], _: &mut dyn SegmentBatch) {
            self.segments.push((peer, segment.to_vec()));
        }

        fn handle_negotiation(&mut self, peer: PeerId, compatible: bool, _: &mut dyn SegmentBatch) {
            self.negotiations.push((peer, compatible));
        }
    }

    #[test]
    fn registering_twice_is_refused() {
        let mut network = LoopbackNetwork::new(32);
        let handle = network.host_a().register(MESSAGES_UUID).expect("first registration");
        assert_eq!(handle, ExtensionHandle::new(0));
        assert!(matches!(
            network.host_a().register(MESSAGES_UUID),
            Err(RegisterError::Host(_))
        ));
    }

    #[test]
    fn negotiation_is_compatible_only_when_both_sides_registered() {
        let mut network = LoopbackNetwork::new(32);
        let handle = network.host_a().register(MESSAGES_UUID).expect("registration");
        network.host_a().initiate_negotiation(handle, PEER_B);

        let (mut a, mut b) = (Recorder::default(), Recorder::default());
        network.run_until_idle(&mut a, &mut b);
        assert_eq!(a.negotiations, [(PEER_B, false)]);

        network.host_b().register(MESSAGES_UUID).expect("registration");
        network.host_a().initiate_negotiation(handle, PEER_B);
        network.run_until_idle(&mut a, &mut b);
        assert_eq!(a.negotiations, [(PEER_B, false), (PEER_B, true)]);
        assert!(b.negotiations.is_empty());
    }

    #[test]
    fn segments_arrive_in_order_from_the_right_peer() {
        let mut network = LoopbackNetwork::new(32);
        let handle = network.host_a().register(MESSAGES_UUID).expect("registration");
        network.host_b().register(MESSAGES_UUID).expect("registration");
        network.host_a().packets().append_segment(handle, b"one");
        network.host_a().packets().append_segment(handle, b"two");

        let (mut a, mut b) = (Recorder::default(), Recorder::default());
        assert_eq!(network.run_until_idle(&mut a, &mut b), 2);
        assert_eq!(
            b.segments,
            [(PEER_A, b"one".to_vec()), (PEER_A, b"two".to_vec())]
        );
        assert_eq!(network.host_a().packets().total_sent(), 2);
    }

    #[test]
    fn segments_for_unregistered_extension_are_discarded() {
        let mut network = LoopbackNetwork::new(32);
        let handle = network.host_a().register(MESSAGES_UUID).expect("registration");
        network.host_a().packets().append_segment(handle, b"lost");

        let (mut a, mut b) = (Recorder::default(), Recorder::default());
        assert_eq!(network.run_until_idle(&mut a, &mut b), 0);
        assert!(b.segments.is_empty());
    }
}
