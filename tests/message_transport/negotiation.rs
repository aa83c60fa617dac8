//! Negotiation tests: size advertisement, asymmetry, and incompatible peers.

use toxext_messages::{
    Extension,
    ExtensionConfig,
    ExtensionError,
    InboundHandler,
    Negotiation,
    PeerId,
    SegmentBatch,
    loopback::{LoopbackNetwork, PEER_A, PEER_B},
};
use toxext_messages_testing::{EventLog, negotiated_pair, registered_pair};

#[test]
fn sending_before_negotiation_is_refused() {
    let mut pair = registered_pair(64, 1000, 2000);

    assert!(matches!(
        pair.a.max_sending_size(PEER_B),
        Err(ExtensionError::NotNegotiated { peer }) if peer == PEER_B
    ));
    assert!(matches!(
        pair.b.max_sending_size(PEER_A),
        Err(ExtensionError::NotNegotiated { .. })
    ));
    assert!(matches!(
        pair.send_a_to_b(b"early"),
        Err(ExtensionError::NotNegotiated { .. })
    ));
    assert!(pair.network.host_a().packets().is_empty());
}

#[test]
fn each_side_learns_the_other_sides_receiving_limit() {
    let pair = negotiated_pair(64, 1000, 2000);

    assert_eq!(pair.a.max_sending_size(PEER_B).ok(), Some(2000));
    assert_eq!(pair.b.max_sending_size(PEER_A).ok(), Some(1000));
    assert_eq!(pair.a.max_receiving_size(), 1000);
    assert_eq!(pair.b.max_receiving_size(), 2000);
}

#[test]
fn negotiation_completes_per_direction() {
    let mut pair = registered_pair(64, 1000, 2000);
    pair.a.negotiate(pair.network.host_a(), PEER_B);
    pair.pump();

    // Only A advertised, so only B may send.
    assert_eq!(pair.b.max_sending_size(PEER_A).ok(), Some(1000));
    assert!(pair.a.max_sending_size(PEER_B).is_err());
    assert_eq!(
        pair.b.callbacks().negotiations,
        [(
            PEER_A,
            Negotiation::Compatible {
                max_sending_size: 1000,
            }
        )]
    );
    assert!(pair.a.callbacks().negotiations.is_empty());
}

#[test]
fn renegotiation_overwrites_the_limit() {
    let mut pair = negotiated_pair(64, 1000, 2000);
    pair.b.negotiate(pair.network.host_b(), PEER_A);
    pair.pump();

    assert_eq!(pair.a.max_sending_size(PEER_B).ok(), Some(2000));
    assert_eq!(pair.a.callbacks().negotiations.len(), 1);
}

struct Silent;

impl InboundHandler for Silent {
    fn handle_segment(&mut self, _: PeerId, _: &[u8], _: &mut dyn SegmentBatch) {}

    fn handle_negotiation(&mut self, _: PeerId, _: bool, _: &mut dyn SegmentBatch) {}
}

#[test]
fn peer_without_the_extension_is_reported_incompatible() {
    let mut network = LoopbackNetwork::new(64);
    let mut a = Extension::register(network.host_a(), ExtensionConfig::default(), EventLog::default())
        .expect("register side A");
    a.negotiate(network.host_a(), PEER_B);
    network.run_until_idle(&mut a, &mut Silent);

    assert_eq!(
        a.callbacks().negotiations,
        [(PEER_B, Negotiation::Incompatible)]
    );
    assert!(a.max_sending_size(PEER_B).is_err());
    assert_eq!(a.peer_count(), 1);
}

#[test]
fn removed_peer_must_negotiate_again() {
    let mut pair = negotiated_pair(64, 1000, 1000);
    assert!(pair.a.remove_peer(PEER_B));
    assert!(!pair.a.remove_peer(PEER_B));
    assert_eq!(pair.a.peer_count(), 0);
    assert!(matches!(
        pair.send_a_to_b(b"gone"),
        Err(ExtensionError::NotNegotiated { .. })
    ));

    pair.negotiate();
    assert!(pair.send_a_to_b(b"back").is_ok());
}
