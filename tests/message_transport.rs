//! Integration tests for chunked message transfer between two instances.
//!
//! Tests are organized into submodules by concern:
//! - Round-trip tests (this file)
//! - Negotiation tests (`message_transport/negotiation.rs`)
//! - Rejection tests (`message_transport/rejection.rs`)

use proptest::prelude::*;
use rstest::rstest;
use toxext_messages::{
    ExtensionError,
    ReceiptId,
    loopback::{PEER_A, PEER_B},
    segment::segment_count,
};
use toxext_messages_testing::negotiated_pair;

#[path = "message_transport/mod.rs"]
mod message_transport;

const SEGMENT_SIZE: usize = 64;
const LIMIT: u64 = 10_000;

fn pattern(len: usize) -> Vec<u8> { (0..=250_u8).cycle().take(len).collect() }

#[rstest]
#[case::empty(0)]
#[case::single_byte(1)]
#[case::under_finish_capacity(SEGMENT_SIZE - 10)]
#[case::fills_finish(SEGMENT_SIZE - 9)]
#[case::one_segment_size(SEGMENT_SIZE)]
#[case::several_segments(3 * SEGMENT_SIZE - SEGMENT_SIZE / 2)]
fn message_round_trips_with_single_receipt(#[case] len: usize) {
    let mut pair = negotiated_pair(SEGMENT_SIZE, LIMIT, LIMIT);
    let payload = pattern(len);

    let receipt = pair
        .a
        .send(pair.network.host_a().packets(), PEER_B, &payload)
        .expect("message within limit");
    let queued = pair.network.host_a().packets().len();
    assert_eq!(segment_count(len, SEGMENT_SIZE), Some(queued));
    assert!(
        pair.network
            .host_a()
            .packets()
            .iter()
            .all(|d| d.bytes.len() <= SEGMENT_SIZE)
    );
    pair.pump();

    assert_eq!(pair.b.callbacks().payloads(), [payload.as_slice()]);
    assert_eq!(pair.b.callbacks().messages[0].0, PEER_A);
    assert_eq!(pair.a.callbacks().receipts, [(PEER_B, receipt)]);
    assert_eq!(pair.b.buffered_len(PEER_A), 0);
}

#[test]
fn receipts_are_issued_in_send_order() {
    let mut pair = negotiated_pair(SEGMENT_SIZE, LIMIT, LIMIT);
    let first = pair.send_a_to_b(&pattern(200)).expect("first send");
    let second = pair.send_a_to_b(b"short").expect("second send");

    assert_eq!(first, ReceiptId::new(0));
    assert_eq!(second, ReceiptId::new(1));
    assert_eq!(pair.a.callbacks().receipt_ids(), [first, second]);
    assert_eq!(pair.b.callbacks().payloads().len(), 2);
}

#[test]
fn both_directions_carry_messages_independently() {
    let mut pair = negotiated_pair(SEGMENT_SIZE, LIMIT, LIMIT);
    let from_a = pair.send_a_to_b(&pattern(300)).expect("send from A");
    let from_b = pair.send_b_to_a(&pattern(150)).expect("send from B");

    assert_eq!(pair.b.callbacks().payloads(), [pattern(300).as_slice()]);
    assert_eq!(pair.a.callbacks().payloads(), [pattern(150).as_slice()]);
    assert_eq!(pair.a.callbacks().receipt_ids(), [from_a]);
    assert_eq!(pair.b.callbacks().receipt_ids(), [from_b]);
}

#[derive(Debug, PartialEq, bincode::Encode, bincode::BorrowDecode)]
struct Chat {
    author: u32,
    body: Vec<u8>,
}

#[test]
fn typed_message_round_trips_through_bincode() {
    use toxext_messages::Message;

    let mut pair = negotiated_pair(SEGMENT_SIZE, LIMIT, LIMIT);
    let chat = Chat {
        author: 7,
        body: pattern(500),
    };
    pair.a
        .send_message(pair.network.host_a().packets(), PEER_B, &chat)
        .expect("typed send");
    pair.pump();

    let payloads = pair.b.callbacks().payloads();
    let (decoded, _) = Chat::from_bytes(payloads[0]).expect("decode chat");
    assert_eq!(decoded, chat);
}

#[test]
fn message_at_limit_is_sent_and_one_more_byte_is_refused() {
    let mut pair = negotiated_pair(SEGMENT_SIZE, LIMIT, 100);

    let err = pair
        .a
        .send(pair.network.host_a().packets(), PEER_B, &pattern(101))
        .expect_err("over the peer's limit");
    assert!(matches!(
        err,
        ExtensionError::MessageTooLarge {
            attempted: 101,
            limit: 100,
            ..
        }
    ));
    assert!(pair.network.host_a().packets().is_empty());

    pair.send_a_to_b(&pattern(100)).expect("exactly at limit");
    assert_eq!(pair.b.callbacks().payloads(), [pattern(100).as_slice()]);
}

#[test]
fn refused_send_does_not_consume_a_receipt() {
    let mut pair = negotiated_pair(SEGMENT_SIZE, LIMIT, 10);
    assert!(pair.send_a_to_b(&pattern(11)).is_err());
    let receipt = pair.send_a_to_b(b"ok").expect("within limit");
    assert_eq!(receipt, ReceiptId::new(0));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn arbitrary_payloads_round_trip(
        payload in proptest::collection::vec(any::<u8>(), 0..600),
        segment_size in 10_usize..100,
    ) {
        let mut pair = negotiated_pair(segment_size, LIMIT, LIMIT);
        let receipt = pair.send_a_to_b(&payload).expect("within limit");

        prop_assert_eq!(pair.b.callbacks().payloads(), vec![payload.as_slice()]);
        prop_assert_eq!(pair.a.callbacks().receipt_ids(), vec![receipt]);
    }
}
