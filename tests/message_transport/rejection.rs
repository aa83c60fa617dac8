//! Rejection tests for malformed, oversized, and interrupted inbound messages.
//!
//! Segments are injected straight into the receiving instance so the sender's
//! own size checks cannot filter them.

use toxext_messages::{
    InboundHandler,
    ReceiptId,
    loopback::PEER_A,
    segment::{Chunker, Segment, SegmentSize},
};
use toxext_messages_testing::{Pair, negotiated_pair};

const SEGMENT_SIZE: usize = 64;
const LIMIT: u64 = 100;

fn pair() -> Pair { negotiated_pair(SEGMENT_SIZE, 10_000, LIMIT) }

/// Feed raw segments to B as if sent by A, returning B's replies.
fn inject<'a>(pair: &mut Pair, segments: impl IntoIterator<Item = Segment<'a>>) -> Vec<Vec<u8>> {
    let mut replies: Vec<Vec<u8>> = Vec::new();
    for segment in segments {
        pair.b.handle_segment(PEER_A, &segment.to_vec(), &mut replies);
    }
    replies
}

fn chunks(payload: &[u8], receipt: u64) -> Vec<Segment<'_>> {
    let ceiling = SegmentSize::new(SEGMENT_SIZE).expect("segment size above minimum");
    Chunker::new(payload, ReceiptId::new(receipt), ceiling).collect()
}

#[test]
fn oversized_single_segment_message_is_dropped() {
    let mut pair = pair();
    let payload = [1_u8; 50];
    let mut tight = negotiated_pair(SEGMENT_SIZE, 10_000, 40);
    let replies = inject(&mut tight, chunks(&payload, 3));

    assert!(replies.is_empty());
    assert!(tight.b.callbacks().messages.is_empty());
    assert_eq!(tight.b.buffered_len(PEER_A), 0);

    // The same message fits the looser limit.
    let replies = inject(&mut pair, chunks(&payload, 3));
    assert_eq!(replies, [Segment::Received {
        receipt: ReceiptId::new(3),
    }
    .to_vec()]);
}

#[test]
fn oversized_multi_segment_message_is_dropped_and_next_message_arrives() {
    let mut pair = pair();
    let payload = vec![2_u8; 250];
    let replies = inject(&mut pair, chunks(&payload, 0));

    assert!(replies.is_empty());
    assert!(pair.b.callbacks().messages.is_empty());
    assert_eq!(pair.b.buffered_len(PEER_A), 0);
    assert!(!pair.b.is_dropping(PEER_A));

    let replies = inject(&mut pair, chunks(b"after", 1));
    assert_eq!(replies.len(), 1);
    assert_eq!(pair.b.callbacks().payloads(), [b"after".as_slice()]);
}

#[test]
fn parts_of_a_dropped_message_are_not_buffered() {
    let mut pair = pair();
    let payload = vec![3_u8; 250];
    let segments = chunks(&payload, 0);
    let (finish, head) = segments.split_last().expect("several segments");

    inject(&mut pair, head.iter().copied());
    assert!(pair.b.is_dropping(PEER_A));
    assert_eq!(pair.b.buffered_len(PEER_A), 0);

    inject(&mut pair, [*finish]);
    assert!(!pair.b.is_dropping(PEER_A));
}

#[test]
fn new_start_replaces_interrupted_message() {
    let mut pair = pair();
    let first = vec![4_u8; 90];
    let second = vec![5_u8; 80];
    let abandoned = chunks(&first, 0);

    inject(&mut pair, abandoned.into_iter().take(1));
    assert_eq!(pair.b.buffered_len(PEER_A), SEGMENT_SIZE - 9);

    let replies = inject(&mut pair, chunks(&second, 1));
    assert_eq!(pair.b.callbacks().payloads(), [second.as_slice()]);
    assert_eq!(replies.len(), 1);
}

#[test]
fn unknown_segment_kind_drops_message_in_flight() {
    let mut pair = pair();
    let payload = vec![6_u8; 90];
    let segments = chunks(&payload, 0);

    let mut replies = inject(&mut pair, segments[..1].iter().copied());
    pair.b.handle_segment(PEER_A, &[9, 1, 2, 3], &mut replies);
    assert_eq!(pair.b.buffered_len(PEER_A), 0);

    replies.extend(inject(&mut pair, segments[1..].iter().copied()));
    assert!(replies.is_empty());
    assert!(pair.b.callbacks().messages.is_empty());

    inject(&mut pair, chunks(b"fresh", 1));
    assert_eq!(pair.b.callbacks().payloads(), [b"fresh".as_slice()]);
}

#[test]
fn truncated_and_empty_segments_are_ignored() {
    let mut pair = pair();
    let mut replies: Vec<Vec<u8>> = Vec::new();
    pair.b.handle_segment(PEER_A, &[], &mut replies);
    pair.b.handle_segment(PEER_A, &[3, 0, 0], &mut replies);
    pair.b.handle_segment(PEER_A, &[4, 0], &mut replies);

    assert!(replies.is_empty());
    assert!(pair.b.callbacks().messages.is_empty());
    assert!(pair.b.callbacks().receipts.is_empty());
    assert!(!pair.b.is_dropping(PEER_A));
}

#[test]
fn overrunning_part_drops_message() {
    let mut pair = pair();
    let segments = [
        Segment::Start {
            total_size: 60,
            chunk: &[7_u8; 55],
        },
        Segment::Part { chunk: &[7_u8; 10] },
        Segment::Finish {
            receipt: ReceiptId::new(0),
            chunk: &[],
        },
    ];
    let replies = inject(&mut pair, segments);

    assert!(replies.is_empty());
    assert!(pair.b.callbacks().messages.is_empty());
}

#[test]
fn segments_from_unknown_peer_create_state() {
    let mut pair = pair();
    let stranger = toxext_messages::PeerId::new(42);
    let mut replies: Vec<Vec<u8>> = Vec::new();
    pair.b.handle_segment(
        stranger,
        &Segment::Finish {
            receipt: ReceiptId::new(5),
            chunk: b"hi",
        }
        .to_vec(),
        &mut replies,
    );

    assert_eq!(pair.b.peer_count(), 2);
    assert_eq!(pair.b.callbacks().messages[0].0, stranger);
    assert!(pair.b.max_sending_size(stranger).is_err());
    assert_eq!(replies.len(), 1);
}
