//! Metric helpers for `toxext_messages`.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! the helpers compile to nothing.

/// Name of the counter tracking segments handed to or received from the host.
pub const SEGMENTS_TOTAL: &str = "toxext_messages_segments_total";
/// Name of the counter tracking messages accepted from peers.
pub const MESSAGES_DELIVERED: &str = "toxext_messages_delivered_total";
/// Name of the counter tracking messages handed to the host.
pub const MESSAGES_SENT: &str = "toxext_messages_sent_total";
/// Name of the counter tracking inbound messages dropped before delivery.
pub const MESSAGES_DROPPED: &str = "toxext_messages_dropped_total";
/// Name of the counter tracking receipts received from peers.
pub const RECEIPTS_TOTAL: &str = "toxext_messages_receipts_total";

/// Direction of segment flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Segments received from a peer.
    Inbound,
    /// Segments sent to a peer.
    Outbound,
}

impl Direction {
    #[cfg_attr(not(feature = "metrics"), allow(dead_code))]
    fn as_str(self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

/// Record one segment for the given direction.
pub fn inc_segments(direction: Direction) {
    #[cfg(feature = "metrics")]
    metrics::counter!(SEGMENTS_TOTAL, "direction" => direction.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = direction;
}

/// Record a message accepted from a peer.
pub fn inc_delivered() {
    #[cfg(feature = "metrics")]
    metrics::counter!(MESSAGES_DELIVERED).increment(1);
}

/// Record a message handed to the host.
pub fn inc_sent() {
    #[cfg(feature = "metrics")]
    metrics::counter!(MESSAGES_SENT).increment(1);
}

/// Record a dropped inbound message with a short reason label.
pub fn inc_dropped(reason: &'static str) {
    #[cfg(feature = "metrics")]
    metrics::counter!(MESSAGES_DROPPED, "reason" => reason).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = reason;
}

/// Record a receipt received from a peer.
pub fn inc_receipts() {
    #[cfg(feature = "metrics")]
    metrics::counter!(RECEIPTS_TOTAL).increment(1);
}
