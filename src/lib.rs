#![doc(html_root_url = "https://docs.rs/toxext_messages/latest")]
//! Public API for the `toxext_messages` library.
//!
//! This crate carries arbitrarily large messages over a peer-to-peer segment
//! transport that only delivers small, bounded segments. Outbound messages are
//! split into `Start`/`Part`/`Finish` segments, reassembled byte-exact on the
//! remote side, and acknowledged with a `Received` segment carrying the
//! sender's receipt id. Each side advertises the largest message it accepts so
//! senders never build messages the receiver would refuse.

pub mod byte_order;
pub mod callbacks;
pub mod config;
pub mod error;
pub mod event;
pub mod extension;
pub mod host;
pub mod loopback;
pub mod message;
pub mod metrics;
pub mod negotiation;
pub mod peer;
pub mod reassembly;
pub mod receipt;
pub mod segment;

pub use callbacks::ExtensionCallbacks;
pub use config::{DEFAULT_MAX_RECEIVING_SIZE, ExtensionConfig};
pub use error::{ExtensionError, RegisterError};
pub use event::{Event, EventSender, EventStream};
pub use extension::Extension;
pub use host::{
    ExtensionHandle,
    ExtensionUuid,
    Host,
    InboundHandler,
    MESSAGES_UUID,
    SegmentBatch,
};
pub use message::Message;
pub use metrics::{
    Direction,
    MESSAGES_DELIVERED,
    MESSAGES_DROPPED,
    MESSAGES_SENT,
    RECEIPTS_TOTAL,
    SEGMENTS_TOTAL,
};
pub use negotiation::Negotiation;
pub use peer::PeerId;
pub use reassembly::ReassemblyError;
pub use receipt::ReceiptId;
