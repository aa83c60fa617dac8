//! Segment kind tags and their fixed header sizes.

use std::fmt;

use crate::byte_order::FIELD_LEN;

/// Bytes occupied by the kind tag that opens every segment.
pub const TAG_LEN: usize = 1;

/// Kind of a single on-wire segment.
///
/// The discriminants are the tag byte values and are fixed by the protocol
/// version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SegmentKind {
    /// Advertises the sender's maximum receiving message size.
    Negotiate = 0,
    /// Opens a multi-segment message and declares its total size.
    Start = 1,
    /// Continues a multi-segment message.
    Part = 2,
    /// Closes a message and carries its receipt id.
    Finish = 3,
    /// Acknowledges full receipt of a message.
    Received = 4,
}

impl SegmentKind {
    /// Every kind in tag order.
    pub const ALL: [Self; 5] = [
        Self::Negotiate,
        Self::Start,
        Self::Part,
        Self::Finish,
        Self::Received,
    ];

    /// Tag byte written on the wire.
    #[must_use]
    pub const fn tag(self) -> u8 { self as u8 }

    /// Bytes taken by the tag plus the kind's fixed fields.
    #[must_use]
    pub const fn header_len(self) -> usize {
        match self {
            Self::Part => TAG_LEN,
            Self::Negotiate | Self::Start | Self::Finish | Self::Received => TAG_LEN + FIELD_LEN,
        }
    }

    /// Whether payload bytes follow the header.
    #[must_use]
    pub const fn carries_payload(self) -> bool {
        matches!(self, Self::Start | Self::Part | Self::Finish)
    }
}

impl TryFrom<u8> for SegmentKind {
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == tag)
            .ok_or(tag)
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Negotiate => "negotiate",
            Self::Start => "start",
            Self::Part => "part",
            Self::Finish => "finish",
            Self::Received => "received",
        };
        f.write_str(name)
    }
}
