//! Helpers for explicit network byte-order conversions.
//!
//! Segment headers carry their fixed-width fields in network byte order. These
//! helpers keep Clippy expectations scoped to the conversion points so the
//! codec can remain explicit about wire endianness without repeating lint
//! annotations.

/// Width in bytes of every fixed integer field on the wire.
pub const FIELD_LEN: usize = 8;

/// Serialise a `u64` in network byte order (big-endian).
///
/// # Examples
///
/// ```
/// use toxext_messages::byte_order::write_network_u64;
///
/// assert_eq!(
///     write_network_u64(0x1122_3344_5566_7788),
///     [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]
/// );
/// ```
#[must_use]
pub fn write_network_u64(value: u64) -> [u8; FIELD_LEN] {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    value.to_be_bytes()
}

/// Parse a network-order `u64` from its on-wire representation.
///
/// # Examples
///
/// ```
/// use toxext_messages::byte_order::read_network_u64;
///
/// assert_eq!(
///     read_network_u64([0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88]),
///     0x1122_3344_5566_7788
/// );
/// ```
#[must_use]
pub fn read_network_u64(bytes: [u8; FIELD_LEN]) -> u64 {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Network byte order requires big-endian bytes."
    )]
    u64::from_be_bytes(bytes)
}

/// Split a leading network-order `u64` off `bytes`.
///
/// Returns `None` when fewer than [`FIELD_LEN`] bytes are available.
#[must_use]
pub fn split_network_u64(bytes: &[u8]) -> Option<(u64, &[u8])> {
    let (field, rest) = bytes.split_first_chunk::<FIELD_LEN>()?;
    Some((read_network_u64(*field), rest))
}
