//! Receipt identifiers correlating sent messages with peer acknowledgements.
//!
//! Every call to [`Extension::send`](crate::Extension::send) draws one
//! [`ReceiptId`] from the instance's [`ReceiptCounter`], regardless of how many
//! segments the message needs. The remote side echoes the identifier back in a
//! `Received` segment once it has reassembled and accepted the message.

use derive_more::{Display, From, Into};

/// Sender-assigned identifier for one logical message.
///
/// # Examples
///
/// ```
/// use toxext_messages::ReceiptId;
/// let id = ReceiptId::new(42);
/// assert_eq!(id.get(), 42);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("{_0}")]
pub struct ReceiptId(u64);

impl ReceiptId {
    /// Create a new identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self { Self(value) }

    /// Return the inner numeric identifier.
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

/// Monotonic source of [`ReceiptId`] values for one extension instance.
///
/// The counter wraps at `u64::MAX`, which no realistic session reaches.
#[derive(Debug, Default)]
pub struct ReceiptCounter {
    next: u64,
}

impl ReceiptCounter {
    /// Create a counter whose first issued identifier is zero.
    #[must_use]
    pub const fn new() -> Self { Self::starting_at(ReceiptId::new(0)) }

    /// Create a counter whose first issued identifier is `start`.
    #[must_use]
    pub const fn starting_at(start: ReceiptId) -> Self { Self { next: start.get() } }

    /// Issue the next identifier.
    pub fn issue(&mut self) -> ReceiptId {
        let id = ReceiptId::new(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }

    /// Peek at the identifier the next call to [`issue`](Self::issue) returns.
    #[must_use]
    pub const fn peek(&self) -> ReceiptId { ReceiptId::new(self.next) }
}
