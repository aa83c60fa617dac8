//! Shared fixtures for `toxext_messages` tests.
//!
//! [`negotiated_pair`] sets up two extension instances on a loopback network
//! with both directions negotiated, recording every notification in an
//! [`EventLog`]. [`LoggerHandle`] serialises access to the captured log.
//!
//! ```rust
//! use toxext_messages_testing::negotiated_pair;
//!
//! let mut pair = negotiated_pair(64, 1000, 1000);
//! pair.send_a_to_b(b"hello").unwrap();
//! assert_eq!(pair.b.callbacks().messages.len(), 1);
//! ```

pub mod events;
pub mod logging;
pub mod pair;

pub use events::EventLog;
pub use logging::{LoggerHandle, logger};
pub use pair::{Pair, negotiated_pair, registered_pair};
