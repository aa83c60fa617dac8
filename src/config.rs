//! Configuration for an extension instance.

/// Receiving ceiling used when the caller does not pick one: 10 MiB.
pub const DEFAULT_MAX_RECEIVING_SIZE: u64 = 10 * 1024 * 1024;

/// Settings fixed when an extension instance is registered.
///
/// # Examples
///
/// ```
/// use toxext_messages::ExtensionConfig;
///
/// let config = ExtensionConfig::default().with_max_receiving_size(1000);
/// assert_eq!(config.max_receiving_size, 1000);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtensionConfig {
    /// Largest message accepted from any peer, advertised during negotiation.
    pub max_receiving_size: u64,
}

impl ExtensionConfig {
    /// Replace the receiving ceiling.
    #[must_use]
    pub const fn with_max_receiving_size(mut self, max_receiving_size: u64) -> Self {
        self.max_receiving_size = max_receiving_size;
        self
    }
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            max_receiving_size: DEFAULT_MAX_RECEIVING_SIZE,
        }
    }
}
