//! Error types for the GA4 kit.

/// Errors that can occur while constructing the kit.
///
/// Event forwarding itself never fails; malformed input is dropped
/// silently or degraded with a logged notice.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Settings payload could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
