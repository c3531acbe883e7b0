//! Error types for zaaksync

use thiserror::Error;

/// Result type alias for zaaksync operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Main error type for the synchronization bridge.
///
/// Every variant is non-fatal by policy: handlers catch these internally,
/// log at warning level, and return the inbound payload unchanged.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("No record found for filter: {0}")]
    NotFound(String),

    #[error("More than one record found for filter: {0}")]
    AmbiguousMatch(String),

    #[error("Unresolvable configuration reference: {0}")]
    UnresolvedReference(String),

    #[error("Remote push returned no usable response: {0}")]
    TransportFailure(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Object store error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BridgeError {
    /// Whether a handler should degrade to returning the inbound payload
    /// unchanged rather than surfacing this error to its caller.
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            BridgeError::NotFound(_)
                | BridgeError::AmbiguousMatch(_)
                | BridgeError::UnresolvedReference(_)
                | BridgeError::TransportFailure(_)
                | BridgeError::Config(_)
        )
    }
}
