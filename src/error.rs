//! Error types for the storefront core
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Storefront Error Enum ==
/// Unified error type for the storefront core.
#[derive(Error, Debug)]
pub enum StorefrontError {
    /// The remote service could not be reached
    #[error("Service unreachable: {0}")]
    Connectivity(String),

    /// The remote service answered with a non-success status
    #[error("Unexpected status {status} from {path}")]
    Status { path: String, status: u16 },

    /// The response body could not be parsed
    #[error("Malformed response from {path}: {reason}")]
    Decode { path: String, reason: String },

    /// Durable slot storage failed to read or write
    #[error("Storage error: {0}")]
    Storage(String),

    /// Product id is not part of the loaded catalog
    #[error("Unknown product: {0}")]
    UnknownProduct(u32),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl StorefrontError {
    /// Returns true when the failure means the service is not reachable at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, StorefrontError::Connectivity(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the storefront core.
pub type Result<T> = std::result::Result<T, StorefrontError>;
