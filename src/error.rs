//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for stores and the registry.
///
/// A missing or expired key is never an error; lookups report it as `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Malformed input, such as a negative or unrepresentable TTL
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No cache is registered under the requested name
    #[error("Cache not found: {0}")]
    NotFound(String),

    /// Backend failure; never raised by the in-memory store
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
