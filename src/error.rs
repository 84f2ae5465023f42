//! Error types for the cache library
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key is empty
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// TTL is zero
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// Cache configuration cannot be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Stored value has a different type than the one requested
    #[error("Type mismatch for key '{key}': expected {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    /// Key parameters could not be turned into a key
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache library.
pub type Result<T> = std::result::Result<T, CacheError>;
