//! Error types for the core library.
//!
//! Lookups and membership changes never fail. Errors are reserved for
//! configuration that makes no sense and is rejected at construction time.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Replication factor must be at least one.
    #[error("invalid replication factor: {0} (must be at least 1)")]
    InvalidReplicationFactor(usize),
    /// Invalid ring configuration
    #[error("invalid ring configuration: {0}")]
    InvalidConfig(String),
}
