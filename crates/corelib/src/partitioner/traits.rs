//! Core partitioner trait definitions.

use crate::token::Token;

/// A partitioner converts keys into tokens for placement on the hash ring.
///
/// Partitioners are pure: the same input always produces the same token,
/// across calls and across process runs.
pub trait Partitioner: Send + Sync + 'static {
    /// The token type produced by this partitioner.
    type TokenType: Token;

    /// Converts a key into a token.
    fn partition(&self, key: &[u8]) -> Self::TokenType;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;

    /// Converts a string key (its UTF-8 bytes) into a token.
    fn position(&self, key: &str) -> Self::TokenType {
        self.partition(key.as_bytes())
    }
}
