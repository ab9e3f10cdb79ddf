//! MD5 partitioner implementation.

use crate::partitioner::traits::Partitioner;
use crate::token::md5::Md5Token;

/// MD5 partitioner, the default for every ring in this workspace.
#[derive(Clone, Copy, Debug, Default)]
pub struct Md5Partitioner;

impl Partitioner for Md5Partitioner {
    type TokenType = Md5Token;

    fn partition(&self, key: &[u8]) -> Self::TokenType {
        Md5Token::from_bytes(key)
    }

    fn name(&self) -> &'static str {
        "Md5Partitioner"
    }
}
