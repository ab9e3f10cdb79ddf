//! MD5-derived ring positions.

use std::fmt;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::token::traits::Token;

/// Ring position taken from the first 8 bytes of an MD5 digest.
///
/// The bytes are assembled big-endian into a signed 64-bit integer, so
/// positions may be negative. The ring orders them as signed values.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Md5Token(pub i64);

impl Token for Md5Token {
    fn min_value() -> Self {
        Md5Token(i64::MIN)
    }

    fn max_value() -> Self {
        Md5Token(i64::MAX)
    }

    fn distance_to(&self, other: &Self) -> u64 {
        // Two's-complement subtraction is exactly the clockwise arc.
        other.0.wrapping_sub(self.0) as u64
    }
}

impl Md5Token {
    /// Creates a token from a byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        let digest = Md5::digest(data);
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        Md5Token(i64::from_be_bytes(prefix))
    }

    /// Creates a token from a string key (UTF-8 bytes).
    pub fn from_key(key: &str) -> Self {
        Self::from_bytes(key.as_bytes())
    }

    /// Absolute value of the position, with `i64::MIN` mapped to 0.
    ///
    /// `i64::MIN` has no positive counterpart, so negating it would overflow.
    pub fn non_negative(&self) -> u64 {
        non_negative(self.0)
    }
}

/// `|value|`, except `i64::MIN` which yields 0.
pub fn non_negative(value: i64) -> u64 {
    if value == i64::MIN {
        0
    } else {
        value.unsigned_abs()
    }
}

impl fmt::Display for Md5Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0 as u64)
    }
}
