//! Block identity type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte block identity.
///
/// Identities order lexicographically by byte, and bits are numbered from the
/// most significant bit of the first byte, so a block whose bit `i` is zero
/// sorts before a block that shares its first `i` bits but has bit `i` set.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId([u8; 32]);

impl Default for BlockId {
    fn default() -> Self {
        Self::ZERO
    }
}

impl BlockId {
    pub const ZERO: Self = Self([0u8; 32]);

    /// Number of addressable bits in an identity.
    pub const NUM_BITS: usize = 256;

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Value (0 or 1) of bit `i`, most significant bit first.
    ///
    /// # Panics
    /// Panics if `i >= 256`.
    pub fn bit(&self, i: usize) -> usize {
        let byte = self.0[i / 8];
        ((byte >> (7 - (i % 8))) & 1) as usize
    }

    /// Index of the first bit in `[start, end)` where `self` and `other`
    /// differ, or `None` when they agree on the whole range.
    pub fn first_difference(&self, start: usize, end: usize, other: &BlockId) -> Option<usize> {
        (start..end.min(Self::NUM_BITS)).find(|&i| self.bit(i) != other.bit(i))
    }

    /// Whether `self` and `other` agree on every bit in `[start, end)`.
    pub fn equal_subset(&self, start: usize, end: usize, other: &BlockId) -> bool {
        self.first_difference(start, end, other).is_none()
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "\u{2026})")
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
