//! Key hashing.
//!
//! [`murmur3_32`] is MurmurHash3 (x86, 32-bit). [`HashKey`] adapts any
//! [`Traits`] value to `Hash + Eq` using [`Traits::hash_key`] and
//! [`Traits::key_equal`], so float-bearing keys can be used in hash maps.

use byteorder::{ByteOrder, LittleEndian};
use core::hash::{Hash, Hasher};

use crate::traits::Traits;

/// Seed used by [`HashKey`].
pub const DEFAULT_SEED: u32 = 1;

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

#[inline]
fn mix_k1(mut k1: u32) -> u32 {
    k1 = k1.wrapping_mul(C1);
    k1 = k1.rotate_left(15);
    k1.wrapping_mul(C2)
}

#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^ (h >> 16)
}

/// MurmurHash3 x86 32-bit over `data`.
///
/// # Example
///
/// ```rust
/// use fz_core::hash::murmur3_32;
///
/// assert_eq!(murmur3_32(&10i32.to_le_bytes(), 1), 0x12ec_2126);
/// ```
#[must_use]
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    let mut h1 = seed;
    let mut blocks = data.chunks_exact(4);

    for block in &mut blocks {
        h1 ^= mix_k1(LittleEndian::read_u32(block));
        h1 = h1.rotate_left(13);
        h1 = h1.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut k1 = 0u32;
        for (i, byte) in tail.iter().enumerate() {
            k1 |= u32::from(*byte) << (8 * i);
        }
        h1 ^= mix_k1(k1);
    }

    // Length is folded in modulo 2^32.
    h1 ^= data.len() as u32;
    fmix32(h1)
}

/// Combine an element hash into a running container hash.
#[inline]
#[must_use]
pub fn combine(seed: u32, value: u32) -> u32 {
    seed ^ value
        .wrapping_add(0x9e37_79b9)
        .wrapping_add(seed << 6)
        .wrapping_add(seed >> 2)
}

/// `Hash + Eq` wrapper over a [`Traits`] value.
///
/// ```rust
/// use std::collections::HashSet;
/// use fz_core::hash::HashKey;
///
/// let mut seen = HashSet::new();
/// assert!(seen.insert(HashKey(f64::NAN)));
/// assert!(!seen.insert(HashKey(f64::NAN)));
/// ```
#[derive(Clone, Debug)]
pub struct HashKey<T>(pub T);

impl<T> HashKey<T> {
    /// Unwrap the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Traits> PartialEq for HashKey<T> {
    fn eq(&self, other: &Self) -> bool {
        T::key_equal(&self.0, &other.0)
    }
}

impl<T: Traits> Eq for HashKey<T> {}

impl<T: Traits> Hash for HashKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.0.hash_key(DEFAULT_SEED));
    }
}
