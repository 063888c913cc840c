// 🔑 Identifier Generator - Compact base62 ids
//
// A new id is a uniform random 64-bit value written in base62
// (0-9, A-Z, a-z), most significant symbol first, no padding.
// Example output: "39eWdE8hZJ"
//
// Ids are NOT deduplicated against each other. With 2^64 values the
// collision probability stays negligible for tens of thousands of records.

use rand::seq::SliceRandom;
use rand::RngCore;

const BASE62_CHARS: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

// ============================================================================
// RANDOM SOURCE
// ============================================================================

/// Source of randomness for ids and color shuffles
///
/// Every `rand` generator implements it, so callers pick the source:
/// `StdRng::from_entropy()` in production, `StdRng::seed_from_u64(..)`
/// when output must be reproducible.
pub trait RandomSource {
    fn next_u64(&mut self) -> u64;

    /// Uniformly random permutation, in place
    fn shuffle<T>(&mut self, items: &mut [T]);
}

impl<R: RngCore + ?Sized> RandomSource for R {
    fn next_u64(&mut self) -> u64 {
        RngCore::next_u64(self)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        SliceRandom::shuffle(items, self);
    }
}

// ============================================================================
// ENCODING
// ============================================================================

/// Positional base62 encoding; 0 encodes as "0"
pub fn encode_base62(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    // u64::MAX needs 11 symbols
    let mut digits = Vec::with_capacity(11);
    while value > 0 {
        digits.push(BASE62_CHARS[(value % 62) as usize]);
        value /= 62;
    }
    digits.reverse();

    digits.into_iter().map(char::from).collect()
}

/// Generate a fresh id from `rng`
pub fn generate_id<R: RandomSource + ?Sized>(rng: &mut R) -> String {
    encode_base62(rng.next_u64())
}
