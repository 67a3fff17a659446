//! Seeded PCG32 streams for diagnostic decoding.
//!
//! Encoding never draws randomness. The partial cell decode does, and a
//! replayable diagnostic run needs the same stream for the same seed and
//! index, so seeds are derived with BLAKE3 from the base seed and the index
//! being decoded.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::index::EncodedIndex;

/// PCG32 stream for a 32-bit seed; the seed fills both halves of the
/// 64-bit state seed.
pub fn create_rng(seed: u32) -> Pcg32 {
    Pcg32::seed_from_u64(u64::from(seed) * 0x1_0000_0001)
}

/// Derives the decode seed for one index from a base seed.
///
/// Hashes the base seed, the radix and the three digits (all little-endian)
/// and keeps the first four bytes of the digest.
pub fn derive_decode_seed(base_seed: u32, index: &EncodedIndex) -> u32 {
    let mut input = Vec::with_capacity(20);
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(&index.radix().to_le_bytes());
    for digit in index.digits() {
        input.extend_from_slice(&digit.to_le_bytes());
    }

    let hash = blake3::hash(&input);
    let bytes = hash.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Creates the RNG for decoding `index` under `base_seed`.
pub fn create_decode_rng(base_seed: u32, index: &EncodedIndex) -> Pcg32 {
    create_rng(derive_decode_seed(base_seed, index))
}
