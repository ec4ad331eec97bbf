//! Helper functions shared across modules

/// Derives the stream id at `index` from `seed` using the splitmix64
/// finalizer, so that every (seed, index) pair maps to an independent-looking
/// RNG seed regardless of how close the inputs are.
pub(crate) fn mix_seed(seed: u64, index: u64) -> u64 {
    let mut z = seed.wrapping_add(index.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
