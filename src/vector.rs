//! Test vectors fed to the popcount benchmarks.

use rand::Rng;

/// Hand-picked values from single digits up to ~2^54, each class with a
/// different density of set bits.
pub const CANONICAL: [u64; 13] = [
    7,
    47,
    223,
    3967,
    16127,
    1046527,
    16769023,
    1073676287,
    68718952447,
    274876858367,
    4398042316799,
    1125899839733759,
    18014398241046527,
];

/// Builds the input for one benchmark configuration. A size of zero selects the
/// canonical vector; anything else draws fresh values from the thread RNG, so
/// runs are comparable by distribution only.
pub fn test_numbers(size: usize) -> Vec<u64> {
    test_numbers_with(&mut rand::thread_rng(), size)
}

pub fn test_numbers_with<R: Rng>(rng: &mut R, size: usize) -> Vec<u64> {
    if size == 0 {
        return CANONICAL.to_vec();
    }
    (0..size).map(|_| rng.gen::<u64>()).collect()
}
