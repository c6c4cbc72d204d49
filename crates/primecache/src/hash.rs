//! Key hashing

/// Prime-weighted sum of a key's characters.
///
/// Character `i` is multiplied by `primes[i]`, so permutations of the same
/// characters spread over different buckets. Keys longer than the table
/// reuse the weights from the start. Not collision resistant.
pub fn prime_weighted_hash(key: &str, primes: &[u64]) -> u64 {
    key.chars()
        .zip(primes.iter().cycle())
        .fold(0u64, |hash, (c, &weight)| {
            hash.wrapping_add(weight.wrapping_mul(c as u64))
        })
}
