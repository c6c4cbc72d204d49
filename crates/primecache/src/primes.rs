//! Precomputed prime table
//!
//! The table serves two purposes: per-position weights for the key hash, and
//! the candidate bucket counts the index resizes to. It is sieved once on
//! first use and shared read-only afterwards.

use std::sync::OnceLock;

/// Number of primes in the table
pub const PRIME_COUNT: usize = 10_000;

/// The 10 000th prime; sieving up to it yields exactly `PRIME_COUNT` primes
const SIEVE_LIMIT: usize = 104_729;

static PRIMES: OnceLock<Box<[u64]>> = OnceLock::new();

/// Ascending table of the first `PRIME_COUNT` primes
pub fn primes() -> &'static [u64] {
    PRIMES.get_or_init(sieve)
}

fn sieve() -> Box<[u64]> {
    let mut composite = vec![false; SIEVE_LIMIT + 1];
    let mut primes = Vec::with_capacity(PRIME_COUNT);

    for n in 2..=SIEVE_LIMIT {
        if composite[n] {
            continue;
        }
        primes.push(n as u64);

        let mut multiple = n * n;
        while multiple <= SIEVE_LIMIT {
            composite[multiple] = true;
            multiple += n;
        }
    }

    debug_assert_eq!(primes.len(), PRIME_COUNT);
    primes.into_boxed_slice()
}

/// Resolve a minimum bucket count to the count actually allocated.
///
/// Returns the smallest prime `>= target`. Past the end of the table the
/// result degrades to the smallest even number `>= target`.
pub fn bucket_size_for(primes: &[u64], target: usize) -> usize {
    let pos = primes.partition_point(|&p| p < target as u64);
    match primes.get(pos) {
        Some(&prime) => prime as usize,
        None => target.next_multiple_of(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        let table = primes();

        assert_eq!(table.len(), PRIME_COUNT);
        assert_eq!(&table[..10], &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert_eq!(table[PRIME_COUNT - 1], 104_729);
        assert!(table.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_table_is_shared() {
        assert!(std::ptr::eq(primes(), primes()));
    }

    #[test]
    fn test_bucket_size_exact_and_next_prime() {
        let table = primes();

        assert_eq!(bucket_size_for(table, 0), 2);
        assert_eq!(bucket_size_for(table, 2), 2);
        assert_eq!(bucket_size_for(table, 4), 5);
        assert_eq!(bucket_size_for(table, 97), 97);
        assert_eq!(bucket_size_for(table, 98), 101);
        assert_eq!(bucket_size_for(table, 136), 137);
        assert_eq!(bucket_size_for(table, 104_729), 104_729);
    }

    #[test]
    fn test_bucket_size_even_fallback() {
        let table = primes();

        assert_eq!(bucket_size_for(table, 104_730), 104_730);
        assert_eq!(bucket_size_for(table, 104_731), 104_732);
        assert_eq!(bucket_size_for(table, 2_000_001), 2_000_002);
    }
}
