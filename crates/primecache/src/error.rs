//! Error types for primecache

use std::fmt;

/// Result type alias for primecache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a table or cache.
///
/// Lookups, inserts and removals never fail: a missing key is reported
/// through the return value, and a broken internal invariant panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Requested initial bucket count cannot hold an empty table
    InvalidBucketSize(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidBucketSize(size) => write!(
                f,
                "Invalid initial bucket size: {} (must resolve to a prime below 100)",
                size
            ),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidBucketSize(150);
        assert!(err.to_string().contains("150"));
    }
}
