use thiserror::Error;

/// Errors returned when constructing a [`HashTable`].
///
/// Lookups and removals of absent keys are not errors; they report through
/// `Option` and `bool` results instead.
///
/// [`HashTable`]: crate::HashTable
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested bucket count was zero.
    #[error("hash table capacity must be at least 1, got {capacity}")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },
}

/// Result type for fallible hash table operations.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn invalid_capacity_message() {
        let err = Error::InvalidCapacity { capacity: 0 };
        assert_eq!(
            err.to_string(),
            "hash table capacity must be at least 1, got 0"
        );
    }
}
