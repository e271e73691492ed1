//! Heap error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during heap operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeapError {
    /// No free block is large enough for the request. The heap is unchanged.
    OutOfMemory {
        /// Payload words requested.
        requested: usize,
        /// Largest payload any single free block could have served.
        largest_free: usize,
    },
    /// The arena is too small to hold even one free block.
    ArenaTooSmall {
        /// Arena length that was supplied.
        words: usize,
        /// Minimum arena length in words.
        minimum: usize,
    },
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory {
                requested,
                largest_free,
            } => {
                write!(
                    f,
                    "out of memory: requested {requested} words, largest free block holds {largest_free}"
                )
            }
            Self::ArenaTooSmall { words, minimum } => {
                write!(f, "arena of {words} words is too small (minimum {minimum})")
            }
        }
    }
}

impl Error for HeapError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_memory_message_names_sizes() {
        let err = HeapError::OutOfMemory {
            requested: 5,
            largest_free: 2,
        };
        assert_eq!(
            err.to_string(),
            "out of memory: requested 5 words, largest free block holds 2"
        );
    }

    #[test]
    fn arena_too_small_message() {
        let err = HeapError::ArenaTooSmall {
            words: 1,
            minimum: 2,
        };
        assert_eq!(err.to_string(), "arena of 1 words is too small (minimum 2)");
    }
}
