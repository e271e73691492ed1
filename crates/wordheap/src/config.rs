//! Heap configuration parameters.

use crate::error::HeapError;

/// Configuration for a [`Heap`](crate::Heap).
///
/// The arena size is fixed for the heap's lifetime. Validated at
/// construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeapConfig {
    /// Length of the arena in words, headers included.
    ///
    /// Default: 4096. Must be at least [`HeapConfig::MIN_ARENA_WORDS`] so the
    /// initial free block can hold its size header and free-list link.
    pub arena_words: usize,
}

impl HeapConfig {
    /// Default arena length in words.
    pub const DEFAULT_ARENA_WORDS: usize = 4096;

    /// Smallest arena that can hold one free block (header + link).
    pub const MIN_ARENA_WORDS: usize = 2;

    /// Create a config for an arena of `arena_words` words.
    pub fn new(arena_words: usize) -> Self {
        Self { arena_words }
    }

    /// Check that the arena can hold at least one free block.
    pub fn validate(&self) -> Result<(), HeapError> {
        if self.arena_words < Self::MIN_ARENA_WORDS {
            return Err(HeapError::ArenaTooSmall {
                words: self.arena_words,
                minimum: Self::MIN_ARENA_WORDS,
            });
        }
        Ok(())
    }

    /// Arena size in bytes on the host.
    pub fn arena_bytes(&self) -> usize {
        self.arena_words * std::mem::size_of::<crate::Word>()
    }
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ARENA_WORDS)
    }
}
