//! The first-fit heap.
//!
//! [`Heap`] is the only stateful type in the crate. It owns the arena and
//! exposes the two primary operations, [`Heap::allocate`] and
//! [`Heap::deallocate`], plus read/write access to allocated payloads.

use crate::addr::{Addr, Word};
use crate::config::HeapConfig;
use crate::error::HeapError;
use crate::free_list::{Arena, NULL};

/// A fixed-size heap with first-fit placement and eager coalescing.
///
/// Placement is deterministic: for a given sequence of calls the returned
/// addresses are always the same, because the free list is kept in address
/// order and scanned from the front.
///
/// The heap is not internally synchronised. Mutating operations take
/// `&mut self`; share across threads behind the caller's own lock.
#[derive(Clone, Debug)]
pub struct Heap {
    pub(crate) arena: Arena,
}

impl Heap {
    /// Create a heap over a fresh zeroed arena of `arena_words` words.
    ///
    /// # Panics
    ///
    /// Panics if `arena_words` is below [`HeapConfig::MIN_ARENA_WORDS`].
    /// Use [`Heap::with_config`] for a fallible constructor.
    pub fn new(arena_words: usize) -> Self {
        assert!(
            arena_words >= HeapConfig::MIN_ARENA_WORDS,
            "arena of {arena_words} words cannot hold a free block"
        );
        Self {
            arena: Arena::new(vec![0; arena_words]),
        }
    }

    /// Create a heap from a validated config.
    pub fn with_config(config: HeapConfig) -> Result<Self, HeapError> {
        config.validate()?;
        Ok(Self {
            arena: Arena::new(vec![0; config.arena_words]),
        })
    }

    /// Manage a caller-supplied buffer.
    ///
    /// The buffer's length becomes the arena size. Its first two words are
    /// overwritten by the initial free block; the rest is left as-is.
    pub fn from_arena(words: Vec<Word>) -> Result<Self, HeapError> {
        HeapConfig::new(words.len()).validate()?;
        Ok(Self {
            arena: Arena::new(words),
        })
    }

    /// Allocate `request` contiguous payload words.
    ///
    /// Returns the address of the first payload word. The block is taken
    /// from the lowest-address free block that fits; any tail of two or
    /// more words is split off and stays free. A single leftover word is
    /// kept inside the allocation as padding.
    ///
    /// `request` must be non-zero.
    ///
    /// # Errors
    ///
    /// [`HeapError::OutOfMemory`] if no free block can hold `request + 1`
    /// words. The heap is not modified.
    pub fn allocate(&mut self, request: usize) -> Result<Addr, HeapError> {
        debug_assert!(request > 0, "zero-word allocation");
        let needed = request.saturating_add(1);

        let predecessor = self.arena.find_fit(needed).map_err(|largest| {
            tracing::debug!(requested = request, largest_block = largest, "allocation failed");
            HeapError::OutOfMemory {
                requested: request,
                largest_free: largest.saturating_sub(1),
            }
        })?;
        let block = self.arena.successor(predecessor);

        self.trim(block, needed);
        // Unlink the chosen block.
        self.arena
            .set_successor(predecessor, self.arena.successor(block));

        let addr = Addr::of_block(block);
        tracing::trace!(
            addr = addr.get(),
            requested = request,
            block_words = self.arena.size(block),
            "allocated"
        );
        Ok(addr)
    }

    /// Split `block` down to `needed` words when the remainder can stand as
    /// a free block of its own.
    fn trim(&mut self, block: usize, needed: usize) {
        let unused = self.arena.size(block) - needed;
        if unused > 1 {
            let tail = block + needed;
            self.arena.set_size(tail, unused);
            self.arena.set_size(block, needed);
            self.arena.insert_after(tail, block);
        } else if unused == 1 {
            tracing::debug!(block, "granting padding word");
        }
    }

    /// Return a block to the heap.
    ///
    /// `addr` must have been returned by [`Heap::allocate`] and not been
    /// deallocated since. Anything else leaves the heap in an unspecified
    /// state; no validation is performed in release builds.
    ///
    /// The block is merged with an adjacent free successor first, then with
    /// an adjacent free predecessor.
    pub fn deallocate(&mut self, addr: Addr) {
        debug_assert!(
            addr.get() >= 1 && addr.get() < self.arena.len(),
            "address {addr} outside arena"
        );
        let block = addr.header();
        let predecessor = self.arena.last_before(block);
        debug_assert!(
            self.arena.successor(predecessor) != block,
            "double free of {addr}"
        );

        self.arena.insert_after(block, predecessor);
        let forward = self.arena.coalesce(block, self.arena.successor(block));
        let backward = self.arena.coalesce(predecessor, block);
        tracing::trace!(addr = addr.get(), forward, backward, "deallocated");
    }

    /// Return every block to the free list.
    ///
    /// All outstanding addresses become invalid.
    pub fn reset(&mut self) {
        self.arena.format();
    }

    /// Arena length in words.
    pub fn capacity(&self) -> usize {
        self.arena.len()
    }

    /// The whole arena, headers and free-list links included.
    pub fn words(&self) -> &[Word] {
        self.arena.words()
    }

    /// Total words of the block at `addr`, its header included.
    ///
    /// `addr` must be a live allocation.
    pub fn block_size(&self, addr: Addr) -> usize {
        self.arena.size(addr.header())
    }

    /// Payload words of the allocated block at `addr`.
    ///
    /// Spans `block_size(addr) - 1` words, which may be one more than was
    /// requested when a padding word was granted.
    ///
    /// # Panics
    ///
    /// Panics if the block's header points outside the arena, which can
    /// only happen for an address that is not a live allocation.
    pub fn payload(&self, addr: Addr) -> &[Word] {
        let end = addr.header() + self.block_size(addr);
        &self.arena.words()[addr.get()..end]
    }

    /// Mutable payload words of the allocated block at `addr`.
    ///
    /// # Panics
    ///
    /// Same conditions as [`Heap::payload`].
    pub fn payload_mut(&mut self, addr: Addr) -> &mut [Word] {
        let end = addr.header() + self.block_size(addr);
        &mut self.arena.words_mut()[addr.get()..end]
    }

    /// Give the arena back, consuming the heap.
    pub fn into_arena(self) -> Vec<Word> {
        self.arena.into_words()
    }

    /// Head of the free list, or `None` when every word is allocated.
    pub(crate) fn first_free(&self) -> Option<usize> {
        match self.arena.successor(NULL) {
            NULL => None,
            block => Some(block),
        }
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new(HeapConfig::DEFAULT_ARENA_WORDS)
    }
}
