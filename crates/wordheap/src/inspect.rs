//! Read-only views over a [`Heap`]: block walks, statistics and an
//! invariant audit.
//!
//! None of this is needed to allocate or deallocate. It exists for tests,
//! benchmarks and debugging.

use std::error::Error;
use std::fmt;

use crate::free_list::NULL;
use crate::heap::Heap;

/// Whether a block is on the free list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockState {
    /// On the free list.
    Free,
    /// Handed out by `allocate` and not yet returned.
    Allocated,
}

/// One block of the arena as seen by a physical walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockInfo {
    /// Index of the block header.
    pub addr: usize,
    /// Total words, header included.
    pub size: usize,
    /// Free or allocated.
    pub state: BlockState,
}

impl BlockInfo {
    /// Index one past the block's last word.
    pub fn end(&self) -> usize {
        self.addr + self.size
    }
}

/// Snapshot of heap occupancy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Arena length in words.
    pub capacity: usize,
    /// Words in free blocks, headers included.
    pub free_words: usize,
    /// Number of blocks on the free list.
    pub free_blocks: usize,
    /// Largest payload a single allocation could currently receive.
    pub largest_free: usize,
    /// Number of allocated blocks.
    pub allocated_blocks: usize,
    /// Words in allocated blocks, headers and padding included.
    pub allocated_words: usize,
}

/// A broken heap invariant found by [`Heap::check_invariants`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A block header records fewer than two words.
    BlockTooSmall {
        /// Block header index.
        addr: usize,
        /// Recorded size.
        size: usize,
    },
    /// A block runs past the end of the arena.
    BlockOverrun {
        /// Block header index.
        addr: usize,
        /// Recorded size.
        size: usize,
        /// Arena length.
        capacity: usize,
    },
    /// Free-list entries are not in strictly ascending address order.
    FreeListUnordered {
        /// Earlier entry.
        prev: usize,
        /// Entry that should have been larger.
        next: usize,
    },
    /// A free-list link does not point at a block header.
    FreeListDangling {
        /// The bad link target.
        addr: usize,
    },
    /// Two free blocks touch and should have been merged.
    AdjacentFree {
        /// Lower block.
        first: usize,
        /// Block starting where `first` ends.
        second: usize,
    },
    /// The free list never reaches NULL.
    FreeListCycle,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockTooSmall { addr, size } => {
                write!(f, "block at {addr} has size {size}, below the 2-word minimum")
            }
            Self::BlockOverrun {
                addr,
                size,
                capacity,
            } => {
                write!(
                    f,
                    "block at {addr} of size {size} runs past arena end {capacity}"
                )
            }
            Self::FreeListUnordered { prev, next } => {
                write!(f, "free list out of order: {prev} followed by {next}")
            }
            Self::FreeListDangling { addr } => {
                write!(f, "free list links to {addr}, which is not a block header")
            }
            Self::AdjacentFree { first, second } => {
                write!(f, "free blocks at {first} and {second} are adjacent")
            }
            Self::FreeListCycle => write!(f, "free list does not terminate"),
        }
    }
}

impl Error for InvariantViolation {}

/// Physical walk over the arena, lowest address first.
///
/// Created by [`Heap::blocks`]. Stops early on a header that would not
/// advance the walk or runs past the arena.
pub struct Blocks<'a> {
    heap: &'a Heap,
    cursor: usize,
    next_free: usize,
}

impl Iterator for Blocks<'_> {
    type Item = BlockInfo;

    fn next(&mut self) -> Option<BlockInfo> {
        let capacity = self.heap.capacity();
        if self.cursor >= capacity {
            return None;
        }
        let addr = self.cursor;
        let size = self.heap.arena.size(addr);
        let state = if addr == self.next_free {
            self.next_free = if addr + 1 < capacity {
                self.heap.arena.successor(addr)
            } else {
                NULL
            };
            BlockState::Free
        } else {
            BlockState::Allocated
        };
        // Corrupt headers end the walk instead of looping or overrunning.
        self.cursor = match addr.checked_add(size) {
            Some(end) if size > 0 && end <= capacity => end,
            _ => capacity,
        };
        Some(BlockInfo { addr, size, state })
    }
}

/// Walk along the free list in list order.
///
/// Created by [`Heap::free_blocks`]. Bounded by the number of blocks the
/// arena could possibly hold, so a cyclic list still terminates.
pub struct FreeBlocks<'a> {
    heap: &'a Heap,
    current: usize,
    remaining: usize,
}

impl Iterator for FreeBlocks<'_> {
    type Item = BlockInfo;

    fn next(&mut self) -> Option<BlockInfo> {
        if self.current == NULL || self.current >= self.heap.capacity() || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let addr = self.current;
        let size = self.heap.arena.size(addr);
        self.current = if addr + 1 < self.heap.capacity() {
            self.heap.arena.successor(addr)
        } else {
            NULL
        };
        Some(BlockInfo {
            addr,
            size,
            state: BlockState::Free,
        })
    }
}

impl Heap {
    /// Iterate every block in address order.
    pub fn blocks(&self) -> Blocks<'_> {
        Blocks {
            heap: self,
            cursor: 0,
            next_free: self.first_free().unwrap_or(NULL),
        }
    }

    /// Iterate the free list from its head.
    pub fn free_blocks(&self) -> FreeBlocks<'_> {
        FreeBlocks {
            heap: self,
            current: self.first_free().unwrap_or(NULL),
            remaining: self.capacity() / 2,
        }
    }

    /// Occupancy summary computed by walking the arena.
    pub fn stats(&self) -> HeapStats {
        let mut stats = HeapStats {
            capacity: self.capacity(),
            ..HeapStats::default()
        };
        for block in self.blocks() {
            match block.state {
                BlockState::Free => {
                    stats.free_blocks += 1;
                    stats.free_words += block.size;
                    stats.largest_free = stats.largest_free.max(block.size.saturating_sub(1));
                }
                BlockState::Allocated => {
                    stats.allocated_blocks += 1;
                    stats.allocated_words += block.size;
                }
            }
        }
        stats
    }

    /// Verify every structural invariant of the heap.
    ///
    /// Checks that blocks are at least two words and tile the arena exactly,
    /// and that the free list visits only block headers, in strictly
    /// ascending order, with no two entries adjacent.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let capacity = self.capacity();
        let mut headers = Vec::new();
        let mut addr = 0;
        while addr < capacity {
            let size = self.arena.size(addr);
            if size < 2 {
                return Err(InvariantViolation::BlockTooSmall { addr, size });
            }
            match addr.checked_add(size) {
                Some(end) if end <= capacity => {
                    headers.push(addr);
                    addr = end;
                }
                _ => {
                    return Err(InvariantViolation::BlockOverrun {
                        addr,
                        size,
                        capacity,
                    })
                }
            }
        }

        let mut prev: Option<usize> = None;
        let mut current = self.arena.successor(NULL);
        // Every free entry is a distinct header, so a longer walk is a cycle.
        let mut budget = headers.len();
        while current != NULL {
            if budget == 0 {
                return Err(InvariantViolation::FreeListCycle);
            }
            budget -= 1;
            if headers.binary_search(&current).is_err() {
                return Err(InvariantViolation::FreeListDangling { addr: current });
            }
            if let Some(prev) = prev {
                if current <= prev {
                    return Err(InvariantViolation::FreeListUnordered {
                        prev,
                        next: current,
                    });
                }
                if prev + self.arena.size(prev) == current {
                    return Err(InvariantViolation::AdjacentFree {
                        first: prev,
                        second: current,
                    });
                }
            }
            prev = Some(current);
            current = self.arena.successor(current);
        }
        Ok(())
    }
}
