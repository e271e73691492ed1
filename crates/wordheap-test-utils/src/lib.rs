//! Test utilities for wordheap development.
//!
//! Provides scripted operation sequences ([`Op`]), a [`Replay`] driver
//! that keeps track of live allocations so scripts stay valid, a
//! [`ModelHeap`] reference implementation to cross-check placement, and
//! proptest strategies in [`strategies`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod model;
pub mod strategies;

pub use model::ModelHeap;

use wordheap::{Addr, Heap, HeapError};

/// One step of a scripted workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Request this many payload words.
    Alloc(usize),
    /// Free a live allocation, chosen by index modulo the live count.
    Free(usize),
}

/// What happened when an [`Op`] was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Allocated(Addr),
    OutOfMemory,
    Freed(Addr),
    /// A `Free` with nothing live to free.
    Skipped,
}

/// Drives a [`Heap`] through a script, remembering live addresses.
///
/// `Free(i)` always targets a live allocation, so a replayed script never
/// violates the heap's preconditions.
#[derive(Clone)]
pub struct Replay {
    pub heap: Heap,
    live: Vec<Addr>,
}

impl Replay {
    pub fn new(arena_words: usize) -> Self {
        Self {
            heap: Heap::new(arena_words),
            live: Vec::new(),
        }
    }

    pub fn apply(&mut self, op: Op) -> Outcome {
        match op {
            Op::Alloc(n) => match self.heap.allocate(n) {
                Ok(addr) => {
                    self.live.push(addr);
                    Outcome::Allocated(addr)
                }
                Err(HeapError::OutOfMemory { .. }) => Outcome::OutOfMemory,
                Err(other) => panic!("unexpected allocation error: {other}"),
            },
            Op::Free(i) => {
                if self.live.is_empty() {
                    return Outcome::Skipped;
                }
                let addr = self.live.remove(i % self.live.len());
                self.heap.deallocate(addr);
                Outcome::Freed(addr)
            }
        }
    }

    /// Apply every op in order and collect the outcomes.
    pub fn run(&mut self, ops: &[Op]) -> Vec<Outcome> {
        ops.iter().map(|&op| self.apply(op)).collect()
    }

    /// Addresses currently allocated, in allocation order.
    pub fn live(&self) -> &[Addr] {
        &self.live
    }

    /// Free everything still live, oldest first.
    pub fn drain(&mut self) {
        for addr in self.live.drain(..) {
            self.heap.deallocate(addr);
        }
    }
}

/// Run `ops` against a fresh heap of `arena_words` and return the outcomes.
pub fn replay(arena_words: usize, ops: &[Op]) -> Vec<Outcome> {
    Replay::new(arena_words).run(ops)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_without_live_is_skipped() {
        let mut replay = Replay::new(10);
        assert_eq!(replay.apply(Op::Free(3)), Outcome::Skipped);
    }

    #[test]
    fn free_index_wraps_over_live_set() {
        let mut replay = Replay::new(20);
        replay.run(&[Op::Alloc(2), Op::Alloc(2)]);
        assert_eq!(replay.apply(Op::Free(3)), Outcome::Freed(Addr(4)));
        assert_eq!(replay.live(), &[Addr(1)]);
    }

    #[test]
    fn drain_returns_heap_to_one_block() {
        let mut replay = Replay::new(32);
        replay.run(&[Op::Alloc(3), Op::Alloc(7), Op::Alloc(1), Op::Free(1)]);
        replay.drain();
        assert_eq!(replay.heap.stats().free_blocks, 1);
        assert_eq!(replay.heap.stats().free_words, 32);
    }
}
