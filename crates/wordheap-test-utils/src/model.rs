//! Reference model of first-fit placement.
//!
//! [`ModelHeap`] keeps an explicit `Vec` of blocks instead of threading a
//! list through the arena. It is slow and obviously correct, which makes it
//! a good oracle for the real heap's addresses.

use wordheap::{Addr, BlockInfo, BlockState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Span {
    start: usize,
    size: usize,
    free: bool,
}

/// Explicit block-vector model of a first-fit heap.
#[derive(Clone, Debug)]
pub struct ModelHeap {
    spans: Vec<Span>,
}

impl ModelHeap {
    pub fn new(arena_words: usize) -> Self {
        Self {
            spans: vec![Span {
                start: 0,
                size: arena_words,
                free: true,
            }],
        }
    }

    /// First-fit allocation. `None` when nothing fits.
    pub fn allocate(&mut self, request: usize) -> Option<Addr> {
        let needed = request + 1;
        let idx = self.spans.iter().position(|s| s.free && s.size >= needed)?;
        let span = self.spans[idx];
        let unused = span.size - needed;
        if unused > 1 {
            self.spans[idx].size = needed;
            self.spans.insert(
                idx + 1,
                Span {
                    start: span.start + needed,
                    size: unused,
                    free: true,
                },
            );
        }
        self.spans[idx].free = false;
        Some(Addr(span.start + 1))
    }

    /// Free the block at `addr` and merge with free neighbours.
    ///
    /// # Panics
    ///
    /// Panics if `addr` does not name an allocated block.
    pub fn deallocate(&mut self, addr: Addr) {
        let start = addr.get() - 1;
        let mut idx = self
            .spans
            .iter()
            .position(|s| s.start == start && !s.free)
            .unwrap_or_else(|| panic!("model: {addr} is not allocated"));
        self.spans[idx].free = true;

        if idx + 1 < self.spans.len() && self.spans[idx + 1].free {
            let next = self.spans.remove(idx + 1);
            self.spans[idx].size += next.size;
        }
        if idx > 0 && self.spans[idx - 1].free {
            let cur = self.spans.remove(idx);
            idx -= 1;
            self.spans[idx].size += cur.size;
        }
    }

    /// Blocks in address order, in the same shape `Heap::blocks` yields.
    pub fn blocks(&self) -> Vec<BlockInfo> {
        self.spans
            .iter()
            .map(|s| BlockInfo {
                addr: s.start,
                size: s.size,
                state: if s.free {
                    BlockState::Free
                } else {
                    BlockState::Allocated
                },
            })
            .collect()
    }

    pub fn free_words(&self) -> usize {
        self.spans.iter().filter(|s| s.free).map(|s| s.size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_matches_hand_worked_layout() {
        let mut model = ModelHeap::new(10);
        assert_eq!(model.allocate(4), Some(Addr(1)));
        assert_eq!(model.allocate(2), Some(Addr(6)));
        model.deallocate(Addr(1));
        model.deallocate(Addr(6));
        assert_eq!(model.blocks().len(), 1);
        assert_eq!(model.allocate(9), Some(Addr(1)));
        assert_eq!(model.allocate(1), None);
    }

    #[test]
    fn model_keeps_padding_word() {
        let mut model = ModelHeap::new(10);
        model.allocate(8);
        assert_eq!(model.blocks()[0].size, 10);
        assert_eq!(model.free_words(), 0);
    }
}
