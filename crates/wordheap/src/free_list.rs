//! Word storage and the intrusive free list threaded through it.
//!
//! Word 0 of every block is its size; word 1 of a free block is the index
//! of the next free block. [`NULL`] stands in for "no block" at both ends
//! of the list: asking for the successor of `NULL` yields the list head,
//! and setting it rewrites the head. Head and interior links therefore go
//! through the same code path.

use crate::addr::Word;

/// Sentinel index meaning "no block". Outside every valid arena index.
pub(crate) const NULL: usize = usize::MAX;

/// The arena words plus the free-list head.
#[derive(Clone, Debug)]
pub(crate) struct Arena {
    words: Vec<Word>,
    head: usize,
}

impl Arena {
    /// Take ownership of `words` and format it as one free block.
    ///
    /// Caller guarantees `words.len() >= 2`.
    pub(crate) fn new(words: Vec<Word>) -> Self {
        let mut arena = Self { words, head: NULL };
        arena.format();
        arena
    }

    /// Install a single free block covering the whole arena.
    pub(crate) fn format(&mut self) {
        let len = self.words.len();
        self.set_size(0, len);
        self.set_successor(0, NULL);
        self.set_successor(NULL, 0);
    }

    pub(crate) fn len(&self) -> usize {
        self.words.len()
    }

    pub(crate) fn words(&self) -> &[Word] {
        &self.words
    }

    pub(crate) fn words_mut(&mut self) -> &mut [Word] {
        &mut self.words
    }

    pub(crate) fn into_words(self) -> Vec<Word> {
        self.words
    }

    pub(crate) fn size(&self, block: usize) -> usize {
        self.words[block]
    }

    pub(crate) fn set_size(&mut self, block: usize, size: usize) {
        self.words[block] = size;
    }

    pub(crate) fn successor(&self, block: usize) -> usize {
        if block == NULL {
            self.head
        } else {
            self.words[block + 1]
        }
    }

    pub(crate) fn set_successor(&mut self, block: usize, successor: usize) {
        if block == NULL {
            self.head = successor;
        } else {
            self.words[block + 1] = successor;
        }
    }

    /// Link `block` into the list directly after `predecessor`.
    pub(crate) fn insert_after(&mut self, block: usize, predecessor: usize) {
        // Read the old link before overwriting it.
        self.set_successor(block, self.successor(predecessor));
        self.set_successor(predecessor, block);
    }

    /// First-fit search for a block of at least `needed` words.
    ///
    /// Returns the chosen block's predecessor in the list. On failure returns
    /// the size of the largest free block seen, headers included.
    pub(crate) fn find_fit(&self, needed: usize) -> Result<usize, usize> {
        let mut predecessor = NULL;
        let mut largest = 0;
        loop {
            let block = self.successor(predecessor);
            if block == NULL {
                return Err(largest);
            }
            let size = self.size(block);
            if size >= needed {
                return Ok(predecessor);
            }
            largest = largest.max(size);
            predecessor = block;
        }
    }

    /// Last free block whose index is below `block`, or `NULL`.
    pub(crate) fn last_before(&self, block: usize) -> usize {
        let mut predecessor = NULL;
        loop {
            let next = self.successor(predecessor);
            if next == NULL || next >= block {
                return predecessor;
            }
            predecessor = next;
        }
    }

    /// Merge `second` into `first` if `first` ends exactly where `second`
    /// begins. `second` must be `first`'s list successor. Returns whether a
    /// merge happened.
    pub(crate) fn coalesce(&mut self, first: usize, second: usize) -> bool {
        if first == NULL || second == NULL || first + self.size(first) != second {
            return false;
        }
        let merged = self.size(first) + self.size(second);
        self.set_size(first, merged);
        self.set_successor(first, self.successor(second));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_arena_is_one_free_block() {
        let arena = Arena::new(vec![0; 10]);
        assert_eq!(arena.successor(NULL), 0);
        assert_eq!(arena.size(0), 10);
        assert_eq!(arena.successor(0), NULL);
    }

    #[test]
    fn null_successor_is_the_head() {
        let mut arena = Arena::new(vec![0; 10]);
        arena.set_successor(NULL, 4);
        assert_eq!(arena.successor(NULL), 4);
        // The word at index 0 is untouched by head updates.
        assert_eq!(arena.size(0), 10);
    }

    #[test]
    fn insert_after_null_becomes_head() {
        let mut arena = Arena::new(vec![0; 10]);
        arena.set_size(0, 6);
        arena.set_size(6, 4);
        arena.set_successor(NULL, 6);
        arena.set_successor(6, NULL);

        arena.insert_after(0, NULL);
        assert_eq!(arena.successor(NULL), 0);
        assert_eq!(arena.successor(0), 6);
    }

    #[test]
    fn find_fit_reports_largest_on_failure() {
        let mut arena = Arena::new(vec![0; 10]);
        arena.set_size(0, 3);
        arena.set_size(5, 4);
        arena.set_successor(0, 5);
        arena.set_successor(5, NULL);

        assert_eq!(arena.find_fit(3), Ok(NULL));
        assert_eq!(arena.find_fit(4), Ok(0));
        assert_eq!(arena.find_fit(5), Err(4));
    }

    #[test]
    fn last_before_stops_at_first_higher_block() {
        let mut arena = Arena::new(vec![0; 12]);
        arena.set_size(0, 2);
        arena.set_size(6, 2);
        arena.set_successor(0, 6);
        arena.set_successor(6, NULL);

        assert_eq!(arena.last_before(0), NULL);
        assert_eq!(arena.last_before(3), 0);
        assert_eq!(arena.last_before(8), 6);
    }

    #[test]
    fn coalesce_only_merges_adjacent_blocks() {
        let mut arena = Arena::new(vec![0; 10]);
        arena.set_size(0, 3);
        arena.set_size(3, 2);
        arena.set_size(7, 3);
        arena.set_successor(0, 3);
        arena.set_successor(3, 7);
        arena.set_successor(7, NULL);

        assert!(arena.coalesce(0, 3));
        assert_eq!(arena.size(0), 5);
        assert_eq!(arena.successor(0), 7);

        assert!(!arena.coalesce(0, 7));
        assert!(!arena.coalesce(NULL, 0));
        assert!(!arena.coalesce(7, NULL));
    }
}
