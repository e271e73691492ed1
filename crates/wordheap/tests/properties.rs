//! Property tests: invariants hold after every call, and placement agrees
//! with an independent block-vector model.

use proptest::prelude::*;
use wordheap::{BlockState, Heap};
use wordheap_test_utils::strategies::{arena_words, script};
use wordheap_test_utils::{ModelHeap, Op, Outcome, Replay};

proptest! {
    #[test]
    fn invariants_hold_between_calls(
        words in arena_words(),
        ops in script(24, 64),
    ) {
        let mut replay = Replay::new(words);
        for op in ops {
            replay.apply(op);
            prop_assert_eq!(replay.heap.check_invariants(), Ok(()));
            let total: usize = replay.heap.blocks().map(|b| b.size).sum();
            prop_assert_eq!(total, words);
        }
    }

    #[test]
    fn placement_matches_model(
        words in arena_words(),
        ops in script(24, 64),
    ) {
        let mut replay = Replay::new(words);
        let mut model = ModelHeap::new(words);
        for op in ops {
            match replay.apply(op) {
                Outcome::Allocated(addr) => {
                    let Op::Alloc(n) = op else { unreachable!() };
                    prop_assert_eq!(model.allocate(n), Some(addr));
                }
                Outcome::OutOfMemory => {
                    let Op::Alloc(n) = op else { unreachable!() };
                    prop_assert_eq!(model.allocate(n), None);
                }
                Outcome::Freed(addr) => model.deallocate(addr),
                Outcome::Skipped => {}
            }
            let blocks: Vec<_> = replay.heap.blocks().collect();
            prop_assert_eq!(blocks, model.blocks());
        }
    }

    #[test]
    fn allocate_then_free_restores_free_words(
        words in arena_words(),
        ops in script(16, 32),
        request in 1usize..32,
    ) {
        let mut replay = Replay::new(words);
        replay.run(&ops);
        let before = replay.heap.stats();
        if let Ok(addr) = replay.heap.allocate(request) {
            replay.heap.deallocate(addr);
            let after = replay.heap.stats();
            prop_assert_eq!(after.free_words, before.free_words);
            prop_assert_eq!(after.free_blocks, before.free_blocks);
        } else {
            // A failed request must not have touched anything.
            prop_assert_eq!(replay.heap.stats(), before);
        }
    }

    #[test]
    fn draining_always_leaves_one_free_block(
        words in arena_words(),
        ops in script(24, 64),
    ) {
        let mut replay = Replay::new(words);
        replay.run(&ops);
        replay.drain();
        let blocks: Vec<_> = replay.heap.blocks().collect();
        prop_assert_eq!(blocks.len(), 1);
        prop_assert_eq!(blocks[0].size, words);
        prop_assert_eq!(blocks[0].state, BlockState::Free);
    }

    #[test]
    fn payloads_never_overlap(
        words in 16usize..128,
        ops in script(12, 48),
    ) {
        let mut replay = Replay::new(words);
        replay.run(&ops);
        let mut heap: Heap = replay.heap.clone();
        // Stamp every live payload with its address, then read them back.
        for &addr in replay.live() {
            heap.payload_mut(addr).fill(addr.get());
        }
        for &addr in replay.live() {
            prop_assert!(heap.payload(addr).iter().all(|&w| w == addr.get()));
        }
    }
}
