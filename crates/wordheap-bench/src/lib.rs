//! Benchmark workloads for wordheap.
//!
//! Provides seeded, reproducible [`Op`] scripts:
//!
//! - [`churn_workload`]: random mix of allocations and frees
//! - [`fragmenting_workload`]: fill the heap, then free every other block
//! - [`steady_state`]: pre-warmed heap plus a churn script to run on it

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wordheap_test_utils::{Op, Replay};

/// Random allocate/free mix with requests in `1..=max_request` words.
///
/// Roughly 60% allocations. The same seed always yields the same script.
pub fn churn_workload(seed: u64, len: usize, max_request: usize) -> Vec<Op> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            if rng.next_u32() % 10 < 6 {
                Op::Alloc(1 + rng.next_u32() as usize % max_request)
            } else {
                Op::Free(rng.next_u32() as usize)
            }
        })
        .collect()
}

/// Allocate `blocks` blocks of `request` words, then free every second one.
///
/// Leaves a long free list of equally sized holes, the worst case for a
/// first-fit scan looking for something bigger.
pub fn fragmenting_workload(blocks: usize, request: usize) -> Vec<Op> {
    let mut ops: Vec<Op> = (0..blocks).map(|_| Op::Alloc(request)).collect();
    // Each free shifts later live indices down by one.
    ops.extend((0..blocks / 2).map(Op::Free));
    ops
}

/// A heap warmed up with `warmup` churn ops, and a further `len` ops to
/// measure against it.
pub fn steady_state(seed: u64, arena_words: usize, warmup: usize, len: usize) -> (Replay, Vec<Op>) {
    let mut replay = Replay::new(arena_words);
    replay.run(&churn_workload(seed, warmup, 64));
    let ops = churn_workload(seed.wrapping_add(1), len, 64);
    (replay, ops)
}
