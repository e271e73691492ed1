//! Proptest strategies for generating heap workloads.

use proptest::prelude::*;

use crate::Op;

/// A single op: allocations of `1..=max_request` words, or a free of any
/// live index. Allocations are weighted slightly higher so heaps fill up.
pub fn op(max_request: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (1..=max_request).prop_map(Op::Alloc),
        2 => any::<usize>().prop_map(Op::Free),
    ]
}

/// A script of up to `max_len` ops.
pub fn script(max_request: usize, max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(op(max_request), 0..max_len)
}

/// Arena sizes worth exercising: tiny arenas hit exhaustion and padding
/// paths, larger ones build long free lists.
pub fn arena_words() -> impl Strategy<Value = usize> {
    prop_oneof![2usize..16, 16usize..256]
}
