//! First-fit explicit allocation over a fixed arena of words.
//!
//! A [`Heap`] owns a flat `Vec<Word>` and hands out contiguous runs of it
//! by address. Bookkeeping lives inside the arena itself: every block
//! starts with a one-word size header, and free blocks additionally carry
//! a link to the next free block, forming an intrusive singly linked list
//! kept in ascending address order.
//!
//! # Layout
//!
//! ```text
//! allocated block:  [ size | payload ... payload ]
//! free block:       [ size | next    | unused ... ]
//! ```
//!
//! `allocate` walks the free list and takes the first block that fits,
//! splitting off the tail when at least two words would remain. `deallocate`
//! reinserts the block at its sorted position and merges it with any
//! address-adjacent free neighbour, so no two free blocks are ever adjacent.
//!
//! # Preconditions
//!
//! The primary operations do not validate their inputs. Requesting zero
//! words, or deallocating an address that was not returned by
//! [`Heap::allocate`] (or was already deallocated), leaves the heap in an
//! unspecified state. Debug builds catch the cheap cases with assertions;
//! [`Heap::check_invariants`] can be used to audit the heap in tests.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod addr;
pub mod config;
pub mod error;
mod free_list;
pub mod heap;
pub mod inspect;

// Public re-exports for the primary API surface.
pub use addr::{Addr, Word};
pub use config::HeapConfig;
pub use error::HeapError;
pub use heap::Heap;
pub use inspect::{BlockInfo, BlockState, HeapStats, InvariantViolation};
