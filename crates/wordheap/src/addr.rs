//! Arena words and payload addresses.
//!
//! Addresses are plain indices into the arena. An [`Addr`] always names the
//! first payload word of an allocated block, one past its size header.

use std::fmt;

/// The arena's native storage unit.
///
/// Block headers, free-list links and caller payload all share this width.
pub type Word = usize;

/// Index of the first payload word of an allocated block.
///
/// Returned by [`Heap::allocate`](crate::Heap::allocate) and consumed by
/// [`Heap::deallocate`](crate::Heap::deallocate). Because every block has a
/// header at the preceding index, a valid `Addr` is never zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Addr(pub usize);

impl Addr {
    /// The raw word index.
    pub fn get(self) -> usize {
        self.0
    }

    /// Index of the block header that precedes this payload.
    pub(crate) fn header(self) -> usize {
        self.0 - 1
    }

    /// Payload address of the block whose header sits at `block`.
    pub(crate) fn of_block(block: usize) -> Self {
        Self(block + 1)
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for Addr {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

impl From<Addr> for usize {
    fn from(addr: Addr) -> Self {
        addr.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_one_before_payload() {
        let addr = Addr::of_block(5);
        assert_eq!(addr, Addr(6));
        assert_eq!(addr.header(), 5);
    }

    #[test]
    fn display_prints_raw_index() {
        assert_eq!(Addr(42).to_string(), "42");
    }

    #[test]
    fn converts_both_ways() {
        let addr: Addr = 7usize.into();
        let raw: usize = addr.into();
        assert_eq!(raw, 7);
        assert_eq!(addr.get(), 7);
    }
}
