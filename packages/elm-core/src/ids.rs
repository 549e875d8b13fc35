//! Handler identity, addressed across the Msg-generic boundary.
//!
//! Mirrors `arena.rs`'s `ElementId(pub usize)` newtype: a bare counter
//! wrapped just enough to stop ids from being mixed up with other `u64`s.

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct HandlerId(pub u64);

/// Monotonic allocator for [`HandlerId`]s. One `IdGen` lives for the whole
/// lifetime of a mounted tree so that ids never repeat, even across diffs
/// that dispose and re-allocate handlers for the same DOM position.
#[derive(Default)]
pub struct IdGen {
    counter: u64,
}

impl IdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> HandlerId {
        let id = HandlerId(self.counter);
        self.counter += 1;
        id
    }
}
