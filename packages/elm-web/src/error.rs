//! Typed errors for C4's patcher. Both variants indicate the live DOM has
//! drifted out of sync with the realized tree the edit script was computed
//! against: a bridge/patcher bug, since correct use never triggers them.

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("expected an element at the cursor for an in-place edit, found {0}")]
    ExpectedElement(&'static str),

    #[error("edit referenced {requested} sibling(s) but only {available} remained")]
    CursorExhausted { requested: usize, available: usize },
}
