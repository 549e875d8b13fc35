//! The edit script C3 produces and C4 consumes: §4 data model + §4.3.4
//! coalescing.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::realized::{HandlerRef, RealizedNode};

/// `None` means "remove this attribute"; `Some(v)` means "set it to `v`".
/// Keys present mean changed; unchanged attributes are simply absent.
pub type AttrDelta = BTreeMap<String, Option<String>>;

/// `None` means "this event name was removed, dispose its handler";
/// `Some(handler)` means "this event name is new, bind this handler".
/// Event names that survive the diff unchanged are rebound in place on the
/// existing [`HandlerRef`] and never appear here at all.
pub type EventDelta<Msg> = BTreeMap<String, Option<Rc<HandlerRef<Msg>>>>;

/// One instruction in a sibling edit script. Counts are always in actual
/// DOM-child units (§4, a keyed fragment counts as the sum of its
/// children's counts, never as one).
pub enum Edit<Msg> {
    /// Leave the next `n` DOM children untouched.
    Skip(usize),
    /// Remove the next `n` DOM children.
    Delete(usize),
    /// Replace the next DOM child with a freshly materialized node.
    Replace(RealizedNode<Msg>),
    /// Insert a freshly materialized node before the cursor; does not
    /// consume a `before` entry.
    Insert(RealizedNode<Msg>),
    /// Relocate `count` DOM children currently at `from` to the cursor,
    /// measured in the live DOM state produced by every edit emitted so far
    /// in this same sibling edit script.
    Move { from: usize, count: usize },
    /// Keep the node at the cursor, applying attribute/event/child deltas
    /// in place. Used only when at least one of the three is non-trivial;
    /// an element diff that reduces to nothing collapses to `Skip(1)`
    /// instead (§4.3.2).
    InPlace {
        attrs: AttrDelta,
        events: EventDelta<Msg>,
        children: Vec<Edit<Msg>>,
    },
}

/// A diff result plus handler-lifecycle bookkeeping (P4: every handler
/// removed during a diff is disposed exactly once), with the internal
/// cursor position `DiffOutput` needs for recursive keyed-fragment diffing
/// stripped out. This is the shape the patcher and test suite actually want
/// to hold onto: "the edits to replay, and how many handlers died along the
/// way", mirroring `dioxus-core`'s `Mutations` bundling edits with the
/// renderer book-keeping it needs. See `DiffOutput::into_batch`.
pub struct EditBatch<Msg> {
    pub edits: Vec<Edit<Msg>>,
    pub disposed: usize,
}
