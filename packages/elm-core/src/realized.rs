//! The materialized half of C2: the realized tree that actually corresponds,
//! node-for-node, to what's live in the DOM.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::event::EventArg;
use crate::ids::HandlerId;
use crate::node::{EventHandler, Key};

/// A live handler binding. The closure lives behind a `RefCell` so an
/// in-place element diff can rebind it to a fresh closure without disturbing
/// the id the DOM listener was registered under; that's what lets a
/// `Skip`/`InPlace` edit avoid any wire traffic for unchanged event names.
pub struct HandlerRef<Msg> {
    pub id: HandlerId,
    handler: RefCell<EventHandler<Msg>>,
    disposed: Cell<bool>,
}

impl<Msg> HandlerRef<Msg> {
    pub fn new(id: HandlerId, handler: EventHandler<Msg>) -> Rc<Self> {
        Rc::new(Self {
            id,
            handler: RefCell::new(handler),
            disposed: Cell::new(false),
        })
    }

    /// Swaps in a fresh closure for the same id. Used by the in-place
    /// element diff (§4.3.2) when an event name survives the diff unchanged.
    pub fn rebind(&self, handler: EventHandler<Msg>) {
        *self.handler.borrow_mut() = handler;
    }

    /// Marks this handler dead. Firing a disposed handler is a bridge bug,
    /// not a runtime error (see `bridge.rs`), so disposal is a cheap flag
    /// rather than a destructive operation.
    pub fn dispose(&self) {
        self.disposed.set(true);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    pub fn call(&self, arg: EventArg) -> Msg {
        (self.handler.borrow())(arg)
    }
}

/// A tag with attributes and event handlers realized against concrete ids.
pub struct RealizedElement<Msg> {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub events: BTreeMap<String, Rc<HandlerRef<Msg>>>,
    pub children: Vec<RealizedNode<Msg>>,
}

/// The tree C3/C4 actually operate on. `Empty`/`Concat` have no counterpart
/// here: they are flattened away during rendering (`render::to_realized`).
pub enum RealizedNode<Msg> {
    Text(String),
    Element(RealizedElement<Msg>),
    /// Still keyed, still transparent: a keyed fragment contributes the sum
    /// of its children's DOM-node counts at the parent level, never one of
    /// its own.
    KeyedFragment(Vec<(Key, Vec<RealizedNode<Msg>>)>),
}

impl<Msg> RealizedNode<Msg> {
    /// The number of real DOM nodes this realized node currently occupies.
    /// Elements and text are always exactly one; fragments are the sum of
    /// their children's counts, recursively.
    pub fn actual_count(&self) -> usize {
        match self {
            RealizedNode::Text(_) | RealizedNode::Element(_) => 1,
            RealizedNode::KeyedFragment(items) => items
                .iter()
                .map(|(_, nodes)| nodes.iter().map(RealizedNode::actual_count).sum::<usize>())
                .sum(),
        }
    }
}

impl<Msg> Clone for RealizedElement<Msg> {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            attrs: self.attrs.clone(),
            events: self.events.clone(),
            children: self.children.clone(),
        }
    }
}

impl<Msg> Clone for RealizedNode<Msg> {
    fn clone(&self) -> Self {
        match self {
            RealizedNode::Text(s) => RealizedNode::Text(s.clone()),
            RealizedNode::Element(e) => RealizedNode::Element(e.clone()),
            RealizedNode::KeyedFragment(items) => RealizedNode::KeyedFragment(items.clone()),
        }
    }
}
