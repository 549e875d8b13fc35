//! C1: the authored, immutable node model.
//!
//! `Node<Msg>` is the only way application code describes UI: text, a single
//! element, the empty node, transparent concatenation, and keyed fragments.
//! `Empty`/`Concat` are authoring conveniences only. They are normalized
//! away during rendering (see `render.rs`) and never appear in a
//! [`crate::realized::RealizedNode`].

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::event::EventArg;

/// A fragment key. Fragment reconciliation (`differ::diff_keyed`) matches
/// children by this value rather than by position.
pub type Key = String;

/// A handler bound to one event name on one element.
///
/// Kept as an `Rc` (not a plain `Box`) because the same closure instance may
/// be shared across renders when a view rebuilds an identical handler; more
/// importantly, the realized tree's [`crate::realized::HandlerRef`] clones
/// this `Rc` into its mutable cell, so the authored tree and the realized
/// tree can both point at it without forcing `Msg: Clone`.
pub type EventHandler<Msg> = Rc<dyn Fn(EventArg) -> Msg>;

/// The authored UI tree. See module docs and the data model in SPEC_FULL.md §3.
pub enum Node<Msg> {
    /// Carries no DOM output.
    Empty,
    /// A single text node.
    Text(String),
    /// A tag with attributes, event handlers, and children.
    Element(ElementNode<Msg>),
    /// Transparent composition; has no DOM output of its own.
    Concat(Vec<Node<Msg>>),
    /// An ordered sequence reconciled by key instead of position.
    KeyedFragment(Vec<(Key, Node<Msg>)>),
}

/// The element variant of [`Node`]. Attribute and event maps are
/// insertion-order-irrelevant, so `BTreeMap` (deterministic iteration, no
/// extra dependency) is used rather than preserving author order.
pub struct ElementNode<Msg> {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub events: BTreeMap<String, EventHandler<Msg>>,
    pub children: Vec<Node<Msg>>,
}

/// A single text node.
pub fn text<Msg>(s: impl Into<String>) -> Node<Msg> {
    Node::Text(s.into())
}

/// A node with no DOM output.
pub fn empty<Msg>() -> Node<Msg> {
    Node::Empty
}

/// Transparent composition of several nodes, spliced into the parent list
/// during rendering and diffing.
pub fn concat<Msg>(children: Vec<Node<Msg>>) -> Node<Msg> {
    Node::Concat(children)
}

/// A keyed sibling group, reconciled by key rather than position.
///
/// Duplicate keys are a non-fatal author error: the second and later
/// occurrences are dropped with a `log::warn!`, first wins.
pub fn keyed<Msg>(children: Vec<(Key, Node<Msg>)>) -> Node<Msg> {
    Node::KeyedFragment(children)
}

/// Starts a fluent element builder, mirroring `nodebuilder.rs`'s
/// `NodeBuilder` fluent construction API.
pub fn el<Msg>(tag: impl Into<String>) -> ElementBuilder<Msg> {
    ElementBuilder {
        node: ElementNode {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            events: BTreeMap::new(),
            children: Vec::new(),
        },
    }
}

/// Fluent builder for [`ElementNode`].
pub struct ElementBuilder<Msg> {
    node: ElementNode<Msg>,
}

impl<Msg> ElementBuilder<Msg> {
    /// Sets (or overwrites) an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.node.attrs.insert(name.into(), value.into());
        self
    }

    /// Binds an event handler, overwriting any previous handler for the same
    /// event name on this builder.
    pub fn on(mut self, event: impl Into<String>, handler: impl Fn(EventArg) -> Msg + 'static) -> Self {
        self.node.events.insert(event.into(), Rc::new(handler));
        self
    }

    /// Appends one child.
    pub fn child(mut self, child: Node<Msg>) -> Self {
        self.node.children.push(child);
        self
    }

    /// Appends several children.
    pub fn children(mut self, children: impl IntoIterator<Item = Node<Msg>>) -> Self {
        self.node.children.extend(children);
        self
    }

    /// Finishes the builder, producing a [`Node::Element`].
    pub fn build(self) -> Node<Msg> {
        Node::Element(self.node)
    }
}
