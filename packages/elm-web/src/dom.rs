//! The DOM abstraction the patcher is generic over.
//!
//! `elm-dom-core` never touches a DOM; `elm-dom-web`'s patcher (`patch.rs`)
//! is itself written against this trait rather than against `web-sys`
//! directly, so it can be exercised with an in-memory double
//! (`mockdom.rs`) in plain unit tests with no browser or wasm target
//! involved. `webdom.rs` is the one real implementation, backed by
//! `web-sys`.
//!
//! Deliberately Msg-agnostic: listener callbacks are plain
//! `Rc<dyn Fn(EventArg)>`, with the `Msg`-typed `HandlerRef` wrapping and
//! dispatch handled one layer up, in `bridge.rs`.

use std::rc::Rc;

use elm_dom_core::EventArg;

/// The handful of tree operations C4 needs. A `DomNode` is an opaque,
/// cheaply-cloneable handle (a `web_sys::Node` clone is a reference-counted
/// JS handle; a mock one is an `Rc` into an in-memory arena).
pub trait DomDocument {
    type Node: Clone + PartialEq;

    fn create_element(&self, tag: &str) -> Self::Node;
    fn create_text(&self, text: &str) -> Self::Node;

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);
    fn remove_attribute(&self, node: &Self::Node, name: &str);

    /// Registers a listener for `event_name` on `node`. Called exactly once
    /// per (node, event name) pair for the lifetime of that binding. An
    /// in-place diff that keeps an event name rebinds the underlying
    /// `HandlerRef` instead of touching the DOM at all (§4.3.2).
    fn add_listener(&self, node: &Self::Node, event_name: &str, callback: Rc<dyn Fn(EventArg)>);
    fn remove_listener(&self, node: &Self::Node, event_name: &str);

    fn append_child(&self, parent: &Self::Node, child: &Self::Node);
    fn insert_before(&self, parent: &Self::Node, child: &Self::Node, reference: Option<&Self::Node>);
    fn remove_child(&self, parent: &Self::Node, child: &Self::Node);

    fn first_child(&self, node: &Self::Node) -> Option<Self::Node>;
    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;
}
