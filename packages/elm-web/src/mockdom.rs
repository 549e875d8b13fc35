//! An in-memory `DomDocument` double, so the patcher's cursor-walk and
//! `Move`/`Replace`/`InPlace` logic can be exercised in plain unit tests
//! with no browser or wasm target, the same niche
//! `old/virtual-dom-rs`'s browser-free `apply_patches` tests fill for its
//! own patch module. Test-only: not part of the public API surface real
//! applications build against.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use elm_dom_core::EventArg;

use crate::dom::DomDocument;

enum MockKind {
    Element { tag: String, attrs: BTreeMap<String, String> },
    Text(String),
}

struct MockNodeData {
    kind: MockKind,
    parent: Option<Weak<RefCell<MockNodeData>>>,
    children: Vec<MockNode>,
    listeners: BTreeMap<String, Rc<dyn Fn(EventArg)>>,
}

/// A cheap, reference-counted handle into the mock tree.
#[derive(Clone)]
pub struct MockNode(Rc<RefCell<MockNodeData>>);

impl PartialEq for MockNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl MockNode {
    fn new(kind: MockKind) -> Self {
        Self(Rc::new(RefCell::new(MockNodeData {
            kind,
            parent: None,
            children: Vec::new(),
            listeners: BTreeMap::new(),
        })))
    }

    /// Renders the subtree to a tag-soup string, for assertions in tests
    /// that want to check overall shape rather than poke at individual
    /// nodes.
    pub fn debug_tree(&self) -> String {
        match &self.0.borrow().kind {
            MockKind::Text(s) => s.clone(),
            MockKind::Element { tag, attrs } => {
                let mut out = format!("<{tag}");
                for (k, v) in attrs {
                    out.push_str(&format!(" {k}={v:?}"));
                }
                out.push('>');
                for child in &self.0.borrow().children {
                    out.push_str(&child.debug_tree());
                }
                out.push_str(&format!("</{tag}>"));
                out
            }
        }
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn has_listener(&self, event: &str) -> bool {
        self.0.borrow().listeners.contains_key(event)
    }

    pub fn fire(&self, event: &str, arg: EventArg) {
        let cb = self.0.borrow().listeners.get(event).cloned();
        if let Some(cb) = cb {
            cb(arg);
        }
    }
}

/// A `DomDocument` with no backing browser; a detached root is typically
/// created with [`MockDom::create_element`] and used directly as the
/// `Patcher::apply`/`materialize` parent.
#[derive(Default)]
pub struct MockDom;

impl DomDocument for MockDom {
    type Node = MockNode;

    fn create_element(&self, tag: &str) -> Self::Node {
        MockNode::new(MockKind::Element {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
        })
    }

    fn create_text(&self, text: &str) -> Self::Node {
        MockNode::new(MockKind::Text(text.to_string()))
    }

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) {
        if let MockKind::Element { attrs, .. } = &mut node.0.borrow_mut().kind {
            attrs.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&self, node: &Self::Node, name: &str) {
        if let MockKind::Element { attrs, .. } = &mut node.0.borrow_mut().kind {
            attrs.remove(name);
        }
    }

    fn add_listener(&self, node: &Self::Node, event_name: &str, callback: Rc<dyn Fn(EventArg)>) {
        node.0.borrow_mut().listeners.insert(event_name.to_string(), callback);
    }

    fn remove_listener(&self, node: &Self::Node, event_name: &str) {
        node.0.borrow_mut().listeners.remove(event_name);
    }

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) {
        child.0.borrow_mut().parent = Some(Rc::downgrade(&parent.0));
        parent.0.borrow_mut().children.push(child.clone());
    }

    fn insert_before(&self, parent: &Self::Node, child: &Self::Node, reference: Option<&Self::Node>) {
        child.0.borrow_mut().parent = Some(Rc::downgrade(&parent.0));
        let mut parent_data = parent.0.borrow_mut();
        let index = match reference {
            Some(r) => parent_data
                .children
                .iter()
                .position(|n| n == r)
                .unwrap_or(parent_data.children.len()),
            None => parent_data.children.len(),
        };
        parent_data.children.insert(index, child.clone());
    }

    fn remove_child(&self, parent: &Self::Node, child: &Self::Node) {
        let mut parent_data = parent.0.borrow_mut();
        if let Some(index) = parent_data.children.iter().position(|n| n == child) {
            parent_data.children.remove(index);
        }
        child.0.borrow_mut().parent = None;
    }

    fn first_child(&self, node: &Self::Node) -> Option<Self::Node> {
        node.0.borrow().children.first().cloned()
    }

    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node> {
        let parent = node.0.borrow().parent.clone()?.upgrade()?;
        let parent_data = parent.borrow();
        let index = parent_data.children.iter().position(|n| n == node)?;
        parent_data.children.get(index + 1).cloned()
    }
}
