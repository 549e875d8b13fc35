//! C4: the patcher. Walks a sibling cursor through the live DOM, replaying
//! an [`Edit`] script produced by `elm-dom-core::diff_siblings` (§4.4), and
//! materializes freshly realized subtrees for `Insert`/`Replace` (§4.4.1).

use elm_dom_core::{AttrDelta, Edit, EventDelta, RealizedElement, RealizedNode};

use crate::bridge::HandlerRegistry;
use crate::dom::DomDocument;
use crate::error::PatchError;

pub struct Patcher<'d, D: DomDocument> {
    doc: &'d D,
}

impl<'d, D: DomDocument> Patcher<'d, D> {
    pub fn new(doc: &'d D) -> Self {
        Self { doc }
    }

    /// Materializes a realized node (and, transparently, every node a
    /// keyed fragment contributes) into brand-new DOM nodes, wiring every
    /// event handler it carries along the way. Returns the created handles
    /// in order, usually one, but `actual_count()` for fragments.
    pub fn materialize<Msg: 'static>(
        &self,
        node: &RealizedNode<Msg>,
        registry: &HandlerRegistry<Msg>,
    ) -> Vec<D::Node> {
        match node {
            RealizedNode::Text(s) => vec![self.doc.create_text(s)],
            RealizedNode::Element(el) => vec![self.materialize_element(el, registry)],
            RealizedNode::KeyedFragment(items) => items
                .iter()
                .flat_map(|(_, children)| self.materialize_list(children, registry))
                .collect(),
        }
    }

    fn materialize_list<Msg: 'static>(&self, nodes: &[RealizedNode<Msg>], registry: &HandlerRegistry<Msg>) -> Vec<D::Node> {
        nodes.iter().flat_map(|n| self.materialize(n, registry)).collect()
    }

    fn materialize_element<Msg: 'static>(&self, el: &RealizedElement<Msg>, registry: &HandlerRegistry<Msg>) -> D::Node {
        let node = self.doc.create_element(&el.tag);
        for (name, value) in &el.attrs {
            self.doc.set_attribute(&node, name, value);
        }
        for (name, handler) in &el.events {
            self.doc.add_listener(&node, name, registry.callback(handler.clone()));
        }
        for child in self.materialize_list(&el.children, registry) {
            self.doc.append_child(&node, &child);
        }
        node
    }

    /// Applies a full sibling edit script against `parent`'s current
    /// children, starting the cursor at `parent`'s first child.
    pub fn apply<Msg: 'static>(
        &self,
        parent: &D::Node,
        edits: &[Edit<Msg>],
        registry: &HandlerRegistry<Msg>,
    ) -> Result<(), PatchError> {
        let mut cursor = self.doc.first_child(parent);
        for edit in edits {
            cursor = self.apply_one(parent, cursor, edit, registry)?;
        }
        Ok(())
    }

    fn nth_child(&self, parent: &D::Node, n: usize) -> Option<D::Node> {
        let mut cur = self.doc.first_child(parent);
        for _ in 0..n {
            cur = cur.and_then(|node| self.doc.next_sibling(&node));
        }
        cur
    }

    fn advance(&self, cursor: Option<D::Node>, n: usize) -> Result<Option<D::Node>, PatchError> {
        let mut cur = cursor;
        for i in 0..n {
            let node = cur.ok_or(PatchError::CursorExhausted { requested: n, available: i })?;
            cur = self.doc.next_sibling(&node);
        }
        Ok(cur)
    }

    fn apply_one<Msg: 'static>(
        &self,
        parent: &D::Node,
        cursor: Option<D::Node>,
        edit: &Edit<Msg>,
        registry: &HandlerRegistry<Msg>,
    ) -> Result<Option<D::Node>, PatchError> {
        match edit {
            Edit::Skip(n) => self.advance(cursor, *n),

            Edit::Delete(n) => {
                let mut cur = cursor;
                for i in 0..*n {
                    let node = cur.ok_or(PatchError::CursorExhausted { requested: *n, available: i })?;
                    let next = self.doc.next_sibling(&node);
                    self.doc.remove_child(parent, &node);
                    cur = next;
                }
                Ok(cur)
            }

            Edit::Replace(new_node) => {
                let old = cursor.ok_or(PatchError::ExpectedElement("end of children"))?;
                let next = self.doc.next_sibling(&old);
                self.doc.remove_child(parent, &old);
                for created in self.materialize(new_node, registry) {
                    self.doc.insert_before(parent, &created, next.as_ref());
                }
                Ok(next)
            }

            Edit::Insert(new_node) => {
                let created = self.materialize(new_node, registry);
                for node in &created {
                    self.doc.insert_before(parent, node, cursor.as_ref());
                }
                Ok(cursor)
            }

            Edit::Move { from, count } => {
                let start = self
                    .nth_child(parent, *from)
                    .ok_or(PatchError::CursorExhausted { requested: *count, available: 0 })?;
                let mut moved = Vec::with_capacity(*count);
                let mut node = Some(start);
                for i in 0..*count {
                    let n = node.ok_or(PatchError::CursorExhausted { requested: *count, available: i })?;
                    node = self.doc.next_sibling(&n);
                    moved.push(n);
                }
                for n in &moved {
                    self.doc.remove_child(parent, n);
                }
                for n in &moved {
                    self.doc.insert_before(parent, n, cursor.as_ref());
                }
                Ok(moved.into_iter().next())
            }

            Edit::InPlace { attrs, events, children } => {
                let node = cursor.ok_or(PatchError::ExpectedElement("end of children"))?;
                self.apply_attrs(&node, attrs);
                self.apply_events(&node, events, registry);
                self.apply(&node, children, registry)?;
                self.advance(Some(node), 1)
            }
        }
    }

    fn apply_attrs(&self, node: &D::Node, attrs: &AttrDelta) {
        for (name, value) in attrs {
            match value {
                Some(v) => self.doc.set_attribute(node, name, v),
                None => self.doc.remove_attribute(node, name),
            }
        }
    }

    fn apply_events<Msg: 'static>(&self, node: &D::Node, events: &EventDelta<Msg>, registry: &HandlerRegistry<Msg>) {
        for (name, delta) in events {
            match delta {
                Some(handler) => self.doc.add_listener(node, name, registry.callback(handler.clone())),
                None => self.doc.remove_listener(node, name),
            }
        }
    }
}
