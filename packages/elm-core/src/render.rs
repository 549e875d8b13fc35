//! C2: the renderer. Turns an authored [`Node`] tree into a
//! [`RealizedNode`] tree, allocating a fresh [`HandlerId`] for every event
//! handler it finds along the way.

use rustc_hash::FxHashSet;

use crate::error::RenderError;
use crate::ids::IdGen;
use crate::node::{ElementNode, Key, Node};
use crate::realized::{HandlerRef, RealizedElement, RealizedNode};

/// Flattens `nodes` (normalizing away `Empty`/`Concat`) into a realized
/// sibling list, allocating handler ids as it goes.
pub fn to_realized<Msg>(nodes: &[Node<Msg>], ids: &mut IdGen) -> Result<Vec<RealizedNode<Msg>>, RenderError> {
    let mut out = Vec::new();
    flatten_into(nodes, ids, &mut out)?;
    Ok(out)
}

fn flatten_into<Msg>(
    nodes: &[Node<Msg>],
    ids: &mut IdGen,
    out: &mut Vec<RealizedNode<Msg>>,
) -> Result<(), RenderError> {
    for node in nodes {
        match node {
            Node::Empty => {}
            Node::Concat(children) => flatten_into(children, ids, out)?,
            leaf => out.push(realize_leaf(leaf, ids)?),
        }
    }
    Ok(())
}

/// Realizes a single node known to be a DOM-bearing leaf (`Text`, `Element`,
/// or `KeyedFragment`, never `Empty`/`Concat`, which only exist to be
/// flattened by their caller).
pub(crate) fn realize_leaf<Msg>(node: &Node<Msg>, ids: &mut IdGen) -> Result<RealizedNode<Msg>, RenderError> {
    match node {
        Node::Text(s) => Ok(RealizedNode::Text(s.clone())),
        Node::Element(el) => Ok(RealizedNode::Element(realize_element(el, ids)?)),
        Node::KeyedFragment(items) => Ok(RealizedNode::KeyedFragment(realize_keyed_items(items, ids)?)),
        Node::Empty | Node::Concat(_) => Err(RenderError::InvariantViolated(
            "Empty/Concat node reached realize_leaf; caller should have flattened it",
        )),
    }
}

fn realize_element<Msg>(el: &ElementNode<Msg>, ids: &mut IdGen) -> Result<RealizedElement<Msg>, RenderError> {
    let mut events = std::collections::BTreeMap::new();
    for (name, handler) in &el.events {
        events.insert(name.clone(), HandlerRef::new(ids.next(), handler.clone()));
    }
    Ok(RealizedElement {
        tag: el.tag.clone(),
        attrs: el.attrs.clone(),
        events,
        children: to_realized(&el.children, ids)?,
    })
}

fn realize_keyed_items<Msg>(
    items: &[(Key, Node<Msg>)],
    ids: &mut IdGen,
) -> Result<Vec<(Key, Vec<RealizedNode<Msg>>)>, RenderError> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::with_capacity(items.len());
    for (key, node) in items {
        if !seen.insert(key.clone()) {
            log::warn!("duplicate key {key:?} in keyed fragment; dropping second occurrence");
            continue;
        }
        out.push((key.clone(), to_realized(std::slice::from_ref(node), ids)?));
    }
    Ok(out)
}
