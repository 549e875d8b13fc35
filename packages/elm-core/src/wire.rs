//! The bit-exact JSON wire format from §6, used by the liveview-style
//! remote-patching path (a host process that doesn't share the renderer's
//! process, the way `dioxus-liveview` serializes `Mutations` to a browser
//! tab over a websocket). Only built when the `serialize` feature is on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::edit::Edit;
use crate::ids::HandlerId;
use crate::realized::RealizedNode;

/// One realized node on the wire. `serde(untagged)` lets a plain JSON
/// string mean text, an object mean an element, and a bare array mean a
/// spliced keyed fragment, distinguishable on read by shape alone, with no
/// discriminant field to carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireNode {
    Text(String),
    Element(WireElement),
    /// A keyed fragment has no JSON shape of its own in §6 ("fragments are
    /// inlined as the concatenation of their children's wire nodes, with no
    /// marker"); this variant exists only for the edge case where a
    /// `Replace`/`Insert` payload is itself a whole fragment rather than a
    /// single element or text node, which the spec's own examples never
    /// exercise. See DESIGN.md.
    Fragment(Vec<WireNode>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireElement {
    pub n: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub a: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub e: BTreeMap<String, u64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub c: Vec<WireNode>,
}

/// One edit instruction on the wire. Each variant serializes as a flat JSON
/// object with exactly one discriminating key (`f`+`n`, `s`, `d`, `r`, `i`,
/// or the all-optional `a`/`e`/`c` trio for `InPlace`); `serde(untagged)`
/// tries each in turn and the first one whose required keys are all present
/// wins, which is unambiguous here since no two variants share a key name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireEdit {
    Move {
        f: usize,
        n: usize,
    },
    Skip {
        s: usize,
    },
    Delete {
        d: usize,
    },
    Replace {
        r: WireNode,
    },
    Insert {
        i: WireNode,
    },
    InPlace {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        a: Option<BTreeMap<String, Option<String>>>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        e: Option<BTreeMap<String, Option<u64>>>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        c: Option<Vec<WireEdit>>,
    },
}

/// Converts a single realized node to its wire form. A top-level keyed
/// fragment becomes [`WireNode::Fragment`]; use [`realized_list_to_wire`]
/// when serializing a sibling list so fragments splice transparently
/// instead.
pub fn realized_to_wire<Msg>(node: &RealizedNode<Msg>) -> WireNode {
    match node {
        RealizedNode::Text(s) => WireNode::Text(s.clone()),
        RealizedNode::Element(el) => WireNode::Element(WireElement {
            n: el.tag.clone(),
            a: el.attrs.clone(),
            e: el.events.iter().map(|(k, v)| (k.clone(), v.id.0)).collect(),
            c: realized_list_to_wire(&el.children),
        }),
        RealizedNode::KeyedFragment(items) => {
            WireNode::Fragment(realized_list_to_wire_flat(items))
        }
    }
}

/// Converts a realized sibling list, splicing keyed fragments in place so
/// they never appear as a nested [`WireNode::Fragment`] inside a list (only
/// a top-level `Replace`/`Insert` payload ever does).
pub fn realized_list_to_wire<Msg>(nodes: &[RealizedNode<Msg>]) -> Vec<WireNode> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            RealizedNode::KeyedFragment(items) => out.extend(realized_list_to_wire_flat(items)),
            other => out.push(realized_to_wire(other)),
        }
    }
    out
}

fn realized_list_to_wire_flat<Msg>(items: &[(crate::node::Key, Vec<RealizedNode<Msg>>)]) -> Vec<WireNode> {
    items.iter().flat_map(|(_, nodes)| realized_list_to_wire(nodes)).collect()
}

/// Converts one edit to its wire form.
pub fn edit_to_wire<Msg>(edit: &Edit<Msg>) -> WireEdit {
    match edit {
        Edit::Skip(n) => WireEdit::Skip { s: *n },
        Edit::Delete(n) => WireEdit::Delete { d: *n },
        Edit::Replace(node) => WireEdit::Replace { r: realized_to_wire(node) },
        Edit::Insert(node) => WireEdit::Insert { i: realized_to_wire(node) },
        Edit::Move { from, count } => WireEdit::Move { f: *from, n: *count },
        Edit::InPlace { attrs, events, children } => WireEdit::InPlace {
            a: if attrs.is_empty() { None } else { Some(attrs.clone()) },
            e: if events.is_empty() {
                None
            } else {
                Some(events.iter().map(|(k, v)| (k.clone(), v.as_ref().map(|h| h.id.0))).collect())
            },
            c: if children.is_empty() {
                None
            } else {
                Some(children.iter().map(edit_to_wire).collect())
            },
        },
    }
}

/// Converts a full edit script to its wire form.
pub fn edits_to_wire<Msg>(edits: &[Edit<Msg>]) -> Vec<WireEdit> {
    edits.iter().map(edit_to_wire).collect()
}
