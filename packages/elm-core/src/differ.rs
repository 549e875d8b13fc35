//! C3: the differ. §4.3 (sibling diff), §4.3.1 (keyed reconciliation),
//! §4.3.2 (element in-place diff), §4.3.4 (coalescing).
//!
//! This is a single linear pass over each sibling list, not a general
//! tree-edit-distance search: positional children are compared index by
//! index, keyed children are matched by key with a bounded forward search
//! for moves. See `DiffMachine` for the teacher's own stack-machine take on
//! the same shape.

use rustc_hash::FxHashSet;

use crate::edit::{Edit, EventDelta};
use crate::ids::IdGen;
use crate::node::{ElementNode, Key, Node};
use crate::realized::{HandlerRef, RealizedElement, RealizedNode};
use crate::render::realize_leaf;

/// Result of diffing one sibling list: the edit script to replay against
/// the live DOM, the new realized sibling list to keep around for the next
/// diff, the cursor position just past the last sibling, and the number of
/// handlers disposed along the way.
pub struct DiffOutput<Msg> {
    pub edits: Vec<Edit<Msg>>,
    pub realized: Vec<RealizedNode<Msg>>,
    pub final_pos: usize,
    pub disposed: usize,
}

impl<Msg> DiffOutput<Msg> {
    /// Drops the realized tree and the cursor position, keeping only what
    /// a caller that already holds its own realized array (the patcher;
    /// property tests) needs: the edits to replay and P4's dispose count.
    pub fn into_batch(self) -> crate::edit::EditBatch<Msg> {
        crate::edit::EditBatch {
            edits: self.edits,
            disposed: self.disposed,
        }
    }
}

/// Accumulates an edit script with §4.3.4 coalescing (adjacent `Skip`s and
/// adjacent `Delete`s merge; nothing else does) and tracks the live DOM
/// cursor position the next `Move`'s `from` offset would be measured
/// against.
struct DiffCtx<Msg> {
    edits: Vec<Edit<Msg>>,
    realized: Vec<RealizedNode<Msg>>,
    disposed: usize,
    pos: usize,
}

impl<Msg> DiffCtx<Msg> {
    fn new(pos: usize) -> Self {
        Self {
            edits: Vec::new(),
            realized: Vec::new(),
            disposed: 0,
            pos,
        }
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    fn push_edit(&mut self, edit: Edit<Msg>) {
        log::debug!("emitting edit instruction: {}", edit_kind(&edit));
        match (self.edits.last_mut(), &edit) {
            (Some(Edit::Skip(a)), Edit::Skip(b)) => *a += b,
            (Some(Edit::Delete(a)), Edit::Delete(b)) => *a += b,
            _ => self.edits.push(edit),
        }
    }
}

/// A short, argument-free label for an [`Edit`] variant, for `log::debug!`
/// call sites that don't want to format a whole `RealizedNode` subtree.
fn edit_kind<Msg>(edit: &Edit<Msg>) -> &'static str {
    match edit {
        Edit::Skip(_) => "Skip",
        Edit::Delete(_) => "Delete",
        Edit::Replace(_) => "Replace",
        Edit::Insert(_) => "Insert",
        Edit::Move { .. } => "Move",
        Edit::InPlace { .. } => "InPlace",
    }
}

fn realize_leaf_unchecked<Msg>(node: &Node<Msg>, ids: &mut IdGen) -> RealizedNode<Msg> {
    realize_leaf(node, ids)
        .unwrap_or_else(|e| unreachable!("flatten_after only ever yields realizable leaves: {e}"))
}

fn dispose_node<Msg>(node: &RealizedNode<Msg>) -> usize {
    match node {
        RealizedNode::Text(_) => 0,
        RealizedNode::Element(el) => {
            let mut n = el.events.len();
            for handler in el.events.values() {
                handler.dispose();
            }
            for child in &el.children {
                n += dispose_node(child);
            }
            n
        }
        RealizedNode::KeyedFragment(items) => items
            .iter()
            .map(|(_, nodes)| dispose_list(nodes))
            .sum(),
    }
}

fn dispose_list<Msg>(nodes: &[RealizedNode<Msg>]) -> usize {
    nodes.iter().map(dispose_node).sum()
}

fn flatten_after<'a, Msg>(nodes: &'a [Node<Msg>], out: &mut Vec<&'a Node<Msg>>) {
    for node in nodes {
        match node {
            Node::Empty => {}
            Node::Concat(children) => flatten_after(children, out),
            leaf => out.push(leaf),
        }
    }
}

/// Diffs one sibling list (§4.3). `pos` is the DOM-cursor position of the
/// first sibling in this list, needed only so nested keyed reconciliation
/// can compute `Move` offsets correctly; top-level callers pass `0`.
pub fn diff_siblings<Msg>(
    pos: usize,
    before: &[RealizedNode<Msg>],
    after: &[Node<Msg>],
    ids: &mut IdGen,
) -> DiffOutput<Msg> {
    log::trace!("diff_siblings: {} before, {} after, starting at pos {pos}", before.len(), after.len());
    let mut after_flat = Vec::new();
    flatten_after(after, &mut after_flat);

    let mut ctx = DiffCtx::new(pos);
    let mut i = 0usize;

    for node in after_flat {
        if i >= before.len() {
            let new_node = realize_leaf_unchecked(node, ids);
            ctx.advance(new_node.actual_count());
            ctx.push_edit(Edit::Insert(new_node.clone()));
            ctx.realized.push(new_node);
            continue;
        }

        match (&before[i], node) {
            (RealizedNode::KeyedFragment(b_items), Node::KeyedFragment(a_items)) => {
                let keyed_out = diff_keyed(ctx.pos, b_items, a_items, ids);
                ctx.disposed += keyed_out.disposed;
                // A fragment's edits are spliced in as-is: they were already
                // coalesced internally by `diff_keyed`, and merging its
                // boundary edits with whatever precedes/follows it here
                // would conflate two unrelated sibling positions.
                ctx.edits.extend(keyed_out.edits);
                let count: usize = keyed_out
                    .items
                    .iter()
                    .map(|(_, nodes)| nodes.iter().map(RealizedNode::actual_count).sum::<usize>())
                    .sum();
                ctx.advance(count);
                ctx.realized.push(RealizedNode::KeyedFragment(keyed_out.items));
            }
            (RealizedNode::Text(before_text), Node::Text(after_text)) if before_text == after_text => {
                ctx.push_edit(Edit::Skip(1));
                ctx.advance(1);
                ctx.realized.push(RealizedNode::Text(before_text.clone()));
            }
            (RealizedNode::Text(_), Node::Text(after_text)) => {
                let new_node = RealizedNode::Text(after_text.clone());
                ctx.advance(1);
                ctx.push_edit(Edit::Replace(new_node.clone()));
                ctx.realized.push(new_node);
            }
            (RealizedNode::Element(before_el), Node::Element(after_el)) if before_el.tag == after_el.tag => {
                let element_out = diff_element(before_el, after_el, ids);
                ctx.disposed += element_out.disposed;
                ctx.advance(1);
                ctx.push_edit(element_out.edit);
                ctx.realized.push(RealizedNode::Element(element_out.realized));
            }
            _ => {
                ctx.disposed += dispose_node(&before[i]);
                let new_node = realize_leaf_unchecked(node, ids);
                ctx.advance(new_node.actual_count());
                ctx.push_edit(Edit::Replace(new_node.clone()));
                ctx.realized.push(new_node);
            }
        }
        i += 1;
    }

    if i < before.len() {
        let remaining: usize = before[i..].iter().map(RealizedNode::actual_count).sum();
        ctx.disposed += dispose_list(&before[i..]);
        ctx.push_edit(Edit::Delete(remaining));
    }

    DiffOutput {
        edits: ctx.edits,
        realized: ctx.realized,
        final_pos: ctx.pos,
        disposed: ctx.disposed,
    }
}

struct KeyedOutput<Msg> {
    edits: Vec<Edit<Msg>>,
    items: Vec<(Key, Vec<RealizedNode<Msg>>)>,
    disposed: usize,
}

/// Keyed fragment reconciliation (§4.3.1). `before`/`after` are the
/// fragment's own key-ordered child lists; `pos` is the DOM cursor position
/// of the fragment's first (still-live) child, carried in from the
/// enclosing sibling list.
fn diff_keyed<Msg>(
    pos: usize,
    before: &[(Key, Vec<RealizedNode<Msg>>)],
    after: &[(Key, Node<Msg>)],
    ids: &mut IdGen,
) -> KeyedOutput<Msg> {
    let mut ctx = DiffCtx::new(pos);
    let after_keys: FxHashSet<&Key> = after.iter().map(|(k, _)| k).collect();
    let mut handled: FxHashSet<Key> = FxHashSet::default();
    let mut new_items: Vec<(Key, Vec<RealizedNode<Msg>>)> = Vec::with_capacity(after.len());
    let mut i = 0usize;

    for (ak, a) in after {
        if handled.contains(ak) {
            log::warn!("duplicate key {ak:?} in keyed fragment; dropping second occurrence");
            continue;
        }

        loop {
            while i < before.len() && handled.contains(&before[i].0) {
                i += 1;
            }

            if i >= before.len() {
                let single = to_realized_single(a, ids);
                for node in &single {
                    ctx.advance(node.actual_count());
                    ctx.edits.push(Edit::Insert(node.clone()));
                }
                new_items.push((ak.clone(), single));
                handled.insert(ak.clone());
                break;
            }

            let (bk, b) = &before[i];
            if bk == ak {
                let sub = diff_siblings(0, b, std::slice::from_ref(a), ids);
                ctx.disposed += sub.disposed;
                ctx.edits.extend(sub.edits);
                ctx.advance(sub.realized.iter().map(RealizedNode::actual_count).sum());
                new_items.push((ak.clone(), sub.realized));
                handled.insert(ak.clone());
                i += 1;
                break;
            } else if after_keys.contains(bk) {
                let mut mpos = ctx.pos;
                let mut j = i;
                let mut found = None;
                while j < before.len() {
                    if before[j].0 == *ak {
                        found = Some(j);
                        break;
                    }
                    if !handled.contains(&before[j].0) {
                        mpos += before[j].1.iter().map(RealizedNode::actual_count).sum::<usize>();
                    }
                    j += 1;
                }

                if let Some(mi) = found {
                    let count: usize = before[mi].1.iter().map(RealizedNode::actual_count).sum();
                    ctx.push_edit(Edit::Move { from: mpos, count });
                    let sub = diff_siblings(0, &before[mi].1, std::slice::from_ref(a), ids);
                    ctx.disposed += sub.disposed;
                    ctx.edits.extend(sub.edits);
                    ctx.advance(sub.realized.iter().map(RealizedNode::actual_count).sum());
                    new_items.push((ak.clone(), sub.realized));
                    handled.insert(ak.clone());
                    break;
                } else {
                    let single = to_realized_single(a, ids);
                    for node in &single {
                        ctx.advance(node.actual_count());
                        ctx.edits.push(Edit::Insert(node.clone()));
                    }
                    new_items.push((ak.clone(), single));
                    handled.insert(ak.clone());
                    break;
                }
            } else {
                let count: usize = b.iter().map(RealizedNode::actual_count).sum();
                ctx.disposed += dispose_list(b);
                ctx.push_edit(Edit::Delete(count));
                handled.insert(bk.clone());
                i += 1;
            }
        }
    }

    let mut remaining = 0usize;
    for (key, nodes) in before {
        if !handled.contains(key) {
            remaining += nodes.iter().map(RealizedNode::actual_count).sum::<usize>();
            ctx.disposed += dispose_list(nodes);
        }
    }
    if remaining > 0 {
        ctx.push_edit(Edit::Delete(remaining));
    }

    KeyedOutput {
        edits: ctx.edits,
        items: new_items,
        disposed: ctx.disposed,
    }
}

/// Realizes a single authored node (known non-`Empty`/`Concat` at the top,
/// but may itself contain them in nested positions) into its realized
/// sibling list, usually length 1, but a keyed-fragment-valued node still
/// flattens to however many DOM children its own children contribute.
fn to_realized_single<Msg>(node: &Node<Msg>, ids: &mut IdGen) -> Vec<RealizedNode<Msg>> {
    crate::render::to_realized(std::slice::from_ref(node), ids)
        .unwrap_or_else(|e| unreachable!("a single authored node always realizes: {e}"))
}

struct ElementDiffOutput<Msg> {
    edit: Edit<Msg>,
    realized: RealizedElement<Msg>,
    disposed: usize,
}

/// In-place diff of two same-tag elements (§4.3.2).
fn diff_element<Msg>(before: &RealizedElement<Msg>, after: &ElementNode<Msg>, ids: &mut IdGen) -> ElementDiffOutput<Msg> {
    let mut attrs = std::collections::BTreeMap::new();
    for (name, value) in &after.attrs {
        if before.attrs.get(name) != Some(value) {
            attrs.insert(name.clone(), Some(value.clone()));
        }
    }
    for name in before.attrs.keys() {
        if !after.attrs.contains_key(name) {
            attrs.insert(name.clone(), None);
        }
    }

    let mut events: EventDelta<Msg> = std::collections::BTreeMap::new();
    let mut new_events = std::collections::BTreeMap::new();
    let mut disposed = 0usize;
    for (name, handler) in &after.events {
        if let Some(existing) = before.events.get(name) {
            existing.rebind(handler.clone());
            new_events.insert(name.clone(), existing.clone());
        } else {
            let handler_ref = HandlerRef::new(ids.next(), handler.clone());
            events.insert(name.clone(), Some(handler_ref.clone()));
            new_events.insert(name.clone(), handler_ref);
        }
    }
    for (name, handler_ref) in &before.events {
        if !after.events.contains_key(name) {
            handler_ref.dispose();
            disposed += 1;
            events.insert(name.clone(), None);
        }
    }

    let child_out = diff_siblings(0, &before.children, &after.children, ids);
    disposed += child_out.disposed;

    let realized = RealizedElement {
        tag: before.tag.clone(),
        attrs: after.attrs.clone(),
        events: new_events,
        children: child_out.realized,
    };

    let children_are_noop = child_out.edits.iter().all(|e| matches!(e, Edit::Skip(_)));
    let edit = if attrs.is_empty() && events.is_empty() && children_are_noop {
        Edit::Skip(1)
    } else {
        Edit::InPlace {
            attrs,
            events,
            children: child_out.edits,
        }
    };

    ElementDiffOutput { edit, realized, disposed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{el, keyed, text};

    type Msg = ();

    fn realize(nodes: Vec<Node<Msg>>) -> Vec<RealizedNode<Msg>> {
        let mut ids = IdGen::new();
        crate::render::to_realized(&nodes, &mut ids).unwrap()
    }

    fn edit_shapes<Msg>(edits: &[Edit<Msg>]) -> Vec<&'static str> {
        edits
            .iter()
            .map(|e| match e {
                Edit::Skip(_) => "skip",
                Edit::Delete(_) => "delete",
                Edit::Replace(_) => "replace",
                Edit::Insert(_) => "insert",
                Edit::Move { .. } => "move",
                Edit::InPlace { .. } => "inplace",
            })
            .collect()
    }

    #[test]
    fn unchanged_text_is_a_skip() {
        let before = realize(vec![text("hi")]);
        let mut ids = IdGen::new();
        let out = diff_siblings(0, &before, &[text("hi")], &mut ids);
        assert_eq!(edit_shapes(&out.edits), vec!["skip"]);
        assert!(matches!(out.edits[0], Edit::Skip(1)));
    }

    #[test]
    fn changed_text_is_a_replace() {
        let before = realize(vec![text("hi")]);
        let mut ids = IdGen::new();
        let out = diff_siblings(0, &before, &[text("ho")], &mut ids);
        assert_eq!(edit_shapes(&out.edits), vec!["replace"]);
    }

    #[test]
    fn appended_child_is_an_insert_not_a_replace() {
        let before = realize(vec![text("a")]);
        let mut ids = IdGen::new();
        let out = diff_siblings(0, &before, &[text("a"), text("b")], &mut ids);
        assert_eq!(edit_shapes(&out.edits), vec!["skip", "insert"]);
    }

    #[test]
    fn removed_trailing_children_become_one_delete() {
        let before = realize(vec![text("a"), text("b"), text("c")]);
        let mut ids = IdGen::new();
        let out = diff_siblings(0, &before, &[text("a")], &mut ids);
        assert_eq!(edit_shapes(&out.edits), vec!["skip", "delete"]);
        assert!(matches!(out.edits[1], Edit::Delete(2)));
    }

    #[test]
    fn adjacent_skips_coalesce() {
        let before = realize(vec![text("a"), text("b")]);
        let mut ids = IdGen::new();
        let out = diff_siblings(0, &before, &[text("a"), text("b")], &mut ids);
        assert_eq!(edit_shapes(&out.edits), vec!["skip"]);
        assert!(matches!(out.edits[0], Edit::Skip(2)));
    }

    #[test]
    fn matching_tag_element_diffs_attrs_in_place() {
        let before = realize(vec![el("div").attr("class", "a").build()]);
        let mut ids = IdGen::new();
        let out = diff_siblings(0, &before, &[el("div").attr("class", "b").build()], &mut ids);
        assert_eq!(edit_shapes(&out.edits), vec!["inplace"]);
        match &out.edits[0] {
            Edit::InPlace { attrs, .. } => {
                assert_eq!(attrs.get("class"), Some(&Some("b".to_string())));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn different_tag_is_a_replace_and_disposes_old_handlers() {
        let before = realize(vec![el::<Msg>("button").on("click", |_| ()).build()]);
        let mut ids = IdGen::new();
        let out = diff_siblings(0, &before, &[text("x")], &mut ids);
        assert_eq!(edit_shapes(&out.edits), vec!["replace"]);
        assert_eq!(out.disposed, 1);
    }

    #[test]
    fn keyed_move_emits_move_then_two_independent_skips() {
        let before = realize(vec![keyed(vec![
            ("a".into(), text("A")),
            ("b".into(), text("B")),
        ])]);
        let mut ids = IdGen::new();
        let after = vec![keyed(vec![
            ("b".into(), text("B")),
            ("a".into(), text("A")),
        ])];
        let out = diff_siblings(0, &before, &after, &mut ids);
        assert_eq!(edit_shapes(&out.edits), vec!["move", "skip", "skip"]);
        match &out.edits[0] {
            Edit::Move { from, count } => {
                assert_eq!(*from, 1);
                assert_eq!(*count, 1);
            }
            _ => unreachable!(),
        }
        // The two skips are independently-sized (1 each), not merged into one.
        assert!(matches!(out.edits[1], Edit::Skip(1)));
        assert!(matches!(out.edits[2], Edit::Skip(1)));
    }

    #[test]
    fn keyed_removal_disposes_and_deletes() {
        let before = realize(vec![keyed(vec![
            ("a".into(), el::<Msg>("li").on("click", |_| ()).build()),
            ("b".into(), text("B")),
        ])]);
        let mut ids = IdGen::new();
        let after = vec![keyed(vec![("b".into(), text("B"))])];
        let out = diff_siblings(0, &before, &after, &mut ids);
        assert_eq!(out.disposed, 1);
        assert!(edit_shapes(&out.edits).contains(&"delete"));
    }

    #[test]
    fn duplicate_keys_drop_the_second_occurrence() {
        let nodes = vec![keyed(vec![
            ("a".into(), text("first")),
            ("a".into(), text("second")),
        ])];
        let realized = realize(nodes);
        match &realized[0] {
            RealizedNode::KeyedFragment(items) => assert_eq!(items.len(), 1),
            _ => unreachable!(),
        }
    }

    #[test]
    fn key_stability_across_unrelated_edits() {
        // P5: a key's identity survives a diff that only touches a sibling.
        let before = realize(vec![keyed(vec![
            ("a".into(), text("A")),
            ("b".into(), text("B")),
        ])]);
        let mut ids = IdGen::new();
        let after = vec![keyed(vec![
            ("a".into(), text("A changed")),
            ("b".into(), text("B")),
        ])];
        let out = diff_siblings(0, &before, &after, &mut ids);
        match &out.realized[0] {
            RealizedNode::KeyedFragment(items) => {
                assert_eq!(items[0].0, "a");
                assert_eq!(items[1].0, "b");
            }
            _ => unreachable!(),
        }
    }
}
