//! End-to-end checks of C4 (patcher) + C5 (event bridge) against the
//! browser-free `MockDom` double, covering the same concrete scenarios
//! `elm-dom-core`'s own tests exercise at the edit-script level, but
//! replayed all the way down to the in-memory tree.

use std::cell::RefCell;
use std::rc::Rc;

use elm_dom_core::node::{el, keyed, text};
use elm_dom_core::{diff_siblings, to_realized, IdGen, Node};
use elm_dom_web::mockdom::MockDom;
use elm_dom_web::{DomDocument, HandlerRegistry, Patcher};

type Msg = String;

fn attach(doc: &MockDom, nodes: &[Node<Msg>], ids: &mut IdGen, registry: &HandlerRegistry<Msg>) -> (
    elm_dom_web::mockdom::MockNode,
    Vec<elm_dom_core::RealizedNode<Msg>>,
) {
    let root = doc.create_element("root");
    let realized = to_realized(nodes, ids).unwrap();
    let patcher = Patcher::new(doc);
    for node in &realized {
        for child in patcher.materialize(node, registry) {
            doc.append_child(&root, &child);
        }
    }
    (root, realized)
}

fn noop_registry() -> HandlerRegistry<Msg> {
    HandlerRegistry::new(Rc::new(|_msg: Msg| {}))
}

#[test]
fn materializes_a_simple_tree_into_mock_dom() {
    let doc = MockDom;
    let mut ids = IdGen::new();
    let registry = noop_registry();
    let (root, _realized) = attach(&doc, &[el("div").attr("id", "x").child(text("hi")).build()], &mut ids, &registry);
    assert_eq!(root.debug_tree(), "<root><div id=\"x\">hi</div></root>");
}

#[test]
fn text_change_patches_in_place() {
    let doc = MockDom;
    let mut ids = IdGen::new();
    let registry = noop_registry();
    let (root, realized) = attach(&doc, &[text("hi")], &mut ids, &registry);

    let out = diff_siblings(0, &realized, &[text("ho")], &mut ids);
    let patcher = Patcher::new(&doc);
    patcher.apply(&root, &out.edits, &registry).unwrap();

    assert_eq!(root.debug_tree(), "<root>ho</root>");
}

#[test]
fn keyed_move_reorders_mock_dom_children() {
    let doc = MockDom;
    let mut ids = IdGen::new();
    let registry = noop_registry();
    let before_nodes = vec![keyed(vec![("a".into(), text("A")), ("b".into(), text("B"))])];
    let (root, realized) = attach(&doc, &before_nodes, &mut ids, &registry);
    assert_eq!(root.debug_tree(), "<root>AB</root>");

    let after = vec![keyed(vec![("b".into(), text("B")), ("a".into(), text("A"))])];
    let out = diff_siblings(0, &realized, &after, &mut ids);
    let patcher = Patcher::new(&doc);
    patcher.apply(&root, &out.edits, &registry).unwrap();

    assert_eq!(root.debug_tree(), "<root>BA</root>");
    assert_eq!(root.child_count(), 2);
}

#[test]
fn attribute_and_child_delta_apply_together() {
    let doc = MockDom;
    let mut ids = IdGen::new();
    let registry = noop_registry();
    let before_nodes = vec![el("div").attr("class", "a").child(text("x")).build()];
    let (root, realized) = attach(&doc, &before_nodes, &mut ids, &registry);

    let after = vec![el("div").attr("class", "b").child(text("y")).build()];
    let out = diff_siblings(0, &realized, &after, &mut ids);
    let patcher = Patcher::new(&doc);
    patcher.apply(&root, &out.edits, &registry).unwrap();

    assert_eq!(root.debug_tree(), "<root><div class=\"b\">y</div></root>");
}

#[test]
fn firing_a_dom_event_dispatches_the_handlers_message() {
    let doc = MockDom;
    let mut ids = IdGen::new();
    let received: Rc<RefCell<Vec<Msg>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = received.clone();
    let registry: HandlerRegistry<Msg> = HandlerRegistry::new(Rc::new(move |msg: Msg| sink.borrow_mut().push(msg)));

    let nodes = vec![el::<Msg>("button").on("click", |_| "clicked".to_string()).build()];
    let (root, _realized) = attach(&doc, &nodes, &mut ids, &registry);

    let button = doc.first_child(&root).unwrap();
    assert!(button.has_listener("click"));
    button.fire("click", None);

    assert_eq!(received.borrow().as_slice(), &["clicked".to_string()]);
}

#[test]
fn in_place_event_rebind_does_not_reattach_the_dom_listener() {
    let doc = MockDom;
    let mut ids = IdGen::new();
    let received: Rc<RefCell<Vec<Msg>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = received.clone();
    let registry: HandlerRegistry<Msg> = HandlerRegistry::new(Rc::new(move |msg: Msg| sink.borrow_mut().push(msg)));

    let before_nodes = vec![el::<Msg>("button").on("click", |_| "one".to_string()).build()];
    let (root, realized) = attach(&doc, &before_nodes, &mut ids, &registry);

    let after = vec![el::<Msg>("button").on("click", |_| "two".to_string()).build()];
    let out = diff_siblings(0, &realized, &after, &mut ids);
    // No event delta: the handler was rebound on the existing HandlerRef.
    assert_eq!(out.edits.len(), 1);
    assert!(matches!(out.edits[0], elm_dom_core::Edit::Skip(1)));
    let patcher = Patcher::new(&doc);
    patcher.apply(&root, &out.edits, &registry).unwrap();

    let button = doc.first_child(&root).unwrap();
    button.fire("click", None);
    assert_eq!(received.borrow().as_slice(), &["two".to_string()]);
}

#[test]
fn deleting_a_subtree_disposes_its_handler_so_later_fires_are_dropped() {
    let doc = MockDom;
    let mut ids = IdGen::new();
    let received: Rc<RefCell<Vec<Msg>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = received.clone();
    let registry: HandlerRegistry<Msg> = HandlerRegistry::new(Rc::new(move |msg: Msg| sink.borrow_mut().push(msg)));

    let before_nodes = vec![el::<Msg>("button").on("click", |_| "one".to_string()).build()];
    let (root, realized) = attach(&doc, &before_nodes, &mut ids, &registry);
    let button = doc.first_child(&root).unwrap();

    let out = diff_siblings(0, &realized, &[], &mut ids);
    assert_eq!(out.disposed, 1);
    let patcher = Patcher::new(&doc);
    patcher.apply(&root, &out.edits, &registry).unwrap();

    // The DOM node is gone, but even firing the stale handle directly (as a
    // buggy host-side retainer might) must not deliver a message: the
    // HandlerRef behind it is disposed.
    button.fire("click", None);
    assert!(received.borrow().is_empty());
}

#[test]
fn cursor_exhausted_is_a_patch_error_not_a_panic() {
    let doc = MockDom;
    let root = doc.create_element("root");
    let registry = noop_registry();
    let patcher = Patcher::new(&doc);
    let bogus_edits: Vec<elm_dom_core::Edit<Msg>> = vec![elm_dom_core::Edit::Delete(3)];
    let result = patcher.apply(&root, &bogus_edits, &registry);
    assert!(result.is_err());
}
