//! Integration tests against the wire format, covering the same concrete
//! before/after scenarios the unit tests in `differ.rs` exercise, but
//! checked against the literal JSON shape rather than the in-memory `Edit`
//! variants.

use elm_dom_core::node::{el, keyed, text};
use elm_dom_core::wire::{edits_to_wire, realized_list_to_wire, WireEdit, WireNode};
use elm_dom_core::{diff_siblings, to_realized, IdGen, Node};

type Msg = ();

fn realize(nodes: &[Node<Msg>], ids: &mut IdGen) -> Vec<elm_dom_core::RealizedNode<Msg>> {
    to_realized(nodes, ids).unwrap()
}

#[test]
fn unchanged_text_round_trips_as_a_single_skip() {
    let mut ids = IdGen::new();
    let before = realize(&[text("hi")], &mut ids);
    let out = diff_siblings(0, &before, &[text("hi")], &mut ids);
    let wire = edits_to_wire(&out.edits);
    assert_eq!(wire, vec![WireEdit::Skip { s: 1 }]);
}

#[test]
fn changed_text_is_a_replace_carrying_the_new_string() {
    let mut ids = IdGen::new();
    let before = realize(&[text("hi")], &mut ids);
    let out = diff_siblings(0, &before, &[text("ho")], &mut ids);
    let wire = edits_to_wire(&out.edits);
    assert_eq!(
        wire,
        vec![WireEdit::Replace {
            r: WireNode::Text("ho".to_string())
        }]
    );
}

#[test]
fn element_realizes_to_wire_with_attrs_and_event_ids() {
    let mut ids = IdGen::new();
    let node: Node<Msg> = el("button").attr("class", "primary").on("click", |_| ()).build();
    let realized = realize(&[node], &mut ids);
    let wire = realized_list_to_wire(&realized);
    match &wire[0] {
        WireNode::Element(el) => {
            assert_eq!(el.n, "button");
            assert_eq!(el.a.get("class"), Some(&"primary".to_string()));
            assert_eq!(el.e.len(), 1);
            assert!(el.e.contains_key("click"));
        }
        other => panic!("expected an element, got {other:?}"),
    }
}

#[test]
fn keyed_swap_emits_a_move_and_two_independent_skips_on_the_wire() {
    let mut ids = IdGen::new();
    let before = realize(
        &[keyed(vec![("a".into(), text("A")), ("b".into(), text("B"))])],
        &mut ids,
    );
    let after = vec![keyed(vec![("b".into(), text("B")), ("a".into(), text("A"))])];
    let out = diff_siblings(0, &before, &after, &mut ids);
    let wire = edits_to_wire(&out.edits);
    assert_eq!(
        wire,
        vec![
            WireEdit::Move { f: 1, n: 1 },
            WireEdit::Skip { s: 1 },
            WireEdit::Skip { s: 1 },
        ]
    );
}

#[test]
fn in_place_attribute_change_serializes_with_only_the_changed_key() {
    let mut ids = IdGen::new();
    let before = realize(&[el("div").attr("class", "a").attr("id", "x").build()], &mut ids);
    let after = vec![el("div").attr("class", "b").attr("id", "x").build()];
    let out = diff_siblings(0, &before, &after, &mut ids);
    let wire = edits_to_wire(&out.edits);
    match &wire[0] {
        WireEdit::InPlace { a, e, c } => {
            let a = a.as_ref().expect("attrs delta present");
            assert_eq!(a.len(), 1);
            assert_eq!(a.get("class"), Some(&Some("b".to_string())));
            assert!(e.is_none());
            assert!(c.is_none());
        }
        other => panic!("expected an in-place edit, got {other:?}"),
    }
}

#[test]
fn disjoint_keyed_fragments_delete_then_insert() {
    let mut ids = IdGen::new();
    let before = realize(&[keyed(vec![("a".into(), text("A"))])], &mut ids);
    let after = vec![keyed(vec![("z".into(), text("Z"))])];
    let out = diff_siblings(0, &before, &after, &mut ids);
    let wire = edits_to_wire(&out.edits);
    assert_eq!(
        wire,
        vec![
            WireEdit::Delete { d: 1 },
            WireEdit::Insert {
                i: WireNode::Text("Z".to_string())
            },
        ]
    );
}
