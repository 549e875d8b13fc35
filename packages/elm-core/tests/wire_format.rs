//! Checks the wire format against the bit-exact JSON literals from §6,
//! one discriminating key per edit object, fields omitted when empty.

use elm_dom_core::node::{el, text};
use elm_dom_core::wire::{edit_to_wire, realized_to_wire};
use elm_dom_core::{diff_siblings, to_realized, Edit, IdGen};

type Msg = ();

#[test]
fn skip_serializes_to_a_bare_s_key() {
    let wire = edit_to_wire::<Msg>(&Edit::Skip(3));
    assert_eq!(serde_json::to_value(&wire).unwrap(), serde_json::json!({ "s": 3 }));
}

#[test]
fn delete_serializes_to_a_bare_d_key() {
    let wire = edit_to_wire::<Msg>(&Edit::Delete(2));
    assert_eq!(serde_json::to_value(&wire).unwrap(), serde_json::json!({ "d": 2 }));
}

#[test]
fn move_serializes_to_f_and_n() {
    let wire = edit_to_wire::<Msg>(&Edit::Move { from: 5, count: 2 });
    assert_eq!(serde_json::to_value(&wire).unwrap(), serde_json::json!({ "f": 5, "n": 2 }));
}

#[test]
fn text_node_serializes_to_a_bare_json_string() {
    let mut ids = IdGen::new();
    let realized = to_realized(&[text::<Msg>("hi")], &mut ids).unwrap();
    let wire = realized_to_wire(&realized[0]);
    assert_eq!(serde_json::to_value(&wire).unwrap(), serde_json::json!("hi"));
}

#[test]
fn element_node_omits_empty_fields() {
    let mut ids = IdGen::new();
    let realized = to_realized(&[el::<Msg>("br").build()], &mut ids).unwrap();
    let wire = realized_to_wire(&realized[0]);
    assert_eq!(serde_json::to_value(&wire).unwrap(), serde_json::json!({ "n": "br" }));
}

#[test]
fn in_place_attr_add_and_remove_round_trips_the_literal_example() {
    // §8 scenario 2: before div{id:x}, after div{class:c} -> {"a":{"id":null,"class":"c"}}
    let mut ids = IdGen::new();
    let before = to_realized(&[el::<Msg>("div").attr("id", "x").build()], &mut ids).unwrap();
    let after = vec![el::<Msg>("div").attr("class", "c").build()];
    let out = diff_siblings(0, &before, &after, &mut ids);
    assert_eq!(out.edits.len(), 1);
    let wire = edit_to_wire(&out.edits[0]);
    let json = serde_json::to_value(&wire).unwrap();
    assert_eq!(json["a"]["id"], serde_json::Value::Null);
    assert_eq!(json["a"]["class"], serde_json::json!("c"));
    assert!(json.get("e").is_none());
    assert!(json.get("c").is_none());
}
