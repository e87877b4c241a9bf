//! Round-trip properties: applying a changeset reconstructs the target,
//! and applying its reverse restores the source.

use changeset_core::{apply, diff, DiffOptions, Document};
use proptest::prelude::*;
use serde_json::{json, Value};

fn doc(value: Value) -> Document {
    Document::from_json_value(value).expect("valid document")
}

fn assert_round_trip(source: &Document, target: &Document) {
    let options = DiffOptions::default();
    let changeset = diff(source, target, &options).expect("top-level mappings");
    let patched = apply(source, &changeset).expect("changeset applies to its source");
    assert_eq!(&patched, target, "changeset must reconstruct the target");
    let restored = apply(target, &changeset.reverse()).expect("reverse applies to the target");
    assert_eq!(&restored, source, "reversed changeset must restore the source");
}

fn permutations(n: usize) -> Vec<Vec<usize>> {
    fn permute(indices: &mut Vec<usize>, at: usize, out: &mut Vec<Vec<usize>>) {
        if at == indices.len() {
            out.push(indices.clone());
            return;
        }
        for i in at..indices.len() {
            indices.swap(at, i);
            permute(indices, at + 1, out);
            indices.swap(at, i);
        }
    }
    let mut indices: Vec<usize> = (0..n).collect();
    let mut out = Vec::new();
    permute(&mut indices, 0, &mut out);
    out
}

fn array_document<F>(order: &[usize], element: F) -> Document
where
    F: Fn(usize) -> Value,
{
    let items: Vec<Value> = order.iter().map(|&label| element(label)).collect();
    doc(json!({ "arr": items }))
}

fn reorder_matrix<F>(element: F)
where
    F: Fn(usize) -> Value,
{
    let identity: Vec<usize> = (0..4).collect();
    let source = array_document(&identity, &element);
    for order in permutations(4) {
        let target = array_document(&order, &element);
        assert_round_trip(&source, &target);
    }
}

#[test]
fn every_reordering_of_a_value_array_round_trips() {
    reorder_matrix(|label| json!(format!("v{label}")));
}

#[test]
fn every_reordering_of_an_object_array_round_trips() {
    reorder_matrix(|label| json!({"v": format!("v{label}")}));
}

#[test]
fn every_reordering_of_an_identity_array_round_trips() {
    reorder_matrix(|label| json!({"_id": label, "v": format!("v{label}")}));
}

#[test]
fn reordering_combined_with_insertions_and_deletions_round_trips() {
    let source = doc(json!({"arr": ["a", "b", "c", "d", "e"]}));
    for target in [
        json!({"arr": ["e", "c", "a", "f"]}),
        json!({"arr": ["f", "a", "b", "c", "d", "e"]}),
        json!({"arr": ["b", "a", "x", "y", "e"]}),
        json!({"arr": []}),
        json!({"arr": ["e", "d", "c", "b", "a", "f", "g"]}),
    ] {
        assert_round_trip(&source, &doc(target));
    }
}

#[test]
fn identity_reorder_with_content_edits_round_trips() {
    let source = doc(json!({"arr": [
        {"_id": 1, "v": "a"},
        {"_id": 2, "v": "b"},
        {"_id": 3, "v": "c"},
    ]}));
    let target = doc(json!({"arr": [
        {"_id": 3, "v": "c2"},
        {"_id": 1, "v": "a"},
        {"_id": 4, "v": "d"},
    ]}));
    assert_round_trip(&source, &target);
}

#[test]
fn arrays_with_duplicate_elements_round_trip() {
    let source = doc(json!({"arr": ["x", "x", "y"]}));
    let target = doc(json!({"arr": ["y", "x", "x"]}));
    assert_round_trip(&source, &target);
    assert_round_trip(&doc(json!({"arr": ["x", "x"]})), &doc(json!({"arr": ["x"]})));
}

#[test]
fn mixed_identity_and_plain_elements_round_trip() {
    let source = doc(json!({"arr": ["plain", {"_id": 1, "v": "a"}, 7]}));
    let target = doc(json!({"arr": [{"_id": 2, "v": "b"}, "plain"]}));
    assert_round_trip(&source, &target);
}

#[test]
fn deeply_nested_structures_round_trip() {
    let source = doc(json!({
        "meta": {"rev": 1, "title": "draft"},
        "rows": [
            {"_id": "r1", "cells": [1, 2, 3]},
            {"_id": "r2", "cells": []},
        ],
    }));
    let target = doc(json!({
        "meta": {"rev": 2, "title": "final"},
        "rows": [
            {"_id": "r2", "cells": ["new"]},
            {"_id": "r1", "cells": [3, 2]},
        ],
        "published": true,
    }));
    assert_round_trip(&source, &target);
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(|n| json!(n)),
        "[a-z]{0,6}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn arb_top_level() -> impl Strategy<Value = Document> {
    prop::collection::btree_map("[a-z]{1,4}", arb_value(), 0..5).prop_map(|map| {
        doc(Value::Object(map.into_iter().collect()))
    })
}

proptest! {
    #[test]
    fn diffing_a_document_against_itself_is_empty(document in arb_top_level()) {
        let changeset = diff(&document, &document, &DiffOptions::default()).unwrap();
        prop_assert!(changeset.is_empty());
    }

    #[test]
    fn diff_then_apply_reconstructs_the_target(
        source in arb_top_level(),
        target in arb_top_level(),
    ) {
        let changeset = diff(&source, &target, &DiffOptions::default()).unwrap();
        let patched = apply(&source, &changeset).unwrap();
        prop_assert_eq!(patched, target);
    }

    #[test]
    fn reversed_diff_restores_the_source(
        source in arb_top_level(),
        target in arb_top_level(),
    ) {
        let changeset = diff(&source, &target, &DiffOptions::default()).unwrap();
        let restored = apply(&target, &changeset.reverse()).unwrap();
        prop_assert_eq!(restored, source);
    }

    #[test]
    fn reversal_is_an_involution(
        source in arb_top_level(),
        target in arb_top_level(),
    ) {
        let changeset = diff(&source, &target, &DiffOptions::default()).unwrap();
        prop_assert_eq!(changeset.reverse().reverse(), changeset);
    }
}
