//! Query-time filters.

use serde_json::json;

use super::common::{counting_engine, hit_ids, seeded_engine};
use ngramdex::testing::Artwork;
use ngramdex::{Error, IndexConfig, SearchOptions};

fn palette() -> Vec<Artwork> {
    vec![
        Artwork::new(1, "Flowers").with_colors(&["red", "green", "blue"]),
        Artwork::new(2, "Flowers").with_colors(&["red", "green"]),
        Artwork::new(3, "Flowers").with_colors(&["blue"]),
        Artwork::new(4, "Flowers"),
    ]
}

fn search(filter: serde_json::Value) -> Vec<String> {
    let engine = seeded_engine(&palette());
    let hits = engine
        .search("flowers", &SearchOptions::default().filter("colors", filter))
        .unwrap();
    let mut ids = hit_ids(&hits);
    ids.sort();
    ids
}

#[test]
fn test_any_matches_at_least_one_value() {
    assert_eq!(search(json!({"any": ["green", "yellow"]})), vec!["1", "2"]);
}

#[test]
fn test_bare_list_means_all() {
    assert_eq!(search(json!(["red", "green"])), vec!["1", "2"]);
    assert_eq!(search(json!(["red", "blue"])), vec!["1"]);
    assert_eq!(search(json!({"all": ["red", "blue"]})), vec!["1"]);
}

#[test]
fn test_bare_scalar_means_contains() {
    assert_eq!(search(json!("blue")), vec!["1", "3"]);
}

#[test]
fn test_empty_stored_list_matches_nothing_specific() {
    // Artwork 4 has an empty colors list.
    assert!(!search(json!({"any": ["red", "green", "blue"]})).contains(&"4".to_string()));
}

#[test]
fn test_empty_operand_matches_nothing() {
    assert!(search(json!({"any": []})).is_empty());
    assert!(search(json!([])).is_empty());
}

#[test]
fn test_filter_on_unknown_key_matches_nothing() {
    let engine = seeded_engine(&palette());
    let hits = engine
        .search("flowers", &SearchOptions::default().filter("shape", json!("round")))
        .unwrap();
    assert!(hits.is_empty());
}

#[test]
fn test_unknown_operator_aborts_before_store_access() {
    let engine = counting_engine(IndexConfig::default(), &palette());
    let err = engine
        .search(
            "flowers",
            &SearchOptions::default().filter("colors", json!({"unknown": ["red"]})),
        )
        .unwrap_err();

    match err {
        Error::UnknownFilterOperator { filter, operators } => {
            assert_eq!(filter, "colors");
            assert_eq!(operators, vec!["unknown".to_string()]);
        }
        other => panic!("expected UnknownFilterOperator, got {other:?}"),
    }
    assert_eq!(engine.store().calls(), 0);
}
