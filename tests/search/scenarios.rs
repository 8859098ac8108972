//! End-to-end scenarios against the default configuration.

use super::common::{artworks, hit_ids, seeded_engine};
use ngramdex::testing::Gallery;
use ngramdex::testing::{artwork_engine, Artwork};
use ngramdex::{Error, IndexConfig, SearchOptions};

#[test]
fn test_flowers_found_by_exact_and_case_different_queries() {
    let docs = artworks(&["Flowers", "Cookies", "Untitled"]);
    let engine = seeded_engine(&docs);

    let hits = engine.search("Flowers", &SearchOptions::default()).unwrap();
    assert_eq!(hits[0].document_id.as_str(), "1");

    let hits = engine.search("flower", &SearchOptions::default()).unwrap();
    assert_eq!(hits[0].document_id.as_str(), "1");

    let hits = engine.search("xyz123", &SearchOptions::default()).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn test_empty_and_unindexable_queries_return_nothing() {
    let engine = seeded_engine(&artworks(&["Flowers"]));
    assert!(engine.search("", &SearchOptions::default()).unwrap().is_empty());
    assert!(engine.search("%%%", &SearchOptions::default()).unwrap().is_empty());
}

#[test]
fn test_short_query_still_matches_full_words() {
    // "ox" is shorter than the n-gram width but is a full word.
    let engine = seeded_engine(&artworks(&["Ox", "Oxford"]));
    let hits = engine.search("ox", &SearchOptions::default()).unwrap();
    assert_eq!(hit_ids(&hits), vec!["1"]);
}

#[test]
fn test_accents_are_folded_on_both_sides() {
    let engine = seeded_engine(&artworks(&["César Galicia", "Cookies"]));
    let hits = engine.search("cesar", &SearchOptions::default()).unwrap();
    assert_eq!(hits[0].document_id.as_str(), "1");
    let hits = engine.search("CÉSAR", &SearchOptions::default()).unwrap();
    assert_eq!(hits[0].document_id.as_str(), "1");
}

#[test]
fn test_accents_kept_when_folding_disabled() {
    let config = IndexConfig::builder().remove_accents(false).build().unwrap();
    let engine = artwork_engine(config);
    engine.reindex_document(&Artwork::new(1, "César")).unwrap();

    // "é" is not in the alphabet, so the title normalizes to "csar".
    let grams = engine.tokenize(None, "César", false).unwrap();
    assert!(grams.contains_key("csa"));
    assert!(!grams.contains_key("ces"));
}

#[test]
fn test_custom_alphabet_and_width() {
    let config = IndexConfig::builder()
        .ngram_width(4)
        .alphabet("abcdefg")
        .build()
        .unwrap();
    let engine = artwork_engine(config);
    engine.reindex_document(&Artwork::new(1, "Cabbage")).unwrap();
    engine.reindex_document(&Artwork::new(2, "Badge")).unwrap();

    let grams = engine.tokenize(None, "cabbage xyz", false).unwrap();
    assert!(grams.contains_key("cabb"));
    assert!(!grams.contains_key("cab"));
    // x, y and z are dropped; the separator survives.
    assert!(grams.keys().all(|g| g.chars().all(|c| "abcdefg ".contains(c))));

    let hits = engine.search("cabbage", &SearchOptions::default()).unwrap();
    assert_eq!(hits[0].document_id.as_str(), "1");
}

#[test]
fn test_unspecified_index_is_an_error() {
    let engine = seeded_engine(&artworks(&["Flowers"])).with_index(
        ngramdex::NgramIndex::new("artists", IndexConfig::default()).field("artist"),
    );
    let err = engine.search("flowers", &SearchOptions::default()).unwrap_err();
    match err {
        Error::UnspecifiedIndex { class, indexes } => {
            assert_eq!(class, "Artwork");
            assert_eq!(indexes, vec!["titles".to_string(), "artists".to_string()]);
        }
        other => panic!("expected UnspecifiedIndex, got {other:?}"),
    }
}

#[test]
fn test_records_missing_from_the_store_are_dropped() {
    let docs = artworks(&["Flowers", "Flower", "Flow"]);
    let engine = seeded_engine(&docs);
    let mut gallery = Gallery::new(&docs);
    gallery.remove(2);

    let matches = engine
        .search_records(&gallery, "flower", &SearchOptions::default())
        .unwrap();
    let titles: Vec<&str> = matches.iter().map(|m| m.record.title.as_str()).collect();
    assert!(!titles.contains(&"Flower"));
    assert_eq!(matches.len(), 2);
}

#[test]
fn test_default_result_limit_is_ten() {
    let titles: Vec<String> = (0..25).map(|i| format!("Painting {i}")).collect();
    let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
    let engine = seeded_engine(&artworks(&refs));

    let hits = engine.search("painting", &SearchOptions::default()).unwrap();
    assert_eq!(hits.len(), 10);

    let all = engine
        .search("painting", &SearchOptions::default().max_results(None))
        .unwrap();
    assert_eq!(all.len(), 25);
}

#[test]
fn test_class_restriction() {
    let engine = seeded_engine(&[
        Artwork::new(1, "Flowers"),
        Artwork::new(2, "Flowers").with_class("Print"),
        Artwork::new(3, "Flowers").with_class("Poster"),
    ]);
    let hits = engine
        .search("flowers", &SearchOptions::default().classes(["Print", "Poster"]))
        .unwrap();
    assert_eq!(hit_ids(&hits), vec!["2", "3"]);
}
