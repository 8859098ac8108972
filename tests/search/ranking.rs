//! Ranking properties: short strings, prefixes, fuzzy OR, tie-breaks.

use std::collections::HashSet;

use super::common::{artworks, hit_ids, seeded_engine};
use ngramdex::ngrams::{interior_score, word_start_score};
use ngramdex::SearchOptions;

#[test]
fn test_shorter_string_ranks_above_its_extension() {
    let engine = seeded_engine(&artworks(&["Flower Myth", "Flowers", "Flowers of Spring"]));
    let hits = engine.search("flowers", &SearchOptions::default()).unwrap();
    assert_eq!(hits[0].document_id.as_str(), "2");
    assert_eq!(hits[1].document_id.as_str(), "3");
}

#[test]
fn test_prefix_outweighs_interior() {
    for len in 3..40 {
        assert!(word_start_score(len) > interior_score(len), "len {len}");
    }

    // Same length, "ant" at the start in one and in the middle in the other.
    let engine = seeded_engine(&artworks(&["antelope", "elephant"]));
    let hits = engine.search("ant", &SearchOptions::default().return_scores(true)).unwrap();
    assert_eq!(hit_ids(&hits), vec!["1", "2"]);
    assert!(hits[0].score > hits[1].score);
}

#[test]
fn test_partial_overlap_still_matches() {
    // Shares only "flo" with the query: fuzzy OR, not AND.
    let engine = seeded_engine(&artworks(&["Floe", "Cookies"]));
    let hits = engine.search("flowers", &SearchOptions::default()).unwrap();
    assert_eq!(hit_ids(&hits), vec!["1"]);
}

#[test]
fn test_typo_tolerance() {
    let engine = seeded_engine(&artworks(&["Sunflowers", "Starry Night", "Water Lilies"]));
    let hits = engine.search("sunflowrs", &SearchOptions::default()).unwrap();
    assert_eq!(hits[0].document_id.as_str(), "1");
}

#[test]
fn test_more_shared_ngrams_rank_higher() {
    let engine = seeded_engine(&artworks(&["Flock", "Flowe", "Flowers"]));
    let hits = engine.search("flowers", &SearchOptions::default()).unwrap();
    assert_eq!(hit_ids(&hits), vec!["3", "2", "1"]);
}

#[test]
fn test_each_document_appears_once() {
    // "banana" repeats "ana"; every probe n-gram hits the same document.
    let engine = seeded_engine(&artworks(&["banana", "bandana", "cabana"]));
    let hits = engine
        .search("banana", &SearchOptions::default().max_results(None))
        .unwrap();
    let unique: HashSet<&str> = hits.iter().map(|h| h.document_id.as_str()).collect();
    assert_eq!(unique.len(), hits.len());
    assert_eq!(hits[0].document_id.as_str(), "1");
}

#[test]
fn test_ties_break_by_document_id() {
    let engine = seeded_engine(&artworks(&["Flowers", "Flowers", "Flowers"]));
    let hits = engine.search("flowers", &SearchOptions::default()).unwrap();
    assert_eq!(hit_ids(&hits), vec!["1", "2", "3"]);
}

#[test]
fn test_scores_are_only_returned_when_requested() {
    let docs = artworks(&["Flowers"]);
    let engine = seeded_engine(&docs);
    let gallery = ngramdex::testing::Gallery::new(&docs);

    let plain = engine
        .search_records(&gallery, "flowers", &SearchOptions::default())
        .unwrap();
    assert_eq!(plain[0].score, None);

    let scored = engine
        .search_records(&gallery, "flowers", &SearchOptions::default().return_scores(true))
        .unwrap();
    assert!(scored[0].score.unwrap() > 0.0);
}
