//! Candidate budget: common n-grams can't flood a search.

use super::common::counting_engine;
use ngramdex::testing::Artwork;
use ngramdex::{IndexConfig, PostingStore, Predicate, SearchOptions};

fn crowded(n: u64) -> Vec<Artwork> {
    let mut docs: Vec<Artwork> = (1..=n).map(|i| Artwork::new(i, &format!("Painting {i}"))).collect();
    docs.push(Artwork::new(n + 1, "Paintbrush"));
    docs
}

fn budget(limit: usize) -> IndexConfig {
    IndexConfig::builder().max_candidate_set_size(limit).build().unwrap()
}

#[test]
fn test_rows_fetched_stay_within_budget() {
    let limit = 20;
    let max_results = 5;
    let engine = counting_engine(budget(limit), &crowded(200));

    for query in ["painting", "paintbrush", "painting 42", "brush", "ting"] {
        engine.store().reset();
        let probe = engine.tokenize(None, query, true).unwrap();
        engine
            .search(query, &SearchOptions::default().max_results(Some(max_results)))
            .unwrap();
        let fetched = engine.store().rows_fetched();
        assert!(
            fetched <= limit + probe.len() * max_results,
            "{query}: fetched {fetched} rows"
        );
    }
}

#[test]
fn test_rare_ngrams_are_fetched_first() {
    let engine = counting_engine(budget(20), &crowded(50));
    let hits = engine
        .search("paintbrush", &SearchOptions::default().max_results(Some(3)))
        .unwrap();
    assert_eq!(hits[0].document_id.as_str(), "51");
}

#[test]
fn test_plans_are_fetched_in_ascending_count_order() {
    let engine = counting_engine(budget(20), &crowded(200));
    engine
        .search("paintbrush", &SearchOptions::default().max_results(Some(3)))
        .unwrap();

    let counts: Vec<usize> = engine
        .store()
        .fetched_ngrams()
        .iter()
        .map(|ngram| {
            engine
                .store()
                .inner()
                .count("titles", &Predicate::ngram(ngram.as_str()))
                .unwrap()
        })
        .collect();

    // "tbr", "ush" and the full word belong to one title; "pai" and "int" to all.
    assert_eq!(counts.first(), Some(&1));
    assert_eq!(counts.last(), Some(&201));
    assert!(
        counts.windows(2).all(|pair| pair[0] <= pair[1]),
        "fetch order by count: {counts:?}"
    );
}

#[test]
fn test_unlimited_results_fall_back_to_budget_per_plan() {
    let limit = 15;
    let engine = counting_engine(budget(limit), &crowded(100));
    let probe = engine.tokenize(None, "painting", true).unwrap();
    let hits = engine
        .search("painting", &SearchOptions::default().max_results(None))
        .unwrap();
    assert!(!hits.is_empty());
    assert!(engine.store().rows_fetched() <= limit * (probe.len() + 1));
}

#[test]
fn test_large_budget_fetches_everything() {
    let engine = counting_engine(IndexConfig::default(), &crowded(30));
    let hits = engine
        .search("painting", &SearchOptions::default().max_results(None))
        .unwrap();
    // Every "Painting N" plus "Paintbrush" via "pai"/"ain"/"int".
    assert_eq!(hits.len(), 31);
}
