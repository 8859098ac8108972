//! Keeping postings in sync: reindex, deindex, shared stores, threads.

use std::sync::Arc;
use std::thread;

use super::common::{artworks, hit_ids, seeded_engine};
use ngramdex::testing::{titles_index, Artwork};
use ngramdex::{
    DocumentId, Engine, IndexConfig, MemoryStore, NgramIndex, ReindexOutcome, SearchOptions,
};

#[test]
fn test_reindex_is_idempotent() {
    let engine = seeded_engine(&artworks(&["Flowers", "Cookies"]));
    let before = engine.store().snapshot("titles");
    engine.reindex_document(&Artwork::new(1, "Flowers")).unwrap();
    engine.reindex_document(&Artwork::new(1, "Flowers")).unwrap();
    assert_eq!(engine.store().snapshot("titles"), before);
}

#[test]
fn test_reindex_follows_field_changes() {
    let engine = seeded_engine(&artworks(&["Flowers"]));
    engine.reindex_document(&Artwork::new(1, "Sunset")).unwrap();
    assert!(engine.search("flowers", &SearchOptions::default()).unwrap().is_empty());
    assert_eq!(
        hit_ids(&engine.search("sunset", &SearchOptions::default()).unwrap()),
        vec!["1"]
    );
}

#[test]
fn test_blank_title_keeps_previous_postings() {
    let engine = seeded_engine(&artworks(&["Flowers"]));
    let outcomes = engine.reindex_document(&Artwork::new(1, "")).unwrap();
    assert_eq!(outcomes["titles"], ReindexOutcome::Empty);
    assert_eq!(engine.search("flowers", &SearchOptions::default()).unwrap().len(), 1);
}

#[test]
fn test_empty_index_does_not_stop_the_others() {
    let engine = Engine::new(MemoryStore::new())
        .with_index(NgramIndex::new("artists", IndexConfig::default()).field("artist"))
        .with_index(titles_index(IndexConfig::default()));
    let outcomes = engine.reindex_document(&Artwork::new(1, "Flowers")).unwrap();
    assert_eq!(outcomes["artists"], ReindexOutcome::Empty);
    assert!(matches!(outcomes["titles"], ReindexOutcome::Indexed(_)));
}

#[test]
fn test_deindex_document_and_class() {
    let engine = seeded_engine(&[
        Artwork::new(1, "Flowers"),
        Artwork::new(2, "Flowers").with_class("Print"),
        Artwork::new(3, "Flowers").with_class("Print"),
    ]);

    engine.deindex_document(&DocumentId::from(1)).unwrap();
    assert_eq!(
        hit_ids(&engine.search("flowers", &SearchOptions::default()).unwrap()),
        vec!["2", "3"]
    );

    engine.deindex_class("Print").unwrap();
    assert!(engine.store().is_empty("titles"));
}

#[test]
fn test_update_if_gates_reindexing() {
    let index = titles_index(IndexConfig::default()).update_if(|art: &Artwork| !art.colors.is_empty());
    let engine = Engine::new(MemoryStore::new()).with_index(index);

    let outcomes = engine.reindex_document(&Artwork::new(1, "Flowers")).unwrap();
    assert_eq!(outcomes["titles"], ReindexOutcome::Skipped);

    engine
        .reindex_document(&Artwork::new(1, "Flowers").with_colors(&["red"]))
        .unwrap();
    assert_eq!(engine.search("flowers", &SearchOptions::default()).unwrap().len(), 1);
}

#[test]
fn test_engines_share_a_store() {
    let store = Arc::new(MemoryStore::new());
    let paintings = Engine::new(Arc::clone(&store)).with_index(titles_index(IndexConfig::default()));
    let prints = Engine::new(Arc::clone(&store)).with_index(titles_index(IndexConfig::default()));

    paintings.reindex_document(&Artwork::new(1, "Flowers")).unwrap();
    prints
        .reindex_document(&Artwork::new(2, "Flowers").with_class("Print"))
        .unwrap();

    let hits = paintings.search("flowers", &SearchOptions::default()).unwrap();
    assert_eq!(hits.len(), 2);
    let hits = paintings
        .search("flowers", &SearchOptions::default().classes(["Artwork"]))
        .unwrap();
    assert_eq!(hit_ids(&hits), vec!["1"]);
}

#[test]
fn test_concurrent_reindex_with_locks_leaves_one_version() {
    let engine = Arc::new(
        Engine::new(MemoryStore::new())
            .with_index(titles_index(IndexConfig::default()))
            .with_document_locks(),
    );

    let handles: Vec<_> = ["Flowers", "Sunset", "Harbor", "Meadow"]
        .into_iter()
        .map(|title| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for _ in 0..25 {
                    engine.reindex_document(&Artwork::new(1, title)).unwrap();
                    engine.search(title, &SearchOptions::default()).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Whatever won, the postings are exactly one title's n-grams.
    let postings = engine.store().snapshot("titles");
    let winners: Vec<&str> = ["Flowers", "Sunset", "Harbor", "Meadow"]
        .into_iter()
        .filter(|title| {
            let expected = engine.indexes()[0].ngrams(&Artwork::new(1, title));
            postings.len() == expected.len()
                && postings.iter().all(|p| expected.contains_key(&p.ngram))
        })
        .collect();
    assert_eq!(winners.len(), 1);
}
