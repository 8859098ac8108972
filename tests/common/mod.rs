//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use ngramdex::testing::{titles_index, Artwork};
use ngramdex::{
    Engine, Fetch, IndexConfig, MemoryStore, Posting, PostingStore, Predicate, StoreError,
};

// Re-export canonical fixtures from ngramdex::testing
pub use ngramdex::testing::seeded_engine;

// ============================================================================
// INSTRUMENTED STORE
// ============================================================================

/// A `MemoryStore` that counts every call and every row it hands back.
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: MemoryStore,
    counts: AtomicUsize,
    finds: AtomicUsize,
    rows_fetched: AtomicUsize,
    /// N-gram of every `find`, in call order.
    fetched_ngrams: Mutex<Vec<String>>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.counts.load(Ordering::SeqCst) + self.finds.load(Ordering::SeqCst)
    }

    pub fn rows_fetched(&self) -> usize {
        self.rows_fetched.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.counts.store(0, Ordering::SeqCst);
        self.finds.store(0, Ordering::SeqCst);
        self.rows_fetched.store(0, Ordering::SeqCst);
        self.fetched_ngrams.lock().clear();
    }

    pub fn fetched_ngrams(&self) -> Vec<String> {
        self.fetched_ngrams.lock().clone()
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

impl PostingStore for CountingStore {
    fn count(&self, index: &str, predicate: &Predicate) -> Result<usize, StoreError> {
        self.counts.fetch_add(1, Ordering::SeqCst);
        self.inner.count(index, predicate)
    }

    fn find(
        &self,
        index: &str,
        predicate: &Predicate,
        fetch: Fetch,
    ) -> Result<Vec<Posting>, StoreError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        if let Some(ngram) = &predicate.ngram {
            self.fetched_ngrams.lock().push(ngram.clone());
        }
        let rows = self.inner.find(index, predicate, fetch)?;
        self.rows_fetched.fetch_add(rows.len(), Ordering::SeqCst);
        Ok(rows)
    }

    fn insert(&self, index: &str, posting: Posting) -> Result<(), StoreError> {
        self.inner.insert(index, posting)
    }

    fn insert_many(&self, index: &str, postings: Vec<Posting>) -> Result<(), StoreError> {
        self.inner.insert_many(index, postings)
    }

    fn delete(&self, index: &str, predicate: &Predicate) -> Result<usize, StoreError> {
        self.inner.delete(index, predicate)
    }
}

// ============================================================================
// ENGINES
// ============================================================================

/// Engine over a counting store with every artwork indexed, counters reset.
pub fn counting_engine(config: IndexConfig, artworks: &[Artwork]) -> Engine<CountingStore, Artwork> {
    let engine = Engine::new(CountingStore::new()).with_index(titles_index(config));
    for artwork in artworks {
        engine.reindex_document(artwork).unwrap();
    }
    engine.store().reset();
    engine
}

/// Artworks with ids starting at 1, in title order.
pub fn artworks(titles: &[&str]) -> Vec<Artwork> {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| Artwork::new(i as u64 + 1, title))
        .collect()
}

/// Hit ids in rank order.
pub fn hit_ids(hits: &[ngramdex::SearchHit]) -> Vec<String> {
    hits.iter().map(|h| h.document_id.to_string()).collect()
}
