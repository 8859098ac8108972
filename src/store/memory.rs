// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Embedded posting tables.
//!
//! Each index gets a `Table`: postings bucketed by n-gram (the lookup every
//! search does) plus a secondary index from document id to the n-grams it
//! has postings under (the lookup every reindex does). Deleting by class has
//! no index and scans, which is fine for something done in bulk maintenance.
//!
//! All tables sit behind one `parking_lot::RwLock`. Searches take read locks
//! and run concurrently; writes are short and serialize.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use parking_lot::RwLock;

use super::{Fetch, PostingStore, Predicate};
use crate::error::StoreError;
use crate::types::{DocumentId, Posting};

/// Summary counts for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableStats {
    pub postings: usize,
    pub ngrams: usize,
    pub documents: usize,
    pub classes: BTreeSet<String>,
}

impl TableStats {
    /// Tally a loose set of postings, e.g. a decoded snapshot.
    pub fn of<'a>(postings: impl IntoIterator<Item = &'a Posting>) -> Self {
        let mut stats = TableStats::default();
        let mut ngrams = BTreeSet::new();
        let mut documents = BTreeSet::new();
        for posting in postings {
            stats.postings += 1;
            ngrams.insert(posting.ngram.as_str());
            documents.insert(&posting.document_id);
            stats.classes.insert(posting.document_class.clone());
        }
        stats.ngrams = ngrams.len();
        stats.documents = documents.len();
        stats
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Table {
    by_ngram: HashMap<String, Vec<Posting>>,
    by_document: HashMap<DocumentId, BTreeSet<String>>,
    len: usize,
}

impl Table {
    pub(crate) fn from_postings(postings: Vec<Posting>) -> Self {
        let mut table = Table::default();
        for posting in postings {
            table.insert(posting);
        }
        table
    }

    pub(crate) fn insert(&mut self, posting: Posting) {
        self.by_document
            .entry(posting.document_id.clone())
            .or_default()
            .insert(posting.ngram.clone());
        self.by_ngram
            .entry(posting.ngram.clone())
            .or_default()
            .push(posting);
        self.len += 1;
    }

    /// Buckets that could hold matches, narrowest lookup first.
    fn buckets_for<'a>(&'a self, predicate: &'a Predicate) -> Vec<&'a str> {
        if let Some(ngram) = &predicate.ngram {
            return vec![ngram.as_str()];
        }
        if let Some(id) = &predicate.document_id {
            return self
                .by_document
                .get(id)
                .map(|ngrams| ngrams.iter().map(String::as_str).collect())
                .unwrap_or_default();
        }
        self.by_ngram.keys().map(String::as_str).collect()
    }

    fn matching<'a>(&'a self, predicate: &'a Predicate) -> impl Iterator<Item = &'a Posting> + 'a {
        self.buckets_for(predicate)
            .into_iter()
            .filter_map(|ngram| self.by_ngram.get(ngram))
            .flatten()
            .filter(move |posting| predicate.matches(posting))
    }

    pub(crate) fn count(&self, predicate: &Predicate) -> usize {
        self.matching(predicate).count()
    }

    pub(crate) fn find(&self, predicate: &Predicate, fetch: Fetch) -> Vec<Posting> {
        let matches = self.matching(predicate).cloned();
        match fetch {
            Fetch::All => matches.collect(),
            Fetch::Top(n) => {
                let mut all: Vec<Posting> = matches.collect();
                all.sort_by(compare_by_score);
                all.truncate(n);
                all
            }
        }
    }

    pub(crate) fn delete(&mut self, predicate: &Predicate) -> usize {
        let buckets: Vec<String> = self
            .buckets_for(predicate)
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut removed = 0;

        for ngram in buckets {
            let Some(bucket) = self.by_ngram.get_mut(&ngram) else {
                continue;
            };

            let mut gone: Vec<DocumentId> = Vec::new();
            bucket.retain(|posting| {
                if predicate.matches(posting) {
                    gone.push(posting.document_id.clone());
                    false
                } else {
                    true
                }
            });
            removed += gone.len();

            // Unlink the document from this n-gram unless it still has a
            // posting left in the bucket.
            for id in gone {
                if bucket.iter().any(|p| p.document_id == id) {
                    continue;
                }
                if let Some(ngrams) = self.by_document.get_mut(&id) {
                    ngrams.remove(&ngram);
                    if ngrams.is_empty() {
                        self.by_document.remove(&id);
                    }
                }
            }

            if bucket.is_empty() {
                self.by_ngram.remove(&ngram);
            }
        }

        self.len -= removed;
        removed
    }

    pub(crate) fn postings(&self) -> impl Iterator<Item = &Posting> {
        self.by_ngram.values().flatten()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn stats(&self) -> TableStats {
        TableStats {
            postings: self.len,
            ngrams: self.by_ngram.len(),
            documents: self.by_document.len(),
            classes: self
                .postings()
                .map(|p| p.document_class.clone())
                .collect(),
        }
    }
}

/// Highest score first, then lowest document id.
fn compare_by_score(a: &Posting, b: &Posting) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.document_id.cmp(&b.document_id))
}

/// In-process posting tables, one per index name.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of postings in an index (0 if it doesn't exist).
    pub fn len(&self, index: &str) -> usize {
        self.tables.read().get(index).map_or(0, Table::len)
    }

    pub fn is_empty(&self, index: &str) -> bool {
        self.len(index) == 0
    }

    pub fn index_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn stats(&self, index: &str) -> TableStats {
        self.tables
            .read()
            .get(index)
            .map(Table::stats)
            .unwrap_or_default()
    }

    /// Copy of every posting in an index, sorted by n-gram then document id.
    pub fn snapshot(&self, index: &str) -> Vec<Posting> {
        let tables = self.tables.read();
        let mut postings: Vec<Posting> = tables
            .get(index)
            .map(|table| table.postings().cloned().collect())
            .unwrap_or_default();
        postings.sort_by(|a, b| {
            a.ngram
                .cmp(&b.ngram)
                .then_with(|| a.document_id.cmp(&b.document_id))
        });
        postings
    }

    /// Replace an index's table wholesale.
    pub(crate) fn load(&self, index: &str, postings: Vec<Posting>) {
        self.tables
            .write()
            .insert(index.to_string(), Table::from_postings(postings));
    }
}

impl PostingStore for MemoryStore {
    fn count(&self, index: &str, predicate: &Predicate) -> Result<usize, StoreError> {
        Ok(self
            .tables
            .read()
            .get(index)
            .map_or(0, |table| table.count(predicate)))
    }

    fn find(
        &self,
        index: &str,
        predicate: &Predicate,
        fetch: Fetch,
    ) -> Result<Vec<Posting>, StoreError> {
        Ok(self
            .tables
            .read()
            .get(index)
            .map(|table| table.find(predicate, fetch))
            .unwrap_or_default())
    }

    fn insert(&self, index: &str, posting: Posting) -> Result<(), StoreError> {
        self.tables
            .write()
            .entry(index.to_string())
            .or_default()
            .insert(posting);
        Ok(())
    }

    fn insert_many(&self, index: &str, postings: Vec<Posting>) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        let table = tables.entry(index.to_string()).or_default();
        for posting in postings {
            table.insert(posting);
        }
        Ok(())
    }

    fn delete(&self, index: &str, predicate: &Predicate) -> Result<usize, StoreError> {
        Ok(self
            .tables
            .write()
            .get_mut(index)
            .map_or(0, |table| table.delete(predicate)))
    }
}
