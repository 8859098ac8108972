// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! One entity type's full-text indexes over one posting store.
//!
//! The engine holds no state besides its index definitions and the store
//! handle. Every call reads the store afresh, so searches from several
//! threads, and searches racing reindexes, are fine.

use std::collections::BTreeMap;

use crate::document::{Document, RecordStore};
use crate::error::{Error, Result};
use crate::filter::FilterQuery;
use crate::index::{self, BatchSummary, NgramIndex, ReindexOutcome};
use crate::locks::DocumentLocks;
use crate::ngrams::{extract, NgramScores};
use crate::search::{self, SearchParams};
use crate::store::PostingStore;
use crate::types::{DocumentId, Match, SearchHit};

/// Default number of results a search returns.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Per-call search options.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Required when the engine has more than one index.
    pub index: Option<String>,
    /// `None` returns every candidate.
    pub max_results: Option<usize>,
    pub return_scores: bool,
    pub filters: FilterQuery,
    /// Restrict postings to these document classes.
    pub classes: Option<Vec<String>>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            index: None,
            max_results: Some(DEFAULT_MAX_RESULTS),
            return_scores: false,
            filters: FilterQuery::new(),
            classes: None,
        }
    }
}

impl SearchOptions {
    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.index = Some(name.into());
        self
    }

    pub fn max_results(mut self, max: Option<usize>) -> Self {
        self.max_results = max;
        self
    }

    pub fn return_scores(mut self, enabled: bool) -> Self {
        self.return_scores = enabled;
        self
    }

    pub fn filter(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.filters.insert(name.into(), value);
        self
    }

    pub fn classes<I, C>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.classes = Some(classes.into_iter().map(Into::into).collect());
        self
    }
}

pub struct Engine<S, D> {
    name: String,
    store: S,
    indexes: Vec<NgramIndex<D>>,
    locks: Option<DocumentLocks>,
}

impl<S, D> Engine<S, D> {
    /// An engine with no indexes. Named after `D` for error messages.
    pub fn new(store: S) -> Self {
        let name = std::any::type_name::<D>()
            .rsplit("::")
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            name,
            store,
            indexes: Vec::new(),
            locks: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Register an index. A later index with the same name replaces the earlier one.
    pub fn with_index(mut self, index: NgramIndex<D>) -> Self {
        self.indexes.retain(|existing| existing.name() != index.name());
        self.indexes.push(index);
        self
    }

    /// Serialize writes to the same `(index, document_id)`.
    pub fn with_document_locks(mut self) -> Self {
        self.locks = Some(DocumentLocks::new());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn indexes(&self) -> &[NgramIndex<D>] {
        &self.indexes
    }

    pub fn index_names(&self) -> Vec<&str> {
        self.indexes.iter().map(NgramIndex::name).collect()
    }

    /// Pick the index a call should use.
    pub fn resolve_index(&self, name: Option<&str>) -> Result<&NgramIndex<D>> {
        match (name, self.indexes.as_slice()) {
            (Some(name), _) => self
                .indexes
                .iter()
                .find(|index| index.name() == name)
                .ok_or_else(|| Error::UnknownIndex(name.to_string())),
            (None, []) => Err(Error::NoIndexes(self.name.clone())),
            (None, [only]) => Ok(only),
            (None, several) => Err(Error::UnspecifiedIndex {
                class: self.name.clone(),
                indexes: several.iter().map(|i| i.name().to_string()).collect(),
            }),
        }
    }

    /// Probe (`bounded`) or index-time n-grams of `text` under an index's config.
    pub fn tokenize(&self, index: Option<&str>, text: &str, bounded: bool) -> Result<NgramScores> {
        let index = self.resolve_index(index)?;
        Ok(extract(Some(text), index.config(), bounded))
    }
}

impl<S, D> Engine<S, D>
where
    S: PostingStore,
    D: Document,
{
    /// Ranked hits, unresolved.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        let index = self.resolve_index(options.index.as_deref())?;
        search::search(
            &self.store,
            index.name(),
            index.config(),
            query,
            SearchParams {
                filters: Some(&options.filters),
                classes: options.classes.as_deref(),
                max_results: options.max_results,
            },
        )
    }

    /// Ranked records. Hits whose record is gone are dropped, so this can
    /// return fewer than `max_results` even when more documents matched.
    pub fn search_records<R>(
        &self,
        records: &R,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<Match<R::Record>>>
    where
        R: RecordStore + ?Sized,
    {
        let hits = self.search(query, options)?;
        Ok(search::resolve(records, hits, options.return_scores))
    }

    /// Bring every index up to date with `document`. Outcomes are keyed by index name.
    pub fn reindex_document(&self, document: &D) -> Result<BTreeMap<String, ReindexOutcome>> {
        let id = document.document_id();
        let mut outcomes = BTreeMap::new();
        for index in &self.indexes {
            let _guard = self.locks.as_ref().map(|l| l.lock(index.name(), &id));
            outcomes.insert(
                index.name().to_string(),
                index::reindex(&self.store, index, document)?,
            );
        }
        Ok(outcomes)
    }

    /// Remove `document_id` from every index. Returns postings removed.
    pub fn deindex_document(&self, document_id: &DocumentId) -> Result<usize> {
        let mut removed = 0;
        for index in &self.indexes {
            let _guard = self.locks.as_ref().map(|l| l.lock(index.name(), document_id));
            removed += index::deindex(&self.store, index.name(), document_id)?;
        }
        Ok(removed)
    }

    /// Remove every posting of `document_class` from every index.
    pub fn deindex_class(&self, document_class: &str) -> Result<usize> {
        let mut removed = 0;
        for index in &self.indexes {
            removed += index::deindex_class(&self.store, index.name(), document_class)?;
        }
        tracing::info!(engine = %self.name, class = document_class, removed, "class deindexed");
        Ok(removed)
    }
}

impl<S, D> Engine<S, D>
where
    S: PostingStore,
    D: Document + Sync,
{
    /// Reindex a whole collection into every index.
    pub fn reindex_all(&self, documents: &[D]) -> Result<BTreeMap<String, BatchSummary>> {
        let mut summaries = BTreeMap::new();
        for index in &self.indexes {
            let summary = index::reindex_batch(&self.store, index, documents, self.locks.as_ref())?;
            summaries.insert(index.name().to_string(), summary);
        }
        Ok(summaries)
    }
}

impl<S: std::fmt::Debug, D> std::fmt::Debug for Engine<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("name", &self.name)
            .field("store", &self.store)
            .field("indexes", &self.indexes)
            .field("document_locks", &self.locks.is_some())
            .finish()
    }
}
