// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Keeping a document's postings in sync with its fields.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **POSTINGS_MATCH_FIELDS**: after `reindex` returns `Indexed`, the index
//!    holds exactly one posting per n-gram of the document's current field
//!    values, and nothing else for that document id.
//! 2. **FILTER_FAILURES_ARE_LOCAL**: a filter function that fails omits its
//!    key; it never aborts the document.
//! 3. **EMPTY_IS_A_NOOP**: a document whose fields yield no n-grams leaves
//!    this index untouched (prior postings included). Other indexes are
//!    processed as usual.
//!
//! # Races
//!
//! Delete-then-insert is two store calls. Two concurrent reindexes of the same
//! document can interleave and leave postings from both; a concurrent search
//! can observe the document half-indexed. `Engine::with_document_locks`
//! serializes writers per `(index, document_id)` for callers that care.

use crate::config::IndexConfig;
use crate::document::Document;
use crate::error::Result;
use crate::filter::{evaluate_filters, BoxError, Filter};
use crate::locks::DocumentLocks;
use crate::ngrams::{extract, merge_sum, NgramScores};
use crate::store::{PostingStore, Predicate};
use crate::types::{DocumentId, Posting};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

type UpdateIf<D> = Box<dyn Fn(&D) -> bool + Send + Sync>;

/// A named n-gram index over some fields of `D`.
pub struct NgramIndex<D> {
    name: String,
    config: IndexConfig,
    fields: Vec<String>,
    filters: Vec<Filter<D>>,
    update_if: Option<UpdateIf<D>>,
}

impl<D> NgramIndex<D> {
    pub fn new(name: impl Into<String>, config: IndexConfig) -> Self {
        Self {
            name: name.into(),
            config,
            fields: Vec::new(),
            filters: Vec::new(),
            update_if: None,
        }
    }

    /// Add a field to index. With no fields, `Document::display_text` is used.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Capture a filter value per document. Filters are stored in the order added.
    pub fn filter<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&D) -> std::result::Result<serde_json::Value, BoxError> + Send + Sync + 'static,
    {
        self.filters.push(Filter::new(name, func));
        self
    }

    /// Only reindex documents for which `predicate` holds.
    pub fn update_if<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&D) -> bool + Send + Sync + 'static,
    {
        self.update_if = Some(Box::new(predicate));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    pub fn filters(&self) -> &[Filter<D>] {
        &self.filters
    }

    pub fn should_update(&self, document: &D) -> bool {
        self.update_if.as_ref().is_none_or(|pred| pred(document))
    }
}

impl<D: Document> NgramIndex<D> {
    /// The configured field values, in field order.
    pub fn field_values(&self, document: &D) -> Vec<Option<String>> {
        if self.fields.is_empty() {
            return vec![document.display_text()];
        }
        self.fields
            .iter()
            .map(|field| document.field_value(field))
            .collect()
    }

    /// Every n-gram of every field, shared n-grams summed across fields.
    pub fn ngrams(&self, document: &D) -> NgramScores {
        merge_sum(
            self.field_values(document)
                .iter()
                .map(|value| extract(value.as_deref(), &self.config, false)),
        )
    }
}

impl<D> std::fmt::Debug for NgramIndex<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NgramIndex")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("fields", &self.fields)
            .field("filters", &self.filters)
            .field("update_if", &self.update_if.is_some())
            .finish()
    }
}

/// What `reindex` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReindexOutcome {
    /// `update_if` said no; the index was not touched.
    Skipped,
    /// The fields produced no n-grams; the index was not touched.
    Empty,
    /// Old postings were replaced by this many new ones.
    Indexed(usize),
}

/// Totals for a batch reindex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub indexed: usize,
    pub skipped: usize,
    pub empty: usize,
    pub postings: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: ReindexOutcome) {
        match outcome {
            ReindexOutcome::Skipped => self.skipped += 1,
            ReindexOutcome::Empty => self.empty += 1,
            ReindexOutcome::Indexed(n) => {
                self.indexed += 1;
                self.postings += n;
            }
        }
    }
}

/// Replace a document's postings in one index.
pub fn reindex<S, D>(store: &S, index: &NgramIndex<D>, document: &D) -> Result<ReindexOutcome>
where
    S: PostingStore + ?Sized,
    D: Document,
{
    if !index.should_update(document) {
        return Ok(ReindexOutcome::Skipped);
    }
    write_postings(store, index, document, index.ngrams(document))
}

/// Delete-then-insert with precomputed n-grams.
pub fn write_postings<S, D>(
    store: &S,
    index: &NgramIndex<D>,
    document: &D,
    ngrams: NgramScores,
) -> Result<ReindexOutcome>
where
    S: PostingStore + ?Sized,
    D: Document,
{
    if ngrams.is_empty() {
        return Ok(ReindexOutcome::Empty);
    }

    let document_id = document.document_id();
    let document_class = document.document_class().to_string();
    store.delete(index.name(), &Predicate::document(document_id.clone()))?;

    let filter_values =
        (!index.filters.is_empty()).then(|| evaluate_filters(&index.filters, document));

    let postings: Vec<Posting> = ngrams
        .into_iter()
        .map(|(ngram, score)| Posting {
            ngram,
            document_id: document_id.clone(),
            document_class: document_class.clone(),
            score,
            filter_values: filter_values.clone(),
        })
        .collect();
    let count = postings.len();
    store.insert_many(index.name(), postings)?;

    tracing::trace!(index = index.name(), document = %document_id, postings = count, "reindexed");
    Ok(ReindexOutcome::Indexed(count))
}

/// Reindex many documents. Tokenization runs in parallel; writes are sequential
/// and, when `locks` is given, take each document's lock.
pub fn reindex_batch<S, D>(
    store: &S,
    index: &NgramIndex<D>,
    documents: &[D],
    locks: Option<&DocumentLocks>,
) -> Result<BatchSummary>
where
    S: PostingStore + ?Sized,
    D: Document + Sync,
{
    reindex_batch_with(store, index, documents, locks, |_| {})
}

/// [`reindex_batch`], calling `on_done` once per document, in input order, as
/// its write finishes.
pub fn reindex_batch_with<S, D, F>(
    store: &S,
    index: &NgramIndex<D>,
    documents: &[D],
    locks: Option<&DocumentLocks>,
    mut on_done: F,
) -> Result<BatchSummary>
where
    S: PostingStore + ?Sized,
    D: Document + Sync,
    F: FnMut(ReindexOutcome),
{
    let tokenize = |document: &D| {
        index
            .should_update(document)
            .then(|| index.ngrams(document))
    };

    #[cfg(feature = "parallel")]
    let prepared: Vec<Option<NgramScores>> = documents.par_iter().map(tokenize).collect();
    #[cfg(not(feature = "parallel"))]
    let prepared: Vec<Option<NgramScores>> = documents.iter().map(tokenize).collect();

    let mut summary = BatchSummary::default();
    for (document, ngrams) in documents.iter().zip(prepared) {
        let outcome = match ngrams {
            None => ReindexOutcome::Skipped,
            Some(ngrams) => {
                let _guard = locks.map(|l| l.lock(index.name(), &document.document_id()));
                write_postings(store, index, document, ngrams)?
            }
        };
        summary.record(outcome);
        on_done(outcome);
    }

    tracing::debug!(
        index = index.name(),
        indexed = summary.indexed,
        skipped = summary.skipped,
        empty = summary.empty,
        postings = summary.postings,
        "batch reindex complete"
    );
    Ok(summary)
}

/// Remove every posting of one document from an index.
pub fn deindex<S>(store: &S, index: &str, document_id: &DocumentId) -> Result<usize>
where
    S: PostingStore + ?Sized,
{
    Ok(store.delete(index, &Predicate::document(document_id.clone()))?)
}

/// Remove every posting of one class from an index.
pub fn deindex_class<S>(store: &S, index: &str, document_class: &str) -> Result<usize>
where
    S: PostingStore + ?Sized,
{
    Ok(store.delete(index, &Predicate::class(document_class))?)
}
