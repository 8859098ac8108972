// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The records that flow between the tokenizer, the store and the ranker.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **Posting**: for a given `(index, document_id)`, the postings present after
//!   a completed reindex are exactly the n-grams of the document's current field
//!   values. One posting per distinct n-gram, never two.
//!
//! - **SearchHit**: each `document_id` appears at most once in a result list,
//!   carrying the sum of its candidate scores over every probe n-gram it matched.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// NEWTYPES
// =============================================================================

/// Opaque document identifier.
///
/// The engine never interprets it beyond equality and ordering (ordering only
/// to break score ties deterministically). Ids are expected to be unique
/// within an index, even when several classes share that index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        DocumentId(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        DocumentId(id)
    }
}

impl From<u64> for DocumentId {
    fn from(id: u64) -> Self {
        DocumentId(id.to_string())
    }
}

/// Filter name → value captured at index time.
///
/// Values are JSON so filter functions can return booleans, strings, numbers
/// or lists of them. A scalar behaves like a one-element list when matched.
pub type FilterValues = BTreeMap<String, serde_json::Value>;

// =============================================================================
// STORED RECORDS
// =============================================================================

/// One stored (n-gram, document) association.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub ngram: String,
    pub document_id: DocumentId,
    pub document_class: String,
    pub score: f64,
    /// `None` when the index defines no filters at all, as opposed to an empty
    /// map when every filter function failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_values: Option<FilterValues>,
}

// =============================================================================
// RESULTS
// =============================================================================

/// A ranked search result before record resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub document_id: DocumentId,
    pub document_class: String,
    pub score: f64,
}

/// A resolved search result.
///
/// `score` is only populated when the search asked for scores.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<T> {
    pub record: T,
    pub score: Option<f64>,
}
