// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Equality predicates over postings.

use crate::filter::FilterPredicate;
use crate::types::{DocumentId, Posting};

/// Conjunction of optional equality constraints plus filter predicates.
///
/// An all-`None` predicate with no filters matches every posting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    pub ngram: Option<String>,
    pub document_id: Option<DocumentId>,
    pub document_class: Option<String>,
    /// Posting class must be one of these (when set).
    pub classes: Option<Vec<String>>,
    pub filters: Vec<FilterPredicate>,
}

impl Predicate {
    pub fn ngram(ngram: impl Into<String>) -> Self {
        Self {
            ngram: Some(ngram.into()),
            ..Self::default()
        }
    }

    pub fn document(id: DocumentId) -> Self {
        Self {
            document_id: Some(id),
            ..Self::default()
        }
    }

    pub fn class(class: impl Into<String>) -> Self {
        Self {
            document_class: Some(class.into()),
            ..Self::default()
        }
    }

    pub fn with_classes(mut self, classes: Option<Vec<String>>) -> Self {
        self.classes = classes;
        self
    }

    pub fn with_filters(mut self, filters: Vec<FilterPredicate>) -> Self {
        self.filters = filters;
        self
    }

    pub fn matches(&self, posting: &Posting) -> bool {
        if self.ngram.as_ref().is_some_and(|n| *n != posting.ngram) {
            return false;
        }
        if self
            .document_id
            .as_ref()
            .is_some_and(|id| *id != posting.document_id)
        {
            return false;
        }
        if self
            .document_class
            .as_ref()
            .is_some_and(|c| *c != posting.document_class)
        {
            return false;
        }
        if self
            .classes
            .as_ref()
            .is_some_and(|classes| !classes.contains(&posting.document_class))
        {
            return false;
        }
        self.filters
            .iter()
            .all(|f| f.matches(posting.filter_values.as_ref()))
    }
}
