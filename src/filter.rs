// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Filters: values captured per document at index time, predicates over them
//! at query time.
//!
//! At index time every configured filter function runs against the document
//! and its result is stored on each posting. A function that errors (or
//! panics) just leaves its key out; the document still gets indexed.
//!
//! At query time a filter map is turned into predicates:
//!
//! | Query value           | Meaning                                   |
//! |-----------------------|-------------------------------------------|
//! | `v` or `[v, ...]`     | stored list contains **all** of the values |
//! | `{"all": [...]}`      | same, spelled out                         |
//! | `{"any": [...]}`      | stored list contains **at least one**     |
//! | `{"other": ...}`      | `Error::UnknownFilterOperator`            |
//!
//! Nested lists are flattened. A stored scalar counts as a one-element list,
//! a missing stored key never matches, and an empty operand list matches
//! nothing.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::FilterValues;

/// Caller-supplied query filters, keyed by filter name.
pub type FilterQuery = BTreeMap<String, Value>;

/// Error type filter functions may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type FilterFn<D> = Box<dyn Fn(&D) -> std::result::Result<Value, BoxError> + Send + Sync>;

// =============================================================================
// INDEX-TIME FILTERS
// =============================================================================

/// A named, fallible function evaluated against each document at index time.
pub struct Filter<D> {
    name: String,
    func: FilterFn<D>,
}

impl<D> Filter<D> {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&D) -> std::result::Result<Value, BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the function, turning errors and panics into `None`.
    pub fn evaluate(&self, document: &D) -> Option<Value> {
        match catch_unwind(AssertUnwindSafe(|| (self.func)(document))) {
            Ok(Ok(value)) => Some(value),
            Ok(Err(err)) => {
                tracing::debug!(filter = %self.name, error = %err, "filter failed; omitting key");
                None
            }
            Err(_) => {
                tracing::debug!(filter = %self.name, "filter panicked; omitting key");
                None
            }
        }
    }
}

impl<D> std::fmt::Debug for Filter<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter").field("name", &self.name).finish()
    }
}

/// Evaluate every filter, keeping the ones that succeeded.
pub fn evaluate_filters<D>(filters: &[Filter<D>], document: &D) -> FilterValues {
    filters
        .iter()
        .filter_map(|filter| {
            filter
                .evaluate(document)
                .map(|value| (filter.name.clone(), value))
        })
        .collect()
}

// =============================================================================
// QUERY-TIME PREDICATES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    All,
    Any,
}

/// A constraint on one stored filter value.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPredicate {
    pub name: String,
    pub operator: FilterOperator,
    pub values: Vec<Value>,
}

impl FilterPredicate {
    pub fn all(name: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            name: name.into(),
            operator: FilterOperator::All,
            values: flatten_all(values),
        }
    }

    pub fn any(name: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            name: name.into(),
            operator: FilterOperator::Any,
            values: flatten_all(values),
        }
    }

    /// Does a posting's stored filter map satisfy this predicate?
    pub fn matches(&self, stored: Option<&FilterValues>) -> bool {
        let Some(value) = stored.and_then(|values| values.get(&self.name)) else {
            return false;
        };
        let stored = flatten(value);

        match self.operator {
            FilterOperator::All => {
                !self.values.is_empty() && self.values.iter().all(|v| stored.contains(v))
            }
            FilterOperator::Any => self.values.iter().any(|v| stored.contains(v)),
        }
    }
}

/// Translate a query filter map into predicates.
///
/// Fails on the first filter using an unrecognized operator, before anything
/// touches the store.
pub fn build(filters: &FilterQuery) -> Result<Vec<FilterPredicate>> {
    filters
        .iter()
        .map(|(name, value)| parse_filter(name, value))
        .collect()
}

fn parse_filter(name: &str, value: &Value) -> Result<FilterPredicate> {
    match value {
        Value::Object(map) => {
            if let Some(any) = map.get("any") {
                Ok(FilterPredicate::any(name, [any.clone()]))
            } else if let Some(all) = map.get("all") {
                Ok(FilterPredicate::all(name, [all.clone()]))
            } else {
                Err(Error::UnknownFilterOperator {
                    filter: name.to_string(),
                    operators: map.keys().cloned().collect(),
                })
            }
        }
        other => Ok(FilterPredicate::all(name, [other.clone()])),
    }
}

fn flatten(value: &Value) -> Vec<Value> {
    let mut out = Vec::new();
    flatten_into(value, &mut out);
    out
}

fn flatten_all(values: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut out = Vec::new();
    for value in values {
        flatten_into(&value, &mut out);
    }
    out
}

fn flatten_into(value: &Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_into(item, out);
            }
        }
        other => out.push(other.clone()),
    }
}
