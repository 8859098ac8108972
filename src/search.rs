// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query planning and ranking.
//!
//! A query becomes a bounded probe set of n-grams. Each probe n-gram is one
//! plan: "postings with this n-gram that pass the filters". Plans are counted
//! first, then fetched rarest-first under a candidate budget so that a common
//! n-gram like `"the"` can't drag in the whole index:
//!
//! ```text
//!   probe ──► count every plan ──► sort ascending ──► walk with budget
//!                                                        │
//!       within budget:        fetch all
//!       would overflow:       fetch top (limit - so_far)
//!       budget exhausted:     fetch top max_results
//!                                                        │
//!   per-plan {id → score} maps ──► fuzzy-OR merge ──► sort ──► truncate
//! ```
//!
//! The merge sums a document's scores across every plan it appears in, so a
//! document matching more probe n-grams ranks higher, but matching one is
//! enough to be a result.

use std::cmp::Ordering;
use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::IndexConfig;
use crate::document::RecordStore;
use crate::error::{Result, StoreError};
use crate::filter::{self, FilterQuery};
use crate::ngrams::extract;
use crate::store::{Fetch, PostingStore, Predicate};
use crate::types::{DocumentId, Match, SearchHit};

/// Query-time restrictions for one search.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchParams<'a> {
    pub filters: Option<&'a FilterQuery>,
    /// Only postings whose class is listed.
    pub classes: Option<&'a [String]>,
    /// `None` returns every candidate.
    pub max_results: Option<usize>,
}

#[derive(Debug)]
struct Plan {
    ngram: String,
    probe_score: f64,
    predicate: Predicate,
    count: usize,
}

type Candidates = HashMap<DocumentId, (String, f64)>;

/// Rank documents in `index` against `query`.
pub fn search<S>(
    store: &S,
    index: &str,
    config: &IndexConfig,
    query: &str,
    params: SearchParams<'_>,
) -> Result<Vec<SearchHit>>
where
    S: PostingStore + ?Sized,
{
    // Bad filters fail before the store sees anything.
    let filters = match params.filters {
        Some(query) => filter::build(query)?,
        None => Vec::new(),
    };

    let probe = extract(Some(query), config, true);
    if probe.is_empty() {
        return Ok(Vec::new());
    }

    let classes = params.classes.map(<[String]>::to_vec);
    let plans: Vec<(String, f64, Predicate)> = probe
        .into_iter()
        .map(|(ngram, probe_score)| {
            let predicate = Predicate::ngram(ngram.clone())
                .with_classes(classes.clone())
                .with_filters(filters.clone());
            (ngram, probe_score, predicate)
        })
        .collect();

    let mut plans = count_plans(store, index, plans)?;
    plans.sort_by_key(|plan| plan.count);

    let candidates = fetch_candidates(store, index, config, &plans, params.max_results)?;
    let mut hits = fuzzy_or(candidates);
    hits.sort_by(compare_hits);
    if let Some(max) = params.max_results {
        hits.truncate(max);
    }

    tracing::debug!(index, query, hits = hits.len(), "search complete");
    Ok(hits)
}

fn count_plans<S>(
    store: &S,
    index: &str,
    plans: Vec<(String, f64, Predicate)>,
) -> std::result::Result<Vec<Plan>, StoreError>
where
    S: PostingStore + ?Sized,
{
    let count = |(ngram, probe_score, predicate): (String, f64, Predicate)| {
        let count = store.count(index, &predicate)?;
        Ok::<_, StoreError>(Plan {
            ngram,
            probe_score,
            predicate,
            count,
        })
    };

    #[cfg(feature = "parallel")]
    let counted = plans.into_par_iter().map(count).collect();
    #[cfg(not(feature = "parallel"))]
    let counted = plans.into_iter().map(count).collect();
    counted
}

/// How much of a plan to fetch given what the earlier plans already counted.
fn fetch_for(count: usize, so_far: usize, limit: usize, max_results: Option<usize>) -> Fetch {
    if so_far >= limit {
        Fetch::Top(max_results.unwrap_or(limit))
    } else if count > limit - so_far {
        Fetch::Top(limit - so_far)
    } else {
        Fetch::All
    }
}

fn fetch_candidates<S>(
    store: &S,
    index: &str,
    config: &IndexConfig,
    plans: &[Plan],
    max_results: Option<usize>,
) -> std::result::Result<Vec<Candidates>, StoreError>
where
    S: PostingStore + ?Sized,
{
    let limit = config.max_candidate_set_size();
    let mut so_far = 0;
    let mut maps = Vec::with_capacity(plans.len());

    for plan in plans {
        if plan.count == 0 {
            continue;
        }
        let fetch = fetch_for(plan.count, so_far, limit, max_results);
        // The full count, not what was fetched.
        so_far += plan.count;

        let postings = store.find(index, &plan.predicate, fetch)?;
        tracing::debug!(
            ngram = %plan.ngram,
            count = plan.count,
            fetched = postings.len(),
            ?fetch,
            "plan"
        );

        let mut candidates = Candidates::with_capacity(postings.len());
        for posting in postings {
            candidates
                .entry(posting.document_id)
                .or_insert((posting.document_class, posting.score * plan.probe_score));
        }
        maps.push(candidates);
    }

    Ok(maps)
}

/// Sum each document's scores across every plan map, counting each once.
fn fuzzy_or(mut maps: Vec<Candidates>) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    while let Some(current) = maps.pop() {
        for (document_id, (document_class, mut score)) in current {
            for pending in maps.iter_mut() {
                if let Some((_, other)) = pending.remove(&document_id) {
                    score += other;
                }
            }
            hits.push(SearchHit {
                document_id,
                document_class,
                score,
            });
        }
    }
    hits
}

/// Descending score, then document id, then class.
fn compare_hits(a: &SearchHit, b: &SearchHit) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.document_id.cmp(&b.document_id))
        .then_with(|| a.document_class.cmp(&b.document_class))
}

/// Turn hits into records, dropping any that no longer resolve.
pub fn resolve<R>(records: &R, hits: Vec<SearchHit>, return_scores: bool) -> Vec<Match<R::Record>>
where
    R: RecordStore + ?Sized,
{
    hits.into_iter()
        .filter_map(|hit| {
            let record = records.resolve(&hit.document_class, &hit.document_id);
            if record.is_none() {
                tracing::debug!(document = %hit.document_id, class = %hit.document_class, "stale hit dropped");
            }
            record.map(|record| Match {
                record,
                score: return_scores.then_some(hit.score),
            })
        })
        .collect()
}
