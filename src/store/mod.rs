// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Where postings live.
//!
//! The ranking algorithm only ever needs four operations against a posting
//! table: count, find (optionally top-N by score), insert and delete. Anything
//! that can do those behind a `&self` can back an index:
//!
//! - [`MemoryStore`]: an embedded table guarded by a `RwLock`.
//! - [`FileStore`]: the same table, persisted per index as a checksummed,
//!   brotli-compressed snapshot in a directory.
//!
//! Stores are shared. `&S` and `Arc<S>` are stores too, so several engines
//! (one per entity type) can write into one table set.

mod file;
mod memory;
mod predicate;
pub mod snapshot;

use std::sync::Arc;

use crate::error::StoreError;
use crate::types::Posting;

pub use file::FileStore;
pub use memory::{MemoryStore, TableStats};
pub use predicate::Predicate;

/// How many matching postings `find` should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    /// Every match, in no particular order.
    All,
    /// The `n` highest-scoring matches, best first. Ties go to the lower
    /// document id.
    Top(usize),
}

/// Posting table operations the indexer and ranker rely on.
///
/// Implementations must be safe to call from several threads at once: the
/// ranker may count plans in parallel, and searches run concurrently with
/// reindexing.
pub trait PostingStore: Send + Sync {
    fn count(&self, index: &str, predicate: &Predicate) -> Result<usize, StoreError>;

    fn find(
        &self,
        index: &str,
        predicate: &Predicate,
        fetch: Fetch,
    ) -> Result<Vec<Posting>, StoreError>;

    fn insert(&self, index: &str, posting: Posting) -> Result<(), StoreError>;

    /// Insert a batch. The default just loops; stores can take one lock instead.
    fn insert_many(&self, index: &str, postings: Vec<Posting>) -> Result<(), StoreError> {
        for posting in postings {
            self.insert(index, posting)?;
        }
        Ok(())
    }

    /// Delete every matching posting, returning how many went.
    fn delete(&self, index: &str, predicate: &Predicate) -> Result<usize, StoreError>;
}

impl<T: PostingStore + ?Sized> PostingStore for &T {
    fn count(&self, index: &str, predicate: &Predicate) -> Result<usize, StoreError> {
        (**self).count(index, predicate)
    }

    fn find(
        &self,
        index: &str,
        predicate: &Predicate,
        fetch: Fetch,
    ) -> Result<Vec<Posting>, StoreError> {
        (**self).find(index, predicate, fetch)
    }

    fn insert(&self, index: &str, posting: Posting) -> Result<(), StoreError> {
        (**self).insert(index, posting)
    }

    fn insert_many(&self, index: &str, postings: Vec<Posting>) -> Result<(), StoreError> {
        (**self).insert_many(index, postings)
    }

    fn delete(&self, index: &str, predicate: &Predicate) -> Result<usize, StoreError> {
        (**self).delete(index, predicate)
    }
}

impl<T: PostingStore + ?Sized> PostingStore for Arc<T> {
    fn count(&self, index: &str, predicate: &Predicate) -> Result<usize, StoreError> {
        (**self).count(index, predicate)
    }

    fn find(
        &self,
        index: &str,
        predicate: &Predicate,
        fetch: Fetch,
    ) -> Result<Vec<Posting>, StoreError> {
        (**self).find(index, predicate, fetch)
    }

    fn insert(&self, index: &str, posting: Posting) -> Result<(), StoreError> {
        (**self).insert(index, posting)
    }

    fn insert_many(&self, index: &str, postings: Vec<Posting>) -> Result<(), StoreError> {
        (**self).insert_many(index, postings)
    }

    fn delete(&self, index: &str, predicate: &Predicate) -> Result<usize, StoreError> {
        (**self).delete(index, predicate)
    }
}
