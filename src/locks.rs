// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Advisory per-document write locks.
//!
//! Reindexing is delete-then-insert, so two writers on the same document can
//! interleave and leave a mix of both versions behind. The engine can route
//! its writes through this table to serialize them per `(index, document_id)`.
//! Searches never take these locks.
//!
//! Keys hash onto a fixed set of stripes. Two unrelated documents may share a
//! stripe and wait on each other; that only costs throughput.

use std::hash::{DefaultHasher, Hash, Hasher};

use parking_lot::{Mutex, MutexGuard};

use crate::types::DocumentId;

const STRIPES: usize = 64;

#[derive(Debug)]
pub struct DocumentLocks {
    stripes: Vec<Mutex<()>>,
}

impl Default for DocumentLocks {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLocks {
    pub fn new() -> Self {
        Self {
            stripes: (0..STRIPES).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Block until no other writer holds this document in this index.
    pub fn lock(&self, index: &str, document_id: &DocumentId) -> MutexGuard<'_, ()> {
        self.stripes[stripe(index, document_id)].lock()
    }
}

fn stripe(index: &str, document_id: &DocumentId) -> usize {
    let mut hasher = DefaultHasher::new();
    index.hash(&mut hasher);
    document_id.hash(&mut hasher);
    (hasher.finish() % STRIPES as u64) as usize
}
