// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Errors surfaced to callers.
//!
//! Only two things are genuinely the caller's fault: asking an entity with
//! several indexes to search without saying which one, and passing a filter
//! operator we don't understand. Everything else that can go wrong during a
//! search (a filter function blowing up at index time, a posting pointing at
//! a record that no longer exists, an empty query) is recovered locally and
//! never shows up here.
//!
//! Store errors wrap whatever the backing table can fail with. The in-memory
//! table never fails; the file-backed one can hit I/O, JSON and integrity
//! problems.

use std::io;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the engine and the free-standing indexer/ranker functions.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// More than one index is registered and the caller did not name one.
    #[error(
        "{class} is indexed by multiple full-text indexes ({}); specify one by passing an index name",
        .indexes.join(", ")
    )]
    UnspecifiedIndex { class: String, indexes: Vec<String> },

    /// The named index is not registered on this engine.
    #[error("no full-text index named '{0}'")]
    UnknownIndex(String),

    /// The engine has no index definitions at all.
    #[error("{0} has no full-text indexes")]
    NoIndexes(String),

    /// A query-time filter used an operator other than `any` / `all`.
    #[error("unknown filter operator for '{filter}': {}", .operators.join(","))]
    UnknownFilterOperator {
        filter: String,
        operators: Vec<String>,
    },

    /// Index configuration failed validation.
    #[error("invalid index configuration: {0}")]
    InvalidConfig(String),

    /// The posting store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from a posting store backend.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Index names become file names, so path separators are refused.
    #[error("invalid index name '{0}'")]
    InvalidIndexName(String),

    #[error("invalid snapshot magic: expected {expected:?}, got {actual:?}")]
    BadMagic { expected: [u8; 4], actual: Vec<u8> },

    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u8, expected: u8 },

    #[error("snapshot checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("snapshot truncated: {len} bytes")]
    Truncated { len: usize },
}
