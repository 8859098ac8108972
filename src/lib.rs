// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Typo-tolerant, prefix-preferring n-gram search for short text fields.
//!
//! Titles, names, labels: strings where users type a few characters, get some
//! of them wrong, and expect the obvious match on top. Every indexed string is
//! cut into overlapping fixed-width n-grams, each stored as a scored posting.
//! A query is cut the same way and documents are ranked by how many of its
//! n-grams they share, weighted so that short strings, word starts and whole
//! words count for more.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌──────────────┐
//! │  utils.rs   │───▶│  ngrams.rs  │───▶│   index.rs   │──┐
//! │ (normalize) │    │  (extract)  │    │  (reindex)   │  │
//! └─────────────┘    └─────────────┘    └──────────────┘  │
//!                           │                             ▼
//!                           │           ┌──────────────────────────┐
//!                           │           │         store/           │
//!                           │           │ PostingStore: Memory,    │
//!                           │           │ File (.ngx snapshots)    │
//!                           ▼           └──────────────────────────┘
//!                    ┌─────────────┐                 ▲
//!  filter.rs ───────▶│  search.rs  │─────────────────┘
//!  (predicates)      │ (plan, rank)│
//!                    └─────────────┘
//!                           │
//!                    ┌─────────────┐
//!                    │  engine.rs  │  one entity type, its indexes, one store
//!                    └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use ngramdex::{Document, DocumentId, Engine, IndexConfig, MemoryStore, NgramIndex, SearchOptions};
//!
//! struct Title { id: u64, text: String }
//!
//! impl Document for Title {
//!     fn document_id(&self) -> DocumentId { self.id.into() }
//!     fn document_class(&self) -> &str { "Title" }
//!     fn field_value(&self, field: &str) -> Option<String> {
//!         (field == "text").then(|| self.text.clone())
//!     }
//! }
//!
//! let engine = Engine::new(MemoryStore::new())
//!     .with_index(NgramIndex::new("titles", IndexConfig::default()).field("text"));
//! engine.reindex_document(&Title { id: 1, text: "Flowers".into() })?;
//! engine.reindex_document(&Title { id: 2, text: "Flower Myth".into() })?;
//!
//! let hits = engine.search("flowers", &SearchOptions::default())?;
//! assert_eq!(hits[0].document_id.as_str(), "1");
//! # Ok::<(), ngramdex::Error>(())
//! ```

pub mod build;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod filter;
pub mod index;
pub mod locks;
pub mod ngrams;
pub mod search;
pub mod store;
pub mod testing;
pub mod types;
pub mod utils;

// Re-exports for public API
pub use config::{CharSet, IndexConfig, IndexConfigBuilder};
pub use document::{Document, RecordStore};
pub use engine::{Engine, SearchOptions, DEFAULT_MAX_RESULTS};
pub use error::{Error, Result, StoreError};
pub use filter::{BoxError, Filter, FilterOperator, FilterPredicate, FilterQuery};
pub use index::{BatchSummary, NgramIndex, ReindexOutcome};
pub use ngrams::{extract, NgramScores};
pub use search::SearchParams;
pub use store::{Fetch, FileStore, MemoryStore, PostingStore, Predicate, TableStats};
pub use types::{DocumentId, FilterValues, Match, Posting, SearchHit};
pub use utils::normalize;
