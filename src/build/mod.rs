// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Building a file-backed store from JSON inputs.
//!
//! A manifest names the indexes; a documents file holds the records. The
//! result is a store directory with one `.ngx` snapshot per index plus a copy
//! of the manifest, so `search` only needs the directory.

pub mod document;
pub mod manifest;

use std::path::Path;

use anyhow::{Context, Result};

#[cfg(feature = "parallel")]
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::index::{self, BatchSummary};
use crate::store::FileStore;

pub use document::*;
pub use manifest::*;

/// What a build produced, per index.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub documents: usize,
    pub indexes: Vec<(String, BatchSummary)>,
    pub files_written: usize,
}

/// Create a progress style for the per-index progress bars
#[cfg(feature = "parallel")]
fn create_progress_style() -> Option<ProgressStyle> {
    ProgressStyle::with_template(
        "{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}",
    )
    .ok()
    .map(|style| style.progress_chars("━━╸"))
}

/// Index `documents` into a store at `output` using `manifest`.
pub fn run_index(documents_path: &Path, manifest_path: &Path, output: &Path) -> Result<BuildReport> {
    let manifest = Manifest::load(manifest_path)?;
    let documents = DocumentSet::load(documents_path)?.documents;
    build_store(&manifest, &documents, output)
}

/// Write `documents` into a store at `output`, replacing whatever the manifest's
/// indexes held before.
pub fn build_store(manifest: &Manifest, documents: &[JsonDocument], output: &Path) -> Result<BuildReport> {
    ensure_unique_ids(documents).context("refusing to build store")?;

    let store = FileStore::open(output)
        .with_context(|| format!("failed to open store {}", output.display()))?;
    let engine = manifest.engine(&store);

    #[cfg(feature = "parallel")]
    let multi = MultiProgress::new();

    let mut report = BuildReport {
        documents: documents.len(),
        ..BuildReport::default()
    };

    for definition in engine.indexes() {
        let name = definition.name();

        #[cfg(feature = "parallel")]
        let pb = multi.add(ProgressBar::new(documents.len() as u64));
        #[cfg(feature = "parallel")]
        {
            if let Some(style) = create_progress_style() {
                pb.set_style(style);
            }
            pb.set_prefix(name.to_string());
            pb.set_message("documents...");
        }

        // Start the index from scratch so removed documents don't linger.
        for class in store.stats(name).classes {
            index::deindex_class(&store, name, &class)?;
        }

        let summary = index::reindex_batch_with(&store, definition, documents, None, |_| {
            #[cfg(feature = "parallel")]
            pb.inc(1);
        })?;

        #[cfg(feature = "parallel")]
        pb.finish_with_message(format!("{} postings", summary.postings));

        tracing::info!(
            index = name,
            indexed = summary.indexed,
            empty = summary.empty,
            postings = summary.postings,
            "index built"
        );
        report.indexes.push((name.to_string(), summary));
    }

    report.files_written = store.flush()?;
    manifest.save(&store.dir().join(MANIFEST_FILE))?;
    Ok(report)
}
