// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::JsonDocument;
use crate::config::IndexConfig;
use crate::engine::Engine;
use crate::index::NgramIndex;
use crate::store::PostingStore;

pub const MANIFEST_VERSION: u32 = 1;

/// File name the manifest is stored under inside a store directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Index definitions for a collection of [`JsonDocument`]s.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Manifest {
    pub version: u32,
    #[serde(default)]
    pub indexes: BTreeMap<String, IndexDefinition>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Default)]
pub struct IndexDefinition {
    /// Fields to index, in order. Empty means the document's `text`.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Filter names; each reads the same-named entry of a document's `filters`.
    #[serde(default)]
    pub filters: Vec<String>,
    #[serde(default)]
    pub config: IndexConfig,
}

impl IndexDefinition {
    pub fn to_index(&self, name: &str) -> NgramIndex<JsonDocument> {
        let mut index = NgramIndex::new(name, self.config.clone()).fields(self.fields.iter().cloned());
        for filter in &self.filters {
            let key = filter.clone();
            index = index.filter(filter.clone(), move |doc: &JsonDocument| {
                doc.filters
                    .get(&key)
                    .cloned()
                    .ok_or_else(|| format!("document has no '{key}' filter value").into())
            });
        }
        index
    }
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid manifest {}", path.display()))
    }

    pub fn parse(json: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(json)?;
        if manifest.version != MANIFEST_VERSION {
            bail!(
                "unsupported manifest version {} (expected {})",
                manifest.version,
                MANIFEST_VERSION
            );
        }
        if manifest.indexes.is_empty() {
            bail!("manifest defines no indexes");
        }
        Ok(manifest)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }

    /// An engine over `store` with every index this manifest defines.
    pub fn engine<S: PostingStore>(&self, store: S) -> Engine<S, JsonDocument> {
        self.indexes
            .iter()
            .fold(Engine::new(store), |engine, (name, definition)| {
                engine.with_index(definition.to_index(name))
            })
    }
}
