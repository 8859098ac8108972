// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical fixtures so tests don't each grow their own record
//! type.

#![doc(hidden)]

use std::collections::HashMap;

use serde_json::json;

use crate::config::IndexConfig;
use crate::document::Document;
use crate::engine::Engine;
use crate::index::NgramIndex;
use crate::store::MemoryStore;
use crate::types::DocumentId;

/// A small record with a couple of text fields and a list-valued attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Artwork {
    pub id: u64,
    pub class: String,
    pub title: String,
    pub artist: Option<String>,
    pub colors: Vec<String>,
}

impl Artwork {
    pub fn new(id: u64, title: &str) -> Self {
        Self {
            id,
            class: "Artwork".to_string(),
            title: title.to_string(),
            artist: None,
            colors: Vec::new(),
        }
    }

    pub fn with_artist(mut self, artist: &str) -> Self {
        self.artist = Some(artist.to_string());
        self
    }

    pub fn with_colors(mut self, colors: &[&str]) -> Self {
        self.colors = colors.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = class.to_string();
        self
    }
}

impl Document for Artwork {
    fn document_id(&self) -> DocumentId {
        DocumentId::from(self.id)
    }

    fn document_class(&self) -> &str {
        &self.class
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "title" => Some(self.title.clone()),
            "artist" => self.artist.clone(),
            _ => None,
        }
    }

    fn display_text(&self) -> Option<String> {
        Some(self.title.clone())
    }
}

/// Index over `title` with a `colors` filter.
pub fn titles_index(config: IndexConfig) -> NgramIndex<Artwork> {
    NgramIndex::new("titles", config)
        .field("title")
        .filter("colors", |art: &Artwork| Ok(json!(art.colors)))
}

/// Single-index engine over an in-memory store.
pub fn artwork_engine(config: IndexConfig) -> Engine<MemoryStore, Artwork> {
    Engine::new(MemoryStore::new()).with_index(titles_index(config))
}

/// Engine with every artwork already indexed. Panics if a reindex fails.
pub fn seeded_engine(artworks: &[Artwork]) -> Engine<MemoryStore, Artwork> {
    let engine = artwork_engine(IndexConfig::default());
    for artwork in artworks {
        engine
            .reindex_document(artwork)
            .expect("in-memory reindex");
    }
    engine
}

/// Records keyed by id, usable as a `RecordStore` through `Gallery::lookup`.
#[derive(Debug, Default)]
pub struct Gallery {
    records: HashMap<DocumentId, Artwork>,
}

impl Gallery {
    pub fn new(artworks: &[Artwork]) -> Self {
        Self {
            records: artworks
                .iter()
                .map(|art| (art.document_id(), art.clone()))
                .collect(),
        }
    }

    pub fn remove(&mut self, id: u64) {
        self.records.remove(&DocumentId::from(id));
    }

    pub fn lookup(&self, class: &str, id: &DocumentId) -> Option<Artwork> {
        self.records.get(id).filter(|art| art.class == class).cloned()
    }
}

impl crate::document::RecordStore for Gallery {
    type Record = Artwork;

    fn resolve(&self, document_class: &str, document_id: &DocumentId) -> Option<Artwork> {
        self.lookup(document_class, document_id)
    }
}
