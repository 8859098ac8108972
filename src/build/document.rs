// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;
use crate::types::DocumentId;

fn default_class() -> String {
    "Document".to_string()
}

/// A record read from a documents file.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct JsonDocument {
    pub id: DocumentId,
    #[serde(default = "default_class")]
    pub class: String,
    /// Text fields. Strings are indexed as-is, numbers and booleans by their
    /// JSON text, lists as their items joined by spaces.
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    /// Raw values for the manifest's filters.
    #[serde(default)]
    pub filters: BTreeMap<String, Value>,
    /// Fallback text for indexes that name no fields.
    #[serde(default)]
    pub text: Option<String>,
}

impl Document for JsonDocument {
    fn document_id(&self) -> DocumentId {
        self.id.clone()
    }

    fn document_class(&self) -> &str {
        &self.class
    }

    fn field_value(&self, field: &str) -> Option<String> {
        self.fields.get(field).and_then(field_text)
    }

    fn display_text(&self) -> Option<String> {
        self.text.clone()
    }
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(field_text).collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        }
        other => Some(other.to_string()),
    }
}

/// Top-level shape of a documents file.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct DocumentSet {
    pub documents: Vec<JsonDocument>,
}

impl DocumentSet {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read documents {}", path.display()))?;
        let set: DocumentSet = serde_json::from_str(&content)
            .with_context(|| format!("invalid documents JSON in {}", path.display()))?;
        ensure_unique_ids(&set.documents)
            .with_context(|| format!("invalid documents file {}", path.display()))?;
        Ok(set)
    }
}

/// Postings are replaced by document id, so a second record with the same id
/// would overwrite the first one's postings, whatever its class.
pub fn ensure_unique_ids(documents: &[JsonDocument]) -> Result<()> {
    let mut seen: HashMap<&DocumentId, &str> = HashMap::with_capacity(documents.len());
    for doc in documents {
        if let Some(first) = seen.insert(&doc.id, &doc.class) {
            bail!(
                "duplicate document id '{}' (classes {} and {})",
                doc.id,
                first,
                doc.class
            );
        }
    }
    Ok(())
}
