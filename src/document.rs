// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The two things the engine needs from the application's own records:
//! how to read a record's searchable text ([`Document`]) and how to turn a
//! search hit back into a record ([`RecordStore`]).

use crate::types::DocumentId;

/// A record that can be indexed.
pub trait Document {
    fn document_id(&self) -> DocumentId;

    /// Type name stored on postings, used to resolve hits and to clear one
    /// type's contribution to a shared index.
    fn document_class(&self) -> &str;

    /// Current value of a named field, `None` if the record has no such field.
    fn field_value(&self, field: &str) -> Option<String>;

    /// What gets indexed when an index names no fields.
    fn display_text(&self) -> Option<String> {
        None
    }
}

/// Resolves hits to records. A record that no longer exists resolves to
/// `None` and is dropped from results.
pub trait RecordStore {
    type Record;

    fn resolve(&self, document_class: &str, document_id: &DocumentId) -> Option<Self::Record>;
}

impl<F, T> RecordStore for F
where
    F: Fn(&str, &DocumentId) -> Option<T>,
{
    type Record = T;

    fn resolve(&self, document_class: &str, document_id: &DocumentId) -> Option<T> {
        self(document_class, document_id)
    }
}
