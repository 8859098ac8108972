// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Directory-backed posting store.
//!
//! Every index is one snapshot file, `<dir>/<index>.ngx`. Opening the store
//! loads all of them into a [`MemoryStore`]; reads and writes go to memory and
//! writes mark their index dirty. [`FileStore::flush`] rewrites the dirty
//! snapshots through a temp file and a rename, so a crash mid-flush leaves the
//! previous snapshot intact.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::{snapshot, Fetch, MemoryStore, PostingStore, Predicate, TableStats};
use crate::error::StoreError;
use crate::types::Posting;

#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    memory: MemoryStore,
    dirty: Mutex<BTreeSet<String>>,
}

impl FileStore {
    /// Open (creating if needed) a store directory and load its snapshots.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let memory = MemoryStore::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(snapshot::EXTENSION) {
                continue;
            }
            let Some(index) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let postings = snapshot::decode(&fs::read(&path)?)?;
            tracing::debug!(index, postings = postings.len(), "loaded snapshot");
            memory.load(index, postings);
        }

        Ok(Self {
            dir,
            memory,
            dirty: Mutex::new(BTreeSet::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn snapshot_path(&self, index: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", index, snapshot::EXTENSION))
    }

    pub fn index_names(&self) -> Vec<String> {
        self.memory.index_names()
    }

    pub fn stats(&self, index: &str) -> TableStats {
        self.memory.stats(index)
    }

    /// Indexes with writes not yet on disk.
    pub fn dirty_indexes(&self) -> Vec<String> {
        self.dirty.lock().iter().cloned().collect()
    }

    /// Write every dirty index to disk. Returns how many files were written.
    pub fn flush(&self) -> Result<usize, StoreError> {
        let dirty: Vec<String> = std::mem::take(&mut *self.dirty.lock()).into_iter().collect();

        for (written, index) in dirty.iter().enumerate() {
            if let Err(err) = self.write_snapshot(index) {
                // Put back whatever we didn't get to.
                self.dirty.lock().extend(dirty[written..].iter().cloned());
                return Err(err);
            }
        }

        if !dirty.is_empty() {
            tracing::info!(dir = %self.dir.display(), indexes = dirty.len(), "flushed snapshots");
        }
        Ok(dirty.len())
    }

    fn write_snapshot(&self, index: &str) -> Result<(), StoreError> {
        let bytes = snapshot::encode(&self.memory.snapshot(index))?;
        let path = self.snapshot_path(index);
        let tmp = path.with_extension(format!("{}.tmp", snapshot::EXTENSION));
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(index, bytes = bytes.len(), "wrote snapshot");
        Ok(())
    }

    fn mark_dirty(&self, index: &str) {
        self.dirty.lock().insert(index.to_string());
    }
}

/// Index names become file names.
fn check_index_name(index: &str) -> Result<(), StoreError> {
    let valid = !index.is_empty()
        && index != "."
        && index != ".."
        && !index.contains(['/', '\\', '\0']);
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidIndexName(index.to_string()))
    }
}

impl PostingStore for FileStore {
    fn count(&self, index: &str, predicate: &Predicate) -> Result<usize, StoreError> {
        self.memory.count(index, predicate)
    }

    fn find(
        &self,
        index: &str,
        predicate: &Predicate,
        fetch: Fetch,
    ) -> Result<Vec<Posting>, StoreError> {
        self.memory.find(index, predicate, fetch)
    }

    fn insert(&self, index: &str, posting: Posting) -> Result<(), StoreError> {
        check_index_name(index)?;
        self.memory.insert(index, posting)?;
        self.mark_dirty(index);
        Ok(())
    }

    fn insert_many(&self, index: &str, postings: Vec<Posting>) -> Result<(), StoreError> {
        check_index_name(index)?;
        self.memory.insert_many(index, postings)?;
        self.mark_dirty(index);
        Ok(())
    }

    fn delete(&self, index: &str, predicate: &Predicate) -> Result<usize, StoreError> {
        let removed = self.memory.delete(index, predicate)?;
        if removed > 0 {
            self.mark_dirty(index);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(ngram: &str, id: &str) -> Posting {
        Posting {
            ngram: ngram.to_string(),
            document_id: id.into(),
            document_class: "Artwork".to_string(),
            score: 1.0,
            filter_values: None,
        }
    }

    #[test]
    fn flush_then_reopen_restores_postings() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store
                .insert_many("titles", vec![posting("flo", "1"), posting("low", "1")])
                .unwrap();
            assert_eq!(store.dirty_indexes(), vec!["titles".to_string()]);
            assert_eq!(store.flush().unwrap(), 1);
            assert!(store.dirty_indexes().is_empty());
            assert!(store.snapshot_path("titles").exists());
        }

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.index_names(), vec!["titles".to_string()]);
        assert_eq!(reopened.count("titles", &Predicate::ngram("flo")).unwrap(), 1);
        assert_eq!(reopened.stats("titles").postings, 2);
    }

    #[test]
    fn noop_delete_stays_clean() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.delete("titles", &Predicate::document("9".into())).unwrap();
        assert!(store.dirty_indexes().is_empty());
        assert_eq!(store.flush().unwrap(), 0);
    }

    #[test]
    fn rejects_path_like_index_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.insert("../escape", posting("flo", "1")),
            Err(StoreError::InvalidIndexName(_))
        ));
        assert!(store.insert("fulltext.index_artwork_0", posting("flo", "1")).is_ok());
    }

    #[test]
    fn corrupt_snapshot_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.ngx"), b"not a snapshot at all").unwrap();
        assert!(FileStore::open(dir.path()).is_err());
    }
}
