//! File-backed store: open, load, atomic save and snapshot transactions.
//!
//! # Invariants
//! - `open` leaves an existing, parseable-or-not file untouched; only a
//!   missing file is created.
//! - `transact` never writes when the mutation fails or changes nothing.
//! - `rewrite` writes after every successful mutation.
//! - A failed save leaves the previous file contents in place.
//! - All file handles are owned locals and close on every exit path.

use super::document::{StoreDocument, LATEST_DOCUMENT_VERSION};
use super::{StoreError, StoreResult};
use log::{debug, error, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// Handle to one persisted store file.
#[derive(Debug, Clone)]
pub struct ContentStore {
    path: PathBuf,
}

impl ContentStore {
    /// Opens the store at `path`, creating an empty document when missing.
    ///
    /// # Side effects
    /// - Creates missing parent directories and the store file.
    /// - Emits `store_open` logging events with status and duration.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let started_at = Instant::now();
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };

        if store.path.exists() {
            info!(
                "event=store_open module=store status=ok mode=existing duration_ms={}",
                started_at.elapsed().as_millis()
            );
            return Ok(store);
        }

        match store.create_empty() {
            Ok(()) => {
                info!(
                    "event=store_open module=store status=ok mode=created duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(store)
            }
            Err(err) => {
                error!(
                    "event=store_open module=store status=error mode=created duration_ms={} error_code=store_create_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Path of the persisted store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the whole document.
    pub fn load(&self) -> StoreResult<StoreDocument> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        let doc: StoreDocument = serde_json::from_str(&raw).map_err(|source| {
            error!(
                "event=store_load module=store status=error error_code=store_parse_failed line={} column={}",
                source.line(),
                source.column()
            );
            StoreError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;

        if doc.version > LATEST_DOCUMENT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: doc.version,
                latest_supported: LATEST_DOCUMENT_VERSION,
            });
        }

        Ok(doc)
    }

    /// Replaces the persisted document in full.
    ///
    /// The document is written to a sibling temp file, synced, then renamed
    /// over the store file.
    pub fn save(&self, doc: &StoreDocument) -> StoreResult<()> {
        let mut encoded = serde_json::to_vec_pretty(doc)?;
        encoded.push(b'\n');

        let dir = self.parent_dir();
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let mut temp = NamedTempFile::new_in(dir).map_err(io_err)?;
        temp.write_all(&encoded).map_err(io_err)?;
        temp.as_file().sync_all().map_err(io_err)?;
        temp.persist(&self.path).map_err(|err| io_err(err.error))?;
        Ok(())
    }

    /// Runs one load -> mutate -> save cycle.
    ///
    /// `mutate` works on a private copy of the document. The copy is written
    /// back only when `mutate` succeeds and the document actually changed.
    pub fn transact<T, E>(
        &self,
        operation: &'static str,
        mutate: impl FnOnce(&mut StoreDocument) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        self.run(operation, false, mutate)
    }

    /// Like [`ContentStore::transact`], but writes the document back after a
    /// successful `mutate` even when nothing changed.
    pub fn rewrite<T, E>(
        &self,
        operation: &'static str,
        mutate: impl FnOnce(&mut StoreDocument) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        self.run(operation, true, mutate)
    }

    fn run<T, E>(
        &self,
        operation: &'static str,
        always_write: bool,
        mutate: impl FnOnce(&mut StoreDocument) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let started_at = Instant::now();
        let original = self.load()?;
        let mut working = original.clone();
        let value = mutate(&mut working)?;

        if !always_write && working == original {
            debug!(
                "event=store_commit module=store status=skipped op={} reason=unchanged",
                operation
            );
            return Ok(value);
        }

        match self.save(&working) {
            Ok(()) => {
                info!(
                    "event=store_commit module=store status=ok op={} items={} duration_ms={}",
                    operation,
                    working.items.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                error!(
                    "event=store_commit module=store status=error op={} duration_ms={} error_code=store_write_failed error={}",
                    operation,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn create_empty(&self) -> StoreResult<()> {
        let dir = self.parent_dir();
        std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        self.save(&StoreDocument::new())
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ContentStore;
    use crate::model::content::ContentType;
    use crate::store::{StoreDocument, StoreError};
    use tempfile::TempDir;

    #[test]
    fn open_creates_missing_file_and_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = ContentStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.load().unwrap(), StoreDocument::new());
    }

    #[test]
    fn transact_skips_write_when_mutation_fails() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::open(dir.path().join("store.json")).unwrap();
        store
            .transact("seed", |doc| -> Result<(), StoreError> {
                doc.add_content(ContentType::Title, "kept");
                Ok(())
            })
            .unwrap();

        let result = store.transact("failing", |doc| -> Result<(), StoreError> {
            doc.clear();
            Err(StoreError::UnsupportedVersion {
                found: 9,
                latest_supported: 1,
            })
        });
        assert!(result.is_err());
        assert_eq!(store.load().unwrap().items.len(), 1);
    }

    #[test]
    fn save_leaves_no_temp_files_behind() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::open(dir.path().join("store.json")).unwrap();
        let mut doc = StoreDocument::new();
        doc.add_content(ContentType::Url, "https://example.com");
        store.save(&doc).unwrap();

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
        assert_eq!(store.load().unwrap(), doc);
    }

    #[test]
    fn rewrite_saves_even_when_document_is_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let store = ContentStore::open(&path).unwrap();
        std::fs::write(&path, r#"{"version":1,"items":[]}"#).unwrap();

        store
            .transact("noop", |_doc| -> Result<(), StoreError> { Ok(()) })
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            r#"{"version":1,"items":[]}"#
        );

        store
            .rewrite("noop", |_doc| -> Result<(), StoreError> { Ok(()) })
            .unwrap();
        let expected = format!(
            "{}\n",
            serde_json::to_string_pretty(&StoreDocument::new()).unwrap()
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), expected);
    }
}
