//! Content repository contract and file-backed implementation.
//!
//! # Responsibility
//! - Provide CRUD over content identity `(kind, data)` and position
//!   attach/detach over the persisted store.
//! - Classify failures into persistence, same-data and already-exists errors.
//!
//! # Invariants
//! - Existence checks always compare the full `(kind, data)` pair.
//! - Listings keep store insertion order.
//! - `update_content` rejects identical old/new pairs before touching the store.
//! - `add_positions` rejects mismatched slice lengths before touching the store.

use crate::config::StoreConfig;
use crate::model::content::{ContentList, ContentType, PositionIndex};
use crate::store::{ContentStore, StoreError};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors surfaced by association store operations.
#[derive(Debug)]
pub enum RepoError {
    /// Store could not be opened, parsed or written.
    Persistence(StoreError),
    /// Update target is identical to the current identity.
    SameData { kind: ContentType, data: String },
    /// Update target identity is already used by another item.
    AlreadyExists { kind: ContentType, data: String },
    /// Batch attach got parallel slices of different lengths.
    BatchLengthMismatch {
        kinds: usize,
        data: usize,
        positions: usize,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence(err) => write!(f, "content persistence failed: {err}"),
            Self::SameData { kind, .. } => {
                write!(f, "old and new {kind} content are identical")
            }
            Self::AlreadyExists { kind, .. } => {
                write!(f, "a {kind} content with the same data already exists")
            }
            Self::BatchLengthMismatch {
                kinds,
                data,
                positions,
            } => write!(
                f,
                "batch attach needs equal lengths, got kinds={kinds} data={data} positions={positions}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            Self::SameData { .. } => None,
            Self::AlreadyExists { .. } => None,
            Self::BatchLengthMismatch { .. } => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Persistence(value)
    }
}

/// Association store interface between content items and positions.
pub trait ContentRepository {
    /// Lists every item with its attached positions.
    fn all_contents(&self) -> RepoResult<ContentList>;
    /// Derives the position -> contents index from the store.
    fn connected_contents(&self) -> RepoResult<PositionIndex>;
    /// Creates `(kind, data)`; `false` when it already exists.
    fn add_content(&self, kind: ContentType, data: &str) -> RepoResult<bool>;
    /// Deletes every item matching `(kind, data)`; `false` when none matched.
    fn remove_content(&self, kind: ContentType, data: &str) -> RepoResult<bool>;
    /// Attaches one position to an existing item.
    fn add_position(&self, kind: ContentType, data: &str, position: &str) -> RepoResult<bool>;
    /// Attaches positions for parallel `(kind, data, position)` triples in one
    /// write; `true` only when every triple attached. Slices of different
    /// lengths fail with [`RepoError::BatchLengthMismatch`].
    fn add_positions(
        &self,
        kinds: &[ContentType],
        data: &[String],
        positions: &[String],
    ) -> RepoResult<bool>;
    /// Detaches one position from matching items.
    fn remove_position(&self, kind: ContentType, data: &str, position: &str) -> RepoResult<bool>;
    /// Detaches every position from matching items; `false` when none matched.
    fn remove_all_positions_of(&self, kind: ContentType, data: &str) -> RepoResult<bool>;
    /// Detaches every position from every item.
    fn remove_all_positions(&self) -> RepoResult<()>;
    /// Changes the identity of an item, keeping its positions.
    fn update_content(
        &self,
        old_kind: ContentType,
        old_data: &str,
        new_kind: ContentType,
        new_data: &str,
    ) -> RepoResult<bool>;
    /// Deletes all items and positions.
    fn remove_all_content(&self) -> RepoResult<()>;
}

/// Association store persisted in one JSON document file.
#[derive(Debug, Clone)]
pub struct FileContentRepository {
    store: ContentStore,
}

impl FileContentRepository {
    /// Opens (or creates) the store file at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::from_store(ContentStore::open(path)?))
    }

    /// Opens the store file named by `config`.
    pub fn open_with_config(config: &StoreConfig) -> RepoResult<Self> {
        Self::open(config.path())
    }

    pub fn from_store(store: ContentStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }
}

impl ContentRepository for FileContentRepository {
    fn all_contents(&self) -> RepoResult<ContentList> {
        let doc = self.store.load()?;
        Ok(ContentList::from(doc.items))
    }

    fn connected_contents(&self) -> RepoResult<PositionIndex> {
        let doc = self.store.load()?;
        Ok(PositionIndex::from_items(&doc.items))
    }

    fn add_content(&self, kind: ContentType, data: &str) -> RepoResult<bool> {
        self.store.transact("add_content", |doc| {
            Ok::<_, RepoError>(doc.add_content(kind, data))
        })
    }

    fn remove_content(&self, kind: ContentType, data: &str) -> RepoResult<bool> {
        self.store.transact("remove_content", |doc| {
            Ok::<_, RepoError>(doc.remove_content(kind, data))
        })
    }

    fn add_position(&self, kind: ContentType, data: &str, position: &str) -> RepoResult<bool> {
        self.store.transact("add_position", |doc| {
            Ok::<_, RepoError>(doc.add_position(kind, data, position))
        })
    }

    fn add_positions(
        &self,
        kinds: &[ContentType],
        data: &[String],
        positions: &[String],
    ) -> RepoResult<bool> {
        if kinds.len() != data.len() || data.len() != positions.len() {
            warn!(
                "event=add_positions module=repo status=rejected reason=length_mismatch kinds={} data={} positions={}",
                kinds.len(),
                data.len(),
                positions.len()
            );
            return Err(RepoError::BatchLengthMismatch {
                kinds: kinds.len(),
                data: data.len(),
                positions: positions.len(),
            });
        }

        self.store.transact("add_positions", |doc| {
            let mut all_attached = true;
            for ((kind, item_data), position) in kinds.iter().zip(data).zip(positions) {
                // Every triple is attempted; a failed one does not stop the rest.
                if !doc.add_position(*kind, item_data, position) {
                    all_attached = false;
                }
            }
            Ok::<_, RepoError>(all_attached)
        })
    }

    fn remove_position(&self, kind: ContentType, data: &str, position: &str) -> RepoResult<bool> {
        self.store.transact("remove_position", |doc| {
            Ok::<_, RepoError>(doc.remove_position(kind, data, position))
        })
    }

    fn remove_all_positions_of(&self, kind: ContentType, data: &str) -> RepoResult<bool> {
        self.store.transact("remove_all_positions_of", |doc| {
            Ok::<_, RepoError>(doc.clear_positions_of(kind, data))
        })
    }

    fn remove_all_positions(&self) -> RepoResult<()> {
        self.store.rewrite("remove_all_positions", |doc| {
            doc.clear_all_positions();
            Ok::<_, RepoError>(())
        })
    }

    fn update_content(
        &self,
        old_kind: ContentType,
        old_data: &str,
        new_kind: ContentType,
        new_data: &str,
    ) -> RepoResult<bool> {
        if old_kind == new_kind && old_data == new_data {
            debug!(
                "event=update_content module=repo status=rejected reason=same_data kind={}",
                old_kind
            );
            return Err(RepoError::SameData {
                kind: new_kind,
                data: new_data.to_string(),
            });
        }

        self.store.transact("update_content", |doc| {
            if doc.contains(new_kind, new_data) {
                debug!(
                    "event=update_content module=repo status=rejected reason=already_exists kind={}",
                    new_kind
                );
                return Err(RepoError::AlreadyExists {
                    kind: new_kind,
                    data: new_data.to_string(),
                });
            }
            Ok(doc.rename(old_kind, old_data, new_kind, new_data))
        })
    }

    fn remove_all_content(&self) -> RepoResult<()> {
        self.store.rewrite("remove_all_content", |doc| {
            doc.clear();
            Ok::<_, RepoError>(())
        })
    }
}
