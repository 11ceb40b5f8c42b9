//! Content use-case service.
//!
//! # Responsibility
//! - Mirror the association store API one to one for process callers.
//! - Cache the position -> contents index and rebuild it after every write.
//!
//! # Invariants
//! - The cached index is replaced wholesale by [`ContentService::refresh`],
//!   never patched.
//! - Every successful mutating call refreshes before returning.
//! - `contents` is a pure cache read; changes made to the store by other
//!   handles are not observed until the next refresh.

use crate::config::StoreConfig;
use crate::model::content::{ContentList, ContentType, PositionIndex};
use crate::repo::content_repo::{ContentRepository, FileContentRepository, RepoResult};
use log::debug;

/// Content manager facade over an association store implementation.
pub struct ContentService<R: ContentRepository> {
    repo: R,
    index: PositionIndex,
}

impl ContentService<FileContentRepository> {
    /// Opens the file-backed store named by `config` and loads the index.
    pub fn open(config: &StoreConfig) -> RepoResult<Self> {
        Self::new(FileContentRepository::open_with_config(config)?)
    }
}

impl<R: ContentRepository> ContentService<R> {
    /// Creates a service and loads the initial position index from `repo`.
    pub fn new(repo: R) -> RepoResult<Self> {
        let index = repo.connected_contents()?;
        Ok(Self { repo, index })
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn into_repo(self) -> R {
        self.repo
    }

    /// Re-derives the cached index from the store.
    pub fn refresh(&mut self) -> RepoResult<()> {
        self.index = self.repo.connected_contents()?;
        debug!(
            "event=index_refresh module=service status=ok positions={}",
            self.index.len()
        );
        Ok(())
    }

    /// Lists every stored item with its positions. Reads the store.
    pub fn all_contents(&self) -> RepoResult<ContentList> {
        self.repo.all_contents()
    }

    /// Cached contents attached to `position`; `None` when nothing is attached.
    pub fn contents(&self, position: &str) -> Option<&ContentList> {
        self.index.get(position)
    }

    /// Cached position index as of the last refresh.
    pub fn connected_contents(&self) -> &PositionIndex {
        &self.index
    }

    pub fn add_content(&mut self, kind: ContentType, data: &str) -> RepoResult<bool> {
        let added = self.repo.add_content(kind, data)?;
        self.refresh()?;
        Ok(added)
    }

    pub fn remove_content(&mut self, kind: ContentType, data: &str) -> RepoResult<bool> {
        let removed = self.repo.remove_content(kind, data)?;
        self.refresh()?;
        Ok(removed)
    }

    pub fn add_position(
        &mut self,
        kind: ContentType,
        data: &str,
        position: &str,
    ) -> RepoResult<bool> {
        let attached = self.repo.add_position(kind, data, position)?;
        self.refresh()?;
        Ok(attached)
    }

    pub fn add_positions(
        &mut self,
        kinds: &[ContentType],
        data: &[String],
        positions: &[String],
    ) -> RepoResult<bool> {
        let all_attached = self.repo.add_positions(kinds, data, positions)?;
        self.refresh()?;
        Ok(all_attached)
    }

    pub fn remove_position(
        &mut self,
        kind: ContentType,
        data: &str,
        position: &str,
    ) -> RepoResult<bool> {
        let detached = self.repo.remove_position(kind, data, position)?;
        self.refresh()?;
        Ok(detached)
    }

    pub fn remove_all_positions_of(&mut self, kind: ContentType, data: &str) -> RepoResult<bool> {
        let matched = self.repo.remove_all_positions_of(kind, data)?;
        self.refresh()?;
        Ok(matched)
    }

    pub fn remove_all_positions(&mut self) -> RepoResult<()> {
        self.repo.remove_all_positions()?;
        self.refresh()
    }

    /// Renames `(old_kind, old_data)` to `(new_kind, new_data)`.
    ///
    /// Same-data and already-exists rejections are returned unchanged from
    /// the repository; the index is not refreshed in that case.
    pub fn update_content(
        &mut self,
        old_kind: ContentType,
        old_data: &str,
        new_kind: ContentType,
        new_data: &str,
    ) -> RepoResult<bool> {
        let renamed = self
            .repo
            .update_content(old_kind, old_data, new_kind, new_data)?;
        self.refresh()?;
        Ok(renamed)
    }

    pub fn remove_all_content(&mut self) -> RepoResult<()> {
        self.repo.remove_all_content()?;
        self.refresh()
    }
}
