//! In-memory form of the persisted store document.
//!
//! All mutations here are pure with respect to the file system; the snapshot
//! transaction in [`crate::store::ContentStore`] decides whether to write.
//! Matching is always by exact `(kind, data)` and visits every matching item,
//! so accidental duplicates in a hand-edited file are handled uniformly.

use crate::model::content::{ContentItem, ContentType};
use serde::{Deserialize, Serialize};

/// Schema version written by this crate.
pub const LATEST_DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    pub version: u32,
    /// Items in insertion order.
    #[serde(default)]
    pub items: Vec<ContentItem>,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreDocument {
    /// Creates an empty document at the latest schema version.
    pub fn new() -> Self {
        Self {
            version: LATEST_DOCUMENT_VERSION,
            items: Vec::new(),
        }
    }

    pub fn contains(&self, kind: ContentType, data: &str) -> bool {
        self.items.iter().any(|item| item.matches(kind, data))
    }

    /// Appends a new item unless `(kind, data)` already exists.
    ///
    /// Returns `true` only when an item was created.
    pub fn add_content(&mut self, kind: ContentType, data: &str) -> bool {
        if self.contains(kind, data) {
            return false;
        }
        self.items.push(ContentItem::new(kind, data));
        true
    }

    /// Removes every item matching `(kind, data)`.
    pub fn remove_content(&mut self, kind: ContentType, data: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| !item.matches(kind, data));
        self.items.len() != before
    }

    /// Attaches `position` to matching items that do not carry it yet.
    ///
    /// Never creates the item. Returns `true` when at least one attach happened.
    pub fn add_position(&mut self, kind: ContentType, data: &str, position: &str) -> bool {
        let mut attached = false;
        for item in self.items.iter_mut().filter(|item| item.matches(kind, data)) {
            if !item.has_position(position) {
                item.positions.push(position.to_string());
                attached = true;
            }
        }
        attached
    }

    /// Detaches `position` from matching items.
    pub fn remove_position(&mut self, kind: ContentType, data: &str, position: &str) -> bool {
        let mut detached = false;
        for item in self.items.iter_mut().filter(|item| item.matches(kind, data)) {
            let before = item.positions.len();
            item.positions.retain(|attached| attached != position);
            detached |= item.positions.len() != before;
        }
        detached
    }

    /// Strips all positions from matching items.
    ///
    /// Returns `true` when any item matched, even if it had no positions.
    pub fn clear_positions_of(&mut self, kind: ContentType, data: &str) -> bool {
        let mut matched = false;
        for item in self.items.iter_mut().filter(|item| item.matches(kind, data)) {
            item.positions.clear();
            matched = true;
        }
        matched
    }

    pub fn clear_all_positions(&mut self) {
        for item in &mut self.items {
            item.positions.clear();
        }
    }

    /// Rewrites identity of every item matching the old pair, keeping positions.
    ///
    /// Callers are responsible for rejecting renames onto an occupied pair.
    pub fn rename(
        &mut self,
        old_kind: ContentType,
        old_data: &str,
        new_kind: ContentType,
        new_data: &str,
    ) -> bool {
        let mut renamed = false;
        for item in self
            .items
            .iter_mut()
            .filter(|item| item.matches(old_kind, old_data))
        {
            item.kind = new_kind;
            item.data = new_data.to_string();
            renamed = true;
        }
        renamed
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
