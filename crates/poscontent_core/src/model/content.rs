//! Content domain model.
//!
//! # Responsibility
//! - Define content types and the content record with its attached positions.
//! - Provide explicit lookup helpers over ordered content lists.
//! - Derive the position -> contents index from a full content listing.
//!
//! # Invariants
//! - Lists keep store (insertion) order; helpers never sort.
//! - Index entries carry only `kind` and `data`, never nested positions.
//! - Lookup by kind alone and lookup by `(kind, data)` are separate functions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Category of a content item. Decides how `data` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    /// Short inline title text.
    Title,
    /// Inline description text.
    Description,
    /// Raw inline HTML markup.
    HtmlText,
    /// Link to an external resource.
    Url,
    /// Path to a plain text file.
    Textfile,
    /// Path to an HTML file.
    HtmlTextfile,
    /// Path or URL of an image.
    Image,
    /// Path or URL of an audio clip.
    Audio,
    /// Path or URL of a video.
    Movie,
}

impl ContentType {
    /// Every content type, in declaration order.
    pub const ALL: [ContentType; 9] = [
        ContentType::Title,
        ContentType::Description,
        ContentType::HtmlText,
        ContentType::Url,
        ContentType::Textfile,
        ContentType::HtmlTextfile,
        ContentType::Image,
        ContentType::Audio,
        ContentType::Movie,
    ];

    /// Canonical upper-case name, identical to the persisted `type` value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "TITLE",
            Self::Description => "DESCRIPTION",
            Self::HtmlText => "HTML_TEXT",
            Self::Url => "URL",
            Self::Textfile => "TEXTFILE",
            Self::HtmlTextfile => "HTML_TEXTFILE",
            Self::Image => "IMAGE",
            Self::Audio => "AUDIO",
            Self::Movie => "MOVIE",
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a known content type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownContentType(pub String);

impl Display for UnknownContentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown content type `{}`", self.0)
    }
}

impl Error for UnknownContentType {}

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| UnknownContentType(value.to_string()))
    }
}

/// One piece of content and the positions it is attached to.
///
/// `positions` is populated by full listings only; index entries leave it
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Serialized as `type` to match the persisted schema.
    #[serde(rename = "type")]
    pub kind: ContentType,
    /// Inline text, file path, URL or raw HTML depending on `kind`.
    pub data: String,
    /// Attached position names in attach order, without duplicates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positions: Vec<String>,
}

impl ContentItem {
    /// Creates an item with no attached positions.
    pub fn new(kind: ContentType, data: impl Into<String>) -> Self {
        Self {
            kind,
            data: data.into(),
            positions: Vec::new(),
        }
    }

    /// Creates an item carrying an explicit position list.
    pub fn with_positions(
        kind: ContentType,
        data: impl Into<String>,
        positions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            kind,
            data: data.into(),
            positions: positions.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns whether this item has the identity `(kind, data)`.
    pub fn matches(&self, kind: ContentType, data: &str) -> bool {
        self.kind == kind && self.data == data
    }

    /// Returns whether `position` is attached to this item.
    pub fn has_position(&self, position: &str) -> bool {
        self.positions.iter().any(|attached| attached == position)
    }

    /// Copy of this item without positions, as stored in the position index.
    pub fn to_bare(&self) -> Self {
        Self::new(self.kind, self.data.clone())
    }
}

/// Ordered list of content items with type-aware lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentList {
    items: Vec<ContentItem>,
}

impl ContentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one item at the end.
    pub fn push(&mut self, item: ContentItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContentItem> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<ContentItem> {
        self.items
    }

    /// Returns the first item of `kind`, ignoring `data`.
    ///
    /// Several items may share a kind; callers that need a specific one must
    /// use [`ContentList::find_exact`].
    pub fn find_first_by_kind(&self, kind: ContentType) -> Option<&ContentItem> {
        self.items.iter().find(|item| item.kind == kind)
    }

    /// Returns the item with identity `(kind, data)`, if present.
    pub fn find_exact(&self, kind: ContentType, data: &str) -> Option<&ContentItem> {
        self.items.iter().find(|item| item.matches(kind, data))
    }

    /// Returns every item of `kind` in list order.
    pub fn filter_by_kind(&self, kind: ContentType) -> Vec<&ContentItem> {
        self.items.iter().filter(|item| item.kind == kind).collect()
    }
}

impl From<Vec<ContentItem>> for ContentList {
    fn from(items: Vec<ContentItem>) -> Self {
        Self { items }
    }
}

impl FromIterator<ContentItem> for ContentList {
    fn from_iter<I: IntoIterator<Item = ContentItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ContentList {
    type Item = ContentItem;
    type IntoIter = std::vec::IntoIter<ContentItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ContentList {
    type Item = &'a ContentItem;
    type IntoIter = std::slice::Iter<'a, ContentItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Derived mapping from position name to the contents attached there.
///
/// Keys iterate in lexical order; each list keeps store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionIndex {
    entries: BTreeMap<String, ContentList>,
}

impl PositionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from a full listing.
    ///
    /// For every item and every position attached to it, a bare copy of the
    /// item is appended under that position.
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a ContentItem>) -> Self {
        let mut entries: BTreeMap<String, ContentList> = BTreeMap::new();
        for item in items {
            for position in &item.positions {
                entries
                    .entry(position.clone())
                    .or_default()
                    .push(item.to_bare());
            }
        }
        Self { entries }
    }

    /// Contents attached to `position`, or `None` when nothing is attached.
    pub fn get(&self, position: &str) -> Option<&ContentList> {
        self.entries.get(position)
    }

    pub fn contains_position(&self, position: &str) -> bool {
        self.entries.contains_key(position)
    }

    /// Position names with at least one attached item.
    pub fn positions(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContentList)> {
        self.entries
            .iter()
            .map(|(position, list)| (position.as_str(), list))
    }

    /// Number of distinct positions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
