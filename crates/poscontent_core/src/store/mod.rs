//! Flat-file persistence for the content/position association document.
//!
//! # Responsibility
//! - Open (and on first use create) the persisted store file.
//! - Load and save the whole document; expose a snapshot transaction that
//!   applies an in-memory mutation between the two.
//!
//! # Invariants
//! - The store file is always rewritten in full, never appended.
//! - Saves go through a temp file and rename, so a failed save leaves the
//!   previous document intact.
//! - Documents with a newer schema version are rejected, not migrated.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod document;
mod file;

pub use document::{StoreDocument, LATEST_DOCUMENT_VERSION};
pub use file::ContentStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// Store file or its directory could not be read, created or written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Store file content is not a valid document.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Document could not be encoded for writing.
    Serialize(serde_json::Error),
    /// Document was written by a newer schema.
    UnsupportedVersion { found: u32, latest_supported: u32 },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "store io failure at `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "malformed store document `{}`: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "failed to encode store document: {err}"),
            Self::UnsupportedVersion {
                found,
                latest_supported,
            } => write!(
                f,
                "store document version {found} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::UnsupportedVersion { .. } => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}
