//! Domain model for typed content and its position associations.
//!
//! # Responsibility
//! - Define the content record shared by store, repository and service layers.
//! - Provide list and index helpers used by callers to inspect results.
//!
//! # Invariants
//! - `(kind, data)` is the identity of a content item; positions are not part
//!   of identity.
//! - The position index is derived data and never persisted.

pub mod content;
