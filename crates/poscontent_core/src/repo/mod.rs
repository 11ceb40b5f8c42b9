//! Repository layer: the content/position association store contract and its
//! file-backed implementation.
//!
//! # Responsibility
//! - Define the use-case oriented association store API.
//! - Keep document and file details behind the repository boundary.
//!
//! # Invariants
//! - Every mutating call is one snapshot transaction: it either rewrites the
//!   whole store or leaves it untouched.
//! - `false` results mean "nothing matched or already satisfied"; only
//!   [`content_repo::RepoError`] values are failures.

pub mod content_repo;
