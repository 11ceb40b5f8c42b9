//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate association store calls into process-facing APIs.
//! - Own the derived position index so callers can read it without I/O.

pub mod content_service;
pub mod mapped_service;
