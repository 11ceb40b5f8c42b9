//! Core logic for attaching typed content to named positions.
//! This crate owns the persisted association store and the process-facing
//! content service built on it.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{ConfigError, StoreConfig, DEFAULT_STORE_FILE_NAME, STORE_PATH_ENV};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::content::{
    ContentItem, ContentList, ContentType, PositionIndex, UnknownContentType,
};
pub use repo::content_repo::{ContentRepository, FileContentRepository, RepoError, RepoResult};
pub use service::content_service::ContentService;
pub use service::mapped_service::{MappedContentService, PositionTranslator};
pub use store::{ContentStore, StoreDocument, StoreError, StoreResult};
