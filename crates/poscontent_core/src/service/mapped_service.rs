//! Coordinate-aware content service.
//!
//! Position arguments are given as coordinates and turned into canonical
//! position names by a [`PositionTranslator`] before delegating to
//! [`ContentService`]. No other behavior is added.

use crate::model::content::{ContentList, ContentType};
use crate::repo::content_repo::{ContentRepository, RepoResult};
use crate::service::content_service::ContentService;

/// Maps a coordinate to its canonical position name.
///
/// Implementations must be pure: the same coordinate always yields the same
/// name.
pub trait PositionTranslator {
    type Coordinate;

    fn position_name(&self, coordinate: &Self::Coordinate) -> String;
}

/// Content service addressed by coordinates instead of position names.
pub struct MappedContentService<R: ContentRepository, T: PositionTranslator> {
    service: ContentService<R>,
    translator: T,
}

impl<R: ContentRepository, T: PositionTranslator> MappedContentService<R, T> {
    pub fn new(service: ContentService<R>, translator: T) -> Self {
        Self {
            service,
            translator,
        }
    }

    /// Name-based service for operations that take no position argument.
    pub fn service(&self) -> &ContentService<R> {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut ContentService<R> {
        &mut self.service
    }

    pub fn into_service(self) -> ContentService<R> {
        self.service
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    /// Cached contents attached at `coordinate`.
    pub fn contents(&self, coordinate: &T::Coordinate) -> Option<&ContentList> {
        let name = self.translator.position_name(coordinate);
        self.service.contents(&name)
    }

    pub fn add_position(
        &mut self,
        kind: ContentType,
        data: &str,
        coordinate: &T::Coordinate,
    ) -> RepoResult<bool> {
        let name = self.translator.position_name(coordinate);
        self.service.add_position(kind, data, &name)
    }

    /// Batch attach; `coordinates` runs parallel to `kinds` and `data`.
    pub fn add_positions(
        &mut self,
        kinds: &[ContentType],
        data: &[String],
        coordinates: &[T::Coordinate],
    ) -> RepoResult<bool> {
        let names: Vec<String> = coordinates
            .iter()
            .map(|coordinate| self.translator.position_name(coordinate))
            .collect();
        self.service.add_positions(kinds, data, &names)
    }

    pub fn remove_position(
        &mut self,
        kind: ContentType,
        data: &str,
        coordinate: &T::Coordinate,
    ) -> RepoResult<bool> {
        let name = self.translator.position_name(coordinate);
        self.service.remove_position(kind, data, &name)
    }
}
