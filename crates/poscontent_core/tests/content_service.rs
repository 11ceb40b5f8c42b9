use poscontent_core::{
    ContentItem, ContentList, ContentRepository, ContentService, ContentType,
    FileContentRepository, PositionIndex, RepoError, RepoResult, StoreConfig, StoreDocument,
};
use std::cell::{Cell, RefCell};
use tempfile::TempDir;

/// In-memory association store that counts index derivations.
#[derive(Default)]
struct MemoryRepository {
    doc: RefCell<StoreDocument>,
    index_loads: Cell<usize>,
}

impl ContentRepository for MemoryRepository {
    fn all_contents(&self) -> RepoResult<ContentList> {
        Ok(ContentList::from(self.doc.borrow().items.clone()))
    }

    fn connected_contents(&self) -> RepoResult<PositionIndex> {
        self.index_loads.set(self.index_loads.get() + 1);
        Ok(PositionIndex::from_items(&self.doc.borrow().items))
    }

    fn add_content(&self, kind: ContentType, data: &str) -> RepoResult<bool> {
        Ok(self.doc.borrow_mut().add_content(kind, data))
    }

    fn remove_content(&self, kind: ContentType, data: &str) -> RepoResult<bool> {
        Ok(self.doc.borrow_mut().remove_content(kind, data))
    }

    fn add_position(&self, kind: ContentType, data: &str, position: &str) -> RepoResult<bool> {
        Ok(self.doc.borrow_mut().add_position(kind, data, position))
    }

    fn add_positions(
        &self,
        kinds: &[ContentType],
        data: &[String],
        positions: &[String],
    ) -> RepoResult<bool> {
        let mut doc = self.doc.borrow_mut();
        let mut all = true;
        for ((kind, item_data), position) in kinds.iter().zip(data).zip(positions) {
            all &= doc.add_position(*kind, item_data, position);
        }
        Ok(all)
    }

    fn remove_position(&self, kind: ContentType, data: &str, position: &str) -> RepoResult<bool> {
        Ok(self.doc.borrow_mut().remove_position(kind, data, position))
    }

    fn remove_all_positions_of(&self, kind: ContentType, data: &str) -> RepoResult<bool> {
        Ok(self.doc.borrow_mut().clear_positions_of(kind, data))
    }

    fn remove_all_positions(&self) -> RepoResult<()> {
        self.doc.borrow_mut().clear_all_positions();
        Ok(())
    }

    fn update_content(
        &self,
        old_kind: ContentType,
        old_data: &str,
        new_kind: ContentType,
        new_data: &str,
    ) -> RepoResult<bool> {
        if old_kind == new_kind && old_data == new_data {
            return Err(RepoError::SameData {
                kind: new_kind,
                data: new_data.to_string(),
            });
        }
        let mut doc = self.doc.borrow_mut();
        if doc.contains(new_kind, new_data) {
            return Err(RepoError::AlreadyExists {
                kind: new_kind,
                data: new_data.to_string(),
            });
        }
        Ok(doc.rename(old_kind, old_data, new_kind, new_data))
    }

    fn remove_all_content(&self) -> RepoResult<()> {
        self.doc.borrow_mut().clear();
        Ok(())
    }
}

fn file_service() -> (ContentService<FileContentRepository>, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig::new(dir.path().join("content.json")).unwrap();
    let service = ContentService::open(&config).unwrap();
    (service, dir)
}

#[test]
fn attach_detach_scenario_updates_cached_index() {
    let (mut service, _dir) = file_service();

    assert!(service.add_content(ContentType::Title, "T").unwrap());
    assert!(!service.add_content(ContentType::Title, "T").unwrap());
    assert!(service.add_position(ContentType::Title, "T", "p1").unwrap());
    assert!(!service.add_position(ContentType::Title, "T", "p1").unwrap());

    let at_p1 = service.contents("p1").expect("p1 should have content");
    assert_eq!(at_p1.as_slice(), &[ContentItem::new(ContentType::Title, "T")]);

    assert!(service.remove_position(ContentType::Title, "T", "p1").unwrap());
    assert!(service.contents("p1").is_none());
}

#[test]
fn index_is_loaded_on_construction() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("content.json");
    {
        let repo = FileContentRepository::open(&path).unwrap();
        repo.add_content(ContentType::Image, "map.png").unwrap();
        repo.add_position(ContentType::Image, "map.png", "entrance")
            .unwrap();
    }

    let service = ContentService::new(FileContentRepository::open(&path).unwrap()).unwrap();
    let at_entrance = service.contents("entrance").unwrap();
    assert_eq!(at_entrance.len(), 1);
    assert_eq!(
        at_entrance.find_first_by_kind(ContentType::Image).unwrap().data,
        "map.png"
    );
}

#[test]
fn every_mutation_refreshes_the_index_once() {
    let mut service = ContentService::new(MemoryRepository::default()).unwrap();
    assert_eq!(service.repo().index_loads.get(), 1);

    service.add_content(ContentType::Description, "d").unwrap();
    service.add_position(ContentType::Description, "d", "a").unwrap();
    service
        .add_positions(
            &[ContentType::Description],
            &["d".to_string()],
            &["b".to_string()],
        )
        .unwrap();
    service.remove_position(ContentType::Description, "d", "a").unwrap();
    service
        .remove_all_positions_of(ContentType::Description, "d")
        .unwrap();
    service.remove_all_positions().unwrap();
    service
        .update_content(ContentType::Description, "d", ContentType::Title, "t")
        .unwrap();
    service.remove_content(ContentType::Title, "t").unwrap();
    service.remove_all_content().unwrap();

    assert_eq!(service.repo().index_loads.get(), 10);
}

#[test]
fn rejected_update_leaves_cache_untouched() {
    let mut service = ContentService::new(MemoryRepository::default()).unwrap();
    service.add_content(ContentType::Description, "d1").unwrap();
    service.add_content(ContentType::Title, "t").unwrap();
    service.add_position(ContentType::Description, "d1", "p").unwrap();
    let loads_before = service.repo().index_loads.get();

    let same = service
        .update_content(ContentType::Description, "d1", ContentType::Description, "d1")
        .unwrap_err();
    assert!(matches!(same, RepoError::SameData { .. }));

    let exists = service
        .update_content(ContentType::Description, "d1", ContentType::Title, "t")
        .unwrap_err();
    assert!(matches!(exists, RepoError::AlreadyExists { .. }));

    assert_eq!(service.repo().index_loads.get(), loads_before);
    assert_eq!(
        service.contents("p").unwrap().as_slice(),
        &[ContentItem::new(ContentType::Description, "d1")]
    );
}

#[test]
fn update_content_moves_index_entries_to_new_identity() {
    let (mut service, _dir) = file_service();
    service.add_content(ContentType::Description, "old").unwrap();
    service.add_position(ContentType::Description, "old", "hall").unwrap();

    assert!(service
        .update_content(ContentType::Description, "old", ContentType::Title, "new")
        .unwrap());

    assert_eq!(
        service.contents("hall").unwrap().as_slice(),
        &[ContentItem::new(ContentType::Title, "new")]
    );
}

#[test]
fn contents_is_a_cache_read_until_refresh() {
    let (mut service, dir) = file_service();
    service.add_content(ContentType::Url, "u").unwrap();

    let other = FileContentRepository::open(dir.path().join("content.json")).unwrap();
    other.add_position(ContentType::Url, "u", "gate").unwrap();

    assert!(service.contents("gate").is_none());
    service.refresh().unwrap();
    assert!(service.contents("gate").is_some());
}

#[test]
fn full_wipe_and_position_strip_through_service() {
    let (mut service, _dir) = file_service();
    service.add_content(ContentType::Title, "title").unwrap();
    service.add_content(ContentType::Description, "description").unwrap();
    service.add_content(ContentType::Textfile, "file.txt").unwrap();
    service
        .add_position(ContentType::Description, "description", "position")
        .unwrap();
    assert_eq!(service.all_contents().unwrap().len(), 3);
    assert!(service.contents("other").is_none());

    service.remove_all_positions().unwrap();
    assert_eq!(service.all_contents().unwrap().len(), 3);
    assert!(service.connected_contents().is_empty());

    service.remove_all_content().unwrap();
    assert!(service.all_contents().unwrap().is_empty());
    assert!(service.connected_contents().is_empty());
}

#[test]
fn persistence_failure_propagates_from_service() {
    let (mut service, dir) = file_service();
    std::fs::write(dir.path().join("content.json"), "{ not json").unwrap();

    let err = service.add_content(ContentType::Title, "t").unwrap_err();
    assert!(matches!(err, RepoError::Persistence(_)));
}

#[test]
fn mismatched_batch_is_rejected_and_cache_is_not_refreshed() {
    let (mut service, _dir) = file_service();
    service.add_content(ContentType::Title, "t").unwrap();

    let err = service
        .add_positions(
            &[ContentType::Title],
            &["t".to_string()],
            &["p1".to_string(), "p2".to_string()],
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::BatchLengthMismatch { .. }));
    assert!(service.contents("p1").is_none());
    assert!(service.all_contents().unwrap().as_slice()[0].positions.is_empty());
}
