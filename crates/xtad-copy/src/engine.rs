use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use xtad_refs::{referenced_ids, remap, RemapMode};
use xtad_store::ObjectStore;
use xtad_types::{ObjectId, RealObject};

use crate::error::CopyResult;

/// Suffix appended to the name of a top-level duplicate.
pub const DEFAULT_COPY_SUFFIX: &str = " copy";

/// Source id to duplicate id, shared across one recursive duplication.
pub type IdMap = HashMap<ObjectId, ObjectId>;

/// Produces new real objects from existing ones. Sources are never mutated.
pub struct DuplicationEngine {
    store: Arc<dyn ObjectStore>,
    remap_mode: RemapMode,
    copy_suffix: String,
}

impl DuplicationEngine {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            remap_mode: RemapMode::default(),
            copy_suffix: DEFAULT_COPY_SUFFIX.to_string(),
        }
    }

    pub fn with_remap_mode(mut self, mode: RemapMode) -> Self {
        self.remap_mode = mode;
        self
    }

    pub fn with_copy_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.copy_suffix = suffix.into();
        self
    }

    pub fn remap_mode(&self) -> RemapMode {
        self.remap_mode
    }

    /// Deep-copy `source` and everything it transitively references.
    ///
    /// Returns the id of the copy of `source`.
    pub fn duplicate(&self, source: &ObjectId) -> CopyResult<ObjectId> {
        let mut map = IdMap::new();
        self.duplicate_with_map(source, &mut map)
    }

    /// Like [`Self::duplicate`], exposing the id map built along the way.
    ///
    /// Ids already present in `map` are treated as copied and reused as-is.
    pub fn duplicate_with_map(&self, source: &ObjectId, map: &mut IdMap) -> CopyResult<ObjectId> {
        let new_id = self.duplicate_inner(source, map, true)?;
        info!(%source, copy = %new_id, objects = map.len(), "duplicated object tree");
        Ok(new_id)
    }

    fn duplicate_inner(
        &self,
        source: &ObjectId,
        map: &mut IdMap,
        top_level: bool,
    ) -> CopyResult<ObjectId> {
        if let Some(existing) = map.get(source) {
            debug!(%source, copy = %existing, "already duplicated");
            return Ok(existing.clone());
        }

        let object = self.store.load(source)?;
        let new_id = ObjectId::generate();
        // Registered before recursing so a cycle back to `source` stops above.
        map.insert(source.clone(), new_id.clone());

        let mut records = object.records;
        for record in &mut records {
            let mut content = record.content.clone();
            for target in referenced_ids(&record.content) {
                let target_copy = self.duplicate_inner(&target, map, false)?;
                content = remap(&content, &target, &target_copy, self.remap_mode);
            }
            if content != record.content {
                record.set_content(content);
            }
        }

        let mut metadata = object.metadata;
        metadata.ref_count = 1;
        metadata.stamp_all(Utc::now());
        if top_level {
            metadata.name.push_str(&self.copy_suffix);
        }

        let copy = RealObject::new(new_id.clone(), metadata, records);
        self.store.save(&new_id, &copy)?;
        self.copy_side_files(source, &new_id, true);

        debug!(%source, copy = %new_id, top_level, "duplicated object");
        Ok(new_id)
    }

    /// Copy `source` one level deep under `new_name`.
    ///
    /// Records are copied verbatim, so the copy shares every embedded
    /// reference with the source. Only the icon is carried over.
    pub fn duplicate_shallow(&self, source: &ObjectId, new_name: &str) -> CopyResult<ObjectId> {
        let object = self.store.load(source)?;
        let new_id = ObjectId::generate();

        let mut metadata = object.metadata;
        metadata.ref_count = 1;
        metadata.name = new_name.to_string();
        metadata.stamp_all(Utc::now());

        let copy = RealObject::new(new_id.clone(), metadata, object.records);
        self.store.save(&new_id, &copy)?;
        self.copy_side_files(source, &new_id, false);

        info!(%source, copy = %new_id, name = new_name, "shallow duplicate");
        Ok(new_id)
    }

    fn copy_side_files(&self, from: &ObjectId, to: &ObjectId, with_images: bool) {
        match self.store.copy_icon(from, to) {
            Ok(copied) => debug!(%from, %to, copied, "icon copy"),
            Err(e) => warn!(%from, %to, error = %e, "failed to copy icon"),
        }
        if with_images {
            match self.store.copy_images(from, to) {
                Ok(count) => debug!(%from, %to, count, "image copy"),
                Err(e) => warn!(%from, %to, error = %e, "failed to copy images"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CopyError;
    use std::fs;
    use tempfile::TempDir;
    use xtad_store::{FsObjectStore, MetadataEntry, StoreError, StoreLayout, StoreResult};
    use xtad_types::{Metadata, Record};

    fn open_store() -> (TempDir, Arc<FsObjectStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FsObjectStore::open(StoreLayout::new(dir.path())).unwrap());
        (dir, store)
    }

    fn engine(store: &Arc<FsObjectStore>) -> DuplicationEngine {
        DuplicationEngine::new(Arc::clone(store) as Arc<dyn ObjectStore>)
    }

    fn tag(target: &ObjectId) -> String {
        format!("<ref id=\"{target}_0.xtad\"/>")
    }

    fn put_record(store: &FsObjectStore, id: &ObjectId, name: &str, record: Record) {
        let obj = RealObject::new(id.clone(), Metadata::new(name), vec![record]);
        store.save(id, &obj).unwrap();
    }

    fn put_with_id(store: &FsObjectStore, id: &ObjectId, name: &str, content: &str) {
        put_record(store, id, name, Record::from_text(content));
    }

    fn put(store: &FsObjectStore, name: &str, content: &str) -> ObjectId {
        let id = ObjectId::generate();
        put_with_id(store, &id, name, content);
        id
    }

    fn count_objects(store: &FsObjectStore) -> usize {
        store.list_all_metadata().unwrap().len()
    }

    #[test]
    fn duplicate_remaps_transitive_reference() {
        let (_dir, store) = open_store();
        let b = put(&store, "B", "leaf");
        let a = put(&store, "A", &tag(&b));

        let mut map = IdMap::new();
        let a_copy = engine(&store).duplicate_with_map(&a, &mut map).unwrap();
        let b_copy = map.get(&b).cloned().unwrap();
        assert_eq!(map.get(&a), Some(&a_copy));
        assert_ne!(b_copy, b);

        let a2 = store.load(&a_copy).unwrap();
        assert_eq!(a2.name(), "A copy");
        assert_eq!(a2.ref_count(), 1);
        assert!(a2.records[0].content.contains(&format!("{b_copy}_0.xtad")));
        assert!(!a2.records[0].content.contains(b.as_str()));

        let b2 = store.load(&b_copy).unwrap();
        assert_eq!(b2.name(), "B");
        assert_eq!(b2.ref_count(), 1);
        assert_eq!(b2.records[0].content, "leaf");

        // Sources untouched.
        assert_eq!(store.load(&a).unwrap().records[0].content, tag(&b));
        assert_eq!(count_objects(&store), 4);
    }

    #[test]
    fn duplicate_is_cycle_safe() {
        let (_dir, store) = open_store();
        let a = ObjectId::generate();
        let b = ObjectId::generate();
        put_with_id(&store, &a, "A", &tag(&b));
        put_with_id(&store, &b, "B", &tag(&a));

        let mut map = IdMap::new();
        let a_copy = engine(&store).duplicate_with_map(&a, &mut map).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(count_objects(&store), 4);

        let b_copy = map[&b].clone();
        let a2 = store.load(&a_copy).unwrap();
        let b2 = store.load(&b_copy).unwrap();
        assert_eq!(a2.records[0].content, tag(&b_copy));
        assert_eq!(b2.records[0].content, tag(&a_copy));
    }

    #[test]
    fn shared_target_gets_one_copy() {
        let (_dir, store) = open_store();
        let shared = put(&store, "shared", "data");
        let mid = put(&store, "mid", &tag(&shared));
        let (s, m) = (tag(&shared), tag(&mid));
        let top = put(&store, "top", &format!("{s}{m}{s}"));

        let mut map = IdMap::new();
        let top_copy = engine(&store).duplicate_with_map(&top, &mut map).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(count_objects(&store), 6);

        let shared_copy = map[&shared].clone();
        let top2 = store.load(&top_copy).unwrap();
        let mid2 = store.load(&map[&mid]).unwrap();
        let (s, m) = (tag(&shared_copy), tag(&map[&mid]));
        assert_eq!(top2.records[0].content, format!("{s}{m}{s}"));
        assert_eq!(mid2.records[0].content, tag(&shared_copy));
    }

    #[test]
    fn self_reference_points_at_copy() {
        let (_dir, store) = open_store();
        let a = ObjectId::generate();
        put_with_id(&store, &a, "loop", &tag(&a));

        let a_copy = engine(&store).duplicate(&a).unwrap();
        let a2 = store.load(&a_copy).unwrap();
        assert_eq!(a2.records[0].content, tag(&a_copy));
        assert_eq!(count_objects(&store), 2);
    }

    #[test]
    fn duplicate_refreshes_metadata_and_keeps_opaque_fields() {
        let (_dir, store) = open_store();
        let id = ObjectId::generate();
        let mut metadata = Metadata::new("doc");
        metadata.ref_count = 7;
        metadata.created_at = Some(Utc::now() - chrono::Duration::days(3));
        metadata.app_list = Some(serde_json::json!({ "editor": "basic" }));
        metadata.extra.insert("custom".into(), 42.into());
        let obj = RealObject::new(id.clone(), metadata, vec![Record::from_text("x")]);
        store.save(&id, &obj).unwrap();

        let copy_id = engine(&store).duplicate(&id).unwrap();
        let copy = store.load(&copy_id).unwrap();
        assert_eq!(copy.ref_count(), 1);
        assert_eq!(copy.metadata.app_list, obj.metadata.app_list);
        let custom = copy.metadata.extra.get("custom");
        assert_eq!(custom, Some(&serde_json::json!(42)));
        assert!(copy.metadata.created_at > obj.metadata.created_at);
        assert_eq!(copy.metadata.created_at, copy.metadata.updated_at);
        assert_eq!(copy.metadata.id, Some(copy_id));
        assert_eq!(store.load(&id).unwrap().ref_count(), 7);
    }

    #[test]
    fn duplicate_copies_side_files() {
        let (dir, store) = open_store();
        let a = put(&store, "A", "x");
        fs::write(dir.path().join(format!("{a}.ico")), b"icon").unwrap();
        fs::write(dir.path().join(format!("{a}_0_0.png")), b"img").unwrap();

        let copy = engine(&store).duplicate(&a).unwrap();
        assert!(dir.path().join(format!("{copy}.ico")).is_file());
        assert_eq!(
            store.load(&copy).unwrap().records[0].images,
            vec![format!("{copy}_0_0.png")]
        );
    }

    #[test]
    fn dangling_reference_propagates_not_found() {
        let (_dir, store) = open_store();
        let missing = ObjectId::generate();
        let a = put(&store, "A", &tag(&missing));

        let err = engine(&store).duplicate(&a).unwrap_err();
        match err {
            CopyError::Store(StoreError::NotFound(id)) => assert_eq!(id, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tags_only_mode_leaves_plain_mentions() {
        let (_dir, store) = open_store();
        let b = put(&store, "B", "leaf");
        let a = put(&store, "A", &format!("{} see {b}", tag(&b)));

        let mut map = IdMap::new();
        let a_copy = engine(&store)
            .with_remap_mode(RemapMode::TagsOnly)
            .duplicate_with_map(&a, &mut map)
            .unwrap();
        let content = store.load(&a_copy).unwrap().records[0].content.clone();
        assert_eq!(content, format!("{} see {b}", tag(&map[&b])));
    }

    #[test]
    fn custom_copy_suffix() {
        let (_dir, store) = open_store();
        let a = put(&store, "A", "x");
        let engine = engine(&store).with_copy_suffix(" (2)");
        let copy = engine.duplicate(&a).unwrap();
        assert_eq!(store.load(&copy).unwrap().name(), "A (2)");
    }

    #[test]
    fn shallow_duplicate_aliases_references() {
        let (dir, store) = open_store();
        let b = put(&store, "B", "leaf");
        let a = put(&store, "A", &tag(&b));
        fs::write(dir.path().join(format!("{a}.ico")), b"icon").unwrap();
        fs::write(dir.path().join(format!("{a}_0_0.png")), b"img").unwrap();

        let copy = engine(&store).duplicate_shallow(&a, "A copy").unwrap();
        let loaded = store.load(&copy).unwrap();
        assert_eq!(loaded.name(), "A copy");
        assert_eq!(loaded.ref_count(), 1);
        let source = store.load(&a).unwrap();
        assert_eq!(loaded.records[0].raw, source.records[0].raw);
        assert_eq!(count_objects(&store), 3);
        assert!(dir.path().join(format!("{copy}.ico")).is_file());
        assert!(!dir.path().join(format!("{copy}_0_0.png")).exists());
    }

    #[test]
    fn copies_keep_undecodable_record_bytes() {
        let (dir, store) = open_store();
        let a = ObjectId::generate();
        let bytes = vec![b'A', 0xfe, b'B'];
        put_record(&store, &a, "bin", Record::from_bytes(bytes.clone()));

        let engine = engine(&store);
        let deep = engine.duplicate(&a).unwrap();
        let shallow = engine.duplicate_shallow(&a, "bin 2").unwrap();
        for id in [&a, &deep, &shallow] {
            let on_disk = fs::read(dir.path().join(format!("{id}_0.xtad"))).unwrap();
            assert_eq!(on_disk, bytes);
        }
    }

    /// Delegates to the filesystem store but fails every side-file copy.
    struct BrokenSideFiles(FsObjectStore);

    impl ObjectStore for BrokenSideFiles {
        fn load(&self, id: &ObjectId) -> StoreResult<RealObject> {
            self.0.load(id)
        }
        fn save(&self, id: &ObjectId, object: &RealObject) -> StoreResult<()> {
            self.0.save(id, object)
        }
        fn physical_delete(&self, id: &ObjectId) -> StoreResult<()> {
            self.0.physical_delete(id)
        }
        fn list_all_metadata(&self) -> StoreResult<Vec<MetadataEntry>> {
            self.0.list_all_metadata()
        }
        fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
            self.0.exists(id)
        }
        fn copy_icon(&self, _: &ObjectId, _: &ObjectId) -> StoreResult<bool> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
        fn copy_images(&self, _: &ObjectId, _: &ObjectId) -> StoreResult<usize> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
        fn load_metadata(&self, id: &ObjectId) -> StoreResult<Metadata> {
            self.0.load_metadata(id)
        }
        fn save_metadata(&self, id: &ObjectId, metadata: &Metadata) -> StoreResult<()> {
            self.0.save_metadata(id, metadata)
        }
    }

    #[test]
    fn side_file_failures_do_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let fs_store = FsObjectStore::open(StoreLayout::new(dir.path())).unwrap();
        let b = put(&fs_store, "B", "leaf");
        let a = put(&fs_store, "A", &tag(&b));
        let store: Arc<dyn ObjectStore> = Arc::new(BrokenSideFiles(fs_store));
        let engine = DuplicationEngine::new(Arc::clone(&store));

        let deep = engine.duplicate(&a).unwrap();
        let shallow = engine.duplicate_shallow(&a, "other").unwrap();
        assert!(store.exists(&deep).unwrap());
        assert!(store.exists(&shallow).unwrap());
    }
}
