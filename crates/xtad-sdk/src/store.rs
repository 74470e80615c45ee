use std::sync::Arc;

use tracing::info;
use xtad_copy::DuplicationEngine;
use xtad_ledger::{orphan, RefCountLedger};
use xtad_store::{FsObjectStore, MetadataEntry, ObjectStore};
use xtad_types::{Metadata, ObjectId, RealObject, Record};

use crate::config::StoreConfig;
use crate::error::{SdkError, SdkResult};

/// The real/virtual object store.
///
/// One operation runs at a time per caller and each is synchronous. Callers
/// decide when a reference is created or removed and call
/// [`increment`](Self::increment) / [`decrement`](Self::decrement)
/// accordingly; the store enforces no policy of its own.
pub struct XtadStore {
    config: StoreConfig,
    store: Arc<dyn ObjectStore>,
    ledger: RefCountLedger,
    engine: DuplicationEngine,
}

impl XtadStore {
    /// Open the directory-backed store described by `config`.
    pub fn open(config: StoreConfig) -> SdkResult<Self> {
        let layout = config.layout();
        let store = if config.create_dir {
            FsObjectStore::open(layout)?
        } else if config.base_dir.is_dir() {
            FsObjectStore::new(layout)
        } else {
            return Err(SdkError::Config(format!(
                "store directory does not exist: {}",
                config.base_dir.display()
            )));
        };
        info!(base_dir = %config.base_dir.display(), "opened object store");
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Build on an arbitrary backend. `config` supplies behavior settings only.
    pub fn with_store(config: StoreConfig, store: Arc<dyn ObjectStore>) -> Self {
        let ledger = if config.serialize_updates {
            RefCountLedger::serialized(Arc::clone(&store))
        } else {
            RefCountLedger::new(Arc::clone(&store))
        };
        let engine = DuplicationEngine::new(Arc::clone(&store))
            .with_remap_mode(config.remap)
            .with_copy_suffix(config.copy_suffix.clone());
        Self {
            config,
            store,
            ledger,
            engine,
        }
    }

    // ---- Persistence ----

    pub fn load(&self, id: &ObjectId) -> SdkResult<RealObject> {
        Ok(self.store.load(id)?)
    }

    pub fn save(&self, id: &ObjectId, object: &RealObject) -> SdkResult<()> {
        Ok(self.store.save(id, object)?)
    }

    pub fn exists(&self, id: &ObjectId) -> SdkResult<bool> {
        Ok(self.store.exists(id)?)
    }

    // ---- Lifecycle ----

    /// Create a one-record object holding `content`, with one reference.
    pub fn create(&self, name: &str, content: &str) -> SdkResult<ObjectId> {
        let id = ObjectId::generate();
        let records = vec![Record::from_text(content)];
        let object = RealObject::new(id.clone(), Metadata::new(name), records);
        self.store.save(&id, &object)?;
        info!(%id, name, "created object");
        Ok(id)
    }

    /// Remove every file of `id`, regardless of its reference count.
    pub fn physical_delete(&self, id: &ObjectId) -> SdkResult<()> {
        Ok(self.store.physical_delete(id)?)
    }

    /// Change the display name of `id`.
    pub fn rename(&self, id: &ObjectId, name: &str) -> SdkResult<()> {
        let mut metadata = self.store.load_metadata(id)?;
        metadata.name = name.to_string();
        metadata.touch_updated();
        Ok(self.store.save_metadata(id, &metadata)?)
    }

    // ---- Duplication ----

    pub fn duplicate(&self, source: &ObjectId) -> SdkResult<ObjectId> {
        Ok(self.engine.duplicate(source)?)
    }

    pub fn duplicate_shallow(&self, source: &ObjectId, new_name: &str) -> SdkResult<ObjectId> {
        Ok(self.engine.duplicate_shallow(source, new_name)?)
    }

    // ---- Reference counting ----

    pub fn increment(&self, id: &ObjectId) -> SdkResult<u64> {
        Ok(self.ledger.increment(id)?)
    }

    pub fn decrement(&self, id: &ObjectId) -> SdkResult<u64> {
        Ok(self.ledger.decrement(id)?)
    }

    // ---- Enumeration ----

    pub fn all_objects(&self) -> SdkResult<Vec<MetadataEntry>> {
        Ok(orphan::all_objects(self.store.as_ref())?)
    }

    pub fn orphan_candidates(&self) -> SdkResult<Vec<MetadataEntry>> {
        Ok(orphan::orphan_candidates(self.store.as_ref())?)
    }

    /// Distinct object ids referenced from any record of `id`.
    pub fn references(&self, id: &ObjectId) -> SdkResult<Vec<ObjectId>> {
        let object = self.store.load(id)?;
        let mut ids: Vec<ObjectId> = Vec::new();
        for record in &object.records {
            for target in xtad_refs::referenced_ids(&record.content) {
                if !ids.contains(&target) {
                    ids.push(target);
                }
            }
        }
        Ok(ids)
    }
}

impl std::fmt::Debug for XtadStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XtadStore")
            .field("base_dir", &self.config.base_dir)
            .field("remap", &self.config.remap)
            .field("serialize_updates", &self.config.serialize_updates)
            .finish()
    }
}
