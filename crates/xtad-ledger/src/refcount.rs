use std::sync::Arc;

use tracing::debug;
use xtad_store::ObjectStore;
use xtad_types::ObjectId;

use crate::error::LedgerResult;
use crate::locks::IdLocks;

/// Adjusts the `refCount` field of existing objects.
///
/// Each adjustment is a read-modify-write of the metadata file and is not
/// atomic against other writers of the same id. With [`Self::serialized`]
/// the ledger holds a per-id mutex around the read-modify-write; this only
/// covers callers sharing this ledger.
///
/// The ledger never deletes anything, even when a count reaches zero.
pub struct RefCountLedger {
    store: Arc<dyn ObjectStore>,
    locks: Option<IdLocks>,
}

impl RefCountLedger {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store, locks: None }
    }

    /// A ledger that serializes updates per object id.
    pub fn serialized(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            locks: Some(IdLocks::new()),
        }
    }

    pub fn is_serialized(&self) -> bool {
        self.locks.is_some()
    }

    /// Record one more reference to `id`. Returns the new count.
    pub fn increment(&self, id: &ObjectId) -> LedgerResult<u64> {
        self.adjust(id, |count| count.saturating_add(1))
    }

    /// Record one reference fewer to `id`, floored at zero. Returns the new count.
    pub fn decrement(&self, id: &ObjectId) -> LedgerResult<u64> {
        self.adjust(id, |count| count.saturating_sub(1))
    }

    /// Current reference count of `id`.
    pub fn count(&self, id: &ObjectId) -> LedgerResult<u64> {
        Ok(self.store.load_metadata(id)?.ref_count)
    }

    fn adjust(&self, id: &ObjectId, op: impl Fn(u64) -> u64) -> LedgerResult<u64> {
        let update = || -> LedgerResult<u64> {
            let mut metadata = self.store.load_metadata(id)?;
            let before = metadata.ref_count;
            metadata.ref_count = op(before);
            self.store.save_metadata(id, &metadata)?;
            debug!(%id, before, after = metadata.ref_count, "adjusted refCount");
            Ok(metadata.ref_count)
        };
        match &self.locks {
            Some(locks) => locks.with_lock(id, update),
            None => update(),
        }
    }
}
