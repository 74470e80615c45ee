//! Enumeration and the refcount-only orphan view.
//!
//! `orphan_candidates` is not a reachability trace. Objects that reference
//! only each other in a cycle keep `refCount > 0` and never show up here,
//! even when nothing else can reach them.

use xtad_store::{MetadataEntry, ObjectStore};

use crate::error::LedgerResult;

/// Every real object in the store.
pub fn all_objects(store: &dyn ObjectStore) -> LedgerResult<Vec<MetadataEntry>> {
    Ok(store.list_all_metadata()?)
}

/// Objects whose reference count is zero; eligible for, but never subject
/// to, automatic deletion.
pub fn orphan_candidates(store: &dyn ObjectStore) -> LedgerResult<Vec<MetadataEntry>> {
    Ok(all_objects(store)?
        .into_iter()
        .filter(|entry| entry.metadata.ref_count == 0)
        .collect())
}
