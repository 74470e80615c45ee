use xtad_types::{Metadata, ObjectId, RealObject};

use crate::error::StoreResult;

/// A metadata document tagged with the id recovered from its file name.
#[derive(Clone, Debug, PartialEq)]
pub struct MetadataEntry {
    pub id: ObjectId,
    pub metadata: Metadata,
}

/// Persistence for real objects.
///
/// Implementations assume a single logical writer per object id:
/// - No locking, versioning, or atomic multi-file commit is performed.
/// - A crash or concurrent writer between the metadata write and a record
///   write in `save()` can leave metadata and records out of step.
/// - Errors are propagated unchanged; nothing is retried.
pub trait ObjectStore: Send + Sync {
    /// Read an object with all of its records.
    ///
    /// Each record carries its image side files numbered contiguously from 0.
    /// Returns `StoreError::NotFound` if the metadata file does not exist.
    fn load(&self, id: &ObjectId) -> StoreResult<RealObject>;

    /// Overwrite the metadata file and write every record's
    /// [`Record::bytes`](xtad_types::Record::bytes).
    ///
    /// `id` and `recordCount` in the written metadata always match `object`.
    /// Record files beyond the new record count are left in place.
    fn save(&self, id: &ObjectId, object: &RealObject) -> StoreResult<()>;

    /// Remove the metadata file, every contiguous record file, the icon and
    /// all image side files. Ignores the reference count.
    fn physical_delete(&self, id: &ObjectId) -> StoreResult<()>;

    /// Every metadata document in the store that carries a `name`, ordered by id.
    fn list_all_metadata(&self) -> StoreResult<Vec<MetadataEntry>>;

    /// Whether the object's metadata file exists.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Copy the icon of `from` to `to`. Returns `false` if `from` has no icon.
    fn copy_icon(&self, from: &ObjectId, to: &ObjectId) -> StoreResult<bool>;

    /// Copy the image side files of each record of `from`, renamed for `to`.
    ///
    /// Only images a `load` would attach are copied. Returns the number of files copied. Individual copy failures are
    /// logged and skipped.
    fn copy_images(&self, from: &ObjectId, to: &ObjectId) -> StoreResult<usize>;

    /// Read only the metadata document, with `recordCount` as stored.
    fn load_metadata(&self, id: &ObjectId) -> StoreResult<Metadata>;

    /// Overwrite only the metadata document, forcing its `id`.
    fn save_metadata(&self, id: &ObjectId, metadata: &Metadata) -> StoreResult<()>;
}
