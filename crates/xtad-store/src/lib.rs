//! File-backed persistence for xtad real objects.
//!
//! Each real object is a loose set of files in one flat directory: a JSON
//! metadata document, contiguous record files, and optional icon and image
//! side files (see [`layout`]).
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`FsObjectStore`] -- the directory-backed store
//!
//! # Design Rules
//!
//! 1. One logical writer per object id; the store performs no locking.
//! 2. `save()` writes metadata first, then records, with no atomic commit.
//! 3. A missing `recordCount` is recomputed by probing record files on load.
//! 4. Physical deletion never consults the reference count.
//! 5. All I/O errors are propagated; only enumeration skips unusable files.

pub mod error;
pub mod fs;
pub mod layout;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use layout::StoreLayout;
pub use traits::{MetadataEntry, ObjectStore};
