//! High-level API for the xtad real/virtual object store.
//!
//! [`XtadStore`] is the entry point for applications: it opens a store
//! directory from a [`StoreConfig`] and exposes every store operation
//! (load, save, create, duplicate, shallow duplicate, reference counting,
//! physical delete, enumeration).

pub mod config;
pub mod error;
pub mod store;

pub use config::StoreConfig;
pub use error::{SdkError, SdkResult};
pub use store::XtadStore;

// Re-export key types
pub use xtad_refs::RemapMode;
pub use xtad_store::MetadataEntry;
pub use xtad_types::{Metadata, ObjectId, RealObject, Record};
