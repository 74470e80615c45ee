//! Virtual-object references for the xtad store.
//!
//! A virtual object is not stored on its own: it is a tag inside a record's
//! content naming another real object as `<targetId>_<record>.<ext>`. This
//! crate finds those tags and rewrites their targets.
//!
//! # Modules
//!
//! - [`scan`] - Locate reference tags and their distinct targets
//! - [`remap`] - Replace a target id after duplication ([`RemapMode`])

pub mod remap;
pub mod scan;

pub use remap::{remap, RemapMode};
pub use scan::{referenced_ids, scan, ReferenceTag};
