//! Foundation types for the xtad object store.
//!
//! This crate provides the identity and structural types shared by every
//! other xtad crate.
//!
//! # Key Types
//!
//! - [`ObjectId`] - Time-ordered (UUID v7) identifier of a real object
//! - [`Metadata`] - The per-object metadata document (`<id>.json`)
//! - [`Record`] - One indexed content slot of a real object
//! - [`RealObject`] - Metadata plus its contiguous records

pub mod error;
pub mod id;
pub mod metadata;
pub mod object;

pub use error::TypeError;
pub use id::ObjectId;
pub use metadata::Metadata;
pub use object::{RealObject, Record};
