//! Duplication of real objects.
//!
//! [`DuplicationEngine::duplicate`] deep-copies an object together with every
//! object it transitively references. Each distinct source id is assigned
//! exactly one new id per call, so cycles terminate and shared targets are
//! copied once. References are rewritten by global text substitution unless
//! [`RemapMode::TagsOnly`](xtad_refs::RemapMode::TagsOnly) is configured.
//!
//! [`DuplicationEngine::duplicate_shallow`] copies a single object verbatim,
//! leaving it sharing every embedded reference with its source.
//!
//! Copies are written child-first and there is no multi-object transaction:
//! if a load or save fails mid-way, the copies already written stay on disk.

pub mod engine;
pub mod error;

pub use engine::{DuplicationEngine, IdMap, DEFAULT_COPY_SUFFIX};
pub use error::{CopyError, CopyResult};
