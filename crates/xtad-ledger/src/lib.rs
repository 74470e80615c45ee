//! Reference-count bookkeeping for the xtad object store.
//!
//! Every real object carries a `refCount`: the number of virtual objects
//! pointing at it. The UI decides when a reference is created or removed;
//! this crate only applies the adjustment and offers the zero-count view.
//!
//! Reference counting here has no reachability trace and no cascade:
//! decrementing to zero deletes nothing, and unreachable cycles are never
//! reported as orphans.
//!
//! # Modules
//!
//! - [`refcount`] - [`RefCountLedger`] increment/decrement
//! - [`locks`] - opt-in per-id serialization ([`IdLocks`])
//! - [`orphan`] - enumeration and orphan candidates

pub mod error;
pub mod locks;
pub mod orphan;
pub mod refcount;

pub use error::{LedgerError, LedgerResult};
pub use locks::IdLocks;
pub use orphan::{all_objects, orphan_candidates};
pub use refcount::RefCountLedger;
