//! Opt-in per-identifier serialization of read-modify-write updates.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use xtad_types::ObjectId;

use crate::error::{LedgerError, LedgerResult};

type LockTable = HashMap<ObjectId, Arc<Mutex<()>>>;

/// One mutex per object id, kept in the table only while some caller holds
/// or waits on it.
///
/// Only callers sharing the same `IdLocks` are serialized; other processes
/// writing the same directory are not.
#[derive(Debug, Default)]
pub struct IdLocks {
    locks: Mutex<LockTable>,
}

impl IdLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `id`.
    pub fn with_lock<T>(
        &self,
        id: &ObjectId,
        f: impl FnOnce() -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        let lock = Arc::clone(self.table()?.entry(id.clone()).or_default());
        let result = match lock.lock() {
            Ok(_guard) => f(),
            Err(e) => Err(LedgerError::LockPoisoned(format!("{id}: {e}"))),
        };
        self.release(id, lock)?;
        result
    }

    /// Number of ids currently held or waited on.
    pub fn len(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn table(&self) -> LedgerResult<MutexGuard<'_, LockTable>> {
        self.locks
            .lock()
            .map_err(|e| LedgerError::LockPoisoned(format!("lock table: {e}")))
    }

    /// Drop the entry for `id` when `lock` and the table are its last owners.
    fn release(&self, id: &ObjectId, lock: Arc<Mutex<()>>) -> LedgerResult<()> {
        let mut locks = self.table()?;
        if Arc::strong_count(&lock) == 2 {
            locks.remove(id);
        }
        // Released under the table lock so the next releaser sees the count.
        drop(lock);
        Ok(())
    }
}
