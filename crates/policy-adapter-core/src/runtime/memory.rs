// crates/policy-adapter-core/src/runtime/memory.rs
// ============================================================================
// Module: In-Memory Document Store
// Description: Simple in-memory document store for tests and local use.
// Purpose: Provide a deterministic DocumentStore without external deps.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! [`InMemoryDocumentStore`] keeps records in insertion order behind a shared
//! mutex. Clones share the same collection. It is not durable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::RecordSelector;
use crate::core::StoredRecord;
use crate::interfaces::DeleteOutcome;
use crate::interfaces::DocumentStore;
use crate::interfaces::RecordCursor;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory document store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDocumentStore {
    /// Records in insertion order, protected by a mutex.
    records: Arc<Mutex<Vec<StoredRecord>>>,
}

impl InMemoryDocumentStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every stored record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Store`] when the mutex is poisoned.
    pub fn snapshot(&self) -> Result<Vec<StoredRecord>, StoreError> {
        Ok(self.lock()?.clone())
    }

    /// Locks the record list.
    fn lock(&self) -> Result<MutexGuard<'_, Vec<StoredRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Store("document store mutex poisoned".to_string()))
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn find(&self, selector: &RecordSelector) -> Result<RecordCursor, StoreError> {
        let matched: Vec<StoredRecord> =
            self.lock()?.iter().filter(|record| selector.matches(record)).cloned().collect();
        Ok(Box::new(matched.into_iter().map(Ok)))
    }

    fn insert_one(&self, record: &StoredRecord) -> Result<(), StoreError> {
        self.lock()?.push(record.clone());
        Ok(())
    }

    fn insert_many(&self, records: &[StoredRecord]) -> Result<(), StoreError> {
        self.lock()?.extend_from_slice(records);
        Ok(())
    }

    fn delete_one(&self, record: &StoredRecord) -> Result<DeleteOutcome, StoreError> {
        let mut guard = self.lock()?;
        let Some(position) = guard.iter().position(|stored| stored == record) else {
            return Ok(DeleteOutcome::NoMatch);
        };
        guard.remove(position);
        drop(guard);
        Ok(DeleteOutcome::Deleted)
    }

    fn delete_many(&self, selector: &RecordSelector) -> Result<u64, StoreError> {
        let mut guard = self.lock()?;
        let before = guard.len();
        guard.retain(|record| !selector.matches(record));
        let removed = before - guard.len();
        drop(guard);
        u64::try_from(removed).map_err(|_| StoreError::Invalid("delete count overflow".to_string()))
    }

    fn drop_collection(&self) -> Result<(), StoreError> {
        self.lock()?.clear();
        Ok(())
    }
}
