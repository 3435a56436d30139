// crates/policy-adapter-core/src/interfaces/mod.rs
// ============================================================================
// Module: Policy Adapter Interfaces
// Description: Document-store and adapter contracts.
// Purpose: Define the seams between the adapter, its store, and the engine.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! [`DocumentStore`] is the narrow set of collection primitives the adapter
//! consumes. [`Adapter`], [`FilteredAdapter`], and [`BatchAdapter`] are the
//! surfaces a policy engine calls to persist its model.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::PolicyModel;
use crate::core::RecordSelector;
use crate::core::StoredRecord;

// ============================================================================
// SECTION: Document Store
// ============================================================================

/// Document store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("document store io error: {0}")]
    Io(String),
    /// Stored data is invalid.
    #[error("document store invalid data: {0}")]
    Invalid(String),
    /// Store schema version is incompatible.
    #[error("document store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store reported an error.
    #[error("document store error: {0}")]
    Store(String),
}

/// Outcome of a single-record delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// A matching record was removed.
    Deleted,
    /// No record matched.
    NoMatch,
}

/// Cursor over records returned by [`DocumentStore::find`].
pub type RecordCursor = Box<dyn Iterator<Item = Result<StoredRecord, StoreError>> + Send>;

/// Collection primitives backing the adapter.
pub trait DocumentStore: Send + Sync {
    /// Returns records matching `selector`; an empty selector matches all.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn find(&self, selector: &RecordSelector) -> Result<RecordCursor, StoreError>;

    /// Inserts a single record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn insert_one(&self, record: &StoredRecord) -> Result<(), StoreError>;

    /// Inserts a batch of records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn insert_many(&self, records: &[StoredRecord]) -> Result<(), StoreError>;

    /// Deletes one record equal to `record` in every field.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails. A missing record is
    /// reported as [`DeleteOutcome::NoMatch`], not as an error.
    fn delete_one(&self, record: &StoredRecord) -> Result<DeleteOutcome, StoreError>;

    /// Deletes every record matching `selector` and returns the count.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn delete_many(&self, selector: &RecordSelector) -> Result<u64, StoreError>;

    /// Removes every record in the collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the collection cannot be cleared.
    fn drop_collection(&self) -> Result<(), StoreError>;
}

// ============================================================================
// SECTION: Adapter
// ============================================================================

/// Adapter errors surfaced to the policy engine.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Document store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The loaded policy is a filtered view and cannot be saved.
    #[error("cannot save a filtered policy")]
    FilteredState,
}

/// Persistence adapter used by a policy engine.
pub trait Adapter {
    /// Loads every stored rule into `model`.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the store cannot be read.
    fn load_policy(&mut self, model: &mut dyn PolicyModel) -> Result<(), AdapterError>;

    /// Replaces stored rules with every rule in `model`.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::FilteredState`] after a filtered load, or
    /// [`AdapterError::Store`] when the store cannot be written.
    fn save_policy(&mut self, model: &dyn PolicyModel) -> Result<(), AdapterError>;

    /// Stores a single rule.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the store cannot be written.
    fn add_policy(&mut self, sec: &str, ptype: &str, rule: &[String]) -> Result<(), AdapterError>;

    /// Removes one stored copy of a rule; a missing rule is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the store cannot be written.
    fn remove_policy(
        &mut self,
        sec: &str,
        ptype: &str,
        rule: &[String],
    ) -> Result<(), AdapterError>;

    /// Removes every rule matching a run of field values starting at
    /// `field_index`; empty values match anything. Returns the count removed.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the store cannot be written.
    fn remove_filtered_policy(
        &mut self,
        sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: &[String],
    ) -> Result<u64, AdapterError>;
}

/// Adapter that supports partial loads.
pub trait FilteredAdapter: Adapter {
    /// Loads rules matching `filter` into `model`.
    ///
    /// `None` or an empty selector loads everything.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the store cannot be read.
    fn load_filtered_policy(
        &mut self,
        model: &mut dyn PolicyModel,
        filter: Option<&RecordSelector>,
    ) -> Result<(), AdapterError>;

    /// Returns true when the last load was filtered.
    fn is_filtered(&self) -> bool;
}

/// Adapter that supports batched writes.
pub trait BatchAdapter: Adapter {
    /// Stores several rules of one rule type.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the store cannot be written.
    fn add_policies(
        &mut self,
        sec: &str,
        ptype: &str,
        rules: &[Vec<String>],
    ) -> Result<(), AdapterError>;

    /// Removes one stored copy of each rule; missing rules are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError`] when the store cannot be written.
    fn remove_policies(
        &mut self,
        sec: &str,
        ptype: &str,
        rules: &[Vec<String>],
    ) -> Result<(), AdapterError>;
}
