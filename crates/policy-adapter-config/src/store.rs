// crates/policy-adapter-config/src/store.rs
// ============================================================================
// Module: Configured Store
// Description: Builds the document store and adapter selected by config.
// Purpose: Give hosts one constructor for any configured backend.
// Dependencies: policy-adapter-core, policy-adapter-store-sqlite, tracing
// ============================================================================

//! ## Overview
//! [`ConfiguredStore`] dispatches [`DocumentStore`] calls to whichever backend
//! the configuration selected, so hosts hold a single concrete adapter type.

// ============================================================================
// SECTION: Imports
// ============================================================================

use policy_adapter_core::DeleteOutcome;
use policy_adapter_core::DocumentStore;
use policy_adapter_core::InMemoryDocumentStore;
use policy_adapter_core::PolicyAdapter;
use policy_adapter_core::RecordCursor;
use policy_adapter_core::RecordSelector;
use policy_adapter_core::StoreError;
use policy_adapter_core::StoredRecord;
use policy_adapter_store_sqlite::SqliteDocumentStore;
use tracing::info;

use crate::config::ConfigError;
use crate::config::PolicyAdapterConfig;
use crate::config::StoreType;

// ============================================================================
// SECTION: Configured Store
// ============================================================================

/// Document store selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredStore {
    /// In-memory store.
    Memory(InMemoryDocumentStore),
    /// `SQLite`-backed store.
    Sqlite(SqliteDocumentStore),
}

impl ConfiguredStore {
    /// Returns the inner store as a trait object.
    fn inner(&self) -> &dyn DocumentStore {
        match self {
            Self::Memory(store) => store,
            Self::Sqlite(store) => store,
        }
    }
}

impl DocumentStore for ConfiguredStore {
    fn find(&self, selector: &RecordSelector) -> Result<RecordCursor, StoreError> {
        self.inner().find(selector)
    }

    fn insert_one(&self, record: &StoredRecord) -> Result<(), StoreError> {
        self.inner().insert_one(record)
    }

    fn insert_many(&self, records: &[StoredRecord]) -> Result<(), StoreError> {
        self.inner().insert_many(records)
    }

    fn delete_one(&self, record: &StoredRecord) -> Result<DeleteOutcome, StoreError> {
        self.inner().delete_one(record)
    }

    fn delete_many(&self, selector: &RecordSelector) -> Result<u64, StoreError> {
        self.inner().delete_many(selector)
    }

    fn drop_collection(&self) -> Result<(), StoreError> {
        self.inner().drop_collection()
    }
}

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Opens the document store described by `config`.
///
/// # Errors
///
/// Returns [`ConfigError`] when the configuration is invalid or the store
/// cannot be opened.
pub fn build_store(config: &PolicyAdapterConfig) -> Result<ConfiguredStore, ConfigError> {
    config.validate()?;
    let store = match config.store.store_type {
        StoreType::Memory => ConfiguredStore::Memory(InMemoryDocumentStore::new()),
        StoreType::Sqlite => {
            let sqlite = config.store.sqlite().ok_or_else(|| {
                ConfigError::Invalid("sqlite store requires path".to_string())
            })?;
            let store = SqliteDocumentStore::new(&sqlite)
                .map_err(|err| ConfigError::Store(err.to_string()))?;
            ConfiguredStore::Sqlite(store)
        }
    };
    info!(
        store_type = config.store.store_type.as_str(),
        collection = %config.store.collection,
        "policy store ready"
    );
    Ok(store)
}

/// Builds a policy adapter over the configured store.
///
/// # Errors
///
/// Returns [`ConfigError`] when the store cannot be built.
pub fn build_adapter(
    config: &PolicyAdapterConfig,
) -> Result<PolicyAdapter<ConfiguredStore>, ConfigError> {
    build_store(config).map(PolicyAdapter::new)
}
