// crates/policy-adapter-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Document Store
// Description: Durable DocumentStore backend using SQLite.
// Purpose: Persist policy rule records in a local SQLite collection table.
// Dependencies: policy-adapter-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`DocumentStore`] implementation. Each
//! collection is a table with `ptype` and `v0..v5` text columns, so one row is
//! one policy rule.
//!
//! [`DocumentStore`]: policy_adapter_core::DocumentStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::DEFAULT_BUSY_TIMEOUT_MS;
pub use store::DEFAULT_COLLECTION;
pub use store::MAX_PATH_COMPONENT_LENGTH;
pub use store::MAX_TOTAL_PATH_LENGTH;
pub use store::SqliteDocumentStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
pub use store::validate_collection_name;
pub use store::validate_store_path;
