// crates/policy-adapter-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Document Store
// Description: DocumentStore backed by a SQLite collection table.
// Purpose: Persist fixed-arity policy records with parameterized queries.
// Dependencies: policy-adapter-core, rusqlite, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! This module implements [`DocumentStore`] on top of `SQLite`. A collection
//! maps to a table of `(id, ptype, v0..v5)` rows; `id` only preserves
//! insertion order and is never exposed. Selectors become parameterized
//! `WHERE` clauses. Collection names are validated as plain identifiers
//! before they are spliced into SQL.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use policy_adapter_core::DeleteOutcome;
use policy_adapter_core::DocumentStore;
use policy_adapter_core::FIELD_NAMES;
use policy_adapter_core::PTYPE_FIELD;
use policy_adapter_core::RecordCursor;
use policy_adapter_core::RecordSelector;
use policy_adapter_core::StoreError;
use policy_adapter_core::StoredRecord;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;
use rusqlite::params_from_iter;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single store path component.
pub const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total store path length.
pub const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a collection name.
const MAX_COLLECTION_NAME_LENGTH: usize = 64;
/// Default collection name for policy rules.
pub const DEFAULT_COLLECTION: &str = "casbin_rule";

// ============================================================================
// SECTION: Config
// ============================================================================

/// Journal mode applied to the policy database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// Write-ahead log; readers do not block a policy save.
    #[default]
    Wal,
    /// Rollback journal deleted after each commit.
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `journal_mode` pragma argument.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// Fsync policy for policy writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Sync on every commit, so an added rule survives power loss.
    #[default]
    Full,
    /// Sync at checkpoints only.
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `synchronous` pragma argument.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` document store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Collection (table) holding the policy records.
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Returns a config for `path` with default settings.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            collection: default_collection(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default collection name.
fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store configuration or data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

/// Maps a `rusqlite` error into a store error.
fn db_error(err: &rusqlite::Error) -> SqliteStoreError {
    SqliteStoreError::Db(err.to_string())
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed document store for policy records.
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    /// Validated collection table name.
    collection: String,
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteDocumentStore {
    /// Opens an `SQLite`-backed document store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized, or the collection name is invalid.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_collection_name(&config.collection)?;
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection, &config.collection)?;
        debug!(
            path = %config.path.display(),
            collection = %config.collection,
            "opened sqlite document store"
        );
        Ok(Self {
            collection: config.collection.clone(),
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Returns the collection table name.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Locks the shared connection.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))
    }

    /// Runs a selector query and buffers the decoded rows.
    fn find_rows(
        &self,
        selector: &RecordSelector,
    ) -> Result<Vec<Result<StoredRecord, StoreError>>, SqliteStoreError> {
        let (clause, values) = where_clause(selector);
        let sql = format!(
            "SELECT ptype, v0, v1, v2, v3, v4, v5 FROM {}{clause} ORDER BY id",
            self.collection
        );
        let guard = self.lock()?;
        let mut stmt = guard.prepare(&sql).map_err(|err| db_error(&err))?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), read_record)
            .map_err(|err| db_error(&err))?
            .map(|row| row.map_err(|err| StoreError::from(db_error(&err))))
            .collect();
        drop(stmt);
        drop(guard);
        Ok(rows)
    }

    /// Inserts records in a single transaction.
    fn insert_rows(&self, records: &[StoredRecord]) -> Result<(), SqliteStoreError> {
        let sql = format!(
            "INSERT INTO {} (ptype, v0, v1, v2, v3, v4, v5) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            self.collection
        );
        let mut guard = self.lock()?;
        let tx = guard.transaction().map_err(|err| db_error(&err))?;
        {
            let mut stmt = tx.prepare(&sql).map_err(|err| db_error(&err))?;
            for record in records {
                let [v0, v1, v2, v3, v4, v5] = &record.values;
                stmt.execute(params![record.ptype, v0, v1, v2, v3, v4, v5])
                    .map_err(|err| db_error(&err))?;
            }
        }
        tx.commit().map_err(|err| db_error(&err))?;
        drop(guard);
        Ok(())
    }

    /// Deletes the oldest row equal to `record`.
    fn delete_row(&self, record: &StoredRecord) -> Result<DeleteOutcome, SqliteStoreError> {
        let (clause, values) = where_clause(&RecordSelector::exact(record));
        let sql = format!(
            "DELETE FROM {table} WHERE id = (SELECT id FROM {table}{clause} ORDER BY id LIMIT 1)",
            table = self.collection
        );
        let guard = self.lock()?;
        let affected =
            guard.execute(&sql, params_from_iter(values.iter())).map_err(|err| db_error(&err))?;
        drop(guard);
        Ok(if affected == 0 { DeleteOutcome::NoMatch } else { DeleteOutcome::Deleted })
    }

    /// Deletes every row matching `selector`.
    fn delete_rows(&self, selector: &RecordSelector) -> Result<u64, SqliteStoreError> {
        let (clause, values) = where_clause(selector);
        let sql = format!("DELETE FROM {}{clause}", self.collection);
        let guard = self.lock()?;
        let affected =
            guard.execute(&sql, params_from_iter(values.iter())).map_err(|err| db_error(&err))?;
        drop(guard);
        u64::try_from(affected)
            .map_err(|_| SqliteStoreError::Invalid("delete count overflow".to_string()))
    }

    /// Removes every row in the collection.
    fn clear_rows(&self) -> Result<(), SqliteStoreError> {
        let sql = format!("DELETE FROM {}", self.collection);
        let guard = self.lock()?;
        guard.execute(&sql, params![]).map_err(|err| db_error(&err))?;
        drop(guard);
        Ok(())
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn find(&self, selector: &RecordSelector) -> Result<RecordCursor, StoreError> {
        let rows = self.find_rows(selector)?;
        Ok(Box::new(rows.into_iter()))
    }

    fn insert_one(&self, record: &StoredRecord) -> Result<(), StoreError> {
        self.insert_rows(std::slice::from_ref(record)).map_err(StoreError::from)
    }

    fn insert_many(&self, records: &[StoredRecord]) -> Result<(), StoreError> {
        self.insert_rows(records).map_err(StoreError::from)
    }

    fn delete_one(&self, record: &StoredRecord) -> Result<DeleteOutcome, StoreError> {
        self.delete_row(record).map_err(StoreError::from)
    }

    fn delete_many(&self, selector: &RecordSelector) -> Result<u64, StoreError> {
        self.delete_rows(selector).map_err(StoreError::from)
    }

    fn drop_collection(&self) -> Result<(), StoreError> {
        self.clear_rows().map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Query Helpers
// ============================================================================

/// Builds a ` WHERE ...` clause and its bound values for `selector`.
///
/// Returns an empty clause for an empty selector.
fn where_clause(selector: &RecordSelector) -> (String, Vec<String>) {
    let mut predicates = Vec::new();
    let mut values = Vec::new();
    if let Some(ptype) = &selector.ptype {
        values.push(ptype.clone());
        predicates.push(format!("{PTYPE_FIELD} = ?{}", values.len()));
    }
    for (index, value) in selector.field_predicates() {
        values.push(value.to_string());
        predicates.push(format!("{} = ?{}", FIELD_NAMES[index], values.len()));
    }
    if predicates.is_empty() {
        return (String::new(), values);
    }
    (format!(" WHERE {}", predicates.join(" AND ")), values)
}

/// Reads a record from a `ptype, v0..v5` row.
fn read_record(row: &Row<'_>) -> rusqlite::Result<StoredRecord> {
    Ok(StoredRecord::new(
        row.get::<_, String>(0)?,
        [row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?, row.get(6)?],
    ))
}

// ============================================================================
// SECTION: Setup Helpers
// ============================================================================

/// Validates a collection name as a plain SQL identifier.
///
/// # Errors
///
/// Returns [`SqliteStoreError::Invalid`] when the name is empty, too long,
/// reserved, or uses characters outside lowercase ASCII letters, digits, and
/// underscores. `SQLite` folds identifier case, so mixed-case names would
/// alias another collection's table.
pub fn validate_collection_name(name: &str) -> Result<(), SqliteStoreError> {
    if name.is_empty() {
        return Err(SqliteStoreError::Invalid("collection name must not be empty".to_string()));
    }
    if name.len() > MAX_COLLECTION_NAME_LENGTH {
        return Err(SqliteStoreError::Invalid("collection name exceeds length limit".to_string()));
    }
    let mut chars = name.chars();
    let leading_ok = chars.next().is_some_and(|c| c.is_ascii_lowercase() || c == '_');
    if !leading_ok || !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
        return Err(SqliteStoreError::Invalid(format!("invalid collection name: {name}")));
    }
    let folded = name.to_ascii_lowercase();
    if folded.starts_with("sqlite_") || folded.starts_with("idx_") || folded == "store_meta" {
        return Err(SqliteStoreError::Invalid(format!("reserved collection name: {name}")));
    }
    Ok(())
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates a database path against length limits.
///
/// # Errors
///
/// Returns [`SqliteStoreError::Invalid`] when the path is blank, too long,
/// has an overlong component, or names an existing directory.
pub fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.trim().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens the policy database, creating the file on first use.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection =
        Connection::open_with_flags(&config.path, flags).map_err(|err| db_error(&err))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies journal, sync, and lock-wait settings to a fresh connection.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| db_error(&err))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| db_error(&err))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| db_error(&err))?;
    Ok(())
}

/// Initializes the schema, validates its version, and creates the collection.
fn initialize_schema(connection: &mut Connection, collection: &str) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| db_error(&err))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| db_error(&err))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| db_error(&err))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| db_error(&err))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {collection} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ptype TEXT NOT NULL,
            v0 TEXT NOT NULL DEFAULT '',
            v1 TEXT NOT NULL DEFAULT '',
            v2 TEXT NOT NULL DEFAULT '',
            v3 TEXT NOT NULL DEFAULT '',
            v4 TEXT NOT NULL DEFAULT '',
            v5 TEXT NOT NULL DEFAULT ''
        );
        CREATE INDEX IF NOT EXISTS idx_{collection}_ptype ON {collection} (ptype);"
    ))
    .map_err(|err| db_error(&err))?;
    tx.commit().map_err(|err| db_error(&err))?;
    Ok(())
}
