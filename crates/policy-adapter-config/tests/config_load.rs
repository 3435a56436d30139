// crates/policy-adapter-config/tests/config_load.rs
// ============================================================================
// Module: Config Loading Tests
// Description: Validate policy-adapter.toml parsing and store construction.
// Purpose: Ensure defaults, fail-closed validation, and backend selection.
// Dependencies: policy-adapter-config, policy-adapter-core, policy-adapter-store-sqlite, tempfile
// ============================================================================

//! ## Overview
//! Configuration tests covering defaults, invalid inputs, file limits, and
//! building adapters over each backend.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;

use policy_adapter_config::CONFIG_ENV_VAR;
use policy_adapter_config::ConfigError;
use policy_adapter_config::ConfiguredStore;
use policy_adapter_config::DEFAULT_CONFIG_NAME;
use policy_adapter_config::PolicyAdapterConfig;
use policy_adapter_config::StoreType;
use policy_adapter_config::build_adapter;
use policy_adapter_config::build_store;
use policy_adapter_core::Adapter;
use policy_adapter_core::Model;
use policy_adapter_store_sqlite::DEFAULT_BUSY_TIMEOUT_MS;
use policy_adapter_store_sqlite::MAX_PATH_COMPONENT_LENGTH;
use policy_adapter_store_sqlite::SqliteStoreMode;
use policy_adapter_store_sqlite::SqliteSyncMode;
use tempfile::TempDir;

// ============================================================================
// SECTION: Parsing
// ============================================================================

#[test]
fn empty_config_defaults_to_memory_store() {
    let config = PolicyAdapterConfig::from_toml_str("").unwrap();
    assert_eq!(config.store.store_type, StoreType::Memory);
    assert_eq!(config.store.collection, "casbin_rule");
    assert!(config.store.path.is_none());
    assert!(config.store.sqlite().is_none());
}

#[test]
fn sqlite_config_parses_all_fields() {
    let config = PolicyAdapterConfig::from_toml_str(
        r#"
        [store]
        type = "sqlite"
        collection = "authz_rules"
        path = "data/policy.sqlite"
        busy_timeout_ms = 2500
        journal_mode = "delete"
        sync_mode = "normal"
        "#,
    )
    .unwrap();
    let sqlite = config.store.sqlite().unwrap();
    assert_eq!(sqlite.collection, "authz_rules");
    assert_eq!(sqlite.path.to_string_lossy(), "data/policy.sqlite");
    assert_eq!(sqlite.busy_timeout_ms, 2_500);
    assert_eq!(sqlite.journal_mode, SqliteStoreMode::Delete);
    assert_eq!(sqlite.sync_mode, SqliteSyncMode::Normal);
}

#[test]
fn sqlite_config_requires_path() {
    let err = PolicyAdapterConfig::from_toml_str("[store]\ntype = \"sqlite\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(message) if message.contains("requires path")));
}

#[test]
fn memory_config_rejects_path() {
    let err =
        PolicyAdapterConfig::from_toml_str("[store]\npath = \"policy.sqlite\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn unknown_backend_is_a_parse_error() {
    let err = PolicyAdapterConfig::from_toml_str("[store]\ntype = \"mongo\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn unknown_fields_are_rejected() {
    let err = PolicyAdapterConfig::from_toml_str("[store]\ncolection = \"x\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn invalid_collection_name_is_rejected() {
    let err = PolicyAdapterConfig::from_toml_str("[store]\ncollection = \"rules; --\"\n")
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(message) if message.contains("store.collection")));
}

#[test]
fn excessive_busy_timeout_is_rejected() {
    let err = PolicyAdapterConfig::from_toml_str(
        "[store]\ntype = \"sqlite\"\npath = \"p.sqlite\"\nbusy_timeout_ms = 600000\n",
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

// ============================================================================
// SECTION: Loading
// ============================================================================

#[test]
fn load_reads_explicit_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("policy-adapter.toml");
    fs::write(&path, "[store]\ncollection = \"rules\"\n").unwrap();
    let config = PolicyAdapterConfig::load(Some(&path)).unwrap();
    assert_eq!(config.store.collection, "rules");
}

#[test]
fn load_reports_missing_file_as_io_error() {
    let temp = TempDir::new().unwrap();
    let err = PolicyAdapterConfig::load(Some(&temp.path().join("missing.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn load_rejects_oversize_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("big.toml");
    let padding = format!("# {}\n", "x".repeat(1024 * 1024));
    fs::write(&path, padding).unwrap();
    let err = PolicyAdapterConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(message) if message.contains("size limit")));
}

#[test]
fn load_rejects_non_utf8_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("binary.toml");
    fs::write(&path, [0xff_u8, 0xfe, 0x00]).unwrap();
    let err = PolicyAdapterConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

// ============================================================================
// SECTION: Store Construction
// ============================================================================

#[test]
fn build_store_selects_memory_backend() {
    let store = build_store(&PolicyAdapterConfig::default()).unwrap();
    assert!(matches!(store, ConfiguredStore::Memory(_)));
}

#[test]
fn build_adapter_over_sqlite_persists_rules() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("db").join("policy.sqlite");
    let text = format!("[store]\ntype = \"sqlite\"\npath = {:?}\n", db.to_string_lossy());
    let config = PolicyAdapterConfig::from_toml_str(&text).unwrap();

    let mut adapter = build_adapter(&config).unwrap();
    assert!(matches!(adapter.store(), ConfiguredStore::Sqlite(_)));
    adapter.add_policy("p", "p", &["alice".to_string(), "data1".to_string()]).unwrap();
    drop(adapter);

    let mut reopened = build_adapter(&config).unwrap();
    let mut model = Model::new();
    reopened.load_policy(&mut model).unwrap();
    assert!(model.has_rule("p", "p", &["alice", "data1"]));
}

#[test]
fn sqlite_path_naming_a_directory_is_rejected() {
    let temp = TempDir::new().unwrap();
    let text = format!("[store]\ntype = \"sqlite\"\npath = {:?}\n", temp.path().to_string_lossy());
    let err = PolicyAdapterConfig::from_toml_str(&text).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(message) if message.contains("store.path")));
}

#[test]
fn sqlite_path_component_limit_matches_store_limit() {
    let long = "p".repeat(MAX_PATH_COMPONENT_LENGTH + 1);
    let text = format!("[store]\ntype = \"sqlite\"\npath = \"data/{long}\"\n");
    let err = PolicyAdapterConfig::from_toml_str(&text).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(message) if message.contains("store.path")));

    let fits = "p".repeat(MAX_PATH_COMPONENT_LENGTH);
    let text = format!("[store]\ntype = \"sqlite\"\npath = \"data/{fits}\"\n");
    let config = PolicyAdapterConfig::from_toml_str(&text).unwrap();
    assert_eq!(config.store.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
}

#[test]
fn build_store_reports_open_failures() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();
    let db = blocker.join("policy.sqlite");
    let text = format!("[store]\ntype = \"sqlite\"\npath = {:?}\n", db.to_string_lossy());
    let config = PolicyAdapterConfig::from_toml_str(&text).unwrap();
    let err = build_store(&config).unwrap_err();
    assert!(matches!(err, ConfigError::Store(_)));
}

// ============================================================================
// SECTION: Path Resolution
// ============================================================================

/// Sets the config override variable for this test process.
#[allow(unsafe_code, reason = "Test mutates process env to exercise path resolution.")]
fn set_config_env(value: &str) {
    // SAFETY: Only `config_path_resolution_order` touches this variable.
    unsafe {
        env::set_var(CONFIG_ENV_VAR, value);
    }
}

/// Clears the config override variable for this test process.
#[allow(unsafe_code, reason = "Test mutates process env to exercise path resolution.")]
fn clear_config_env() {
    // SAFETY: Only `config_path_resolution_order` touches this variable.
    unsafe {
        env::remove_var(CONFIG_ENV_VAR);
    }
}

// Every env-dependent case runs in this one test so no other test observes
// the variable mid-change.
#[test]
fn config_path_resolution_order() {
    let temp = TempDir::new().unwrap();
    let from_env = temp.path().join("from-env.toml");
    fs::write(&from_env, "[store]\ncollection = \"env_rules\"\n").unwrap();
    let explicit = temp.path().join("explicit.toml");
    fs::write(&explicit, "[store]\ncollection = \"explicit_rules\"\n").unwrap();

    set_config_env(&from_env.to_string_lossy());
    let config = PolicyAdapterConfig::load(None).unwrap();
    assert_eq!(config.store.collection, "env_rules");

    let config = PolicyAdapterConfig::load(Some(&explicit)).unwrap();
    assert_eq!(config.store.collection, "explicit_rules");

    set_config_env(&"c".repeat(5_000));
    let err = PolicyAdapterConfig::load(None).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(message) if message.contains("max length")));

    clear_config_env();
    let err = PolicyAdapterConfig::load(None).unwrap_err();
    assert!(matches!(err, ConfigError::Io(message) if message.contains(DEFAULT_CONFIG_NAME)));
}
