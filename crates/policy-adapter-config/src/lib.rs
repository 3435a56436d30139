// crates/policy-adapter-config/src/lib.rs
// ============================================================================
// Module: Policy Adapter Config Library
// Description: Config model, validation, and configured store construction.
// Purpose: Single source of truth for policy-adapter.toml semantics.
// Dependencies: policy-adapter-core, policy-adapter-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `policy-adapter-config` defines the configuration model for the policy
//! adapter, validates it fail-closed, and opens the selected document store.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use store::ConfiguredStore;
pub use store::build_adapter;
pub use store::build_store;
