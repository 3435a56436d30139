// crates/policy-adapter-core/src/runtime/mod.rs
// ============================================================================
// Module: Policy Adapter Runtime
// Description: Adapter facade and the in-memory document store.
// Purpose: Orchestrate policy persistence over a DocumentStore.
// Dependencies: crate::{core, interfaces}, tracing
// ============================================================================

//! ## Overview
//! Runtime modules wire the rule codec to a document store. Every engine
//! operation goes through [`PolicyAdapter`] so all backends share the same
//! encoding, truncation, and wildcard rules.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod adapter;
pub mod memory;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use adapter::PolicyAdapter;
pub use memory::InMemoryDocumentStore;
