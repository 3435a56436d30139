// crates/policy-adapter-core/src/lib.rs
// ============================================================================
// Module: Policy Adapter Core Library
// Description: Public API surface for the policy adapter core.
// Purpose: Expose the rule codec, store interfaces, and adapter facade.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Policy adapter core persists an access-control engine's sectioned policy
//! model in a document collection of fixed-arity `{ptype, v0..v5}` records.
//! It is backend-agnostic and reaches storage only through
//! [`DocumentStore`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::Adapter;
pub use interfaces::AdapterError;
pub use interfaces::BatchAdapter;
pub use interfaces::DeleteOutcome;
pub use interfaces::DocumentStore;
pub use interfaces::FilteredAdapter;
pub use interfaces::RecordCursor;
pub use interfaces::StoreError;
pub use runtime::InMemoryDocumentStore;
pub use runtime::PolicyAdapter;
