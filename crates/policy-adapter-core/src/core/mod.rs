// crates/policy-adapter-core/src/core/mod.rs
// ============================================================================
// Module: Policy Adapter Core Types
// Description: Stored records, rule codec, selectors, and the model seam.
// Purpose: Provide the pure mapping between policy rules and stored records.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types have no storage dependency. The codec and selector builder are
//! pure functions over [`StoredRecord`] and can be tested without a store.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod codec;
pub mod model;
pub mod record;
pub mod selector;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use codec::DecodedRule;
pub use codec::decode_record;
pub use codec::encode_rule;
pub use codec::load_record;
pub use codec::section_of;
pub use model::Assertion;
pub use model::Model;
pub use model::PolicyModel;
pub use record::FIELD_NAMES;
pub use record::MAX_RULE_ARITY;
pub use record::PTYPE_FIELD;
pub use record::StoredRecord;
pub use selector::RecordSelector;
