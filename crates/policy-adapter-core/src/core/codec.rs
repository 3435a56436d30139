// crates/policy-adapter-core/src/core/codec.rs
// ============================================================================
// Module: Rule Codec
// Description: Conversion between policy rule tuples and stored records.
// Purpose: Encode variable-arity rules into fixed slots and decode them back.
// Dependencies: crate::core::{model, record}
// ============================================================================

//! ## Overview
//! Encoding copies up to [`MAX_RULE_ARITY`] fields into `v0..v5` and pads the
//! rest with empty strings. Decoding derives the section from the first
//! character of `ptype` and stops at the first empty slot, so a rule such as
//! `[a, "", c]` comes back as `[a]`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::model::PolicyModel;
use crate::core::record::MAX_RULE_ARITY;
use crate::core::record::StoredRecord;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Rule recovered from a stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRule {
    /// Section identifier (first character of the rule type).
    pub section: String,
    /// Rule-type key.
    pub key: String,
    /// Rule fields up to the first empty slot.
    pub fields: Vec<String>,
}

// ============================================================================
// SECTION: Encode / Decode
// ============================================================================

/// Encodes a rule into a fixed-arity record.
///
/// Fields past index 5 are dropped.
#[must_use]
pub fn encode_rule<S: AsRef<str>>(ptype: &str, rule: &[S]) -> StoredRecord {
    let mut values: [String; MAX_RULE_ARITY] = Default::default();
    for (slot, field) in values.iter_mut().zip(rule) {
        field.as_ref().clone_into(slot);
    }
    StoredRecord::new(ptype, values)
}

/// Decodes a record into its section, key, and rule fields.
#[must_use]
pub fn decode_record(record: &StoredRecord) -> DecodedRule {
    let fields = record
        .values
        .iter()
        .take_while(|value| !value.is_empty())
        .cloned()
        .collect();
    DecodedRule {
        section: section_of(&record.ptype).to_string(),
        key: record.ptype.clone(),
        fields,
    }
}

/// Decodes a record and appends the rule into `model`.
pub fn load_record<M: PolicyModel + ?Sized>(record: &StoredRecord, model: &mut M) {
    let decoded = decode_record(record);
    model.append_rule(&decoded.section, &decoded.key, decoded.fields);
}

/// Returns the section id for a rule type; empty for an empty rule type.
#[must_use]
pub fn section_of(ptype: &str) -> &str {
    ptype.chars().next().map_or("", |first| &ptype[.. first.len_utf8()])
}
