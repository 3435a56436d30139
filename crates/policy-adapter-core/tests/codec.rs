// crates/policy-adapter-core/tests/codec.rs
// ============================================================================
// Module: Rule Codec Tests
// Description: Validate rule encoding, decoding, and record serialization.
// Purpose: Ensure arity caps, gap truncation, and section derivation hold.
// Dependencies: policy-adapter-core, proptest, serde_json
// ============================================================================

//! ## Overview
//! Unit and property tests for the rule codec.

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

use policy_adapter_core::MAX_RULE_ARITY;
use policy_adapter_core::Model;
use policy_adapter_core::StoredRecord;
use policy_adapter_core::decode_record;
use policy_adapter_core::encode_rule;
use policy_adapter_core::load_record;
use policy_adapter_core::section_of;
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn record(ptype: &str, values: [&str; MAX_RULE_ARITY]) -> StoredRecord {
    StoredRecord::new(ptype, values.map(str::to_string))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn encode_pads_missing_fields_with_empty_strings() {
    let encoded = encode_rule("p", &["alice", "data1", "read"]);
    assert_eq!(encoded, record("p", ["alice", "data1", "read", "", "", ""]));
}

#[test]
fn encode_drops_fields_past_arity_cap() {
    let encoded = encode_rule("p", &["a", "b", "c", "d", "e", "f", "g", "h"]);
    assert_eq!(encoded, record("p", ["a", "b", "c", "d", "e", "f"]));
}

#[test]
fn encode_empty_rule_yields_empty_slots() {
    let empty: [&str; 0] = [];
    assert_eq!(encode_rule("g", &empty), record("g", ["", "", "", "", "", ""]));
}

#[test]
fn decode_derives_section_and_key() {
    let decoded = decode_record(&record("p", ["alice", "data1", "read", "", "", ""]));
    assert_eq!(decoded.section, "p");
    assert_eq!(decoded.key, "p");
    assert_eq!(decoded.fields, vec!["alice", "data1", "read"]);
}

#[test]
fn decode_uses_first_character_for_numbered_types() {
    let decoded = decode_record(&record("g2", ["alice", "admin", "", "", "", ""]));
    assert_eq!(decoded.section, "g");
    assert_eq!(decoded.key, "g2");
}

#[test]
fn decode_truncates_at_first_gap() {
    let decoded = decode_record(&record("p", ["alice", "data1", "", "write", "", ""]));
    assert_eq!(decoded.fields, vec!["alice", "data1"]);
}

#[test]
fn decode_empty_first_field_yields_empty_tuple() {
    let decoded = decode_record(&record("p", ["", "data1", "read", "", "", ""]));
    assert!(decoded.fields.is_empty());
}

#[test]
fn gap_in_rule_is_lost_after_round_trip() {
    let decoded = decode_record(&encode_rule("p", &["a", "", "c"]));
    assert_eq!(decoded.fields, vec!["a"]);
}

#[test]
fn section_of_handles_empty_and_multibyte_types() {
    assert_eq!(section_of(""), "");
    assert_eq!(section_of("p3"), "p");
    assert_eq!(section_of("ñx"), "ñ");
}

#[test]
fn load_record_appends_in_order_and_keeps_duplicates() {
    let mut model = Model::new();
    let line = record("p", ["alice", "data1", "read", "", "", ""]);
    load_record(&line, &mut model);
    load_record(&record("p", ["bob", "data2", "write", "", "", ""]), &mut model);
    load_record(&line, &mut model);
    assert_eq!(
        model.rules("p", "p"),
        &[
            vec!["alice".to_string(), "data1".to_string(), "read".to_string()],
            vec!["bob".to_string(), "data2".to_string(), "write".to_string()],
            vec!["alice".to_string(), "data1".to_string(), "read".to_string()],
        ]
    );
}

#[test]
fn record_serializes_with_named_value_fields() {
    let encoded = encode_rule("p", &["alice", "data1", "read"]);
    let value = serde_json::to_value(&encoded).unwrap();
    assert_eq!(
        value,
        json!({
            "ptype": "p",
            "v0": "alice",
            "v1": "data1",
            "v2": "read",
            "v3": "",
            "v4": "",
            "v5": "",
        })
    );
}

#[test]
fn record_deserializes_missing_value_fields_as_empty() {
    let parsed: StoredRecord =
        serde_json::from_value(json!({ "ptype": "g", "v0": "alice", "v1": "admin" })).unwrap();
    assert_eq!(parsed, record("g", ["alice", "admin", "", "", "", ""]));
}

proptest! {
    #[test]
    fn gap_free_rules_survive_round_trip(
        rule in prop::collection::vec("[a-z0-9_:/*]{1,12}", 0 ..= MAX_RULE_ARITY),
        ptype in "[pg][0-9]?",
    ) {
        let decoded = decode_record(&encode_rule(&ptype, &rule));
        prop_assert_eq!(decoded.fields, rule);
        prop_assert_eq!(decoded.key, ptype.clone());
        prop_assert_eq!(decoded.section, ptype[.. 1].to_string());
    }

    #[test]
    fn decoded_rules_never_exceed_arity_cap(
        rule in prop::collection::vec("[a-z]{0,4}", 0 .. 12),
    ) {
        let decoded = decode_record(&encode_rule("p", &rule));
        prop_assert!(decoded.fields.len() <= MAX_RULE_ARITY);
        let expected: Vec<String> = rule
            .iter()
            .take(MAX_RULE_ARITY)
            .take_while(|field| !field.is_empty())
            .cloned()
            .collect();
        prop_assert_eq!(decoded.fields, expected);
    }
}
