// crates/policy-adapter-core/src/core/record.rs
// ============================================================================
// Module: Stored Records
// Description: Fixed-arity storage document for a single policy rule.
// Purpose: Provide the `{ptype, v0..v5}` record shape shared by all stores.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`StoredRecord`] is the flat, fixed-shape document persisted for each
//! policy rule. Values are held in a `[String; 6]` array and serialized with
//! the `ptype`, `v0`..`v5` field names used by existing collections.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of rule fields a record can hold.
pub const MAX_RULE_ARITY: usize = 6;

/// Storage field names for the value slots, in positional order.
pub const FIELD_NAMES: [&str; MAX_RULE_ARITY] = ["v0", "v1", "v2", "v3", "v4", "v5"];

/// Storage field name for the rule type.
pub const PTYPE_FIELD: &str = "ptype";

// ============================================================================
// SECTION: Record
// ============================================================================

/// Fixed-shape storage record for one policy rule.
///
/// # Invariants
/// - Unused value slots hold the empty string.
/// - Records carry no identity beyond their content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "RecordDocument", into = "RecordDocument")]
pub struct StoredRecord {
    /// Rule-type identifier (`p`, `p2`, `g`, ...).
    pub ptype: String,
    /// Positional rule values `v0..v5`.
    pub values: [String; MAX_RULE_ARITY],
}

impl StoredRecord {
    /// Creates a record from a rule type and the full value array.
    #[must_use]
    pub fn new(ptype: impl Into<String>, values: [String; MAX_RULE_ARITY]) -> Self {
        Self {
            ptype: ptype.into(),
            values,
        }
    }
}

// ============================================================================
// SECTION: Wire Document
// ============================================================================

/// Serialized document shape with explicit `v0..v5` fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RecordDocument {
    /// Rule-type identifier.
    ptype: String,
    /// Value slot 0.
    #[serde(default)]
    v0: String,
    /// Value slot 1.
    #[serde(default)]
    v1: String,
    /// Value slot 2.
    #[serde(default)]
    v2: String,
    /// Value slot 3.
    #[serde(default)]
    v3: String,
    /// Value slot 4.
    #[serde(default)]
    v4: String,
    /// Value slot 5.
    #[serde(default)]
    v5: String,
}

impl From<RecordDocument> for StoredRecord {
    fn from(doc: RecordDocument) -> Self {
        Self {
            ptype: doc.ptype,
            values: [doc.v0, doc.v1, doc.v2, doc.v3, doc.v4, doc.v5],
        }
    }
}

impl From<StoredRecord> for RecordDocument {
    fn from(record: StoredRecord) -> Self {
        let [v0, v1, v2, v3, v4, v5] = record.values;
        Self {
            ptype: record.ptype,
            v0,
            v1,
            v2,
            v3,
            v4,
            v5,
        }
    }
}
