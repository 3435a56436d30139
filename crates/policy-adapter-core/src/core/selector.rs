// crates/policy-adapter-core/src/core/selector.rs
// ============================================================================
// Module: Record Selectors
// Description: Partial-match predicates over stored records.
// Purpose: Build filters for filtered loads and filtered rule removal.
// Dependencies: crate::core::record
// ============================================================================

//! ## Overview
//! A [`RecordSelector`] constrains `ptype` and any subset of `v0..v5` to exact
//! values. Unset fields match anything. The builder treats an empty value as a
//! wildcard, which is how filtered removal expresses "any value here".
//! [`RecordSelector::exact`] is the exception: it constrains every slot, empty
//! ones included, for full-equality deletes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::record::MAX_RULE_ARITY;
use crate::core::record::StoredRecord;

// ============================================================================
// SECTION: Selector
// ============================================================================

/// Structural predicate over `{ptype, v0..v5}`.
///
/// # Invariants
/// - A `None` slot matches any stored value.
/// - A `Some` slot matches only an identical stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSelector {
    /// Required rule type, if constrained.
    pub ptype: Option<String>,
    /// Required positional values, if constrained.
    pub fields: [Option<String>; MAX_RULE_ARITY],
}

impl RecordSelector {
    /// Returns a selector matching every record.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Returns a selector matching records equal to `record` in every field.
    #[must_use]
    pub fn exact(record: &StoredRecord) -> Self {
        Self {
            ptype: Some(record.ptype.clone()),
            fields: record.values.clone().map(Some),
        }
    }

    /// Builds the removal selector for a contiguous run of field values.
    ///
    /// `ptype` is always constrained. Position `p` is constrained to
    /// `field_values[p - field_index]` when it falls inside the run and the
    /// supplied value is non-empty.
    #[must_use]
    pub fn for_field_range<S: AsRef<str>>(
        ptype: &str,
        field_index: usize,
        field_values: &[S],
    ) -> Self {
        let mut selector = Self::all().with_ptype(ptype);
        for (offset, value) in field_values.iter().enumerate() {
            let Some(position) = field_index.checked_add(offset) else {
                break;
            };
            selector = selector.with_field(position, value.as_ref());
        }
        selector
    }

    /// Constrains the rule type.
    #[must_use]
    pub fn with_ptype(mut self, ptype: impl Into<String>) -> Self {
        self.ptype = Some(ptype.into());
        self
    }

    /// Constrains field `index` to `value`.
    ///
    /// Empty values and indexes past the arity cap leave the selector
    /// unchanged.
    #[must_use]
    pub fn with_field(mut self, index: usize, value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            return self;
        }
        if let Some(slot) = self.fields.get_mut(index) {
            *slot = Some(value);
        }
        self
    }

    /// Returns true when the selector has no predicates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ptype.is_none() && self.fields.iter().all(Option::is_none)
    }

    /// Returns the constrained positional fields as `(index, value)` pairs.
    pub fn field_predicates(&self) -> impl Iterator<Item = (usize, &str)> {
        self.fields
            .iter()
            .enumerate()
            .filter_map(|(index, value)| value.as_deref().map(|value| (index, value)))
    }

    /// Returns true when `record` satisfies every predicate.
    #[must_use]
    pub fn matches(&self, record: &StoredRecord) -> bool {
        if let Some(ptype) = &self.ptype
            && *ptype != record.ptype
        {
            return false;
        }
        self.field_predicates().all(|(index, value)| record.values[index] == value)
    }
}
