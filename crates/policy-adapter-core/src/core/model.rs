// crates/policy-adapter-core/src/core/model.rs
// ============================================================================
// Module: Policy Model
// Description: Sectioned policy model seam and a BTreeMap-backed model.
// Purpose: Let the adapter append and enumerate rules without owning the engine model.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The policy engine owns its model: a mapping from section id (`p`, `g`) to
//! rule-type key to an assertion holding an ordered list of rule tuples. The
//! adapter only reaches it through [`PolicyModel`]. [`Model`] is a
//! deterministic implementation for hosts without their own model type and for
//! tests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

// ============================================================================
// SECTION: Model Seam
// ============================================================================

/// Mutable view of an engine-owned policy model.
pub trait PolicyModel {
    /// Appends a rule tuple to the assertion list for `(section, key)`.
    ///
    /// Insertion order is preserved and duplicates are permitted.
    fn append_rule(&mut self, section: &str, key: &str, rule: Vec<String>);

    /// Returns the section identifiers present in the model.
    fn sections(&self) -> Vec<String>;

    /// Returns `(ptype, rules)` pairs for every assertion in `section`.
    fn section_rules(&self, section: &str) -> Vec<(&str, &[Vec<String>])>;
}

// ============================================================================
// SECTION: Assertion
// ============================================================================

/// Ordered rule tuples stored under one rule-type key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assertion {
    /// Rule tuples in insertion order.
    pub policy: Vec<Vec<String>>,
}

// ============================================================================
// SECTION: Model
// ============================================================================

/// `BTreeMap`-backed policy model with deterministic iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    /// Section id to rule-type key to assertion.
    sections: BTreeMap<String, BTreeMap<String, Assertion>>,
}

impl Model {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule under `(section, key)`.
    pub fn add_rule<I, T>(&mut self, section: &str, key: &str, rule: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.append_rule(section, key, rule.into_iter().map(Into::into).collect());
    }

    /// Returns the rules stored under `(section, key)`.
    #[must_use]
    pub fn rules(&self, section: &str, key: &str) -> &[Vec<String>] {
        self.sections
            .get(section)
            .and_then(|keys| keys.get(key))
            .map_or(&[], |assertion| assertion.policy.as_slice())
    }

    /// Returns true when `rule` is stored under `(section, key)`.
    #[must_use]
    pub fn has_rule(&self, section: &str, key: &str, rule: &[&str]) -> bool {
        self.rules(section, key).iter().any(|stored| {
            stored.len() == rule.len() && stored.iter().zip(rule).all(|(a, b)| a == b)
        })
    }

    /// Returns the total number of rules across all sections.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.sections
            .values()
            .flat_map(BTreeMap::values)
            .map(|assertion| assertion.policy.len())
            .sum()
    }

    /// Removes every rule while keeping section and key entries.
    pub fn clear_policy(&mut self) {
        for assertion in self.sections.values_mut().flat_map(BTreeMap::values_mut) {
            assertion.policy.clear();
        }
    }
}

impl PolicyModel for Model {
    fn append_rule(&mut self, section: &str, key: &str, rule: Vec<String>) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .entry(key.to_string())
            .or_default()
            .policy
            .push(rule);
    }

    fn sections(&self) -> Vec<String> {
        self.sections.keys().cloned().collect()
    }

    fn section_rules(&self, section: &str) -> Vec<(&str, &[Vec<String>])> {
        self.sections.get(section).map_or_else(Vec::new, |keys| {
            keys.iter()
                .map(|(ptype, assertion)| (ptype.as_str(), assertion.policy.as_slice()))
                .collect()
        })
    }
}
