// crates/policy-adapter-core/src/runtime/adapter.rs
// ============================================================================
// Module: Policy Adapter Facade
// Description: Load/save/add/remove orchestration over a document store.
// Purpose: Persist a policy model through the rule codec and a DocumentStore.
// Dependencies: crate::{core, interfaces}, tracing
// ============================================================================

//! ## Overview
//! [`PolicyAdapter`] owns a [`DocumentStore`] and the `filtered` flag. Loads
//! decode records into the caller's model; saves drop the collection and
//! insert every encoded rule. Saving is not atomic: a failure after the drop
//! leaves the collection empty.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::debug;
use tracing::warn;

use crate::core::PolicyModel;
use crate::core::RecordSelector;
use crate::core::StoredRecord;
use crate::core::encode_rule;
use crate::core::load_record;
use crate::interfaces::Adapter;
use crate::interfaces::AdapterError;
use crate::interfaces::BatchAdapter;
use crate::interfaces::DeleteOutcome;
use crate::interfaces::DocumentStore;
use crate::interfaces::FilteredAdapter;

// ============================================================================
// SECTION: Adapter
// ============================================================================

/// Policy adapter backed by a document store.
#[derive(Debug)]
pub struct PolicyAdapter<S> {
    /// Backing document store.
    store: S,
    /// True when the last load was filtered.
    filtered: bool,
}

impl<S: DocumentStore> PolicyAdapter<S> {
    /// Creates an adapter over `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            filtered: false,
        }
    }

    /// Returns the backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the adapter and returns the backing store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Overrides the filtered flag.
    pub const fn set_filtered(&mut self, filtered: bool) {
        self.filtered = filtered;
    }

    /// Streams records matching `selector` into `model`.
    fn load_matching(
        &self,
        model: &mut dyn PolicyModel,
        selector: &RecordSelector,
    ) -> Result<usize, AdapterError> {
        let mut loaded = 0_usize;
        for record in self.store.find(selector)? {
            load_record(&record?, &mut *model);
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Removes one record, treating a missing record as success.
    fn remove_record(&self, record: &StoredRecord) -> Result<(), AdapterError> {
        match self.store.delete_one(record)? {
            DeleteOutcome::Deleted => {}
            DeleteOutcome::NoMatch => {
                debug!(ptype = %record.ptype, "no stored rule matched removal");
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Adapter Impl
// ============================================================================

impl<S: DocumentStore> Adapter for PolicyAdapter<S> {
    fn load_policy(&mut self, model: &mut dyn PolicyModel) -> Result<(), AdapterError> {
        self.load_filtered_policy(model, None)
    }

    fn save_policy(&mut self, model: &dyn PolicyModel) -> Result<(), AdapterError> {
        if self.filtered {
            warn!("refusing to save a filtered policy view");
            return Err(AdapterError::FilteredState);
        }
        let mut records = Vec::new();
        for section in model.sections() {
            for (ptype, rules) in model.section_rules(&section) {
                records.extend(rules.iter().map(|rule| encode_rule(ptype, rule.as_slice())));
            }
        }
        self.store.drop_collection()?;
        if !records.is_empty() {
            self.store.insert_many(&records)?;
        }
        debug!(records = records.len(), "saved policy");
        Ok(())
    }

    fn add_policy(&mut self, sec: &str, ptype: &str, rule: &[String]) -> Result<(), AdapterError> {
        self.store.insert_one(&encode_rule(ptype, rule))?;
        debug!(sec, ptype, "added policy rule");
        Ok(())
    }

    fn remove_policy(
        &mut self,
        sec: &str,
        ptype: &str,
        rule: &[String],
    ) -> Result<(), AdapterError> {
        self.remove_record(&encode_rule(ptype, rule))?;
        debug!(sec, ptype, "removed policy rule");
        Ok(())
    }

    fn remove_filtered_policy(
        &mut self,
        sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: &[String],
    ) -> Result<u64, AdapterError> {
        let selector = RecordSelector::for_field_range(ptype, field_index, field_values);
        let removed = self.store.delete_many(&selector)?;
        debug!(sec, ptype, field_index, removed, "removed filtered policy rules");
        Ok(removed)
    }
}

impl<S: DocumentStore> FilteredAdapter for PolicyAdapter<S> {
    fn load_filtered_policy(
        &mut self,
        model: &mut dyn PolicyModel,
        filter: Option<&RecordSelector>,
    ) -> Result<(), AdapterError> {
        let all = RecordSelector::all();
        let selector = match filter {
            Some(selector) if !selector.is_empty() => {
                self.filtered = true;
                selector
            }
            _ => {
                self.filtered = false;
                &all
            }
        };
        let loaded = self.load_matching(model, selector)?;
        debug!(records = loaded, filtered = self.filtered, "loaded policy");
        Ok(())
    }

    fn is_filtered(&self) -> bool {
        self.filtered
    }
}

impl<S: DocumentStore> BatchAdapter for PolicyAdapter<S> {
    fn add_policies(
        &mut self,
        sec: &str,
        ptype: &str,
        rules: &[Vec<String>],
    ) -> Result<(), AdapterError> {
        if rules.is_empty() {
            return Ok(());
        }
        let records: Vec<StoredRecord> =
            rules.iter().map(|rule| encode_rule(ptype, rule.as_slice())).collect();
        self.store.insert_many(&records)?;
        debug!(sec, ptype, records = records.len(), "added policy rules");
        Ok(())
    }

    fn remove_policies(
        &mut self,
        sec: &str,
        ptype: &str,
        rules: &[Vec<String>],
    ) -> Result<(), AdapterError> {
        for rule in rules {
            self.remove_record(&encode_rule(ptype, rule.as_slice()))?;
        }
        debug!(sec, ptype, records = rules.len(), "removed policy rules");
        Ok(())
    }
}
