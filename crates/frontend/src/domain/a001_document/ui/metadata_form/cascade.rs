//! Option lists and the clear-on-change cascade
//!
//! Every option request carries a token. Only the latest token issued for a
//! field may write that field's options; older responses are dropped when they
//! arrive (soft cancel, the transport request still completes).

use std::collections::HashMap;

use contracts::domain::a001_document::dependency::{cascade_order, should_disable_field};
use contracts::domain::a001_document::field_config::{dependents_of, field_config, scoped_by};
use contracts::domain::a001_document::metadata::{DocumentMetadata, FieldInput, MetadataFieldName};
use contracts::domain::a001_document::options::{MetadataOption, OptionsContext};

/// Pending options request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionFetch {
    pub field: MetadataFieldName,
    pub token: u64,
    pub context: OptionsContext,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    pub options: Vec<MetadataOption>,
    pub is_loading: bool,
}

#[derive(Debug, Default)]
pub struct CascadeController {
    fields: HashMap<MetadataFieldName, FieldOptions>,
    latest: HashMap<MetadataFieldName, u64>,
    next_token: u64,
}

impl CascadeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self, field: MetadataFieldName) -> &[MetadataOption] {
        self.fields
            .get(&field)
            .map(|f| f.options.as_slice())
            .unwrap_or_default()
    }

    pub fn is_loading(&self, field: MetadataFieldName) -> bool {
        self.fields.get(&field).is_some_and(|f| f.is_loading)
    }

    /// Write `input` into the draft, clear every transitive dependent and
    /// return the option requests for the direct dependents.
    pub fn apply_change(
        &mut self,
        draft: &mut DocumentMetadata,
        field: MetadataFieldName,
        input: FieldInput,
    ) -> Vec<OptionFetch> {
        draft.set_field(field, input);

        for dependent in cascade_order(field) {
            draft.clear_field(dependent);
            self.invalidate(dependent);
        }

        let mut fetches = Vec::new();
        for child in dependents_of(field) {
            // a parent without an identifier leaves the child disabled
            if !should_disable_field(child, draft) {
                fetches.push(self.begin_fetch(child, OptionsContext::for_field(child, draft)));
            }
        }
        for scoped in scoped_by(field) {
            fetches.push(self.begin_fetch(scoped, OptionsContext::for_field(scoped, draft)));
        }
        fetches
    }

    /// Start a request for `field`, superseding any request in flight
    pub fn begin_fetch(&mut self, field: MetadataFieldName, context: OptionsContext) -> OptionFetch {
        let token = self.issue_token(field);
        self.fields.entry(field).or_default().is_loading = true;
        OptionFetch {
            field,
            token,
            context,
        }
    }

    /// Initial requests for every option-backed field that can be used now
    pub fn initial_fetches(&mut self, metadata: &DocumentMetadata) -> Vec<OptionFetch> {
        MetadataFieldName::ALL
            .into_iter()
            .filter(|f| field_config(*f).field_type.has_options())
            .filter(|f| !should_disable_field(*f, metadata))
            .map(|f| self.begin_fetch(f, OptionsContext::for_field(f, metadata)))
            .collect()
    }

    /// Apply a finished request. Returns `false` when a newer request for the
    /// same field was issued meanwhile and the result was discarded.
    pub fn complete_fetch<E: std::fmt::Display>(
        &mut self,
        fetch: &OptionFetch,
        result: Result<Vec<MetadataOption>, E>,
    ) -> bool {
        if self.latest.get(&fetch.field) != Some(&fetch.token) {
            log::debug!(
                "discarding stale options for {} (token {})",
                fetch.field,
                fetch.token
            );
            return false;
        }

        let state = self.fields.entry(fetch.field).or_default();
        state.is_loading = false;
        state.options = match result {
            Ok(options) => options,
            Err(e) => {
                log::warn!("options lookup for {} failed: {}", fetch.field, e);
                Vec::new()
            }
        };
        true
    }

    /// Forget every option list. Requests already in flight stay superseded,
    /// so nothing issued before the reset can write afterwards.
    pub fn reset(&mut self) {
        for field in MetadataFieldName::ALL {
            self.invalidate(field);
        }
    }

    /// Drop options of a field and supersede its in-flight request
    fn invalidate(&mut self, field: MetadataFieldName) {
        self.issue_token(field);
        self.fields.insert(field, FieldOptions::default());
    }

    fn issue_token(&mut self, field: MetadataFieldName) -> u64 {
        self.next_token += 1;
        self.latest.insert(field, self.next_token);
        self.next_token
    }
}
