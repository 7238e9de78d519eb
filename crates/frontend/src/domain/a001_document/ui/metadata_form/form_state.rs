//! Stateful controller behind the metadata form
//!
//! Owns the draft metadata of the open document. The view forwards events to
//! it and spawns the futures it hands back (option fetches, debounced
//! autosave); the controller never spawns on its own.

use futures::future::{FutureExt, LocalBoxFuture};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Duration;

use contracts::domain::a001_document::aggregate::{DocumentId, DocumentSnapshot};
use contracts::domain::a001_document::dependency::is_field_disabled;
use contracts::domain::a001_document::mapping::map_metadata_to_api_request;
use contracts::domain::a001_document::metadata::{DocumentMetadata, FieldInput, MetadataFieldName};
use contracts::domain::a001_document::options::{MetadataOption, OptionsContext};
use contracts::domain::a001_document::validation::{
    validate_metadata_field, validate_metadata_form, ValidationErrors,
};

use super::cascade::{CascadeController, OptionFetch};
use super::collaborators::{MetadataOptionsSource, MetadataSaver};
use crate::shared::debounce::{browser_sleeper, Debouncer, Sleeper};

/// Quiet period before an autosave
pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(800);

/// Observable state of the form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataFormState {
    pub values: DocumentMetadata,
    pub errors: ValidationErrors,
    pub touched: BTreeSet<MetadataFieldName>,
    pub is_valid: bool,
    pub is_dirty: bool,
    pub is_submitting: bool,
    pub is_saving: bool,
    pub submit_error: Option<String>,
    pub save_error: Option<String>,
    pub is_read_only: bool,
    /// Set by a submit attempt; shows errors of untouched fields too
    pub submit_attempted: bool,
}

impl MetadataFormState {
    fn from_snapshot(snapshot: &DocumentSnapshot) -> Self {
        let values = snapshot.form_metadata();
        let errors = validate_metadata_form(&values);
        Self {
            is_valid: errors.is_empty(),
            errors,
            values,
            is_read_only: snapshot.is_read_only(),
            ..Self::default()
        }
    }

    fn revalidate(&mut self) {
        self.errors = validate_metadata_form(&self.values);
        self.is_valid = self.errors.is_empty();
    }
}

/// Result of a debounced autosave
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutosaveOutcome {
    /// A later edit or teardown re-armed or cancelled the timer
    Superseded,
    /// Nothing to save, the form is invalid, or the document is read-only
    Skipped,
    Saved,
    Failed(String),
}

/// Work the view must run after a field change
pub struct ChangeEffects {
    pub fetches: Vec<OptionFetch>,
    pub autosave: Option<LocalBoxFuture<'static, AutosaveOutcome>>,
}

impl ChangeEffects {
    fn none() -> Self {
        Self {
            fetches: Vec::new(),
            autosave: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fetches.is_empty() && self.autosave.is_none()
    }
}

struct Inner {
    document_id: DocumentId,
    state: MetadataFormState,
    cascade: CascadeController,
}

type Listener = Rc<dyn Fn(&MetadataFormState)>;

/// Cheaply clonable handle; all clones share one form
#[derive(Clone)]
pub struct MetadataFormController {
    inner: Rc<RefCell<Inner>>,
    options_source: Rc<dyn MetadataOptionsSource>,
    saver: Rc<dyn MetadataSaver>,
    autosave: Debouncer,
    listener: Rc<RefCell<Option<Listener>>>,
}

impl MetadataFormController {
    pub fn new(
        snapshot: &DocumentSnapshot,
        options_source: Rc<dyn MetadataOptionsSource>,
        saver: Rc<dyn MetadataSaver>,
    ) -> Self {
        Self::with_sleeper(snapshot, options_source, saver, browser_sleeper())
    }

    pub fn with_sleeper(
        snapshot: &DocumentSnapshot,
        options_source: Rc<dyn MetadataOptionsSource>,
        saver: Rc<dyn MetadataSaver>,
        sleeper: Sleeper,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                document_id: snapshot.id,
                state: MetadataFormState::from_snapshot(snapshot),
                cascade: CascadeController::new(),
            })),
            options_source,
            saver,
            autosave: Debouncer::new(AUTOSAVE_DELAY, sleeper),
            listener: Rc::new(RefCell::new(None)),
        }
    }

    /// Register the single state listener (the view's signal setter)
    pub fn subscribe(&self, listener: impl Fn(&MetadataFormState) + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    fn notify(&self) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            let state = self.state();
            listener(&state);
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn state(&self) -> MetadataFormState {
        self.inner.borrow().state.clone()
    }

    pub fn document_id(&self) -> DocumentId {
        self.inner.borrow().document_id
    }

    pub fn values(&self) -> DocumentMetadata {
        self.inner.borrow().state.values.clone()
    }

    pub fn is_field_disabled(&self, field: MetadataFieldName) -> bool {
        let inner = self.inner.borrow();
        is_field_disabled(field, &inner.state.values, inner.state.is_read_only)
    }

    /// Error to display: hidden until the field was touched or a submit was attempted
    pub fn visible_error(&self, field: MetadataFieldName) -> Option<String> {
        let inner = self.inner.borrow();
        let state = &inner.state;
        if !(state.touched.contains(&field) || state.submit_attempted) {
            return None;
        }
        state.errors.get(&field).map(ToString::to_string)
    }

    pub fn options(&self, field: MetadataFieldName) -> Vec<MetadataOption> {
        self.inner.borrow().cascade.options(field).to_vec()
    }

    pub fn is_loading(&self, field: MetadataFieldName) -> bool {
        self.inner.borrow().cascade.is_loading(field)
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Value change from the UI. No-op on read-only documents.
    pub fn handle_field_change(&self, field: MetadataFieldName, input: FieldInput) -> ChangeEffects {
        let fetches = {
            let mut inner = self.inner.borrow_mut();
            if inner.state.is_read_only {
                log::debug!("ignoring change of {} on read-only document", field);
                return ChangeEffects::none();
            }
            let Inner { state, cascade, .. } = &mut *inner;
            let fetches = cascade.apply_change(&mut state.values, field, input);
            state.revalidate();
            state.is_dirty = true;
            fetches
        };

        let debounced = self.autosave.schedule();
        let controller = self.clone();
        let autosave = async move {
            if !debounced.await {
                return AutosaveOutcome::Superseded;
            }
            controller.autosave().await
        }
        .boxed_local();

        self.notify();
        ChangeEffects {
            fetches,
            autosave: Some(autosave),
        }
    }

    pub fn handle_field_blur(&self, field: MetadataFieldName) {
        {
            let mut inner = self.inner.borrow_mut();
            let state = &mut inner.state;
            state.touched.insert(field);
            let value = state.values.display_value(field);
            match validate_metadata_field(field, value, &state.values) {
                Some(err) => {
                    state.errors.insert(field, err);
                }
                None => {
                    state.errors.remove(&field);
                }
            }
            state.is_valid = state.errors.is_empty();
        }
        self.notify();
    }

    /// Autocomplete left with typed text that picked no option. Text that
    /// differs from the stored value is committed as free text, which drops
    /// the identifier and lets the field's validator report it.
    pub fn commit_typed_text(&self, field: MetadataFieldName, text: &str) -> ChangeEffects {
        let unchanged = {
            let inner = self.inner.borrow();
            let stored = inner.state.values.display_value(field).unwrap_or_default();
            stored.trim() == text.trim()
        };
        if unchanged {
            return ChangeEffects::none();
        }
        let input = if text.trim().is_empty() {
            FieldInput::Clear
        } else {
            FieldInput::Text(text.to_string())
        };
        self.handle_field_change(field, input)
    }

    /// Autocomplete typing: refetch options of `field` filtered by `query`
    pub fn search_options(&self, field: MetadataFieldName, query: &str) -> Option<OptionFetch> {
        let mut inner = self.inner.borrow_mut();
        if is_field_disabled(field, &inner.state.values, inner.state.is_read_only) {
            return None;
        }
        let mut context = OptionsContext::for_field(field, &inner.state.values);
        context.query = Some(query.to_string()).filter(|q| !q.is_empty());
        Some(inner.cascade.begin_fetch(field, context))
    }

    /// Requests to run when the form opens
    pub fn initial_fetches(&self) -> Vec<OptionFetch> {
        let mut inner = self.inner.borrow_mut();
        let Inner { state, cascade, .. } = &mut *inner;
        cascade.initial_fetches(&state.values)
    }

    /// Run one options request and apply its result if still current
    pub async fn run_fetch(&self, fetch: OptionFetch) -> bool {
        let result = self
            .options_source
            .get_metadata_options(fetch.field, &fetch.context)
            .await;
        let applied = self.inner.borrow_mut().cascade.complete_fetch(&fetch, result);
        if applied {
            self.notify();
        }
        applied
    }

    /// Explicit save. Returns `true` when the document was saved.
    pub async fn handle_submit(&self) -> bool {
        let (document_id, sent) = {
            let mut inner = self.inner.borrow_mut();
            let state = &mut inner.state;
            state.revalidate();
            if !state.is_valid {
                state.submit_attempted = true;
                state.touched.extend(state.errors.keys().copied());
                drop(inner);
                self.notify();
                return false;
            }
            state.is_submitting = true;
            (inner.document_id, inner.state.values.clone())
        };
        // the explicit save covers any pending autosave
        self.autosave.cancel();
        self.notify();

        let result = self
            .saver
            .update_metadata(document_id, &map_metadata_to_api_request(&sent))
            .await;

        let saved = {
            let mut inner = self.inner.borrow_mut();
            let state = &mut inner.state;
            state.is_submitting = false;
            match result {
                Ok(snapshot) => {
                    state.submit_error = None;
                    state.save_error = None;
                    // keep edits typed while the request was in flight
                    if state.values == sent {
                        state.values = snapshot.form_metadata();
                        state.is_dirty = false;
                    }
                    state.is_read_only = snapshot.is_read_only();
                    state.revalidate();
                    true
                }
                Err(e) => {
                    log::warn!("metadata save for document {} failed: {}", document_id, e);
                    state.submit_error = Some(e.to_string());
                    false
                }
            }
        };
        self.notify();
        saved
    }

    /// Debounced background save; failures go to `save_error` only
    pub async fn autosave(&self) -> AutosaveOutcome {
        let (document_id, sent) = {
            let mut inner = self.inner.borrow_mut();
            let state = &mut inner.state;
            if state.is_read_only || !state.is_dirty || !state.is_valid || state.is_submitting {
                return AutosaveOutcome::Skipped;
            }
            state.is_saving = true;
            (inner.document_id, inner.state.values.clone())
        };
        self.notify();

        let result = self
            .saver
            .update_metadata(document_id, &map_metadata_to_api_request(&sent))
            .await;

        let outcome = {
            let mut inner = self.inner.borrow_mut();
            let state = &mut inner.state;
            state.is_saving = false;
            match result {
                Ok(snapshot) => {
                    state.save_error = None;
                    if state.values == sent {
                        state.is_dirty = false;
                    }
                    state.is_read_only = snapshot.is_read_only();
                    AutosaveOutcome::Saved
                }
                Err(e) => {
                    log::warn!("autosave for document {} failed: {}", document_id, e);
                    let message = e.to_string();
                    state.save_error = Some(message.clone());
                    AutosaveOutcome::Failed(message)
                }
            }
        };
        self.notify();
        outcome
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    pub fn set_read_only(&self, read_only: bool) {
        self.inner.borrow_mut().state.is_read_only = read_only;
        if read_only {
            self.autosave.cancel();
        }
        self.notify();
    }

    /// Replace everything with a freshly loaded document. Returns the option
    /// requests of the new form; answers to older requests are dropped.
    pub fn reset_from_document(&self, snapshot: &DocumentSnapshot) -> Vec<OptionFetch> {
        self.autosave.cancel();
        let fetches = {
            let mut inner = self.inner.borrow_mut();
            inner.document_id = snapshot.id;
            inner.state = MetadataFormState::from_snapshot(snapshot);
            let Inner { state, cascade, .. } = &mut *inner;
            cascade.reset();
            cascade.initial_fetches(&state.values)
        };
        self.notify();
        fetches
    }

    /// Follow a newer snapshot of the open document. The same document only
    /// takes the read-only flag, keeping the draft; another one resets the form.
    pub fn sync_with_document(&self, snapshot: &DocumentSnapshot) -> Vec<OptionFetch> {
        if snapshot.id != self.document_id() {
            return self.reset_from_document(snapshot);
        }
        if snapshot.is_read_only() != self.inner.borrow().state.is_read_only {
            self.set_read_only(snapshot.is_read_only());
        }
        Vec::new()
    }

    /// View closed: a pending autosave must not fire afterwards
    pub fn teardown(&self) {
        self.autosave.cancel();
        self.listener.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::api_utils::ApiError;
    use crate::shared::debounce::immediate_sleeper;
    use async_trait::async_trait;
    use contracts::domain::a001_document::aggregate::{DocumentMetadataResponse, UpdateMetadataRequest};
    use contracts::domain::a001_document::mapping::map_metadata_to_api_response;
    use contracts::domain::a001_document::validation::FieldError;
    use futures::executor::block_on;
    use std::cell::Cell;

    #[derive(Default)]
    struct RecordingOptions {
        calls: RefCell<Vec<(MetadataFieldName, OptionsContext)>>,
        fail: Cell<bool>,
    }

    #[async_trait(?Send)]
    impl MetadataOptionsSource for RecordingOptions {
        async fn get_metadata_options(
            &self,
            field: MetadataFieldName,
            context: &OptionsContext,
        ) -> Result<Vec<MetadataOption>, ApiError> {
            self.calls.borrow_mut().push((field, context.clone()));
            if self.fail.get() {
                return Err(ApiError::Network("offline".into()));
            }
            Ok(vec![MetadataOption::new(1, format!("1 - {}", field))])
        }
    }

    #[derive(Default)]
    struct RecordingSaver {
        calls: RefCell<Vec<UpdateMetadataRequest>>,
        fail: Cell<bool>,
        processed_after_save: Cell<bool>,
    }

    #[async_trait(?Send)]
    impl MetadataSaver for RecordingSaver {
        async fn update_metadata(
            &self,
            document_id: DocumentId,
            payload: &UpdateMetadataRequest,
        ) -> Result<DocumentSnapshot, ApiError> {
            self.calls.borrow_mut().push(payload.clone());
            if self.fail.get() {
                return Err(ApiError::Status {
                    status: 422,
                    message: "Loss does not belong to policy".into(),
                });
            }
            let mut snap = snapshot(DocumentMetadataResponse {
                policy_id: payload.policy_id,
                policy_number: payload.policy_id.map(|id| format!("PLCY-{}", id)),
                loss_id: payload.loss_id,
                loss_sequence: payload.loss_id.map(|id| format!("{} - Server", id)),
                claimant_id: payload.claimant_id,
                document_description: payload.document_description.clone(),
                ..Default::default()
            });
            snap.id = document_id;
            snap.is_processed = self.processed_after_save.get();
            Ok(snap)
        }
    }

    fn snapshot(metadata: DocumentMetadataResponse) -> DocumentSnapshot {
        let now = chrono::Utc::now();
        DocumentSnapshot {
            id: DocumentId(42),
            file_name: "estimate.pdf".into(),
            file_url: "/files/estimate.pdf".into(),
            mime_type: "application/pdf".into(),
            page_count: Some(2),
            is_processed: false,
            processed_at: None,
            processed_by: None,
            is_deleted: false,
            created_at: now,
            updated_at: now,
            version: 1,
            metadata,
        }
    }

    fn valid_metadata() -> DocumentMetadata {
        DocumentMetadata {
            policy_number: Some("PLCY-1".into()),
            policy_id: Some(1),
            loss_sequence: Some("1 - Fire".into()),
            loss_id: Some(10),
            claimant: Some("1 - Jane Roe".into()),
            claimant_id: Some(100),
            document_description: Some("Estimate".into()),
            ..Default::default()
        }
    }

    struct Fixture {
        controller: MetadataFormController,
        options: Rc<RecordingOptions>,
        saver: Rc<RecordingSaver>,
    }

    fn fixture(metadata: DocumentMetadata) -> Fixture {
        let options = Rc::new(RecordingOptions::default());
        let saver = Rc::new(RecordingSaver::default());
        let controller = MetadataFormController::with_sleeper(
            &snapshot(map_metadata_to_api_response(&metadata)),
            options.clone(),
            saver.clone(),
            immediate_sleeper(),
        );
        Fixture {
            controller,
            options,
            saver,
        }
    }

    fn run_effects(controller: &MetadataFormController, effects: ChangeEffects) -> Option<AutosaveOutcome> {
        for fetch in effects.fetches {
            block_on(controller.run_fetch(fetch));
        }
        effects.autosave.map(block_on)
    }

    #[test]
    fn test_policy_change_cascades_and_fetches_losses_once() {
        let f = fixture(valid_metadata());
        let effects = f.controller.handle_field_change(
            MetadataFieldName::PolicyNumber,
            FieldInput::Selection {
                id: 2,
                label: "PLCY-2".into(),
            },
        );
        let values = f.controller.values();
        assert_eq!(values.loss_sequence, None);
        assert_eq!(values.loss_id, None);
        assert_eq!(values.claimant, None);
        assert_eq!(values.claimant_id, None);
        assert!(f.controller.is_loading(MetadataFieldName::LossSequence));

        run_effects(&f.controller, effects);

        let calls = f.options.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, MetadataFieldName::LossSequence);
        assert_eq!(calls[0].1.policy_id, Some(2));
        assert_eq!(f.controller.options(MetadataFieldName::LossSequence).len(), 1);
        assert!(!f.controller.is_loading(MetadataFieldName::LossSequence));
        assert!(f.controller.is_field_disabled(MetadataFieldName::Claimant));
    }

    #[test]
    fn test_change_revalidates_whole_form() {
        let f = fixture(valid_metadata());
        assert!(f.controller.state().is_valid);
        f.controller
            .handle_field_change(MetadataFieldName::DocumentDescription, FieldInput::Text(String::new()));
        let state = f.controller.state();
        assert!(state.is_dirty);
        assert!(!state.is_valid);
        assert_eq!(
            state.errors.get(&MetadataFieldName::DocumentDescription),
            Some(&FieldError::Required)
        );
        // errors stay hidden until blur
        assert_eq!(f.controller.visible_error(MetadataFieldName::DocumentDescription), None);
        f.controller.handle_field_blur(MetadataFieldName::DocumentDescription);
        assert_eq!(
            f.controller.visible_error(MetadataFieldName::DocumentDescription).as_deref(),
            Some("This field is required")
        );
    }

    #[test]
    fn test_read_only_change_is_no_op() {
        let f = fixture(valid_metadata());
        f.controller.set_read_only(true);
        let before = f.controller.values();
        let effects = f.controller.handle_field_change(
            MetadataFieldName::PolicyNumber,
            FieldInput::Selection {
                id: 9,
                label: "PLCY-9".into(),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(f.controller.values(), before);
        assert!(!f.controller.state().is_dirty);
        assert!(f.saver.calls.borrow().is_empty());
        for field in MetadataFieldName::ALL {
            assert!(f.controller.is_field_disabled(field));
        }
    }

    #[test]
    fn test_processed_snapshot_opens_read_only() {
        let options = Rc::new(RecordingOptions::default());
        let saver = Rc::new(RecordingSaver::default());
        let mut snap = snapshot(map_metadata_to_api_response(&valid_metadata()));
        snap.is_processed = true;
        let controller =
            MetadataFormController::with_sleeper(&snap, options, saver.clone(), immediate_sleeper());
        assert!(controller.state().is_read_only);
        assert!(controller
            .handle_field_change(MetadataFieldName::DocumentDescription, FieldInput::Text("x".into()))
            .is_empty());
        assert!(saver.calls.borrow().is_empty());
    }

    #[test]
    fn test_submit_with_errors_does_not_call_saver() {
        let f = fixture(DocumentMetadata::default());
        assert!(!block_on(f.controller.handle_submit()));
        assert!(f.saver.calls.borrow().is_empty());
        let state = f.controller.state();
        assert!(state.submit_attempted);
        assert!(state.touched.contains(&MetadataFieldName::PolicyNumber));
        assert!(f.controller.visible_error(MetadataFieldName::PolicyNumber).is_some());
    }

    #[test]
    fn test_submit_success_clears_dirty_and_reloads_values() {
        let f = fixture(valid_metadata());
        f.controller.handle_field_change(
            MetadataFieldName::DocumentDescription,
            FieldInput::Text("Revised estimate".into()),
        );
        assert!(block_on(f.controller.handle_submit()));

        let calls = f.saver.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].document_description.as_deref(), Some("Revised estimate"));
        assert_eq!(calls[0].policy_id, Some(1));

        let state = f.controller.state();
        assert!(!state.is_dirty);
        assert!(!state.is_submitting);
        assert_eq!(state.submit_error, None);
        // display values come from the server response
        assert_eq!(state.values.loss_sequence.as_deref(), Some("10 - Server"));
    }

    #[test]
    fn test_submit_failure_sets_submit_error_and_keeps_field_errors() {
        let f = fixture(valid_metadata());
        f.controller.handle_field_change(
            MetadataFieldName::DocumentDescription,
            FieldInput::Text("Revised".into()),
        );
        f.saver.fail.set(true);
        assert!(!block_on(f.controller.handle_submit()));
        let state = f.controller.state();
        assert_eq!(
            state.submit_error.as_deref(),
            Some("HTTP 422: Loss does not belong to policy")
        );
        assert!(state.is_dirty);
        assert!(!state.is_submitting);
    }

    #[test]
    fn test_rapid_changes_coalesce_into_one_autosave() {
        let f = fixture(valid_metadata());
        let first = f
            .controller
            .handle_field_change(MetadataFieldName::DocumentDescription, FieldInput::Text("R".into()));
        let second = f
            .controller
            .handle_field_change(MetadataFieldName::DocumentDescription, FieldInput::Text("Re".into()));
        let third = f
            .controller
            .handle_field_change(MetadataFieldName::DocumentDescription, FieldInput::Text("Rev".into()));

        assert_eq!(run_effects(&f.controller, first), Some(AutosaveOutcome::Superseded));
        assert_eq!(run_effects(&f.controller, second), Some(AutosaveOutcome::Superseded));
        assert_eq!(run_effects(&f.controller, third), Some(AutosaveOutcome::Saved));

        let calls = f.saver.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].document_description.as_deref(), Some("Rev"));
        assert!(!f.controller.state().is_dirty);
    }

    #[test]
    fn test_autosave_skipped_while_invalid() {
        let f = fixture(valid_metadata());
        let effects = f
            .controller
            .handle_field_change(MetadataFieldName::DocumentDescription, FieldInput::Clear);
        assert_eq!(run_effects(&f.controller, effects), Some(AutosaveOutcome::Skipped));
        assert!(f.saver.calls.borrow().is_empty());
    }

    #[test]
    fn test_autosave_failure_reported_without_blocking_edits() {
        let f = fixture(valid_metadata());
        f.saver.fail.set(true);
        let effects = f
            .controller
            .handle_field_change(MetadataFieldName::DocumentDescription, FieldInput::Text("New".into()));
        assert!(matches!(
            run_effects(&f.controller, effects),
            Some(AutosaveOutcome::Failed(_))
        ));
        let state = f.controller.state();
        assert!(state.save_error.is_some());
        assert_eq!(state.submit_error, None);
        assert!(state.is_dirty);

        // further edits still apply
        f.controller
            .handle_field_change(MetadataFieldName::DocumentDescription, FieldInput::Text("Newer".into()));
        assert_eq!(
            f.controller.values().document_description.as_deref(),
            Some("Newer")
        );
    }

    #[test]
    fn test_teardown_cancels_pending_autosave() {
        let f = fixture(valid_metadata());
        let effects = f
            .controller
            .handle_field_change(MetadataFieldName::DocumentDescription, FieldInput::Text("Late".into()));
        f.controller.teardown();
        assert_eq!(run_effects(&f.controller, effects), Some(AutosaveOutcome::Superseded));
        assert!(f.saver.calls.borrow().is_empty());
    }

    #[test]
    fn test_failed_options_lookup_is_silent() {
        let f = fixture(valid_metadata());
        f.options.fail.set(true);
        let effects = f.controller.handle_field_change(
            MetadataFieldName::PolicyNumber,
            FieldInput::Selection {
                id: 3,
                label: "PLCY-3".into(),
            },
        );
        run_effects(&f.controller, effects);
        assert!(f.controller.options(MetadataFieldName::LossSequence).is_empty());
        assert!(!f.controller.is_loading(MetadataFieldName::LossSequence));
        let state = f.controller.state();
        assert_eq!(state.submit_error, None);
        assert!(state.is_valid);
    }

    #[test]
    fn test_search_options_passes_query() {
        let f = fixture(DocumentMetadata::default());
        let fetch = f
            .controller
            .search_options(MetadataFieldName::PolicyNumber, "PLCY-12")
            .expect("policy is enabled");
        block_on(f.controller.run_fetch(fetch));
        let calls = f.options.calls.borrow();
        assert_eq!(calls[0].1.query.as_deref(), Some("PLCY-12"));
        assert!(f
            .controller
            .search_options(MetadataFieldName::Claimant, "x")
            .is_none());
    }

    #[test]
    fn test_listener_sees_every_mutation() {
        let f = fixture(valid_metadata());
        let seen = Rc::new(Cell::new(0));
        let seen_in = Rc::clone(&seen);
        f.controller.subscribe(move |_| seen_in.set(seen_in.get() + 1));
        f.controller.handle_field_blur(MetadataFieldName::PolicyNumber);
        f.controller
            .handle_field_change(MetadataFieldName::DocumentDescription, FieldInput::Text("A".into()));
        assert_eq!(seen.get(), 2);
        f.controller.teardown();
        f.controller.handle_field_blur(MetadataFieldName::PolicyNumber);
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_reset_from_document_replaces_state() {
        let f = fixture(valid_metadata());
        f.controller
            .handle_field_change(MetadataFieldName::DocumentDescription, FieldInput::Text("Draft".into()));
        let mut reloaded = snapshot(DocumentMetadataResponse::default());
        reloaded.is_processed = true;
        f.controller.reset_from_document(&reloaded);
        let state = f.controller.state();
        assert_eq!(state.values, DocumentMetadata::default());
        assert!(!state.is_dirty);
        assert!(state.is_read_only);
    }

    #[test]
    fn test_options_requested_for_previous_document_are_dropped() {
        let f = fixture(valid_metadata());
        let stale = f
            .controller
            .search_options(MetadataFieldName::PolicyNumber, "PLCY")
            .expect("policy is enabled");

        let mut other = snapshot(DocumentMetadataResponse::default());
        other.id = DocumentId(7);
        let fetches = f.controller.sync_with_document(&other);
        assert_eq!(f.controller.document_id(), DocumentId(7));
        assert!(fetches.iter().any(|fetch| fetch.field == MetadataFieldName::PolicyNumber));

        assert!(!block_on(f.controller.run_fetch(stale)));
        assert!(f.controller.options(MetadataFieldName::PolicyNumber).is_empty());
        for fetch in fetches {
            assert!(block_on(f.controller.run_fetch(fetch)));
        }
        assert_eq!(f.controller.options(MetadataFieldName::PolicyNumber).len(), 1);
    }

    #[test]
    fn test_same_document_snapshot_only_updates_read_only() {
        let f = fixture(valid_metadata());
        let effects = f
            .controller
            .handle_field_change(MetadataFieldName::DocumentDescription, FieldInput::Text("Draft".into()));

        let mut processed = snapshot(map_metadata_to_api_response(&valid_metadata()));
        processed.is_processed = true;
        assert!(f.controller.sync_with_document(&processed).is_empty());

        let state = f.controller.state();
        assert!(state.is_read_only);
        assert_eq!(state.values.document_description.as_deref(), Some("Draft"));
        // locking cancels the pending autosave
        assert_eq!(run_effects(&f.controller, effects), Some(AutosaveOutcome::Superseded));
        assert!(f.saver.calls.borrow().is_empty());
    }

    #[test]
    fn test_unmatched_policy_text_invalidates_form() {
        let f = fixture(valid_metadata());
        let effects = f
            .controller
            .commit_typed_text(MetadataFieldName::PolicyNumber, "PLCY-");
        let state = f.controller.state();
        assert_eq!(state.values.policy_number.as_deref(), Some("PLCY-"));
        assert_eq!(state.values.policy_id, None);
        assert_eq!(state.values.loss_id, None);
        assert_eq!(
            state.errors.get(&MetadataFieldName::PolicyNumber),
            Some(&FieldError::InvalidPolicyNumber)
        );
        assert!(!state.is_valid);
        assert!(effects.fetches.is_empty());
        assert_eq!(run_effects(&f.controller, effects), Some(AutosaveOutcome::Skipped));
        assert!(!block_on(f.controller.handle_submit()));
        assert!(f.saver.calls.borrow().is_empty());

        // leaving the field again with the same text changes nothing
        assert!(f
            .controller
            .commit_typed_text(MetadataFieldName::PolicyNumber, "PLCY-")
            .is_empty());
    }

    #[test]
    fn test_unmatched_producer_text_drops_identifier() {
        let mut metadata = valid_metadata();
        metadata.producer_number = Some("AG-789456".into());
        metadata.producer_id = Some(5);
        let f = fixture(metadata);
        f.controller
            .commit_typed_text(MetadataFieldName::ProducerNumber, "789456");
        let state = f.controller.state();
        assert_eq!(state.values.producer_id, None);
        assert_eq!(
            state.errors.get(&MetadataFieldName::ProducerNumber),
            Some(&FieldError::InvalidProducerNumber)
        );
        // the stored label leaves the field untouched
        let f = fixture(valid_metadata());
        assert!(f
            .controller
            .commit_typed_text(MetadataFieldName::PolicyNumber, "PLCY-1")
            .is_empty());
        assert!(!f.controller.state().is_dirty);
    }

    #[test]
    fn test_policy_without_loss_submits() {
        let f = fixture(DocumentMetadata {
            policy_number: Some("PLCY-1".into()),
            policy_id: Some(1),
            document_description: Some("Estimate".into()),
            ..Default::default()
        });
        assert!(f.controller.state().is_valid);
        assert!(f.controller.state().errors.is_empty());
        assert!(block_on(f.controller.handle_submit()));
        let calls = f.saver.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].policy_id, Some(1));
        assert_eq!(calls[0].loss_id, None);
        assert_eq!(calls[0].claimant_id, None);
    }

    #[test]
    fn test_description_only_document_reports_policy_only() {
        let f = fixture(DocumentMetadata {
            document_description: Some("Estimate".into()),
            ..Default::default()
        });
        let errors = f.controller.state().errors;
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(&MetadataFieldName::PolicyNumber),
            Some(&FieldError::Required)
        );
    }

    #[test]
    fn test_save_returning_processed_document_locks_form() {
        let f = fixture(valid_metadata());
        f.saver.processed_after_save.set(true);
        f.controller
            .handle_field_change(MetadataFieldName::DocumentDescription, FieldInput::Text("Final".into()));
        assert!(block_on(f.controller.handle_submit()));
        assert!(f.controller.state().is_read_only);
    }
}
