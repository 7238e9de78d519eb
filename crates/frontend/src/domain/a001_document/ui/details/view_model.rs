use crate::domain::a001_document::model;
use crate::shared::api_utils::ApiError;
use contracts::domain::a001_document::aggregate::{DocumentId, DocumentSnapshot};
use contracts::domain::a001_document::history::DocumentHistoryEntry;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// ViewModel of the document details panel
///
/// The metadata form has its own controller; this one only owns the document
/// snapshot, its history and the status commands (processed, trash, restore).
#[derive(Clone, Copy)]
pub struct DocumentDetailsViewModel {
    pub document: RwSignal<Option<DocumentSnapshot>>,
    pub history: RwSignal<Vec<DocumentHistoryEntry>>,
    pub error: RwSignal<Option<String>>,
    pub is_loading: RwSignal<bool>,
    pub is_busy: RwSignal<bool>,
}

impl DocumentDetailsViewModel {
    pub fn new() -> Self {
        Self {
            document: RwSignal::new(None),
            history: RwSignal::new(Vec::new()),
            error: RwSignal::new(None),
            is_loading: RwSignal::new(false),
            is_busy: RwSignal::new(false),
        }
    }

    pub fn load(&self, id: DocumentId) {
        let vm = *self;
        vm.is_loading.set(true);
        vm.error.set(None);
        spawn_local(async move {
            match model::fetch_document(id).await {
                Ok(doc) => vm.document.set(Some(doc)),
                Err(e) => {
                    log::warn!("failed to load document {}: {}", id, e);
                    vm.document.set(None);
                    vm.error.set(Some(format!("Failed to load: {}", e)));
                }
            }
            vm.is_loading.set(false);
        });
        self.reload_history(id);
    }

    pub fn reload_history(&self, id: DocumentId) {
        let history = self.history;
        spawn_local(async move {
            match model::fetch_history(id).await {
                Ok(entries) => history.set(entries),
                Err(e) => log::warn!("failed to load history of document {}: {}", id, e),
            }
        });
    }

    pub fn current_id(&self) -> Option<DocumentId> {
        self.document.with_untracked(|d| d.as_ref().map(|d| d.id))
    }

    /// Run a status command and take the returned snapshot
    fn run_command<F, Fut>(&self, on_changed: Callback<()>, command: F)
    where
        F: FnOnce(DocumentId) -> Fut + 'static,
        Fut: std::future::Future<Output = Result<DocumentSnapshot, ApiError>> + 'static,
    {
        let Some(id) = self.current_id() else {
            return;
        };
        let vm = *self;
        vm.is_busy.set(true);
        vm.error.set(None);
        spawn_local(async move {
            match command(id).await {
                Ok(doc) => {
                    vm.document.set(Some(doc));
                    vm.reload_history(id);
                    on_changed.run(());
                }
                Err(e) => vm.error.set(Some(e.to_string())),
            }
            vm.is_busy.set(false);
        });
    }

    pub fn toggle_processed_command(&self, on_changed: Callback<()>) {
        let processed = self
            .document
            .with_untracked(|d| d.as_ref().is_some_and(|d| d.is_processed));
        self.run_command(on_changed, move |id| model::set_processed(id, !processed));
    }

    pub fn trash_command(&self, on_changed: Callback<()>) {
        self.run_command(on_changed, model::trash_document);
    }

    pub fn restore_command(&self, on_changed: Callback<()>) {
        self.run_command(on_changed, model::restore_document);
    }
}

impl Default for DocumentDetailsViewModel {
    fn default() -> Self {
        Self::new()
    }
}
