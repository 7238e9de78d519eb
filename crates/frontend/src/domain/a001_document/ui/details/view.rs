use super::view_model::DocumentDetailsViewModel;
use crate::domain::a001_document::ui::metadata_form::{HttpMetadataApi, MetadataForm, MetadataFormController};
use crate::shared::date_utils::format_timestamp;
use contracts::domain::a001_document::aggregate::DocumentId;
use contracts::domain::a001_document::metadata::MetadataFieldName;
use leptos::prelude::*;
use std::rc::Rc;
use thaw::*;

#[component]
pub fn DocumentDetails(
    id: ReadSignal<Option<DocumentId>>,
    /// Status changed (processed, trashed, restored); the list should refresh
    on_changed: Callback<()>,
) -> impl IntoView {
    let vm = DocumentDetailsViewModel::new();

    Effect::new(move |_| {
        if let Some(current) = id.get() {
            vm.load(current);
        } else {
            vm.document.set(None);
            vm.history.set(Vec::new());
        }
    });

    view! {
        <div class="document-details">
            {move || vm.error.get().map(|e| view! { <div class="warning-box text-error">{e}</div> })}
            <Show when=move || vm.is_loading.get()>
                <Spinner />
            </Show>
            {move || vm.document.get().map(|doc| {
                let is_deleted = doc.is_deleted;
                let processed_label = if doc.is_processed { "Mark unprocessed" } else { "Mark processed" };
                let status = if doc.is_deleted {
                    "In trash"
                } else if doc.is_processed {
                    "Processed"
                } else {
                    "Open"
                };
                view! {
                    <div class="document-details__header">
                        <h2>{doc.file_name.clone()}</h2>
                        <span class="badge">{status}</span>
                        {doc.processed_by.clone().map(|by| view! {
                            <span class="text-muted">
                                {format!(
                                    "by {} at {}",
                                    by,
                                    doc.processed_at.map(|t| format_timestamp(&t)).unwrap_or_default()
                                )}
                            </span>
                        })}
                        <div class="modal-actions-top">
                            <Show
                                when=move || !is_deleted
                                fallback=move || view! {
                                    <Button
                                        appearance=ButtonAppearance::Secondary
                                        disabled=vm.is_busy
                                        on_click=move |_| vm.restore_command(on_changed)
                                    >
                                        "Restore"
                                    </Button>
                                }
                            >
                                <Button
                                    appearance=ButtonAppearance::Secondary
                                    disabled=vm.is_busy
                                    on_click=move |_| vm.toggle_processed_command(on_changed)
                                >
                                    {processed_label}
                                </Button>
                                <Button
                                    appearance=ButtonAppearance::Subtle
                                    disabled=vm.is_busy
                                    on_click=move |_| vm.trash_command(on_changed)
                                >
                                    "Move to trash"
                                </Button>
                            </Show>
                        </div>
                    </div>
                    <iframe
                        class="document-viewer"
                        src=doc.file_url.clone()
                        title=doc.file_name.clone()
                    ></iframe>
                }
            })}
            // one form per opened panel; later snapshots are synced into it
            <Show when=move || vm.document.with(Option::is_some)>
                {move || vm.document.get_untracked().map(|doc| {
                    let api = Rc::new(HttpMetadataApi);
                    let controller = MetadataFormController::new(&doc, api.clone(), api);
                    view! {
                        <div class="document-details__side">
                            <MetadataForm
                                controller=controller
                                document=vm.document
                                on_saved=Callback::new(move |_| {
                                    if let Some(id) = vm.current_id() {
                                        vm.reload_history(id);
                                    }
                                })
                            />
                            <DocumentHistoryPanel vm=vm />
                        </div>
                    }
                })}
            </Show>
        </div>
    }
}

#[component]
fn DocumentHistoryPanel(vm: DocumentDetailsViewModel) -> impl IntoView {
    view! {
        <div class="document-history">
            <h3>"History"</h3>
            <Show
                when=move || !vm.history.with(|h| h.is_empty())
                fallback=|| view! { <div class="text-muted">"No changes yet"</div> }
            >
                <Table>
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell>"When"</TableHeaderCell>
                            <TableHeaderCell>"Who"</TableHeaderCell>
                            <TableHeaderCell>"What"</TableHeaderCell>
                            <TableHeaderCell>"Change"</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || vm.history.get()
                            key=|entry| entry.id
                            children=|entry| {
                                let what = match entry.field {
                                    Some(field) => format!("{}: {}", entry.action.label(), field_label(field)),
                                    None => entry.action.label().to_string(),
                                };
                                let change = match (&entry.old_value, &entry.new_value) {
                                    (None, None) => String::new(),
                                    (old, new) => format!(
                                        "{} → {}",
                                        old.as_deref().unwrap_or("∅"),
                                        new.as_deref().unwrap_or("∅")
                                    ),
                                };
                                view! {
                                    <TableRow>
                                        <TableCell>{format_timestamp(&entry.created_at)}</TableCell>
                                        <TableCell>{entry.actor.clone()}</TableCell>
                                        <TableCell>{what}</TableCell>
                                        <TableCell>{change}</TableCell>
                                    </TableRow>
                                }
                            }
                        />
                    </TableBody>
                </Table>
            </Show>
        </div>
    }
}

fn field_label(field: MetadataFieldName) -> &'static str {
    contracts::domain::a001_document::field_config::field_config(field).label
}
