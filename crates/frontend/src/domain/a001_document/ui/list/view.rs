use super::state::create_state;
use crate::domain::a001_document::model;
use crate::shared::date_utils::format_timestamp;
use contracts::domain::a001_document::aggregate::{DocumentId, DocumentStatusFilter};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

const STATUS_TABS: [(DocumentStatusFilter, &str); 4] = [
    (DocumentStatusFilter::Active, "Open"),
    (DocumentStatusFilter::Processed, "Processed"),
    (DocumentStatusFilter::Trashed, "Trash"),
    (DocumentStatusFilter::All, "All"),
];

#[component]
#[allow(non_snake_case)]
pub fn DocumentList(
    selected: ReadSignal<Option<DocumentId>>,
    on_open: Callback<DocumentId>,
    /// Bumped by the parent when a document changed status elsewhere
    refresh: ReadSignal<u64>,
) -> impl IntoView {
    let state = create_state();
    let (error, set_error) = signal::<Option<String>>(None);
    let seed_message = RwSignal::new(None::<String>);

    let fetch = move || {
        let query = state.with_untracked(|s| s.query());
        spawn_local(async move {
            match model::fetch_documents(&query).await {
                Ok(resp) => {
                    state.update(|s| {
                        s.items = resp.items;
                        s.total_count = resp.total;
                        s.page = resp.page;
                        s.page_size = resp.page_size;
                        s.is_loaded = true;
                    });
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e.to_string())),
            }
        });
    };

    Effect::new(move |_| {
        refresh.track();
        fetch();
    });

    let set_status = move |status: DocumentStatusFilter| {
        state.update(|s| {
            s.status = status;
            s.page = 1;
        });
        fetch();
    };

    let seed = move |_| {
        spawn_local(async move {
            match model::generate_test_data().await {
                Ok(summary) => {
                    seed_message.set(Some(format!("Created {} documents", summary.documents)));
                    fetch();
                }
                Err(e) => set_error.set(Some(e.to_string())),
            }
        });
    };

    view! {
        <div class="document-list">
            <div class="filter-panel">
                {STATUS_TABS
                    .into_iter()
                    .map(|(status, label)| view! {
                        <Button
                            size=ButtonSize::Small
                            appearance=move || {
                                if state.with(|s| s.status == status) {
                                    ButtonAppearance::Primary
                                } else {
                                    ButtonAppearance::Subtle
                                }
                            }
                            on_click=move |_| set_status(status)
                        >
                            {label}
                        </Button>
                    })
                    .collect_view()}
                <input
                    class="form__input"
                    type="search"
                    placeholder="Search file, policy, description"
                    prop:value=move || state.with(|s| s.search.clone())
                    on:input=move |ev| state.update(|s| s.search = event_target_value(&ev))
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            state.update(|s| s.page = 1);
                            fetch();
                        }
                    }
                />
                <Button size=ButtonSize::Small appearance=ButtonAppearance::Secondary on_click=seed>
                    "Generate test data"
                </Button>
            </div>

            {move || error.get().map(|e| view! { <div class="warning-box text-error">{e}</div> })}
            {move || seed_message.get().map(|m| view! { <div class="info-box">{m}</div> })}

            <Table>
                <TableHeader>
                    <TableRow>
                        <TableHeaderCell>"File"</TableHeaderCell>
                        <TableHeaderCell>"Policy"</TableHeaderCell>
                        <TableHeaderCell>"Description"</TableHeaderCell>
                        <TableHeaderCell>"Assigned to"</TableHeaderCell>
                        <TableHeaderCell>"Updated"</TableHeaderCell>
                    </TableRow>
                </TableHeader>
                <TableBody>
                    <For
                        each=move || state.with(|s| s.items.clone())
                        key=|item| (item.id, item.updated_at)
                        children=move |item| {
                            let id = item.id;
                            let class = move || {
                                if selected.get() == Some(id) { "table__row table__row--selected" } else { "table__row" }
                            };
                            view! {
                                <tr class=class on:click=move |_| on_open.run(id)>
                                    <TableCell>{item.file_name.clone()}</TableCell>
                                    <TableCell>{item.policy_number.clone().unwrap_or_else(|| "-".to_string())}</TableCell>
                                    <TableCell>{item.document_description.clone().unwrap_or_default()}</TableCell>
                                    <TableCell>{item.assigned_to.clone().unwrap_or_default()}</TableCell>
                                    <TableCell>{format_timestamp(&item.updated_at)}</TableCell>
                                </tr>
                            }
                        }
                    />
                </TableBody>
            </Table>

            <div class="pagination-controls">
                <Button
                    size=ButtonSize::Small
                    disabled=Signal::derive(move || state.with(|s| s.page <= 1))
                    on_click=move |_| {
                        state.update(|s| s.page = s.page.saturating_sub(1).max(1));
                        fetch();
                    }
                >
                    "‹"
                </Button>
                <span>
                    {move || state.with(|s| format!("{} / {} ({} total)", s.page, s.total_pages().max(1), s.total_count))}
                </span>
                <Button
                    size=ButtonSize::Small
                    disabled=Signal::derive(move || state.with(|s| !s.has_next()))
                    on_click=move |_| {
                        state.update(|s| s.page += 1);
                        fetch();
                    }
                >
                    "›"
                </Button>
            </div>
        </div>
    }
}
