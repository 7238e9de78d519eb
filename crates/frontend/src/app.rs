use crate::domain::a001_document::ui::details::DocumentDetails;
use crate::domain::a001_document::ui::list::DocumentList;
use contracts::domain::a001_document::aggregate::DocumentId;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    let (selected, set_selected) = signal::<Option<DocumentId>>(None);
    // bumped when the open document changes status, so the list refetches
    let (refresh, set_refresh) = signal(0u64);

    view! {
        <div class="app-shell">
            <header class="top-header">
                <h1>"Documents"</h1>
            </header>
            <div class="app-shell__body">
                <aside class="app-shell__left">
                    <DocumentList
                        selected=selected
                        on_open=Callback::new(move |id| set_selected.set(Some(id)))
                        refresh=refresh
                    />
                </aside>
                <main class="app-shell__center">
                    <Show
                        when=move || selected.get().is_some()
                        fallback=|| view! { <div class="text-muted">"Select a document"</div> }
                    >
                        <DocumentDetails
                            id=selected
                            on_changed=Callback::new(move |_| set_refresh.update(|r| *r += 1))
                        />
                    </Show>
                </main>
            </div>
        </div>
    }
}
