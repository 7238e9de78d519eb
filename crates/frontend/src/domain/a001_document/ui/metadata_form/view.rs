use super::cascade::OptionFetch;
use super::form_state::{AutosaveOutcome, ChangeEffects, MetadataFormController, MetadataFormState};
use contracts::domain::a001_document::aggregate::DocumentSnapshot;
use contracts::domain::a001_document::field_config::{field_configs, FieldConfig};
use contracts::domain::a001_document::metadata::{DocumentMetadata, FieldInput, MetadataFieldName};
use contracts::domain::a001_document::options::MetadataOption;
use contracts::shared::metadata::FieldType;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

fn spawn_fetches(controller: &MetadataFormController, fetches: Vec<OptionFetch>) {
    for fetch in fetches {
        let controller = controller.clone();
        spawn_local(async move {
            controller.run_fetch(fetch).await;
        });
    }
}

/// Run the requests and the debounced save a field change asked for
fn spawn_effects(controller: &MetadataFormController, effects: ChangeEffects) {
    spawn_fetches(controller, effects.fetches);
    if let Some(autosave) = effects.autosave {
        spawn_local(async move {
            if let AutosaveOutcome::Saved = autosave.await {
                log::debug!("metadata autosaved");
            }
        });
    }
}

fn field_text(values: &DocumentMetadata, field: MetadataFieldName) -> String {
    values.display_value(field).unwrap_or_default().to_string()
}

#[component]
pub fn MetadataForm(
    controller: MetadataFormController,
    /// Latest snapshot of the open document
    #[prop(into)]
    document: Signal<Option<DocumentSnapshot>>,
    /// Called after a successful explicit save
    #[prop(optional)]
    on_saved: Option<Callback<()>>,
) -> impl IntoView {
    let state = RwSignal::new(controller.state());
    // bumped on every controller notification; option lists read through it
    let revision = RwSignal::new(0u64);
    controller.subscribe(move |s: &MetadataFormState| {
        state.set(s.clone());
        revision.update(|r| *r += 1);
    });

    spawn_fetches(&controller, controller.initial_fetches());

    let ctrl = StoredValue::new_local(controller);
    on_cleanup(move || ctrl.with_value(|c| c.teardown()));

    // status commands and document switches arrive as new snapshots
    Effect::new(move |_| {
        if let Some(doc) = document.get() {
            ctrl.with_value(|c| spawn_fetches(c, c.sync_with_document(&doc)));
        }
    });

    let submit = move |_| {
        let controller = ctrl.get_value();
        spawn_local(async move {
            if controller.handle_submit().await {
                if let Some(cb) = on_saved {
                    cb.run(());
                }
            }
        });
    };

    view! {
        <div class="detail-form metadata-form">
            {field_configs()
                .iter()
                .map(|config| view! { <MetadataField config=*config ctrl=ctrl state=state revision=revision /> })
                .collect_view()}

            {move || state.get().save_error.map(|e| view! {
                <div class="warning-box">{format!("Autosave failed: {}", e)}</div>
            })}
            {move || state.get().submit_error.map(|e| view! {
                <div class="warning-box text-error">{e}</div>
            })}

            <div class="modal-actions-top">
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=submit
                    disabled=Signal::derive(move || {
                        let s = state.get();
                        s.is_read_only || s.is_submitting
                    })
                >
                    {move || if state.get().is_submitting { "Saving..." } else { "Save" }}
                </Button>
                <span class="form__status">
                    {move || {
                        let s = state.get();
                        if s.is_read_only {
                            "Read-only"
                        } else if s.is_saving {
                            "Autosaving..."
                        } else if s.is_dirty {
                            "Unsaved changes"
                        } else {
                            "All changes saved"
                        }
                    }}
                </span>
            </div>
        </div>
    }
}

#[component]
fn MetadataField(
    config: FieldConfig,
    ctrl: StoredValue<MetadataFormController, LocalStorage>,
    state: RwSignal<MetadataFormState>,
    revision: RwSignal<u64>,
) -> impl IntoView {
    let field = config.name;
    let input_id = format!("metadata-{}", field.as_str().to_lowercase());

    let disabled = move || {
        state.track();
        ctrl.with_value(|c| c.is_field_disabled(field))
    };
    let error = move || {
        state.track();
        ctrl.with_value(|c| c.visible_error(field))
    };
    let loading = move || {
        revision.track();
        ctrl.with_value(|c| c.is_loading(field))
    };
    let options = move || {
        revision.track();
        ctrl.with_value(|c| c.options(field))
    };

    let change = move |input: FieldInput| {
        ctrl.with_value(|c| spawn_effects(c, c.handle_field_change(field, input)));
    };
    let blur = move |_| ctrl.with_value(|c| c.handle_field_blur(field));

    let widget = match config.field_type {
        FieldType::Text | FieldType::Textarea => {
            let rows = if config.field_type == FieldType::Textarea { "4" } else { "1" };
            view! {
                <textarea
                    class="form__textarea"
                    id=input_id.clone()
                    rows=rows
                    placeholder=config.placeholder
                    disabled=disabled
                    prop:value=move || state.with(|s| field_text(&s.values, field))
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        change(if value.is_empty() { FieldInput::Clear } else { FieldInput::Text(value) });
                    }
                    on:blur=blur
                />
            }
            .into_any()
        }
        FieldType::Autocomplete => {
            let list_id = format!("{}-options", input_id);
            // typed text; follows the stored value only when that value changes
            let stored = Memo::new(move |_| state.with(|s| field_text(&s.values, field)));
            let text = RwSignal::new(stored.get_untracked());
            Effect::new(move |_| text.set(stored.get()));

            view! {
                <input
                    class="form__input"
                    type="text"
                    id=input_id.clone()
                    list=list_id.clone()
                    placeholder=config.placeholder
                    disabled=disabled
                    prop:value=move || text.get()
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        text.set(value.clone());
                        if value.trim().is_empty() {
                            change(FieldInput::Clear);
                        } else if let Some(picked) = options().into_iter().find(|o| o.label == value) {
                            change(picked.to_field_input());
                        } else {
                            ctrl.with_value(|c| {
                                if let Some(fetch) = c.search_options(field, &value) {
                                    let c = c.clone();
                                    spawn_local(async move {
                                        c.run_fetch(fetch).await;
                                    });
                                }
                            });
                        }
                    }
                    on:blur=move |_| {
                        let typed = text.get_untracked();
                        ctrl.with_value(|c| {
                            spawn_effects(c, c.commit_typed_text(field, &typed));
                            c.handle_field_blur(field);
                        });
                    }
                />
                <datalist id=list_id>
                    {move || options()
                        .into_iter()
                        .map(|o| view! { <option value=o.label.clone()></option> })
                        .collect_view()}
                </datalist>
            }
            .into_any()
        }
        FieldType::Select => {
            let selected = move || {
                state.with(|s| {
                    s.values
                        .identifier(DocumentMetadata::id_path(field))
                        .map(|id| id.to_string())
                        .unwrap_or_default()
                })
            };
            view! {
                <select
                    class="form__select"
                    id=input_id.clone()
                    disabled=disabled
                    prop:value=selected
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        let picked = options()
                            .into_iter()
                            .find(|o| o.id.to_string() == value);
                        change(picked.map(|o| o.to_field_input()).unwrap_or(FieldInput::Clear));
                    }
                    on:blur=blur
                >
                    <option value="">{config.placeholder}</option>
                    {move || {
                        let mut opts = options();
                        // keep the stored selection visible before its list arrives
                        let current = state.with(|s| {
                            s.values
                                .identifier(DocumentMetadata::id_path(field))
                                .map(|id| (id, field_text(&s.values, field)))
                        });
                        if let Some((id, label)) = current {
                            if !opts.iter().any(|o| o.id == id) {
                                opts.insert(0, MetadataOption::new(id, label));
                            }
                        }
                        opts.into_iter()
                            .map(|o| view! { <option value=o.id.to_string()>{o.label}</option> })
                            .collect_view()
                    }}
                </select>
            }
            .into_any()
        }
    };

    view! {
        <div class="form__group">
            <label class="form__label" for=input_id>
                {config.label}
                {config.required.then(|| view! { <span class="form__required">" *"</span> })}
                {move || loading().then(|| view! { <Spinner /> })}
            </label>
            {widget}
            {move || error().map(|e| view! { <small class="form__error text-error">{e}</small> })}
        </div>
    }
}
