//! Deal Form Components
//!
//! Create form (all fields, plus optional value for admins and a first note)
//! and edit form (summary, sector and deal type only).

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::context::use_app_context;
use crate::models::{DealDraft, DealEdits, DealStage};
use crate::routes::Route;
use crate::store::{store_upsert_deal, use_app_store};

/// Common deal types offered in the form
const DEAL_TYPES: &[&str] = &["M&A", "IPO", "Debt Financing", "Equity Financing", "Restructuring", "Other"];

/// Labeled text input bound to a signal
#[component]
fn TextField(
    #[prop(into)] label: String,
    value: ReadSignal<String>,
    set_value: WriteSignal<String>,
    #[prop(optional, into)] placeholder: String,
) -> impl IntoView {
    view! {
        <label class="form-field">
            {label}
            <input
                type="text"
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| set_value.set(event_target_value(&ev))
            />
        </label>
    }
}

/// Deal type select; keeps unknown existing values selectable
#[component]
fn DealTypeField(value: ReadSignal<String>, set_value: WriteSignal<String>) -> impl IntoView {
    view! {
        <label class="form-field">
            "Deal type"
            <select on:change=move |ev| set_value.set(event_target_value(&ev))>
                <option value="" selected=move || value.get().is_empty()>"Select a type"</option>
                {move || {
                    let current = value.get();
                    let mut options: Vec<String> = DEAL_TYPES.iter().map(|t| t.to_string()).collect();
                    if !current.is_empty() && !options.contains(&current) {
                        options.push(current.clone());
                    }
                    options.into_iter().map(|option| {
                        let selected = option == current;
                        view! { <option value=option.clone() selected=selected>{option.clone()}</option> }
                    }).collect_view()
                }}
            </select>
        </label>
    }
}

#[component]
pub fn DealForm() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (deal_name, set_deal_name) = signal(String::new());
    let (client_name, set_client_name) = signal(String::new());
    let (deal_type, set_deal_type) = signal(String::new());
    let (sector, set_sector) = signal(String::new());
    let (summary, set_summary) = signal(String::new());
    let (stage, set_stage) = signal(DealStage::Prospect.as_str().to_string());
    let (value, set_value) = signal(String::new());
    let (note, set_note) = signal(String::new());
    let (saving, set_saving) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);

    let is_admin = move || {
        ctx.session_version();
        ctx.session().is_admin()
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get() {
            return;
        }
        let draft = DealDraft {
            deal_name: deal_name.get(),
            client_name: client_name.get(),
            deal_type: deal_type.get(),
            sector: sector.get(),
            summary: summary.get(),
            stage: stage.get(),
        };
        // value is an admin-only follow-up
        let initial_value = if is_admin() { value.get().trim().parse::<f64>().ok() } else { None };
        let initial_note = note.get();

        set_error.set(None);
        set_saving.set(true);
        spawn_local(async move {
            let note = Some(initial_note.as_str()).filter(|n| !n.trim().is_empty());
            match api::create_deal_with_extras(&ctx.client(), &draft, initial_value, note).await {
                Ok(deal) => {
                    ctx.notifier.success("Deal created");
                    let next = if deal.id.is_empty() { Route::Deals } else { Route::DealDetail(deal.id.clone()) };
                    store_upsert_deal(&store, deal);
                    ctx.navigate(next);
                }
                Err(e) => {
                    set_error.set(Some(e.to_string()));
                    ctx.notifier.error(&e);
                }
            }
            set_saving.set(false);
        });
    };

    view! {
        <section class="deal-form">
            <h1>"New Deal"</h1>

            {move || error.get().map(|message| view! { <div class="form-error">{message}</div> })}

            <form on:submit=on_submit>
                <TextField label="Deal name" value=deal_name set_value=set_deal_name />
                <TextField label="Client name" value=client_name set_value=set_client_name />
                <DealTypeField value=deal_type set_value=set_deal_type />
                <TextField label="Sector" value=sector set_value=set_sector placeholder="e.g. Technology" />

                <label class="form-field">
                    "Summary"
                    <textarea
                        rows="4"
                        prop:value=move || summary.get()
                        on:input=move |ev| set_summary.set(event_target_value(&ev))
                    ></textarea>
                </label>

                <label class="form-field">
                    "Stage"
                    <select on:change=move |ev| set_stage.set(event_target_value(&ev))>
                        {DealStage::ALL.iter().map(|s| {
                            let value = s.as_str();
                            view! {
                                <option value=value selected=move || stage.get() == value>{s.label()}</option>
                            }
                        }).collect_view()}
                    </select>
                </label>

                <Show when=is_admin>
                    <label class="form-field">
                        "Deal value (optional)"
                        <input
                            type="number"
                            min="0"
                            step="0.01"
                            prop:value=move || value.get()
                            on:input=move |ev| set_value.set(event_target_value(&ev))
                        />
                    </label>
                </Show>

                <label class="form-field">
                    "First note (optional)"
                    <textarea
                        rows="3"
                        prop:value=move || note.get()
                        on:input=move |ev| set_note.set(event_target_value(&ev))
                    ></textarea>
                </label>

                <div class="form-actions">
                    <button type="button" on:click=move |_| ctx.navigate(Route::Deals)>"Cancel"</button>
                    <button type="submit" class="primary-btn" disabled=move || saving.get()>
                        {move || if saving.get() { "Creating..." } else { "Create Deal" }}
                    </button>
                </div>
            </form>
        </section>
    }
}

#[component]
pub fn DealEditForm(#[prop(into)] id: String) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (title, set_title) = signal(String::new());
    let (deal_type, set_deal_type) = signal(String::new());
    let (sector, set_sector) = signal(String::new());
    let (summary, set_summary) = signal(String::new());
    let (loading, set_loading) = signal(true);
    let (saving, set_saving) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let deal_id = StoredValue::new(id);

    Effect::new(move |_| {
        let id = deal_id.get_value();
        spawn_local(async move {
            match api::get_deal(&ctx.client(), &id).await {
                Ok(deal) => {
                    set_title.set(deal.display_name().to_string());
                    set_deal_type.set(deal.deal_type.unwrap_or_default());
                    set_sector.set(deal.sector.unwrap_or_default());
                    set_summary.set(deal.summary.unwrap_or_default());
                }
                Err(e) => {
                    set_error.set(Some(e.to_string()));
                    ctx.notifier.error(&e);
                }
            }
            set_loading.set(false);
        });
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let edits = DealEdits {
            summary: Some(summary.get()),
            sector: Some(sector.get()),
            deal_type: Some(deal_type.get()),
        };
        set_error.set(None);
        set_saving.set(true);
        spawn_local(async move {
            let id = deal_id.get_value();
            match api::update_deal(&ctx.client(), &id, &edits).await {
                Ok(mut deal) => {
                    if deal.id.is_empty() {
                        deal.id = id.clone();
                    }
                    store_upsert_deal(&store, deal);
                    ctx.notifier.success("Deal updated");
                    ctx.navigate(Route::DealDetail(id));
                }
                Err(e) => {
                    set_error.set(Some(e.to_string()));
                    ctx.notifier.error(&e);
                }
            }
            set_saving.set(false);
        });
    };

    view! {
        <section class="deal-form">
            <h1>{move || format!("Edit {}", title.get())}</h1>

            {move || error.get().map(|message| view! { <div class="form-error">{message}</div> })}

            <Show when=move || !loading.get() fallback=|| view! { <div class="loading">"Loading deal..."</div> }>
                <form on:submit=on_submit>
                    <DealTypeField value=deal_type set_value=set_deal_type />
                    <TextField label="Sector" value=sector set_value=set_sector />
                    <label class="form-field">
                        "Summary"
                        <textarea
                            rows="4"
                            prop:value=move || summary.get()
                            on:input=move |ev| set_summary.set(event_target_value(&ev))
                        ></textarea>
                    </label>

                    <div class="form-actions">
                        <button type="button" on:click=move |_| ctx.navigate(Route::DealDetail(deal_id.get_value()))>
                            "Cancel"
                        </button>
                        <button type="submit" class="primary-btn" disabled=move || saving.get()>
                            {move || if saving.get() { "Saving..." } else { "Save" }}
                        </button>
                    </div>
                </form>
            </Show>
        </section>
    }
}
