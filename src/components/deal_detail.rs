//! Deal Detail Component
//!
//! Single deal with its notes. Stage changes and notes open dialogs; admins
//! can edit the deal value inline and delete the deal.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::{DeleteConfirmButton, NoteDialog, StageBadge, StageDialog};
use crate::context::use_app_context;
use crate::format::{format_date, format_money};
use crate::models::{Deal, DealNote};
use crate::routes::Route;
use crate::store::{store_remove_deal, store_upsert_deal, use_app_store};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialog {
    Stage,
    Note,
}

#[component]
pub fn DealDetail(#[prop(into)] id: String) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (deal, set_deal) = signal::<Option<Deal>>(None);
    let (load_error, set_load_error) = signal::<Option<String>>(None);
    let (dialog, set_dialog) = signal::<Option<Dialog>>(None);
    let (value_input, set_value_input) = signal(String::new());
    let (saving_value, set_saving_value) = signal(false);
    let deal_id = StoredValue::new(id);

    let is_admin = move || {
        ctx.session_version();
        ctx.session().is_admin()
    };

    let apply_update = move |updated: Deal| {
        set_value_input.set(updated.deal_value.map(|v| v.to_string()).unwrap_or_default());
        store_upsert_deal(&store, updated.clone());
        set_deal.set(Some(updated));
    };

    Effect::new(move |_| {
        let id = deal_id.get_value();
        if id.trim().is_empty() {
            set_load_error.set(Some("Invalid deal ID".to_string()));
            return;
        }
        spawn_local(async move {
            match api::get_deal(&ctx.client(), &id).await {
                Ok(loaded) => apply_update(loaded),
                Err(e) => {
                    set_load_error.set(Some(e.to_string()));
                    ctx.notifier.error(&e);
                }
            }
        });
    });

    let on_stage_updated = Callback::new(move |updated: Deal| {
        set_dialog.set(None);
        apply_update(updated);
        ctx.notifier.success("Deal stage updated");
    });

    let on_note_added = Callback::new(move |updated: Deal| {
        set_dialog.set(None);
        apply_update(updated);
        ctx.notifier.success("Note added");
    });

    let close_dialog = Callback::new(move |_: ()| set_dialog.set(None));

    let on_save_value = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let raw = value_input.get();
        let parsed = raw.trim().parse::<f64>().ok();
        let current = deal.with(|d| d.as_ref().and_then(|d| d.deal_value));
        if parsed.is_some() && parsed == current {
            ctx.notifier.info("Deal value unchanged");
            return;
        }

        set_saving_value.set(true);
        spawn_local(async move {
            match api::update_value(&ctx.client(), &deal_id.get_value(), parsed).await {
                Ok(updated) => {
                    apply_update(updated);
                    ctx.notifier.success("Deal value updated");
                }
                Err(e) => ctx.notifier.error(&e),
            }
            set_saving_value.set(false);
        });
    };

    let on_delete = move |_: ()| {
        spawn_local(async move {
            let id = deal_id.get_value();
            match api::delete_deal(&ctx.client(), &id).await {
                Ok(()) => {
                    store_remove_deal(&store, &id);
                    ctx.notifier.success("Deal deleted");
                    ctx.navigate(Route::Deals);
                }
                Err(e) => ctx.notifier.error(&e),
            }
        });
    };

    view! {
        <section class="deal-detail">
            <button class="back-btn" on:click=move |_| ctx.navigate(Route::Deals)>"Back to deals"</button>

            {move || load_error.get().map(|message| view! {
                <div class="form-error">{message}</div>
            })}

            {move || deal.get().map(|d| {
                let notes = d.notes.clone();
                view! {
                    <div class="page-header">
                        <h1>{d.display_name().to_string()}</h1>
                        <StageBadge stage=d.stage.clone() />
                    </div>

                    <dl class="deal-fields">
                        <dt>"Client"</dt><dd>{d.client_name.clone()}</dd>
                        <dt>"Type"</dt><dd>{d.deal_type.clone().unwrap_or_else(|| "-".to_string())}</dd>
                        <dt>"Sector"</dt><dd>{d.sector.clone().unwrap_or_else(|| "-".to_string())}</dd>
                        <dt>"Summary"</dt><dd>{d.summary.clone().unwrap_or_else(|| "-".to_string())}</dd>
                        <dt>"Expected close"</dt>
                        <dd>{d.expected_close_date.as_deref().map(format_date).unwrap_or_else(|| "-".to_string())}</dd>
                        <dt>"Created"</dt>
                        <dd>{d.created_date.as_deref().map(format_date).unwrap_or_else(|| "-".to_string())}</dd>
                        <dt>"Last modified"</dt>
                        <dd>{d.last_modified_date.as_deref().map(format_date).unwrap_or_else(|| "-".to_string())}</dd>
                    </dl>

                    <div class="detail-actions">
                        <button on:click=move |_| set_dialog.set(Some(Dialog::Stage))>"Change Stage"</button>
                        <button on:click=move |_| set_dialog.set(Some(Dialog::Note))>"Add Note"</button>
                        <button on:click=move |_| ctx.navigate(Route::DealEdit(deal_id.get_value()))>"Edit"</button>
                        <Show when=is_admin>
                            <DeleteConfirmButton subject="this deal" on_confirm=on_delete />
                        </Show>
                    </div>

                    <Show when=is_admin>
                        <form class="value-form" on:submit=on_save_value>
                            <label>
                                "Deal value"
                                <span class="current-value">
                                    {move || deal.with(|d| d.as_ref().and_then(|d| d.deal_value))
                                        .map(format_money)
                                        .unwrap_or_else(|| "not set".to_string())}
                                </span>
                                <input
                                    type="number"
                                    min="0"
                                    step="0.01"
                                    prop:value=move || value_input.get()
                                    on:input=move |ev| set_value_input.set(event_target_value(&ev))
                                />
                            </label>
                            <button type="submit" disabled=move || saving_value.get()>"Save Value"</button>
                        </form>
                    </Show>

                    <NoteList notes=notes />
                }
            })}

            {move || match (dialog.get(), deal.get()) {
                (Some(Dialog::Stage), Some(d)) => view! {
                    <StageDialog deal=d on_updated=on_stage_updated on_cancel=close_dialog />
                }.into_any(),
                (Some(Dialog::Note), Some(_)) => view! {
                    <NoteDialog deal_id=deal_id.get_value() on_added=on_note_added on_cancel=close_dialog />
                }.into_any(),
                _ => view! { <div></div> }.into_any(),
            }}
        </section>
    }
}

/// Notes, newest last as the backend stores them
#[component]
fn NoteList(notes: Vec<DealNote>) -> impl IntoView {
    if notes.is_empty() {
        return view! { <div class="empty-message">"No notes yet"</div> }.into_any();
    }

    view! {
        <ul class="note-list">
            {notes.into_iter().map(|note| view! {
                <li class="note">
                    <div class="note-meta">
                        <span class="note-author">
                            {if note.created_by.is_empty() { "unknown".to_string() } else { note.created_by.clone() }}
                        </span>
                        <span class="note-date">{format_date(&note.created_date)}</span>
                    </div>
                    <p class="note-content">{note.content}</p>
                </li>
            }).collect_view()}
        </ul>
    }
    .into_any()
}
