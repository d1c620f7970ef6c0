//! Add Note Dialog Component

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::context::use_app_context;
use crate::models::Deal;

/// Modal with a single note textarea
#[component]
pub fn NoteDialog(
    #[prop(into)] deal_id: String,
    #[prop(into)] on_added: Callback<Deal>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let ctx = use_app_context();

    let (text, set_text) = signal(String::new());
    let (saving, set_saving) = signal(false);
    let deal_id = StoredValue::new(deal_id);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let note = text.get();
        set_saving.set(true);
        spawn_local(async move {
            match api::add_note(&ctx.client(), &deal_id.get_value(), &note).await {
                Ok(updated) => {
                    set_text.set(String::new());
                    on_added.run(updated);
                }
                Err(e) => ctx.notifier.error(&e),
            }
            set_saving.set(false);
        });
    };

    view! {
        <div class="modal-backdrop" on:click=move |_| on_cancel.run(())>
            <form class="modal" on:click=|ev| ev.stop_propagation() on:submit=on_submit>
                <h2>"Add Note"</h2>
                <textarea
                    rows="5"
                    placeholder="Write a note..."
                    prop:value=move || text.get()
                    on:input=move |ev| set_text.set(event_target_value(&ev))
                ></textarea>
                <div class="modal-actions">
                    <button type="button" on:click=move |_| on_cancel.run(())>"Cancel"</button>
                    <button
                        type="submit"
                        class="primary-btn"
                        disabled=move || saving.get() || text.with(|t| t.trim().is_empty())
                    >
                        "Add Note"
                    </button>
                </div>
            </form>
        </div>
    }
}
