//! Stage Components
//!
//! Stage badge for tables and the dialog used to move a deal to another stage.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::context::use_app_context;
use crate::models::{Deal, DealStage};

fn badge_class(stage: Option<DealStage>) -> &'static str {
    match stage {
        Some(DealStage::Prospect) => "stage-badge stage-prospect",
        Some(DealStage::UnderEvaluation) => "stage-badge stage-evaluation",
        Some(DealStage::TermSheetSubmitted) => "stage-badge stage-term-sheet",
        Some(DealStage::Closed) => "stage-badge stage-closed",
        Some(DealStage::Lost) => "stage-badge stage-lost",
        None => "stage-badge stage-unknown",
    }
}

/// Stage as a colored badge; unknown values are shown raw
#[component]
pub fn StageBadge(#[prop(into)] stage: Option<String>) -> impl IntoView {
    let known = stage.as_deref().and_then(DealStage::from_input);
    let text = match (known, stage) {
        (Some(s), _) => s.label().to_string(),
        (None, Some(raw)) => raw,
        (None, None) => "Unknown".to_string(),
    };

    view! { <span class=badge_class(known)>{text}</span> }
}

/// Modal for changing a deal's stage
#[component]
pub fn StageDialog(
    deal: Deal,
    #[prop(into)] on_updated: Callback<Deal>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let ctx = use_app_context();

    let current = deal.known_stage();
    let (selected, set_selected) = signal(current.unwrap_or(DealStage::Prospect));
    let (saving, set_saving) = signal(false);
    let deal_id = StoredValue::new(deal.id.clone());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let stage = selected.get();
        if Some(stage) == current {
            ctx.notifier.info("Stage unchanged");
            on_cancel.run(());
            return;
        }

        set_saving.set(true);
        spawn_local(async move {
            match api::change_stage(&ctx.client(), &deal_id.get_value(), stage.as_str()).await {
                Ok(updated) => on_updated.run(updated),
                Err(e) => ctx.notifier.error(&e),
            }
            set_saving.set(false);
        });
    };

    view! {
        <div class="modal-backdrop" on:click=move |_| on_cancel.run(())>
            <form class="modal" on:click=|ev| ev.stop_propagation() on:submit=on_submit>
                <h2>"Update Stage"</h2>
                <p class="modal-subtitle">{deal.display_name().to_string()}</p>

                <label>
                    "Stage"
                    <select on:change=move |ev| {
                        if let Some(stage) = DealStage::parse(&event_target_value(&ev)) {
                            set_selected.set(stage);
                        }
                    }>
                        {DealStage::ALL.iter().map(|stage| {
                            let stage = *stage;
                            view! {
                                <option value=stage.as_str() selected=move || selected.get() == stage>
                                    {stage.label()}
                                </option>
                            }
                        }).collect_view()}
                    </select>
                </label>

                <div class="modal-actions">
                    <button type="button" on:click=move |_| on_cancel.run(())>"Cancel"</button>
                    <button type="submit" class="primary-btn" disabled=move || saving.get()>
                        {move || if saving.get() { "Saving..." } else { "Update" }}
                    </button>
                </div>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_class_per_stage() {
        assert_eq!(badge_class(Some(DealStage::Closed)), "stage-badge stage-closed");
        assert_eq!(badge_class(DealStage::from_input("CLOSED_LOST")), "stage-badge stage-lost");
        assert_eq!(badge_class(None), "stage-badge stage-unknown");
    }
}
