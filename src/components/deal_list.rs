//! Deal List Component
//!
//! Table of all deals with stage filter and text search. Admins also see the
//! deal value and can delete deals from here.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::{DeleteConfirmButton, StageBadge, StageDialog};
use crate::context::use_app_context;
use crate::format::format_money;
use crate::models::{Deal, DealStage};
use crate::routes::Route;
use crate::store::{store_remove_deal, store_upsert_deal, use_app_store, AppStateStoreFields};

/// Whether `deal` passes the stage filter and the search text
fn matches_filter(deal: &Deal, stage: Option<DealStage>, query: &str) -> bool {
    if stage.is_some() && deal.known_stage() != stage {
        return false;
    }
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    [
        Some(deal.deal_name.as_str()),
        Some(deal.client_name.as_str()),
        deal.sector.as_deref(),
        deal.deal_type.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&query))
}

#[component]
pub fn DealList() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (loading, set_loading) = signal(true);
    let (load_error, set_load_error) = signal::<Option<String>>(None);
    let (reload_trigger, set_reload_trigger) = signal(0u32);
    let (stage_filter, set_stage_filter) = signal::<Option<DealStage>>(None);
    let (query, set_query) = signal(String::new());
    let (stage_target, set_stage_target) = signal::<Option<Deal>>(None);

    let is_admin = move || {
        ctx.session_version();
        ctx.session().is_admin()
    };

    // Load deals on mount and on every reload request
    Effect::new(move |_| {
        let trigger = reload_trigger.get();
        tracing::debug!(trigger, "loading deals");
        set_loading.set(true);
        spawn_local(async move {
            match api::list_deals(&ctx.client()).await {
                Ok(loaded) => {
                    *store.deals().write() = loaded;
                    set_load_error.set(None);
                }
                Err(e) => {
                    set_load_error.set(Some(e.to_string()));
                    ctx.notifier.error(&e);
                }
            }
            set_loading.set(false);
        });
    });

    let visible = Memo::new(move |_| {
        let stage = stage_filter.get();
        let query = query.get();
        store
            .deals()
            .get()
            .into_iter()
            .filter(|deal| matches_filter(deal, stage, &query))
            .collect::<Vec<_>>()
    });

    let delete_deal = move |deal: Deal| {
        spawn_local(async move {
            match api::delete_deal(&ctx.client(), &deal.id).await {
                Ok(()) => {
                    store_remove_deal(&store, &deal.id);
                    ctx.notifier.success(format!("Deal \"{}\" deleted", deal.display_name()));
                }
                Err(e) => ctx.notifier.error(&e),
            }
        });
    };

    let on_stage_changed = Callback::new(move |updated: Deal| {
        set_stage_target.set(None);
        store_upsert_deal(&store, updated);
        ctx.notifier.success("Deal stage updated");
        // the backend may normalize more than the stage
        set_reload_trigger.update(|v| *v += 1);
    });

    view! {
        <section class="deal-list">
            <div class="page-header">
                <h1>"Deals"</h1>
                <button class="primary-btn" on:click=move |_| ctx.navigate(Route::DealNew)>"New Deal"</button>
                <button on:click=move |_| set_reload_trigger.update(|v| *v += 1)>"Refresh"</button>
            </div>

            <div class="deal-filters">
                <input
                    type="search"
                    placeholder="Search name, client, sector..."
                    prop:value=move || query.get()
                    on:input=move |ev| set_query.set(event_target_value(&ev))
                />
                <select on:change=move |ev| set_stage_filter.set(DealStage::parse(&event_target_value(&ev)))>
                    <option value="">"All stages"</option>
                    {DealStage::ALL.iter().map(|stage| view! {
                        <option value=stage.as_str()>{stage.label()}</option>
                    }).collect_view()}
                </select>
            </div>

            {move || load_error.get().map(|message| view! {
                <div class="form-error">{message}</div>
            })}

            <Show when=move || !loading.get() fallback=|| view! { <div class="loading">"Loading deals..."</div> }>
                <Show
                    when=move || !visible.with(Vec::is_empty)
                    fallback=|| view! { <div class="empty-message">"No deals found"</div> }
                >
                    <table class="deal-table">
                        <thead>
                            <tr>
                                <th>"Deal"</th>
                                <th>"Client"</th>
                                <th>"Type"</th>
                                <th>"Sector"</th>
                                <th>"Stage"</th>
                                <Show when=is_admin>
                                    <th>"Value"</th>
                                </Show>
                                <th>"Actions"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || visible.get()
                                key=|deal| (deal.id.clone(), deal.stage.clone(), deal.deal_value.map(f64::to_bits))
                                children=move |deal| {
                                    let id = deal.id.clone();
                                    let for_stage = deal.clone();
                                    let for_delete = deal.clone();
                                    let value = deal.deal_value.map(format_money).unwrap_or_else(|| "-".to_string());
                                    view! {
                                        <tr class="deal-row" on:click=move |_| ctx.navigate(Route::DealDetail(id.clone()))>
                                            <td>{deal.deal_name.clone()}</td>
                                            <td>{deal.client_name.clone()}</td>
                                            <td>{deal.deal_type.clone().unwrap_or_default()}</td>
                                            <td>{deal.sector.clone().unwrap_or_default()}</td>
                                            <td><StageBadge stage=deal.stage.clone() /></td>
                                            <Show when=is_admin>
                                                <td class="deal-value">{value.clone()}</td>
                                            </Show>
                                            <td class="row-actions" on:click=|ev| ev.stop_propagation()>
                                                <button on:click=move |_| set_stage_target.set(Some(for_stage.clone()))>
                                                    "Stage"
                                                </button>
                                                <Show when=is_admin>
                                                    <DeleteConfirmButton
                                                        subject=for_delete.display_name().to_string()
                                                        on_confirm={
                                                            let deal = for_delete.clone();
                                                            move |_: ()| delete_deal(deal.clone())
                                                        }
                                                    />
                                                </Show>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </Show>
            </Show>

            {move || stage_target.get().map(|deal| view! {
                <StageDialog
                    deal=deal
                    on_updated=on_stage_changed
                    on_cancel=move |_: ()| set_stage_target.set(None)
                />
            })}
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deal(name: &str, sector: &str, stage: &str) -> Deal {
        Deal {
            id: name.to_lowercase(),
            deal_name: name.to_string(),
            client_name: format!("{name} Holdings"),
            sector: Some(sector.to_string()),
            stage: Some(stage.to_string()),
            ..Deal::default()
        }
    }

    #[test]
    fn test_filter_by_stage_includes_legacy_values() {
        let legacy = deal("Falcon", "Tech", "PROPOSAL");
        assert!(matches_filter(&legacy, Some(DealStage::TermSheetSubmitted), ""));
        assert!(!matches_filter(&legacy, Some(DealStage::Closed), ""));
        assert!(matches_filter(&legacy, None, ""));
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let d = deal("Falcon", "Healthcare", "Prospect");
        assert!(matches_filter(&d, None, "falc"));
        assert!(matches_filter(&d, None, " HOLDINGS "));
        assert!(matches_filter(&d, None, "health"));
        assert!(!matches_filter(&d, None, "energy"));
    }

    #[test]
    fn test_unstaged_deal_hidden_by_stage_filter() {
        let mut d = deal("Orphan", "Tech", "");
        d.stage = None;
        assert!(!matches_filter(&d, Some(DealStage::Prospect), ""));
        assert!(matches_filter(&d, None, "orphan"));
    }
}
