//! Deal Pipeline App
//!
//! Root component: builds the services, runs the guard on every route change
//! and switches between views.

use leptos::ev;
use leptos::prelude::*;
use reactive_stores::Store;

use crate::components::{
    CreateUserForm, DealDetail, DealEditForm, DealForm, DealList, LoginPage, NavBar, ToastHost, UserList,
};
use crate::config::AppConfig;
use crate::context::{AppContext, Services};
use crate::notify::Notifier;
use crate::routes::{needs_startup_redirect, BrowserNavigator, Navigator, Route};
use crate::store::AppState;

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_build_env();
    tracing::info!(api = %config.api_base_url, "starting deal pipeline ui");

    let route = RwSignal::new(BrowserNavigator::location_route());
    let navigator = BrowserNavigator::new(route);
    apply_startup_redirect(&navigator);

    let notifier = Notifier::new(config.toast_ms);
    let ctx = AppContext::new(route, notifier, Services::browser(config, navigator));
    provide_context(ctx);
    provide_context(Store::new(AppState::default()));

    // Back/forward buttons
    let _ = window_event_listener(ev::popstate, move |_| {
        route.set(BrowserNavigator::location_route());
    });

    // View actually on screen; only set once the guard lets it through
    let shown = RwSignal::new(None::<Route>);
    Effect::new(move |_| {
        let requested = route.get();
        if ctx.allows(&requested) {
            shown.set(Some(requested));
        }
    });

    view! {
        <div class="app-layout">
            <Show when=move || shown.with(|r| r.as_ref().is_some_and(Route::is_protected))>
                <NavBar />
            </Show>

            <main class="main-content">
                {move || match shown.get() {
                    None => view! { <div class="loading">"Loading..."</div> }.into_any(),
                    Some(Route::Login { return_url }) => view! { <LoginPage return_url=return_url /> }.into_any(),
                    Some(Route::Deals) => view! { <DealList /> }.into_any(),
                    Some(Route::DealNew) => view! { <DealForm /> }.into_any(),
                    Some(Route::DealDetail(id)) => view! { <DealDetail id=id /> }.into_any(),
                    Some(Route::DealEdit(id)) => view! { <DealEditForm id=id /> }.into_any(),
                    Some(Route::AdminUsers) => view! { <UserList /> }.into_any(),
                    Some(Route::AdminUserNew) => view! { <CreateUserForm /> }.into_any(),
                }}
            </main>

            <ToastHost />
        </div>
    }
}

/// A fresh load straight onto a deals view starts at login instead
fn apply_startup_redirect(navigator: &BrowserNavigator) {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return;
    };
    let path = location.pathname().unwrap_or_default();
    let search = location.search().unwrap_or_default();
    if needs_startup_redirect(&path, &search) {
        tracing::info!(path = %path, "fresh load on a deals view, starting at login");
        navigator.navigate(Route::login(), true);
    }
}
