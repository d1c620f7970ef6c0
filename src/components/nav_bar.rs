//! Navigation Bar Component

use leptos::prelude::*;

use crate::api;
use crate::context::use_app_context;
use crate::routes::Route;
use crate::store::{store_clear, use_app_store};

#[component]
pub fn NavBar() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let current_user = move || {
        ctx.session_version();
        ctx.session().user()
    };
    let is_admin = move || current_user().is_some_and(|u| u.is_admin());

    let link = move |label: &'static str, route: Route| {
        let target = route.clone();
        let active = move || {
            let current = ctx.route.get();
            current == target
        };
        view! {
            <button
                class=move || if active() { "nav-link active" } else { "nav-link" }
                on:click=move |_| ctx.navigate(route.clone())
            >
                {label}
            </button>
        }
    };

    let on_logout = move |_| {
        api::logout(&ctx.client());
        store_clear(&store);
        ctx.session_changed();
        ctx.notifier.info("Signed out");
        ctx.navigate(Route::login());
    };

    view! {
        <nav class="nav-bar">
            <span class="nav-title">"Deal Pipeline"</span>
            {link("Deals", Route::Deals)}
            {link("New Deal", Route::DealNew)}
            <Show when=is_admin>
                {link("Users", Route::AdminUsers)}
            </Show>
            <span class="nav-spacer"></span>
            {move || current_user().map(|user| view! {
                <span class="nav-user">
                    {user.username.clone()}
                    <span class="role-badge">{user.role.as_str()}</span>
                </span>
            })}
            <button class="nav-logout" on:click=on_logout>"Logout"</button>
        </nav>
    }
}
