//! Login Page Component
//!
//! Username/password form. On success the browsing-session flag is set by
//! the session store and the user is sent to `returnUrl` or the deal list.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::context::use_app_context;
use crate::routes::Route;
use crate::store::{store_clear, use_app_store};

#[component]
pub fn LoginPage(return_url: Option<String>) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (submitting, set_submitting) = signal(false);

    let target = StoredValue::new(return_url.clone());

    // Already signed in and sent here with a destination: go straight there
    if let Some(url) = return_url {
        if ctx.session().is_authenticated() {
            tracing::info!(return_url = %url, "already authenticated, returning");
            ctx.navigate(Route::parse(&url));
        }
    }

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get() {
            return;
        }
        let user = username.get();
        let pass = password.get();
        set_error.set(None);
        set_submitting.set(true);

        spawn_local(async move {
            match api::login(&ctx.client(), &user, &pass).await {
                Ok(logged_in) => {
                    store_clear(&store);
                    ctx.session_changed();
                    ctx.notifier.success(format!("Welcome, {}", logged_in.username));
                    let destination = target
                        .get_value()
                        .map(|url| Route::parse(&url))
                        .filter(|route| route.is_protected())
                        .unwrap_or(Route::Deals);
                    ctx.navigate(destination);
                }
                Err(e) => {
                    set_error.set(Some(e.to_string()));
                    set_password.set(String::new());
                }
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="login-page">
            <form class="login-form" on:submit=on_submit>
                <h1>"Deal Pipeline"</h1>
                <p class="login-subtitle">"Sign in to continue"</p>

                {move || error.get().map(|message| view! {
                    <div class="form-error">{message}</div>
                })}

                <label>
                    "Username"
                    <input
                        type="text"
                        autocomplete="username"
                        prop:value=move || username.get()
                        on:input=move |ev| set_username.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Password"
                    <input
                        type="password"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </label>

                <button type="submit" class="primary-btn" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </div>
    }
}
