//! User Administration Components
//!
//! Admin-only account list with enable/disable, and the create-user form.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::context::use_app_context;
use crate::models::{Role, User, UserDraft};
use crate::routes::Route;
use crate::store::{store_upsert_user, use_app_store, AppStateStoreFields};

#[component]
pub fn UserList() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (loading, set_loading) = signal(true);
    let (pending, set_pending) = signal::<Option<String>>(None);

    Effect::new(move |_| {
        spawn_local(async move {
            match api::list_users(&ctx.client()).await {
                Ok(users) => *store.users().write() = users,
                Err(e) => ctx.notifier.error(&e),
            }
            set_loading.set(false);
        });
    });

    let toggle = move |user: User| {
        if user.id.is_empty() {
            ctx.notifier.info("Invalid user ID");
            return;
        }
        let enable = !user.enabled;
        set_pending.set(Some(user.id.clone()));
        spawn_local(async move {
            match api::set_user_enabled(&ctx.client(), &user.id, enable).await {
                Ok(mut updated) => {
                    // keep what the list already knows when the echo is sparse
                    if updated.username.is_empty() {
                        updated = User { enabled: updated.enabled, ..user.clone() };
                    }
                    let verb = if updated.enabled { "enabled" } else { "disabled" };
                    ctx.notifier.success(format!("User {} {}", updated.username, verb));
                    store_upsert_user(&store, updated);
                }
                Err(e) => ctx.notifier.error(&e),
            }
            set_pending.set(None);
        });
    };

    view! {
        <section class="user-admin">
            <div class="page-header">
                <h1>"Users"</h1>
                <button class="primary-btn" on:click=move |_| ctx.navigate(Route::AdminUserNew)>"New User"</button>
            </div>

            <Show when=move || !loading.get() fallback=|| view! { <div class="loading">"Loading users..."</div> }>
                <table class="user-table">
                    <thead>
                        <tr>
                            <th>"Username"</th>
                            <th>"Email"</th>
                            <th>"Role"</th>
                            <th>"Status"</th>
                            <th>"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || store.users().get()
                            key=|user| (user.id.clone(), user.enabled, user.role)
                            children=move |user| {
                                let id = user.id.clone();
                                let busy = move || pending.get().as_deref() == Some(id.as_str());
                                let target = user.clone();
                                view! {
                                    <tr class=if user.enabled { "user-row" } else { "user-row disabled" }>
                                        <td>{user.username.clone()}</td>
                                        <td>{user.email.clone()}</td>
                                        <td><span class="role-badge">{user.role.as_str()}</span></td>
                                        <td>{if user.enabled { "Active" } else { "Disabled" }}</td>
                                        <td>
                                            <button
                                                disabled=busy
                                                on:click=move |_| toggle(target.clone())
                                            >
                                                {if user.enabled { "Disable" } else { "Enable" }}
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </Show>
        </section>
    }
}

#[component]
pub fn CreateUserForm() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (role, set_role) = signal(Role::User);
    let (saving, set_saving) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = UserDraft {
            username: username.get(),
            email: email.get(),
            password: password.get(),
            role: role.get().as_str().to_string(),
        };
        set_error.set(None);
        set_saving.set(true);
        spawn_local(async move {
            match api::create_user(&ctx.client(), &draft).await {
                Ok(user) => {
                    ctx.notifier.success(format!("User {} created", draft.username.trim()));
                    if !user.id.is_empty() {
                        store_upsert_user(&store, user);
                    }
                    ctx.navigate(Route::AdminUsers);
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
        <section class="user-form">
            <h1>"New User"</h1>

            {move || error.get().map(|message| view! { <div class="form-error">{message}</div> })}

            <form on:submit=on_submit>
                <label class="form-field">
                    "Username"
                    <input
                        type="text"
                        prop:value=move || username.get()
                        on:input=move |ev| set_username.set(event_target_value(&ev))
                    />
                </label>
                <label class="form-field">
                    "Email"
                    <input
                        type="email"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </label>
                <label class="form-field">
                    "Password"
                    <input
                        type="password"
                        autocomplete="new-password"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </label>
                <label class="form-field">
                    "Role"
                    <select on:change=move |ev| set_role.set(Role::from_claim(&event_target_value(&ev)))>
                        <option value="USER" selected=move || role.get() == Role::User>"User"</option>
                        <option value="ADMIN" selected=move || role.get() == Role::Admin>"Admin"</option>
                    </select>
                </label>

                <div class="form-actions">
                    <button type="button" on:click=move |_| ctx.navigate(Route::AdminUsers)>"Cancel"</button>
                    <button type="submit" class="primary-btn" disabled=move || saving.get()>
                        {move || if saving.get() { "Creating..." } else { "Create User" }}
                    </button>
                </div>
            </form>
        </section>
    }
}
