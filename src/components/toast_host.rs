//! Toast Host Component

use leptos::prelude::*;

use crate::context::use_app_context;

/// Renders the notification queue; click a toast to dismiss it early
#[component]
pub fn ToastHost() -> impl IntoView {
    let notifier = use_app_context().notifier;

    view! {
        <div class="toast-host">
            <For
                each=move || notifier.toasts()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.level.css_class() on:click=move |_| notifier.dismiss(id)>
                            {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
