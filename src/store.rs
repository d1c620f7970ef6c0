//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::{Deal, User};

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Deals as last loaded from the backend
    pub deals: Vec<Deal>,
    /// Accounts shown in user administration (admins only)
    pub users: Vec<User>,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Replace a deal in the store by ID, or append it if unknown
pub fn store_upsert_deal(store: &AppStore, deal: Deal) {
    let deals = store.deals();
    let mut deals = deals.write();
    match deals.iter_mut().find(|d| d.id == deal.id) {
        Some(existing) => *existing = deal,
        None => deals.push(deal),
    }
}

/// Remove a deal from the store by ID
pub fn store_remove_deal(store: &AppStore, deal_id: &str) {
    store.deals().write().retain(|deal| deal.id != deal_id);
}

/// Replace a user in the store by ID, or append it if unknown
pub fn store_upsert_user(store: &AppStore, user: User) {
    let users = store.users();
    let mut users = users.write();
    match users.iter_mut().find(|u| u.id == user.id) {
        Some(existing) => *existing = user,
        None => users.push(user),
    }
}

/// Drop everything cached for the previous session
pub fn store_clear(store: &AppStore) {
    store.deals().write().clear();
    store.users().write().clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deal(id: &str, name: &str) -> Deal {
        Deal { id: id.to_string(), deal_name: name.to_string(), ..Deal::default() }
    }

    #[test]
    fn test_upsert_deal_replaces_or_appends() {
        let owner = Owner::new();
        owner.set();
        let store = Store::new(AppState::default());

        store_upsert_deal(&store, deal("d1", "Alpha"));
        store_upsert_deal(&store, deal("d2", "Beta"));
        store_upsert_deal(&store, deal("d1", "Alpha Prime"));

        let names: Vec<String> = store.deals().get_untracked().into_iter().map(|d| d.deal_name).collect();
        assert_eq!(names, vec!["Alpha Prime", "Beta"]);

        store_remove_deal(&store, "d2");
        assert_eq!(store.deals().get_untracked().len(), 1);
    }

    #[test]
    fn test_upsert_user_and_clear() {
        let owner = Owner::new();
        owner.set();
        let store = Store::new(AppState::default());

        let ada = User { id: "u1".to_string(), username: "ada".to_string(), ..User::default() };
        store_upsert_user(&store, ada.clone());
        store_upsert_user(&store, User { enabled: !ada.enabled, ..ada });
        assert_eq!(store.users().get_untracked().len(), 1);

        store_upsert_deal(&store, deal("d1", "Alpha"));
        store_clear(&store);
        assert!(store.users().get_untracked().is_empty());
        assert!(store.deals().get_untracked().is_empty());
    }
}
