//! Session Store
//!
//! Bearer token and cached user live in durable storage (`localStorage`);
//! the "logged in during this browsing session" flag lives in ephemeral
//! storage (`sessionStorage`). One [`SessionService`] is built at startup and
//! shared by the guard, the interceptor and the views.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::models::User;

/// Durable key holding the bearer token
pub const TOKEN_KEY: &str = "auth_token";
/// Durable key holding the cached user record (JSON)
pub const USER_KEY: &str = "user_data";
/// Ephemeral key set after an interactive login
pub const SESSION_FLAG_KEY: &str = "hasLoggedInThisSession";

/// Minimal string key/value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `window.localStorage` / `window.sessionStorage`
pub struct BrowserStore {
    storage: web_sys::Storage,
    name: &'static str,
}

impl BrowserStore {
    pub fn local() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { storage, name: "localStorage" })
    }

    pub fn session() -> Option<Self> {
        let storage = web_sys::window()?.session_storage().ok().flatten()?;
        Some(Self { storage, name: "sessionStorage" })
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set_item(key, value) {
            tracing::warn!(store = self.name, key, "write failed: {:?}", e);
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = self.storage.remove_item(key) {
            tracing::warn!(store = self.name, key, "remove failed: {:?}", e);
        }
    }
}

/// In-memory storage; used when the browser refuses storage access
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// A token is usable iff it is present and non-blank
pub fn is_usable_token(token: Option<&str>) -> bool {
    token.is_some_and(|t| !t.trim().is_empty())
}

/// Client-side session: token, cached user, browsing-session flag
#[derive(Clone)]
pub struct SessionService {
    durable: Rc<dyn KeyValueStore>,
    ephemeral: Rc<dyn KeyValueStore>,
}

impl SessionService {
    pub fn new(durable: Rc<dyn KeyValueStore>, ephemeral: Rc<dyn KeyValueStore>) -> Self {
        Self { durable, ephemeral }
    }

    /// Browser storage, falling back to memory when unavailable
    pub fn browser() -> Self {
        let durable: Rc<dyn KeyValueStore> = match BrowserStore::local() {
            Some(store) => Rc::new(store),
            None => {
                tracing::warn!("localStorage unavailable, session will not survive reloads");
                Rc::new(MemoryStore::new())
            }
        };
        let ephemeral: Rc<dyn KeyValueStore> = match BrowserStore::session() {
            Some(store) => Rc::new(store),
            None => {
                tracing::warn!("sessionStorage unavailable, using memory");
                Rc::new(MemoryStore::new())
            }
        };
        Self::new(durable, ephemeral)
    }

    /// Raw stored token, exactly as persisted
    pub fn token(&self) -> Option<String> {
        self.durable.get(TOKEN_KEY)
    }

    /// Trimmed token, `None` when absent or blank
    pub fn usable_token(&self) -> Option<String> {
        self.token()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    pub fn set_token(&self, token: &str) {
        self.durable.set(TOKEN_KEY, token.trim());
    }

    /// Cached user; a corrupt record reads as absent
    pub fn user(&self) -> Option<User> {
        let raw = self.durable.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("ignoring corrupt cached user: {}", e);
                None
            }
        }
    }

    pub fn set_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => self.durable.set(USER_KEY, &json),
            Err(e) => tracing::error!("failed to cache user: {}", e),
        }
    }

    /// Store the result of a successful login
    pub fn establish(&self, token: &str, user: &User) {
        self.set_token(token);
        self.set_user(user);
        self.mark_logged_in_this_session();
    }

    pub fn is_authenticated(&self) -> bool {
        is_usable_token(self.token().as_deref())
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|u| u.is_admin())
    }

    pub fn has_logged_in_this_session(&self) -> bool {
        self.ephemeral.get(SESSION_FLAG_KEY).as_deref() == Some("true")
    }

    pub fn mark_logged_in_this_session(&self) {
        self.ephemeral.set(SESSION_FLAG_KEY, "true");
    }

    /// Forget token, user and the browsing-session flag
    pub fn logout(&self) {
        self.durable.remove(TOKEN_KEY);
        self.durable.remove(USER_KEY);
        self.ephemeral.remove(SESSION_FLAG_KEY);
        tracing::info!("session cleared");
    }
}

#[cfg(test)]
pub(crate) fn memory_session() -> SessionService {
    SessionService::new(Rc::new(MemoryStore::new()), Rc::new(MemoryStore::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn admin() -> User {
        User {
            id: "u1".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::Admin,
            enabled: true,
        }
    }

    #[test]
    fn test_usable_token_rules() {
        assert!(!is_usable_token(None));
        assert!(!is_usable_token(Some("")));
        assert!(!is_usable_token(Some("   \t")));
        assert!(is_usable_token(Some(" abc ")));
    }

    #[test]
    fn test_establish_and_logout() {
        let session = memory_session();
        assert!(!session.is_authenticated());
        assert!(!session.has_logged_in_this_session());

        session.establish("  jwt-token  ", &admin());
        assert_eq!(session.token().as_deref(), Some("jwt-token"));
        assert!(session.is_authenticated());
        assert!(session.is_admin());
        assert!(session.has_logged_in_this_session());

        session.logout();
        assert_eq!(session.token(), None);
        assert_eq!(session.user(), None);
        assert!(!session.has_logged_in_this_session());
    }

    #[test]
    fn test_whitespace_token_not_authenticated() {
        let durable = Rc::new(MemoryStore::new());
        durable.set(TOKEN_KEY, "   ");
        let session = SessionService::new(durable, Rc::new(MemoryStore::new()));
        assert!(session.token().is_some());
        assert_eq!(session.usable_token(), None);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_corrupt_user_reads_as_none() {
        let durable = Rc::new(MemoryStore::new());
        durable.set(USER_KEY, "{not json");
        let session = SessionService::new(durable, Rc::new(MemoryStore::new()));
        assert_eq!(session.user(), None);
        assert!(!session.is_admin());
    }

    #[test]
    fn test_flag_survives_only_in_ephemeral_store() {
        let durable: Rc<MemoryStore> = Rc::new(MemoryStore::new());
        let first = SessionService::new(durable.clone(), Rc::new(MemoryStore::new()));
        first.establish("t", &admin());

        // new browsing session: same durable store, fresh ephemeral store
        let reopened = SessionService::new(durable, Rc::new(MemoryStore::new()));
        assert!(reopened.is_authenticated());
        assert!(!reopened.has_logged_in_this_session());
    }
}
