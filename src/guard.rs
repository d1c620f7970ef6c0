//! Route Guard
//!
//! [`decide`] is the pure access decision for protected views. [`RouteGuard`]
//! applies it: at most one logout and exactly one navigation per denial.

use std::rc::Rc;

use crate::routes::{Navigator, Route};
use crate::session::{is_usable_token, SessionService};

/// Outcome of a guard evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Token present but no login in this browsing session: back to login,
    /// replacing history, no `returnUrl`
    FreshLoad,
    /// No usable (or no valid) token
    Denied { return_url: String, clear_session: bool },
}

/// Access decision for a protected view
pub fn decide(
    token: Option<&str>,
    token_valid: bool,
    logged_in_this_session: bool,
    requested_url: &str,
) -> GuardDecision {
    let usable = is_usable_token(token);

    if usable && token_valid && logged_in_this_session {
        return GuardDecision::Allow;
    }
    if usable && !logged_in_this_session {
        return GuardDecision::FreshLoad;
    }

    GuardDecision::Denied {
        return_url: requested_url.to_string(),
        // a whitespace-only token still counts as something to clear
        clear_session: token.is_some_and(|t| !t.is_empty()),
    }
}

/// Applies guard decisions against the live session
#[derive(Clone)]
pub struct RouteGuard {
    session: SessionService,
    navigator: Rc<dyn Navigator>,
}

impl RouteGuard {
    pub fn new(session: SessionService, navigator: Rc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    /// Whether `route` may be shown. When it may not, the redirect has
    /// already been issued.
    pub fn check(&self, route: &Route) -> bool {
        if !route.is_protected() {
            return true;
        }

        let token = self.session.token();
        let decision = decide(
            token.as_deref(),
            self.session.is_authenticated(),
            self.session.has_logged_in_this_session(),
            &route.to_url(),
        );

        match decision {
            GuardDecision::Allow => self.check_admin(route),
            GuardDecision::FreshLoad => {
                tracing::info!("no login in this browsing session, showing login");
                self.navigator.navigate(Route::login(), true);
                false
            }
            GuardDecision::Denied { return_url, clear_session } => {
                tracing::info!(return_url = %return_url, "not authenticated");
                if clear_session {
                    self.session.logout();
                }
                self.navigator.navigate(Route::login_returning_to(return_url), false);
                false
            }
        }
    }

    fn check_admin(&self, route: &Route) -> bool {
        if !route.requires_admin() || self.session.is_admin() {
            return true;
        }
        tracing::warn!(url = %route.to_url(), "admin view refused for non-admin user");
        self.navigator.navigate(Route::Deals, false);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, User};
    use crate::routes::testing::RecordingNavigator;
    use crate::session::{memory_session, MemoryStore, KeyValueStore, TOKEN_KEY};

    fn user(role: Role) -> User {
        User {
            id: "u1".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            role,
            enabled: true,
        }
    }

    fn guard_with(session: SessionService) -> (RouteGuard, Rc<RecordingNavigator>) {
        let navigator = Rc::new(RecordingNavigator::at("/"));
        (RouteGuard::new(session, navigator.clone()), navigator)
    }

    #[test]
    fn test_decide_no_token() {
        assert_eq!(
            decide(None, false, false, "/deals/7"),
            GuardDecision::Denied { return_url: "/deals/7".to_string(), clear_session: false }
        );
    }

    #[test]
    fn test_decide_whitespace_token_clears() {
        assert_eq!(
            decide(Some("   "), false, true, "/deals"),
            GuardDecision::Denied { return_url: "/deals".to_string(), clear_session: true }
        );
        assert_eq!(
            decide(Some("   "), false, false, "/deals/7"),
            GuardDecision::Denied { return_url: "/deals/7".to_string(), clear_session: true }
        );
        assert_eq!(
            decide(Some(""), false, true, "/deals"),
            GuardDecision::Denied { return_url: "/deals".to_string(), clear_session: false }
        );
    }

    #[test]
    fn test_decide_fresh_load() {
        assert_eq!(decide(Some("abc"), true, false, "/deals"), GuardDecision::FreshLoad);
    }

    #[test]
    fn test_decide_allow() {
        assert_eq!(decide(Some("abc"), true, true, "/deals"), GuardDecision::Allow);
    }

    #[test]
    fn test_decide_invalid_token_denied() {
        assert_eq!(
            decide(Some("abc"), false, true, "/admin/users"),
            GuardDecision::Denied { return_url: "/admin/users".to_string(), clear_session: true }
        );
    }

    #[test]
    fn test_login_view_always_allowed() {
        let (guard, navigator) = guard_with(memory_session());
        assert!(guard.check(&Route::login()));
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn test_denied_navigates_once_with_return_url() {
        let (guard, navigator) = guard_with(memory_session());
        assert!(!guard.check(&Route::DealDetail("42".to_string())));
        assert_eq!(
            navigator.visits(),
            vec![(Route::login_returning_to("/deals/42"), false)]
        );
    }

    #[test]
    fn test_whitespace_token_is_cleared_on_denial() {
        let durable = Rc::new(MemoryStore::new());
        durable.set(TOKEN_KEY, "  ");
        let session = SessionService::new(durable.clone(), Rc::new(MemoryStore::new()));
        session.mark_logged_in_this_session();

        let (guard, navigator) = guard_with(session.clone());
        assert!(!guard.check(&Route::Deals));
        assert_eq!(durable.get(TOKEN_KEY), None);
        assert!(!session.has_logged_in_this_session());
        assert_eq!(navigator.visits().len(), 1);
    }

    #[test]
    fn test_fresh_load_replaces_history() {
        let durable = Rc::new(MemoryStore::new());
        durable.set(TOKEN_KEY, "abc");
        let session = SessionService::new(durable.clone(), Rc::new(MemoryStore::new()));

        let (guard, navigator) = guard_with(session);
        assert!(!guard.check(&Route::Deals));
        assert_eq!(navigator.visits(), vec![(Route::login(), true)]);
        // the token is kept for the next interactive login
        assert_eq!(durable.get(TOKEN_KEY).as_deref(), Some("abc"));
    }

    #[test]
    fn test_allowed_after_login() {
        let session = memory_session();
        session.establish("abc", &user(Role::User));
        let (guard, navigator) = guard_with(session);
        assert!(guard.check(&Route::Deals));
        assert!(guard.check(&Route::DealNew));
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn test_admin_gate() {
        let session = memory_session();
        session.establish("abc", &user(Role::User));
        let (guard, navigator) = guard_with(session.clone());
        assert!(!guard.check(&Route::AdminUsers));
        assert_eq!(navigator.visits(), vec![(Route::Deals, false)]);

        session.set_user(&user(Role::Admin));
        assert!(guard.check(&Route::AdminUserNew));
        assert_eq!(navigator.visits().len(), 1);
    }
}
