//! Routes & Navigation
//!
//! The view table, URL parsing, and the [`Navigator`] seam used by the guard
//! and the request interceptor. In the browser, navigation goes through the
//! History API and a route signal drives the view switch.

use leptos::prelude::*;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const LOGIN_PATH: &str = "/login";
pub const LANDING_PATH: &str = "/deals";

/// Query parameter carrying the view to return to after login
pub const RETURN_URL_PARAM: &str = "returnUrl";

/// Characters left readable inside an encoded `returnUrl`
const RETURN_URL_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const DEAL_ID_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

/// Every view the application can show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login { return_url: Option<String> },
    Deals,
    DealNew,
    DealDetail(String),
    DealEdit(String),
    AdminUsers,
    AdminUserNew,
}

impl Route {
    pub fn login() -> Self {
        Self::Login { return_url: None }
    }

    pub fn login_returning_to(url: impl Into<String>) -> Self {
        Self::Login { return_url: Some(url.into()) }
    }

    /// Parse a path with optional query. Unknown paths fall back to login.
    pub fn parse(url: &str) -> Self {
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (url, None),
        };
        let path = path.split('#').next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["login"] => Self::Login {
                return_url: query.and_then(|q| query_param(q, RETURN_URL_PARAM)),
            },
            ["deals"] => Self::Deals,
            ["deals", "new"] => Self::DealNew,
            ["deals", id] => Self::DealDetail(decode(id)),
            ["deals", id, "edit"] => Self::DealEdit(decode(id)),
            ["admin", "users"] => Self::AdminUsers,
            ["admin", "users", "new"] => Self::AdminUserNew,
            _ => Self::login(),
        }
    }

    /// Full URL for this route, including the encoded `returnUrl`
    pub fn to_url(&self) -> String {
        match self {
            Self::Login { return_url: Some(url) } => format!(
                "{LOGIN_PATH}?{RETURN_URL_PARAM}={}",
                utf8_percent_encode(url, RETURN_URL_SET)
            ),
            Self::Login { return_url: None } => LOGIN_PATH.to_string(),
            Self::Deals => LANDING_PATH.to_string(),
            Self::DealNew => "/deals/new".to_string(),
            Self::DealDetail(id) => format!("/deals/{}", utf8_percent_encode(id, DEAL_ID_SET)),
            Self::DealEdit(id) => format!("/deals/{}/edit", utf8_percent_encode(id, DEAL_ID_SET)),
            Self::AdminUsers => "/admin/users".to_string(),
            Self::AdminUserNew => "/admin/users/new".to_string(),
        }
    }

    /// Everything except the login view needs a session
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Login { .. })
    }

    pub fn requires_admin(&self) -> bool {
        matches!(self, Self::AdminUsers | Self::AdminUserNew)
    }
}

fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| decode(&value.replace('+', " ")))
        .filter(|value| !value.is_empty())
}

/// True when the app is first loaded straight onto a deals view without a
/// pending `returnUrl`; such loads start at the login view instead.
pub fn needs_startup_redirect(path: &str, search: &str) -> bool {
    let on_deals = path == LANDING_PATH || path.starts_with("/deals/");
    let search = search.trim_start_matches('?');
    on_deals && query_param(search, RETURN_URL_PARAM).is_none()
}

// ========================
// Navigator
// ========================

/// Where navigation requests from non-view code go
pub trait Navigator {
    /// URL of the view currently shown (path and query)
    fn current_url(&self) -> String;

    /// Show `route`; `replace` swaps the current history entry instead of pushing
    fn navigate(&self, route: Route, replace: bool);
}

/// History API navigation feeding the app's route signal
#[derive(Clone, Copy)]
pub struct BrowserNavigator {
    route: RwSignal<Route>,
}

impl BrowserNavigator {
    pub fn new(route: RwSignal<Route>) -> Self {
        Self { route }
    }

    /// Route for the address bar as it is right now
    pub fn location_route() -> Route {
        Route::parse(&location_url().unwrap_or_default())
    }
}

fn location_url() -> Option<String> {
    let location = web_sys::window()?.location();
    let path = location.pathname().ok()?;
    let search = location.search().unwrap_or_default();
    Some(format!("{path}{search}"))
}

impl Navigator for BrowserNavigator {
    fn current_url(&self) -> String {
        location_url().unwrap_or_else(|| self.route.get_untracked().to_url())
    }

    fn navigate(&self, route: Route, replace: bool) {
        let url = route.to_url();
        tracing::debug!(url = %url, replace, "navigate");

        if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
            let result = if replace {
                history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&url))
            } else {
                history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&url))
            };
            if let Err(e) = result {
                tracing::warn!(url = %url, "history update failed: {:?}", e);
            }
        }

        self.route.set(route);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::{Navigator, Route};

    /// Records every navigation instead of performing it
    #[derive(Default)]
    pub struct RecordingNavigator {
        pub current: RefCell<String>,
        pub visits: RefCell<Vec<(Route, bool)>>,
    }

    impl RecordingNavigator {
        pub fn at(url: &str) -> Self {
            Self { current: RefCell::new(url.to_string()), visits: RefCell::default() }
        }

        pub fn visits(&self) -> Vec<(Route, bool)> {
            self.visits.borrow().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn current_url(&self) -> String {
            self.current.borrow().clone()
        }

        fn navigate(&self, route: Route, replace: bool) {
            *self.current.borrow_mut() = route.to_url();
            self.visits.borrow_mut().push((route, replace));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_views() {
        assert_eq!(Route::parse("/deals"), Route::Deals);
        assert_eq!(Route::parse("/deals/"), Route::Deals);
        assert_eq!(Route::parse("/deals/new"), Route::DealNew);
        assert_eq!(Route::parse("/deals/abc123"), Route::DealDetail("abc123".to_string()));
        assert_eq!(Route::parse("/deals/abc123/edit"), Route::DealEdit("abc123".to_string()));
        assert_eq!(Route::parse("/admin/users"), Route::AdminUsers);
        assert_eq!(Route::parse("/admin/users/new"), Route::AdminUserNew);
        assert_eq!(Route::parse("/login"), Route::login());
    }

    #[test]
    fn test_unknown_paths_fall_back_to_login() {
        assert_eq!(Route::parse("/"), Route::login());
        assert_eq!(Route::parse(""), Route::login());
        assert_eq!(Route::parse("/reports/2026"), Route::login());
    }

    #[test]
    fn test_return_url_survives_encoding() {
        let route = Route::login_returning_to("/deals/42/edit?tab=notes&x=1");
        let url = route.to_url();
        assert_eq!(url, "/login?returnUrl=/deals/42/edit%3Ftab%3Dnotes%26x%3D1");
        assert_eq!(Route::parse(&url), route);
    }

    #[test]
    fn test_empty_return_url_is_none() {
        assert_eq!(Route::parse("/login?returnUrl="), Route::login());
        assert_eq!(Route::parse("/login?other=1"), Route::login());
    }

    #[test]
    fn test_protection_and_admin_flags() {
        assert!(!Route::login().is_protected());
        assert!(Route::Deals.is_protected());
        assert!(!Route::Deals.requires_admin());
        assert!(Route::AdminUsers.requires_admin());
        assert!(Route::AdminUserNew.requires_admin());
    }

    #[test]
    fn test_startup_redirect() {
        assert!(needs_startup_redirect("/deals", ""));
        assert!(needs_startup_redirect("/deals/7", "?tab=1"));
        assert!(!needs_startup_redirect("/deals", "?returnUrl=%2Fdeals%2F7"));
        assert!(!needs_startup_redirect("/login", ""));
        assert!(!needs_startup_redirect("/admin/users", ""));
        assert!(!needs_startup_redirect("/dealsx", ""));
    }
}
