//! Application Context
//!
//! Shared state provided via Leptos Context API. The service objects are
//! single-threaded (`Rc`, browser handles), so they sit in local storage
//! behind a `Copy` handle.

use std::rc::Rc;

use leptos::prelude::*;

use crate::api::{ApiClient, HttpTransport};
use crate::config::AppConfig;
use crate::guard::RouteGuard;
use crate::interceptor::RequestInterceptor;
use crate::notify::Notifier;
use crate::routes::{BrowserNavigator, Navigator, Route};
use crate::session::SessionService;

/// Everything built once at startup
#[derive(Clone)]
pub struct Services {
    pub client: ApiClient,
    pub guard: RouteGuard,
    pub navigator: Rc<dyn Navigator>,
}

impl Services {
    pub fn browser(config: AppConfig, navigator: BrowserNavigator) -> Self {
        let session = SessionService::browser();
        let navigator: Rc<dyn Navigator> = Rc::new(navigator);
        let interceptor = RequestInterceptor::new(session.clone(), navigator.clone());
        let client = ApiClient::new(config, Rc::new(HttpTransport::new()), interceptor);
        let guard = RouteGuard::new(session, navigator.clone());
        Self { client, guard, navigator }
    }
}

/// App-wide signals and services provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Route requested by the address bar or by navigation
    pub route: RwSignal<Route>,
    /// Bumped on login and logout so session-dependent views re-read
    session_version: RwSignal<u32>,
    pub notifier: Notifier,
    services: StoredValue<Services, LocalStorage>,
}

impl AppContext {
    pub fn new(route: RwSignal<Route>, notifier: Notifier, services: Services) -> Self {
        Self {
            route,
            session_version: RwSignal::new(0),
            notifier,
            services: StoredValue::new_local(services),
        }
    }

    pub fn client(&self) -> ApiClient {
        self.services.with_value(|s| s.client.clone())
    }

    pub fn session(&self) -> SessionService {
        self.services.with_value(|s| s.client.session().clone())
    }

    /// Run the guard for `route`; a refusal has already redirected
    pub fn allows(&self, route: &Route) -> bool {
        self.services.with_value(|s| s.guard.check(route))
    }

    pub fn navigate(&self, route: Route) {
        self.services.with_value(|s| s.navigator.navigate(route, false));
    }

    /// Tracked read of the session generation
    pub fn session_version(&self) -> u32 {
        self.session_version.get()
    }

    /// Signal that login or logout changed the session
    pub fn session_changed(&self) {
        self.session_version.update(|v| *v += 1);
    }
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
