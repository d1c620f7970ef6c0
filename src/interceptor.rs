//! Request Interceptor
//!
//! Cross-cutting request/response handling for the API client: bearer token
//! on the way out, session expiry and permission redirects on the way back.
//! Requests to the authentication group are left untouched in both
//! directions.

use std::rc::Rc;

use crate::api::ApiRequest;
use crate::error::ApiError;
use crate::routes::{Navigator, Route, LOGIN_PATH};
use crate::session::SessionService;

/// URL fragment identifying the authentication endpoints
pub const AUTH_GROUP: &str = "/auth/";

pub fn is_auth_endpoint(url: &str) -> bool {
    url.contains(AUTH_GROUP)
}

#[derive(Clone)]
pub struct RequestInterceptor {
    session: SessionService,
    navigator: Rc<dyn Navigator>,
}

impl RequestInterceptor {
    pub fn new(session: SessionService, navigator: Rc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    /// `Bearer <token>` for protected URLs while a usable token is stored
    pub fn authorization(&self, url: &str) -> Option<String> {
        if is_auth_endpoint(url) {
            return None;
        }
        self.session.usable_token().map(|token| format!("Bearer {token}"))
    }

    pub fn prepare(&self, request: &mut ApiRequest) {
        match self.authorization(&request.url) {
            Some(value) => request.headers.push(("Authorization".to_string(), value)),
            None if !is_auth_endpoint(&request.url) => {
                tracing::warn!(url = %request.url, "protected request sent without a token");
            }
            None => {}
        }
    }

    /// React to a failed call. The error itself is left for the caller.
    pub fn on_failure(&self, url: &str, error: &ApiError) {
        if is_auth_endpoint(url) {
            return;
        }

        match error {
            ApiError::Unauthorized { .. } => {
                let current = self.navigator.current_url();
                if current.starts_with(LOGIN_PATH) {
                    return;
                }
                tracing::warn!(url = %url, "session rejected by backend, returning to login");
                self.session.logout();
                self.navigator.navigate(Route::login_returning_to(current), false);
            }
            ApiError::Forbidden { .. } => {
                tracing::warn!(url = %url, "forbidden, returning to deals");
                self.navigator.navigate(Route::Deals, false);
            }
            _ => {}
        }
    }
}
