//! Authentication Calls

use crate::error::{ApiError, ApiResult, TransportFailure};
use crate::models::{LoginRequest, User};
use crate::normalize::normalize_login;

use super::ApiClient;

/// Log in and establish the session (token, cached user, browsing-session flag)
pub async fn login(client: &ApiClient, username: &str, password: &str) -> ApiResult<User> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::validation("Username and password are required"));
    }

    let request = LoginRequest { username: username.to_string(), password: password.to_string() };
    let body = client.post("/auth/login", &request).await.map_err(login_failure)?;
    let outcome = normalize_login(&body)?;

    client.session().establish(&outcome.token, &outcome.user);
    tracing::info!(username = %outcome.user.username, role = outcome.user.role.as_str(), "logged in");
    Ok(outcome.user)
}

/// Reword a failed login for the login form. A 401 here means bad
/// credentials, not an expired session.
fn login_failure(error: ApiError) -> ApiError {
    let message = match &error {
        ApiError::Unauthorized { .. } => "Login failed. Please check your username and password.".to_string(),
        ApiError::Forbidden { .. } => "Access forbidden. Your account may not have permission.".to_string(),
        ApiError::BadRequest { .. } => "Invalid request. Please check your input.".to_string(),
        ApiError::Server { status: 500, .. } => "Server error. Please try again later.".to_string(),
        ApiError::NotFound { .. } => "Error 404: Request failed".to_string(),
        ApiError::Server { status, .. } => format!("Error {status}: Request failed"),
        ApiError::Transport { failure: TransportFailure::Unreachable, .. } => {
            "Network Error: Cannot reach backend server. Is it running?".to_string()
        }
        ApiError::Transport { .. } | ApiError::Validation(_) | ApiError::Decode(_) => return error,
    };
    tracing::warn!(status = ?error.status(), "login failed: {}", error);

    match error {
        ApiError::Unauthorized { .. } => ApiError::Unauthorized { message },
        ApiError::Forbidden { .. } => ApiError::Forbidden { message },
        ApiError::BadRequest { .. } => ApiError::BadRequest { message },
        ApiError::NotFound { .. } => ApiError::NotFound { message },
        ApiError::Server { status, .. } => ApiError::Server { status, message },
        ApiError::Transport { failure, .. } => ApiError::Transport { failure, message },
        other => other,
    }
}

/// Clear the local session. There is no server-side logout endpoint.
pub fn logout(client: &ApiClient) {
    client.session().logout();
}
