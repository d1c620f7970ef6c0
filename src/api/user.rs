//! User Administration Calls

use crate::error::ApiResult;
use crate::models::{UpdateUserStatusRequest, User, UserDraft};
use crate::normalize::{normalize_status_update, normalize_user, normalize_users};
use crate::validate;

use super::{segment, ApiClient};

pub async fn list_users(client: &ApiClient) -> ApiResult<Vec<User>> {
    let body = client.get("/admin/users").await?;
    Ok(normalize_users(&body))
}

pub async fn create_user(client: &ApiClient, draft: &UserDraft) -> ApiResult<User> {
    let request = validate::create_user(draft)?;
    let body = client.post("/admin/users", &request).await?;
    let user = normalize_user(&body);
    tracing::info!(username = %request.username, role = request.role.as_str(), "user created");
    Ok(user)
}

/// Enable or disable an account. Falls back to the requested state when the
/// backend echoes nothing useful.
pub async fn set_user_enabled(client: &ApiClient, id: &str, enabled: bool) -> ApiResult<User> {
    let request = UpdateUserStatusRequest::from_enabled(enabled);
    let path = format!("/admin/users/{}/status", segment(id));
    let body = client.put(&path, &request).await?;
    tracing::info!(id, enabled, "user status changed");
    Ok(normalize_status_update(&body, id, enabled))
}
