//! Response Normalizer
//!
//! The backend is unversioned and answers with several shapes for the same
//! entity: wrapped in `data` or `content`, snake_case or camelCase keys,
//! enums as strings or objects. Everything here maps those shapes onto the
//! canonical models. Every precedence is an ordered table so the order can be
//! read and tested on its own.
//!
//! All functions are total: unrecognized input degrades to defaults.

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::models::{Deal, DealNote, Role, User};

type Object = Map<String, Value>;

/// Keys tried, in order, when a collection arrives wrapped in an object.
/// The caller's named key (`deals`, `users`) is tried after these.
pub const COLLECTION_KEYS: &[&str] = &["data", "content"];

/// Alternate keys carrying the stage, tried after `currentStage` and `stage`
pub const STAGE_ALTERNATE_KEYS: &[&str] =
    &["dealStage", "stageType", "stageName", "deal_stage", "stage_type", "stage_name"];

/// `(canonical, alias)`: alias is copied only when the canonical key is absent
pub const FIELD_ALIASES: &[(&str, &str)] = &[
    ("dealName", "deal_name"),
    ("clientName", "client_name"),
    ("expectedCloseDate", "expected_close_date"),
    ("dealValue", "deal_value"),
    ("dealType", "deal_type"),
    ("summary", "description"),
];

/// Named stage extractor
pub type StageExtractor = (&'static str, fn(&Object) -> Option<String>);

/// Stage resolution order; first hit wins
pub const STAGE_EXTRACTORS: &[StageExtractor] = &[
    ("currentStage", stage_from_current),
    ("stage", stage_from_stage_field),
    ("alternates", stage_from_alternates),
];

/// Token keys in a login response, checked in `data` and then at the root
pub const TOKEN_KEYS: &[&str] =
    &["token", "accessToken", "jwtToken", "access_token", "jwt_token", "authToken"];

/// Named role extractor
pub type RoleExtractor = (&'static str, fn(&Object) -> Option<Role>);

/// Role resolution order; first hit wins, default is [`Role::User`]
pub const ROLE_EXTRACTORS: &[RoleExtractor] = &[
    ("roles[]", role_from_roles_array),
    ("roles", role_from_roles_string),
    ("role", role_from_role),
    ("authorities", role_from_authorities),
];

const NOTE_CONTENT_KEYS: &[&str] = &["content", "noteText", "text"];
const NOTE_DATE_KEYS: &[&str] = &["createdDate", "timestamp", "createdAt"];
const NOTE_AUTHOR_KEYS: &[&str] = &["createdBy", "username", "userId"];
const ENABLED_KEYS: &[&str] = &["enabled", "active"];

// ========================
// Envelopes
// ========================

/// Single entity: `response.data` when present, otherwise the response itself
pub fn unwrap_entity(response: &Value) -> &Value {
    match response.get("data") {
        Some(data) if !data.is_null() => data,
        _ => response,
    }
}

/// Collection: bare array, then [`COLLECTION_KEYS`], then `named`
pub fn unwrap_collection<'a>(response: &'a Value, named: &str) -> Option<&'a Vec<Value>> {
    if let Value::Array(items) = response {
        return Some(items);
    }
    COLLECTION_KEYS
        .iter()
        .copied()
        .chain(std::iter::once(named))
        .find_map(|key| response.get(key).and_then(Value::as_array))
}

// ========================
// Deals
// ========================

/// Normalize a single-deal response
pub fn normalize_deal(response: &Value) -> Deal {
    let Some(raw) = unwrap_entity(response).as_object() else {
        tracing::warn!("deal response is not an object: {}", response);
        return Deal::default();
    };

    let mut map = raw.clone();
    apply_aliases(&mut map);

    Deal {
        id: first_text(&map, &["id", "_id"]).unwrap_or_default(),
        deal_name: text(&map, "dealName").unwrap_or_default(),
        deal_value: number(&map, "dealValue"),
        stage: resolve_stage(&map),
        client_name: text(&map, "clientName").unwrap_or_default(),
        deal_type: text(&map, "dealType"),
        sector: text(&map, "sector"),
        summary: text(&map, "summary"),
        description: text(&map, "description").unwrap_or_default(),
        expected_close_date: text(&map, "expectedCloseDate"),
        created_date: first_text(&map, &["createdDate", "createdAt"]),
        last_modified_date: first_text(&map, &["lastModifiedDate", "updatedAt"]),
        created_by: first_text(&map, &["createdBy", "createdByUsername"]),
        notes: normalize_notes(map.get("notes")),
    }
}

/// Normalize a deal-list response; unknown shapes yield an empty list
pub fn normalize_deals(response: &Value) -> Vec<Deal> {
    match unwrap_collection(response, "deals") {
        Some(items) => items.iter().map(normalize_deal).collect(),
        None => {
            tracing::warn!("unexpected deals response structure: {}", response);
            Vec::new()
        }
    }
}

/// Copy aliased values into absent canonical keys. Present values are never overwritten.
pub fn apply_aliases(map: &mut Object) {
    for (canonical, alias) in FIELD_ALIASES {
        if !is_absent(map.get(*canonical)) {
            continue;
        }
        if let Some(value) = map.get(*alias).filter(|v| !is_absent(Some(v))).cloned() {
            map.insert((*canonical).to_string(), value);
        }
    }
}

/// Run [`STAGE_EXTRACTORS`] in order
pub fn resolve_stage(map: &Object) -> Option<String> {
    STAGE_EXTRACTORS.iter().find_map(|(_, extract)| extract(map))
}

fn stage_from_current(map: &Object) -> Option<String> {
    map.get("currentStage").and_then(stage_value)
}

fn stage_from_stage_field(map: &Object) -> Option<String> {
    map.get("stage").and_then(stage_value)
}

fn stage_from_alternates(map: &Object) -> Option<String> {
    STAGE_ALTERNATE_KEYS.iter().find_map(|key| map.get(*key).and_then(stage_value))
}

/// Stage as text; objects are unwrapped via `name`, then `value`, then stringified
fn stage_value(value: &Value) -> Option<String> {
    match value {
        Value::Object(inner) => Some(
            ["name", "value"]
                .iter()
                .find_map(|key| inner.get(*key).and_then(scalar_text))
                .unwrap_or_else(|| value.to_string()),
        ),
        Value::Array(_) => Some(value.to_string()),
        other => scalar_text(other),
    }
}

fn normalize_notes(notes: Option<&Value>) -> Vec<DealNote> {
    let Some(Value::Array(items)) = notes else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => DealNote {
                id: text(map, "id").unwrap_or_else(|| index.to_string()),
                content: first_text(map, NOTE_CONTENT_KEYS).unwrap_or_default(),
                created_date: first_text(map, NOTE_DATE_KEYS).unwrap_or_default(),
                created_by: first_text(map, NOTE_AUTHOR_KEYS).unwrap_or_default(),
            },
            other => DealNote {
                id: index.to_string(),
                content: scalar_text(other).unwrap_or_default(),
                ..DealNote::default()
            },
        })
        .collect()
}

// ========================
// Users
// ========================

/// Normalize a single-user response
pub fn normalize_user(response: &Value) -> User {
    match unwrap_entity(response).as_object() {
        Some(map) => user_from_map(map, true),
        None => {
            tracing::warn!("user response is not an object: {}", response);
            User { enabled: true, ..User::default() }
        }
    }
}

/// Normalize a user-list response; unknown shapes yield an empty list
pub fn normalize_users(response: &Value) -> Vec<User> {
    match unwrap_collection(response, "users") {
        Some(items) => items
            .iter()
            .map(|item| match item.as_object() {
                Some(map) => user_from_map(map, true),
                None => User { enabled: true, ..User::default() },
            })
            .collect(),
        None => {
            tracing::warn!("unexpected users response structure: {}", response);
            Vec::new()
        }
    }
}

/// Normalize the answer to a status update. Missing id or flag fall back to
/// what was requested.
pub fn normalize_status_update(response: &Value, id: &str, requested_enabled: bool) -> User {
    let mut user = match unwrap_entity(response).as_object() {
        Some(map) => user_from_map(map, requested_enabled),
        None => User { enabled: requested_enabled, ..User::default() },
    };
    if user.id.is_empty() {
        user.id = id.to_string();
    }
    user
}

fn user_from_map(map: &Object, default_enabled: bool) -> User {
    User {
        id: first_text(map, &["id", "_id"]).unwrap_or_default(),
        username: text(map, "username").unwrap_or_default(),
        email: text(map, "email").unwrap_or_default(),
        role: resolve_role(map).unwrap_or_default(),
        enabled: ENABLED_KEYS.iter().find_map(|key| map.get(*key).and_then(flag)).unwrap_or(default_enabled),
    }
}

/// Run [`ROLE_EXTRACTORS`] in order
pub fn resolve_role(map: &Object) -> Option<Role> {
    ROLE_EXTRACTORS.iter().find_map(|(_, extract)| extract(map))
}

fn any_admin<'a>(mut claims: impl Iterator<Item = &'a str>) -> Role {
    if claims.any(|c| Role::from_claim(c) == Role::Admin) { Role::Admin } else { Role::User }
}

fn role_from_roles_array(map: &Object) -> Option<Role> {
    let roles = map.get("roles")?.as_array()?;
    Some(any_admin(roles.iter().filter_map(Value::as_str)))
}

fn role_from_roles_string(map: &Object) -> Option<Role> {
    map.get("roles")?.as_str().filter(|s| !s.is_empty()).map(Role::from_claim)
}

fn role_from_role(map: &Object) -> Option<Role> {
    map.get("role").and_then(scalar_text).map(|r| Role::from_claim(&r))
}

fn role_from_authorities(map: &Object) -> Option<Role> {
    let authorities = map.get("authorities")?.as_array()?;
    Some(any_admin(authorities.iter().filter_map(|a| {
        a.as_str().or_else(|| a.get("authority").and_then(Value::as_str))
    })))
}

// ========================
// Login
// ========================

/// Token and user extracted from a login response
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub token: String,
    pub user: User,
}

/// Locate the token and user details in a login response
pub fn normalize_login(response: &Value) -> Result<LoginOutcome, ApiError> {
    let data = unwrap_entity(response);
    let scopes = [data, response];

    let token = scopes
        .iter()
        .flat_map(|scope| TOKEN_KEYS.iter().map(move |key| scope.get(*key)))
        .flatten()
        .find_map(|v| v.as_str().map(str::trim).filter(|t| !t.is_empty()))
        .map(str::to_string)
        .ok_or_else(|| {
            tracing::error!("token not found in login response: {}", response);
            ApiError::Decode("Invalid token received from server. Token field not found in response.".to_string())
        })?;

    let role = scopes
        .iter()
        .filter_map(|scope| scope.as_object())
        .find_map(resolve_role)
        .unwrap_or_default();

    let user = User {
        id: first_text_in(&scopes, &["id", "_id"]).unwrap_or_default(),
        username: first_text_in(&scopes, &["username", "userName"]).unwrap_or_default(),
        email: first_text_in(&scopes, &["email"]).unwrap_or_default(),
        role,
        enabled: true,
    };

    Ok(LoginOutcome { token, user })
}

// ========================
// Field helpers
// ========================

/// Missing, null and empty string all count as absent
fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text(map: &Object, key: &str) -> Option<String> {
    map.get(key).and_then(scalar_text)
}

fn first_text(map: &Object, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text(map, key))
}

fn first_text_in(scopes: &[&Value], keys: &[&str]) -> Option<String> {
    scopes
        .iter()
        .filter_map(|scope| scope.as_object())
        .find_map(|map| first_text(map, keys))
}

fn number(map: &Object, key: &str) -> Option<f64> {
    match map.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests;
