//! API Errors
//!
//! Every failure the service layer can report, built once at the HTTP
//! boundary and consumed by views as a closed set.

use serde_json::Value;
use thiserror::Error;

/// Coarse classification used by views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Auth,
    NotFound,
    Server,
    Transport,
}

/// Why a request never produced an HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    /// Browser blocked the response (missing CORS headers on the backend)
    Cors,
    /// Backend host could not be reached
    Unreachable,
    Other,
}

/// Errors returned by API calls
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Payload rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    /// 400
    #[error("{message}")]
    BadRequest { message: String },

    /// 401
    #[error("{message}")]
    Unauthorized { message: String },

    /// 403
    #[error("{message}")]
    Forbidden { message: String },

    /// 404
    #[error("{message}")]
    NotFound { message: String },

    /// 500 and any other unexpected status
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Status 0: the request did not complete
    #[error("{message}")]
    Transport { failure: TransportFailure, message: String },

    /// Payload could not be encoded, or a response could not be understood
    #[error("Malformed payload: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Build from a non-success HTTP response. The body message wins over the
    /// status default whenever one can be found.
    pub fn from_response(status: u16, body: &Value) -> Self {
        let extracted = extract_message(body);
        let message = extracted.unwrap_or_else(|| default_message(status));
        match status {
            400 => Self::BadRequest { message },
            401 => Self::Unauthorized { message },
            403 => Self::Forbidden { message },
            404 => Self::NotFound { message },
            _ => Self::Server { status, message },
        }
    }

    /// Build from a transport-level failure, classified by its message text
    pub fn transport(raw: &str) -> Self {
        let failure = if raw.contains("CORS") || raw.contains("cors") {
            TransportFailure::Cors
        } else if raw.contains("Failed to fetch")
            || raw.contains("NetworkError")
            || raw.contains("error sending request")
            || raw.contains("Connection refused")
        {
            TransportFailure::Unreachable
        } else {
            TransportFailure::Other
        };

        let message = match failure {
            TransportFailure::Cors => {
                "CORS Error: Backend not configured. Please check backend CORS settings."
            }
            TransportFailure::Unreachable => "Network Error: Cannot reach backend server.",
            TransportFailure::Other => {
                "Connection Error: Cannot connect to backend. Check if backend is running and CORS is configured."
            }
        };

        Self::Transport { failure, message: message.to_string() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::BadRequest { .. } => ErrorKind::Validation,
            Self::Unauthorized { .. } | Self::Forbidden { .. } => ErrorKind::Auth,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Server { .. } | Self::Decode(_) => ErrorKind::Server,
            Self::Transport { .. } => ErrorKind::Transport,
        }
    }

    /// Raw HTTP status; 0 for transport failures, `None` when no request was made
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Validation(_) | Self::Decode(_) => None,
            Self::BadRequest { .. } => Some(400),
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Server { status, .. } => Some(*status),
            Self::Transport { .. } => Some(0),
        }
    }
}

fn default_message(status: u16) -> String {
    match status {
        400 => "Bad Request: Invalid data provided. Please check your input.".to_string(),
        401 => "Unauthorized. Please log in again.".to_string(),
        403 => "Forbidden. You do not have permission.".to_string(),
        404 => "Resource not found.".to_string(),
        500 => "Server Error: An unexpected error occurred on the server.".to_string(),
        other => format!("Error {other}: Request failed"),
    }
}

/// Direct message fields checked on the error body, in order
const MESSAGE_FIELDS: &[&str] = &["message", "error", "details", "msg"];

/// Message fields checked inside a nested `data` object, in order
const NESTED_MESSAGE_FIELDS: &[&str] = &["message", "error"];

/// Pull a human-readable message out of whatever error body the backend sent
pub fn extract_message(body: &Value) -> Option<String> {
    match body {
        Value::String(s) => non_empty(s),
        Value::Object(map) => {
            if let Some(Value::Array(errors)) = map.get("errors") {
                let joined = errors.iter().filter_map(field_error_message).collect::<Vec<_>>().join(", ");
                return non_empty(&joined)
                    .or_else(|| string_at(body, "message"))
                    .or_else(|| Some("Validation failed".to_string()));
            }

            if let Some(found) = MESSAGE_FIELDS.iter().find_map(|key| string_at(body, key)) {
                return Some(found);
            }

            match map.get("data") {
                Some(data @ Value::Object(_)) => {
                    NESTED_MESSAGE_FIELDS.iter().find_map(|key| string_at(data, key))
                }
                Some(Value::Array(items)) => {
                    let joined = items
                        .iter()
                        .filter_map(|item| string_at(item, "message").or_else(|| item.as_str().and_then(non_empty)))
                        .collect::<Vec<_>>()
                        .join(", ");
                    non_empty(&joined)
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// One entry of a Spring-style `errors` array
fn field_error_message(entry: &Value) -> Option<String> {
    if let Some(s) = entry.as_str() {
        return non_empty(s);
    }
    string_at(entry, "defaultMessage")
        .or_else(|| string_at(entry, "message"))
        .or_else(|| {
            let field = string_at(entry, "field")?;
            let rejected = entry
                .get("rejectedValue")
                .filter(|v| !v.is_null())
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .unwrap_or_else(|| "invalid".to_string());
            Some(format!("{field}: {rejected}"))
        })
}

fn string_at(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).and_then(non_empty)
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(ApiError::from_response(400, &Value::Null), ApiError::BadRequest { .. }));
        assert!(matches!(ApiError::from_response(401, &Value::Null), ApiError::Unauthorized { .. }));
        assert!(matches!(ApiError::from_response(403, &Value::Null), ApiError::Forbidden { .. }));
        assert!(matches!(ApiError::from_response(404, &Value::Null), ApiError::NotFound { .. }));
        assert!(matches!(
            ApiError::from_response(502, &Value::Null),
            ApiError::Server { status: 502, .. }
        ));
    }

    #[test]
    fn test_kind_folds_variants() {
        assert_eq!(ApiError::validation("x").kind(), ErrorKind::Validation);
        assert_eq!(ApiError::from_response(400, &Value::Null).kind(), ErrorKind::Validation);
        assert_eq!(ApiError::from_response(401, &Value::Null).kind(), ErrorKind::Auth);
        assert_eq!(ApiError::from_response(403, &Value::Null).kind(), ErrorKind::Auth);
        assert_eq!(ApiError::from_response(500, &Value::Null).kind(), ErrorKind::Server);
        assert_eq!(ApiError::transport("Failed to fetch").kind(), ErrorKind::Transport);
        assert_eq!(ApiError::transport("Failed to fetch").status(), Some(0));
        assert_eq!(ApiError::validation("x").status(), None);
    }

    #[test]
    fn test_defaults_when_body_empty() {
        let err = ApiError::from_response(500, &json!({}));
        assert_eq!(err.to_string(), "Server Error: An unexpected error occurred on the server.");
        let err = ApiError::from_response(404, &Value::Null);
        assert_eq!(err.to_string(), "Resource not found.");
    }

    #[test]
    fn test_body_message_wins() {
        let err = ApiError::from_response(500, &json!({"success": false, "message": "Mongo is down"}));
        assert_eq!(err.to_string(), "Mongo is down");
        let err = ApiError::from_response(400, &json!("dealName is required"));
        assert_eq!(err.to_string(), "dealName is required");
    }

    #[test]
    fn test_spring_validation_errors_joined() {
        let body = json!({
            "errors": [
                {"defaultMessage": "Deal name is required"},
                {"field": "sector", "rejectedValue": null},
                {"message": "bad stage"}
            ]
        });
        assert_eq!(
            extract_message(&body).as_deref(),
            Some("Deal name is required, sector: invalid, bad stage")
        );
    }

    #[test]
    fn test_message_field_precedence() {
        assert_eq!(extract_message(&json!({"error": "e", "details": "d"})).as_deref(), Some("e"));
        assert_eq!(extract_message(&json!({"details": "d", "msg": "m"})).as_deref(), Some("d"));
        assert_eq!(extract_message(&json!({"data": {"error": "nested"}})).as_deref(), Some("nested"));
        assert_eq!(
            extract_message(&json!({"data": [{"message": "a"}, "b"]})).as_deref(),
            Some("a, b")
        );
        assert_eq!(extract_message(&json!({"message": "   "})), None);
    }

    #[test]
    fn test_transport_classification() {
        let cors = ApiError::transport("blocked by CORS policy");
        assert!(matches!(cors, ApiError::Transport { failure: TransportFailure::Cors, .. }));
        let down = ApiError::transport("TypeError: Failed to fetch");
        assert!(matches!(down, ApiError::Transport { failure: TransportFailure::Unreachable, .. }));
        let other = ApiError::transport("something odd");
        assert!(matches!(other, ApiError::Transport { failure: TransportFailure::Other, .. }));
    }
}
