//! Backend API Client
//!
//! REST bindings to the deal pipeline backend, organized by domain. Every
//! call goes through [`ApiClient::execute`], which runs the interceptor and
//! turns non-success responses into [`ApiError`].

mod auth;
mod deal;
mod http;
mod user;

use std::rc::Rc;

use async_trait::async_trait;
pub use reqwest::Method;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::Value;

use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::interceptor::RequestInterceptor;
use crate::session::SessionService;

// Re-export all public items
pub use auth::*;
pub use deal::*;
pub use http::*;
pub use user::*;

// ========================
// Transport
// ========================

/// Outgoing request as seen by the transport
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

#[cfg(test)]
impl ApiRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and decoded body. Non-JSON bodies arrive as a JSON string,
/// empty bodies as `null`.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request. `Err` carries the raw message of a request that never
/// produced an HTTP status.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, String>;
}

// ========================
// Client
// ========================

#[derive(Clone)]
pub struct ApiClient {
    config: AppConfig,
    transport: Rc<dyn Transport>,
    interceptor: RequestInterceptor,
}

impl ApiClient {
    pub fn new(config: AppConfig, transport: Rc<dyn Transport>, interceptor: RequestInterceptor) -> Self {
        Self { config, transport, interceptor }
    }

    pub fn session(&self) -> &SessionService {
        self.interceptor.session()
    }

    pub async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> ApiResult<Value> {
        let url = self.config.endpoint(path);
        let mut request = ApiRequest {
            method,
            url: url.clone(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body,
        };
        self.interceptor.prepare(&mut request);
        tracing::debug!(method = %request.method, url = %url, "request");

        let result = match self.transport.send(request).await {
            Ok(response) if response.is_success() => Ok(response.body),
            Ok(response) => Err(ApiError::from_response(response.status, &response.body)),
            Err(raw) => {
                tracing::error!(url = %url, "transport failure: {}", raw);
                Err(ApiError::transport(&raw))
            }
        };

        if let Err(e) = &result {
            tracing::warn!(url = %url, status = ?e.status(), "request failed: {}", e);
            self.interceptor.on_failure(&url, e);
        }
        result
    }

    pub async fn get(&self, path: &str) -> ApiResult<Value> {
        self.execute(Method::GET, path, None).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<Value> {
        self.execute(Method::DELETE, path, None).await
    }

    pub async fn post<T: Serialize>(&self, path: &str, payload: &T) -> ApiResult<Value> {
        self.execute(Method::POST, path, Some(to_body(payload)?)).await
    }

    pub async fn put<T: Serialize>(&self, path: &str, payload: &T) -> ApiResult<Value> {
        self.execute(Method::PUT, path, Some(to_body(payload)?)).await
    }

    pub async fn patch<T: Serialize>(&self, path: &str, payload: &T) -> ApiResult<Value> {
        self.execute(Method::PATCH, path, Some(to_body(payload)?)).await
    }
}

fn to_body<T: Serialize>(payload: &T) -> ApiResult<Value> {
    serde_json::to_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
}

const ID_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Id made safe for use as a single path segment
fn segment(id: &str) -> String {
    utf8_percent_encode(id, ID_SEGMENT).to_string()
}
