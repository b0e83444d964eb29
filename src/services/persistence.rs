//! Client for the external REST backend that stores every school entity.
//!
//! The gateway only ever needs "send one JSON call, get JSON back", so the
//! seam is a single-method trait. [`HttpPersistenceApi`] implements it with
//! [`reqwest`]; tests swap in an in-memory double.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use strum_macros::Display;

use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// One request against a backend collection.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendCall {
    pub method: HttpMethod,
    /// Path below the backend base URL, e.g. `/flight-sessions/42`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Caller's bearer token, forwarded as-is.
    pub token: Option<String>,
}

impl BackendCall {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        BackendCall {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            token: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path).with_body(body)
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Patch, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }
}

/// Errors from the persistence API layer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    /// The request never got a response (network, DNS, TLS, timeout).
    #[error("persistence API request failed: {0}")]
    Transport(String),

    /// Non-2xx response; `message` comes from the `{message}`/`{error}` payload.
    #[error("persistence API rejected the request ({status})")]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// 2xx response whose body is not the JSON we expected.
    #[error("persistence API returned an unreadable body: {0}")]
    Decode(String),
}

impl BackendError {
    /// Converts to the error shown to the user, substituting `fallback` when
    /// the backend gave no message of its own.
    pub fn into_app_error(self, fallback: &str) -> AppError {
        match self {
            BackendError::Rejected { status, message } => AppError::Upstream {
                status: Some(status),
                message: message.unwrap_or_else(|| fallback.to_string()),
            },
            BackendError::Transport(_) | BackendError::Decode(_) => AppError::Upstream {
                status: None,
                message: fallback.to_string(),
            },
        }
    }
}

#[async_trait]
pub trait PersistenceApi: Send + Sync {
    async fn send(&self, call: BackendCall) -> Result<Value, BackendError>;
}

pub struct HttpPersistenceApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPersistenceApi {
    /// * `base_url` - Backend root, e.g. `https://api.example.com/v1`.
    pub fn new(base_url: String, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PersistenceApi for HttpPersistenceApi {
    async fn send(&self, call: BackendCall) -> Result<Value, BackendError> {
        let method = match call.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut request = self
            .client
            .request(method, format!("{}{}", self.base_url, call.path));
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }
        if let Some(token) = &call.token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(method = %call.method, path = %call.path, "calling persistence API");

        let response = request.send().await.map_err(|e| {
            tracing::warn!(method = %call.method, path = %call.path, error = %e, "persistence API unreachable");
            BackendError::Transport(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = extract_error_message(&body);
            tracing::warn!(
                method = %call.method,
                path = %call.path,
                status = status.as_u16(),
                message = message.as_deref().unwrap_or("<none>"),
                "persistence API rejected request"
            );
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        parse_body(&body)
    }
}

#[derive(Deserialize)]
struct ErrorPayload {
    message: Option<Value>,
    error: Option<Value>,
}

/// Pulls the human message out of an error body: `message` wins over
/// `error`, and a list of messages is joined.
pub fn extract_error_message(body: &str) -> Option<String> {
    let payload: ErrorPayload = serde_json::from_str(body).ok()?;
    payload
        .message
        .as_ref()
        .and_then(message_text)
        .or_else(|| payload.error.as_ref().and_then(message_text))
}

fn message_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn parse_body(body: &str) -> Result<Value, BackendError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))
}

/// List endpoints answer with a bare array or with `{ "data": [...] }`.
pub fn unwrap_list(value: Value) -> Result<Vec<Value>, BackendError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(BackendError::Decode("expected a `data` array".into())),
        },
        _ => Err(BackendError::Decode("expected a JSON array".into())),
    }
}
