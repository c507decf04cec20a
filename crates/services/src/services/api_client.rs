//! HTTP request wrapper shared by every store.
//!
//! One call in, one normalized outcome out: the reporter sees `loading = true`
//! before the request and `loading = false` after it, however the call ends,
//! plus the server's message on success or an error message on failure.
//! There is no retry; the caller decides whether to issue the request again.

use std::{
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};

use reqwest::{Client, Method, StatusCode, multipart};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;
use utils::response::ApiResponse;

use super::{config::ClientConfig, message::StatusReporter};

pub const GENERIC_ERROR: &str = "Something went wrong, please try again";

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("http {status}: {message}")]
    Http { status: u16, message: String },
    #[error("json error: {0}")]
    Decode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized(message) | Self::Http { message, .. } => message.clone(),
            Self::Timeout => "The server took too long to respond".to_string(),
            _ => GENERIC_ERROR.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED.as_u16()),
            _ => None,
        }
    }
}

/// A file picked by the user, sent as one multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name)
            .first_raw()
            .map(str::to_string);
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Part {
    Text(String),
    File(Attachment),
}

/// Multipart form body. Built into a `reqwest` form only when the request is sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartBody {
    parts: Vec<(String, Part)>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// One text part per top-level field of `value`. Nulls are skipped, nested
    /// arrays and objects are sent JSON-encoded.
    pub fn from_serialize(value: &impl Serialize) -> Result<Self, ApiError> {
        let value = serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;
        let Value::Object(fields) = value else {
            return Err(ApiError::InvalidRequest(
                "multipart body must be built from an object".to_string(),
            ));
        };

        let mut body = Self::new();
        for (name, value) in fields {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s,
                other => other.to_string(),
            };
            body.parts.push((name, Part::Text(text)));
        }
        Ok(body)
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), Part::Text(value.into())));
        self
    }

    /// Add a file part, replacing a text part of the same name.
    pub fn file(mut self, name: impl Into<String>, attachment: Attachment) -> Self {
        let name = name.into();
        self.parts.retain(|(existing, _)| existing != &name);
        self.parts.push((name, Part::File(attachment)));
        self
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.parts.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn into_form(self) -> Result<multipart::Form, ApiError> {
        let mut form = multipart::Form::new();
        for (name, part) in self.parts {
            form = match part {
                Part::Text(text) => form.text(name, text),
                Part::File(file) => {
                    let mut part = multipart::Part::bytes(file.bytes).file_name(file.file_name);
                    if let Some(mime) = file.mime_type {
                        part = part
                            .mime_str(&mime)
                            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
                    }
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Multipart(MultipartBody),
}

impl RequestBody {
    pub fn json(value: impl Serialize) -> Result<Self, ApiError> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub fn empty() -> Self {
        Self::Json(Value::Object(Map::new()))
    }
}

/// One request against the API. The path is relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<RequestBody>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }
}

/// Clears the loading flag when dropped, so it runs on every exit path.
struct LoadingGuard<'a>(&'a dyn StatusReporter);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.set_loading(false);
    }
}

/// Dashboard API client. Clones share the HTTP pool and the session token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Arc<RwLock<Option<SecretString>>>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder =
            Client::builder().user_agent(concat!("farmdash/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let base = Url::parse(&config.api_base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.api_base_url, e)))?;

        Ok(Self {
            http,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        Self::new(&ClientConfig {
            api_base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Install or clear the bearer token used by every clone of this client.
    pub fn set_token(&self, token: Option<SecretString>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        let path = path.trim_start_matches('/');
        let raw = format!("{}/{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// Issue `request`, reporting loading transitions and the outcome message.
    pub async fn send(
        &self,
        request: ApiRequest,
        reporter: &dyn StatusReporter,
    ) -> Result<ApiResponse, ApiError> {
        reporter.set_loading(true);
        let _loading = LoadingGuard(reporter);

        let method = request.method.clone();
        let path = request.path.clone();

        match self.execute(request).await {
            Ok(response) => {
                if let Some(message) = response.message() {
                    reporter.set_message(message, true);
                }
                Ok(response)
            }
            Err(e) => {
                warn!(method = %method, path = %path, error = %e, "api request failed");
                reporter.set_message(&e.user_message(), false);
                Err(e)
            }
        }
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url(&request.path)?;
        debug!(method = %request.method, url = %url, "api request");

        let mut builder = self.http.request(request.method, url);

        let bearer = self
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|token| token.expose_secret().to_string());
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match request.body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Multipart(body)) => builder.multipart(body.into_form()?),
            None => builder,
        };

        let res = builder.send().await.map_err(map_reqwest_error)?;
        let status = res.status();
        let text = res.text().await.map_err(map_reqwest_error)?;

        if status.is_success() {
            let body = if text.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))?
            };
            return Ok(ApiResponse::new(body));
        }

        // Error bodies are not always JSON (proxies, HTML error pages).
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        let message = ApiResponse::new(body)
            .error_message()
            .map(str::to_string)
            .unwrap_or_else(|| GENERIC_ERROR.to_string());

        match status {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized(message)),
            s => Err(ApiError::Http {
                status: s.as_u16(),
                message,
            }),
        }
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(e.to_string())
    }
}
