// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the platform REST backend.
//!
//! Every call returns the normalized [`ApiResponse`] envelope. Transport
//! failures (unreachable host, timeout, non-JSON body) are synthesized into
//! failure responses instead of being propagated as errors, so callers only
//! ever inspect the returned shape.

use std::time::Duration;

use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Pagination metadata returned alongside list endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseMeta {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub total: Option<u64>,
    pub total_pages: Option<u32>,
}

/// Structured error payload inside a backend error envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    #[serde(default)]
    pub trace_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Backend error envelope: `{success: false, statusCode, error: {...}}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub status_code: u16,
    pub error: ApiErrorDetails,
}

/// Normalized backend response.
///
/// `error` preserves the structured backend payload (when one was present)
/// for logging and support correlation; it never leaves the server.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "default_status_code")]
    pub status_code: u16,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(skip)]
    pub error: Option<ApiErrorDetails>,
}

fn default_status_code() -> u16 {
    200
}

impl<T> ApiResponse<T> {
    /// Synthesize a failure response.
    pub fn failure(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code,
            message: message.into(),
            data: None,
            meta: None,
            error: None,
        }
    }

    fn with_error(mut self, details: ApiErrorDetails) -> Self {
        self.error = Some(details);
        self
    }
}

/// Client for the platform backend.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Make a request and normalize the response.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
        token: Option<&str>,
    ) -> ApiResponse<T> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut builder = self
            .http
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            builder = builder.json(&body);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) if err.is_timeout() => {
                tracing::warn!(endpoint, "Backend request timed out");
                return ApiResponse::failure(0, "Request timed out - please try again");
            }
            Err(err) => {
                tracing::warn!(endpoint, error = %err, "Backend request failed");
                return ApiResponse::failure(0, "Network error - unable to reach the server");
            }
        };

        let status = response.status();

        // Refuse to parse non-JSON bodies (gateway error pages, HTML, etc.)
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !content_type.contains("application/json") {
            return ApiResponse::failure(status.as_u16(), "Server returned non-JSON response");
        }

        let value: serde_json::Value = match response.json().await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(endpoint, error = %err, "Failed to parse backend response");
                return ApiResponse::failure(500, "Invalid response from server");
            }
        };

        normalize(status, value)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, token: Option<&str>) -> ApiResponse<T> {
        self.request(Method::GET, endpoint, None, token).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: serde_json::Value,
        token: Option<&str>,
    ) -> ApiResponse<T> {
        self.request(Method::POST, endpoint, Some(body), token).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: serde_json::Value,
        token: Option<&str>,
    ) -> ApiResponse<T> {
        self.request(Method::PUT, endpoint, Some(body), token).await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: serde_json::Value,
        token: Option<&str>,
    ) -> ApiResponse<T> {
        self.request(Method::PATCH, endpoint, Some(body), token).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str, token: Option<&str>) -> ApiResponse<T> {
        self.request(Method::DELETE, endpoint, None, token).await
    }
}

/// Fold an HTTP status and a parsed JSON body into the normalized envelope.
fn normalize<T: DeserializeOwned>(status: StatusCode, value: serde_json::Value) -> ApiResponse<T> {
    let reported_failure = value.get("success").and_then(|v| v.as_bool()) == Some(false);

    if !status.is_success() || reported_failure {
        // Structured error envelope
        if value.get("error").map(|e| e.is_object()).unwrap_or(false) {
            if let Ok(envelope) = serde_json::from_value::<ErrorEnvelope>(value.clone()) {
                tracing::warn!(
                    code = %envelope.error.code,
                    trace_id = envelope.error.trace_id.as_deref().unwrap_or("-"),
                    "Backend reported structured error"
                );
                let status_code = if envelope.status_code != 0 {
                    envelope.status_code
                } else {
                    status.as_u16()
                };
                let message = envelope.error.message.clone();
                return ApiResponse::failure(status_code, message).with_error(envelope.error);
            }
        }

        // Legacy flat error format
        let status_code = value
            .get("statusCode")
            .and_then(|v| v.as_u64())
            .map(|v| v as u16)
            .unwrap_or_else(|| status.as_u16());
        let message = value
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("Request failed")
            .to_string();
        return ApiResponse::failure(status_code, message);
    }

    match serde_json::from_value::<ApiResponse<T>>(value) {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(error = %err, "Backend response did not match expected shape");
            ApiResponse::failure(500, "Invalid response from server")
        }
    }
}
