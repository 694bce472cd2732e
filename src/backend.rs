//! HTTP client for the assistant backend.
//!
//! The backend owns session orchestration, retrieval, and patient records;
//! this client only speaks its narrow JSON contract:
//! - `GET  /health`
//! - `GET  /patients/lookup?name=`
//! - `POST /chat/session`
//! - `POST /rag/query`
//! - `GET  /logs/agent[?download=true]`
//!
//! Requests are synchronous with a fixed per-request timeout; there is no
//! retry or ordering logic here — one call per user action.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config;
use crate::models::{ChatRequest, ChatResponse, PatientLookupResponse, RagQueryRequest, RagQueryResponse};

/// Errors from backend calls.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Cannot reach assistant backend at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// The backend operations the session and export layers depend on.
///
/// `BackendClient` is the real implementation; tests script this trait to
/// drive the timeline without a server.
pub trait AssistantBackend {
    fn chat_session(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError>;
    fn fetch_agent_log(&self, download: bool) -> Result<String, BackendError>;
}

/// Response body of `GET /health`.
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub app: Option<String>,
}

/// Synchronous HTTP client for the assistant backend.
pub struct BackendClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl BackendClient {
    /// Create a client for the given base URL with a per-request timeout.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Client configured from `ASSISTANT_API_URL` (or the default local
    /// backend) with the standard 20s timeout.
    pub fn from_env() -> Self {
        Self::new(&config::api_base_url(), config::REQUEST_TIMEOUT_SECS)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe `/health`. The backend also uses this to lazily seed its
    /// patient store, so it is called once at startup.
    pub fn health(&self) -> Result<HealthResponse, BackendError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .map_err(|e| self.map_transport_error(e))?;
        self.parse_json(response)
    }

    /// Look up discharge reports by patient-name substring.
    pub fn lookup_patient(&self, name: &str) -> Result<PatientLookupResponse, BackendError> {
        let response = self
            .client
            .get(format!("{}/patients/lookup", self.base_url))
            .query(&[("name", name)])
            .send()
            .map_err(|e| self.map_transport_error(e))?;
        self.parse_json(response)
    }

    /// Run one chat turn through the backend's agent orchestration.
    pub fn chat_session(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        let response = self
            .client
            .post(format!("{}/chat/session", self.base_url))
            .json(request)
            .send()
            .map_err(|e| self.map_transport_error(e))?;
        self.parse_json(response)
    }

    /// Direct retrieval query against the reference material.
    pub fn rag_query(&self, request: &RagQueryRequest) -> Result<RagQueryResponse, BackendError> {
        let response = self
            .client
            .post(format!("{}/rag/query", self.base_url))
            .json(request)
            .send()
            .map_err(|e| self.map_transport_error(e))?;
        self.parse_json(response)
    }

    /// Fetch the agent audit log as NDJSON text. With `download`, the
    /// backend serves it as an attachment; either way the body is the log
    /// (empty when no events were written yet).
    pub fn fetch_agent_log(&self, download: bool) -> Result<String, BackendError> {
        let mut request = self
            .client
            .get(format!("{}/logs/agent", self.base_url));
        if download {
            request = request.query(&[("download", "true")]);
        }
        let response = request.send().map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .text()
            .map_err(|e| BackendError::ResponseParsing(e.to_string()))
    }

    // ── Internal ────────────────────────────────────────────

    fn map_transport_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_connect() {
            BackendError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            BackendError::Timeout(self.timeout_secs)
        } else {
            BackendError::HttpClient(e.to_string())
        }
    }

    fn parse_json<T: DeserializeOwned>(
        &self,
        response: reqwest::blocking::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json()
            .map_err(|e| BackendError::ResponseParsing(e.to_string()))
    }
}

impl AssistantBackend for BackendClient {
    fn chat_session(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        BackendClient::chat_session(self, request)
    }

    fn fetch_agent_log(&self, download: bool) -> Result<String, BackendError> {
        BackendClient::fetch_agent_log(self, download)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_stripped_from_base_url() {
        let client = BackendClient::new("http://localhost:8000/", 20);
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn status_error_keeps_status_and_body() {
        let err = BackendError::Status {
            status: 500,
            body: "Internal error".into(),
        };
        assert_eq!(err.to_string(), "Backend returned HTTP 500: Internal error");
    }

    #[test]
    fn health_response_tolerates_missing_app_name() {
        let res: HealthResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert_eq!(res.status, "ok");
        assert!(res.app.is_none());
    }
}
