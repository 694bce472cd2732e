use serde::{Deserialize, Serialize};

use super::citation::Citation;
use super::patient::PatientReport;

/// Request body for `POST /chat/session`.
///
/// `session_id` is absent on the first turn; the backend mints one and the
/// client echoes it back on every later turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
    #[serde(default)]
    pub patient_name: Option<String>,
}

/// Response body of `POST /chat/session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub response: String,
    /// Which agent produced the answer: "receptionist", "clinical", ...
    pub agent: String,
    /// Set when the receptionist routed the turn, e.g. "receptionist->clinical".
    #[serde(default)]
    pub handoff: Option<String>,
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// Request body for `POST /rag/query` — a direct retrieval query against the
/// nephrology reference, outside any chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagQueryRequest {
    pub query: String,
    #[serde(default)]
    pub patient_context: Option<PatientReport>,
    #[serde(default)]
    pub top_k: Option<u32>,
}

/// Response body of `POST /rag/query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagQueryResponse {
    pub answer: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
    /// Raw retrieval chunks; shape is backend-owned and passed through opaquely.
    #[serde(default)]
    pub retrieved_chunks: Vec<serde_json::Value>,
}
