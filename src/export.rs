//! Agent-log export.
//!
//! The backend keeps an append-only NDJSON audit log of agent events
//! (lookups, retrievals, handoffs). This fetches it with `download=true`
//! and writes it next to the other app data, mirroring the browser
//! frontend's blob download of `agent_audit.ndjson`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::{AssistantBackend, BackendError};

/// File name the export is written under, matching the attachment name the
/// backend suggests.
pub const AGENT_LOG_FILENAME: &str = "agent_audit.ndjson";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Failed to write log file: {0}")]
    Io(#[from] std::io::Error),
}

/// Fetch the agent audit log and write it into `dir`, creating the
/// directory if needed. Returns the path written. An empty body is valid —
/// the backend serves an empty file when no events exist yet.
pub fn download_agent_log(
    backend: &dyn AssistantBackend,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let body = backend.fetch_agent_log(true)?;

    fs::create_dir_all(dir)?;
    let path = dir.join(AGENT_LOG_FILENAME);
    fs::write(&path, &body)?;

    tracing::info!(path = %path.display(), bytes = body.len(), "Agent log exported");
    Ok(path)
}
