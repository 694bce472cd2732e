//! Client-side chat session state.
//!
//! The backend owns the authoritative session (id, history, agent routing);
//! this module keeps only what the timeline needs to render: the ordered
//! turns, the citations of the last assistant turn, and the last handoff
//! marker. A transport failure becomes a system turn in the timeline rather
//! than an error — the session stays usable and the next send retries
//! naturally.

use chrono::{DateTime, Local};

use crate::backend::AssistantBackend;
use crate::models::{ChatRequest, Citation, PatientReport};

/// Shown in place of an answer when the backend call fails.
const SEND_FAILURE_TEXT: &str = "Error contacting server.";

/// Who produced a timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Patient,
    Assistant,
}

/// One rendered turn of the timeline.
#[derive(Debug, Clone)]
pub struct TimelineEntry {
    pub role: Role,
    /// Backend agent tag for assistant turns ("receptionist", "clinical",
    /// "system" for locally generated failure turns).
    pub agent: Option<String>,
    pub content: String,
    pub citations: Vec<Citation>,
    pub timestamp: DateTime<Local>,
}

impl TimelineEntry {
    fn patient(content: &str) -> Self {
        Self {
            role: Role::Patient,
            agent: None,
            content: content.to_string(),
            citations: Vec::new(),
            timestamp: Local::now(),
        }
    }

    fn assistant(agent: &str, content: &str, citations: Vec<Citation>) -> Self {
        Self {
            role: Role::Assistant,
            agent: Some(agent.to_string()),
            content: content.to_string(),
            citations,
            timestamp: Local::now(),
        }
    }
}

/// Display name for a backend agent tag.
pub fn agent_label(agent: &str) -> &'static str {
    match agent {
        "clinical" => "Clinical AI",
        "receptionist" => "Receptionist",
        _ => "System",
    }
}

/// Human-readable routing notice for a handoff marker.
pub fn describe_handoff(handoff: &str) -> String {
    if handoff == "receptionist->clinical" {
        "Routing to Clinical AI Agent...".to_string()
    } else {
        handoff.to_string()
    }
}

/// A chat session bound to one resolved patient.
pub struct ChatSession {
    patient: PatientReport,
    session_id: Option<String>,
    entries: Vec<TimelineEntry>,
    last_citations: Vec<Citation>,
    last_handoff: Option<String>,
}

impl ChatSession {
    pub fn new(patient: PatientReport) -> Self {
        Self {
            patient,
            session_id: None,
            entries: Vec::new(),
            last_citations: Vec::new(),
            last_handoff: None,
        }
    }

    pub fn patient(&self) -> &PatientReport {
        &self.patient
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// Citations of the most recent assistant turn, for the citation viewer.
    pub fn last_citations(&self) -> &[Citation] {
        &self.last_citations
    }

    pub fn last_handoff(&self) -> Option<&str> {
        self.last_handoff.as_deref()
    }

    /// Send one patient turn. Appends the patient entry, posts the request
    /// with the current session id and the patient's name, then appends the
    /// assistant's answer — or a system failure turn if the call failed.
    ///
    /// Returns the assistant-side entry that was appended, or `None` when
    /// the input was empty and nothing was sent.
    pub fn send(
        &mut self,
        backend: &dyn AssistantBackend,
        text: &str,
    ) -> Option<&TimelineEntry> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.entries.push(TimelineEntry::patient(text));

        let request = ChatRequest {
            session_id: self.session_id.clone(),
            message: text.to_string(),
            patient_name: Some(self.patient.patient_name.clone()),
        };

        match backend.chat_session(&request) {
            Ok(response) => {
                self.session_id = Some(response.session_id);
                self.last_citations = response.citations.clone();
                self.last_handoff = response.handoff;
                self.entries.push(TimelineEntry::assistant(
                    &response.agent,
                    &response.response,
                    response.citations,
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chat turn failed");
                self.entries
                    .push(TimelineEntry::assistant("system", SEND_FAILURE_TEXT, Vec::new()));
            }
        }

        self.entries.last()
    }

    /// Forget everything for a patient change.
    pub fn reset(&mut self) {
        self.session_id = None;
        self.entries.clear();
        self.last_citations.clear();
        self.last_handoff = None;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::backend::{AssistantBackend, BackendError};
    use crate::models::ChatResponse;

    /// Scripted backend: pops one queued result per chat turn and records
    /// the requests it saw.
    struct ScriptedBackend {
        responses: RefCell<VecDeque<Result<ChatResponse, BackendError>>>,
        requests: RefCell<Vec<ChatRequest>>,
    }

    impl ScriptedBackend {
        fn new(responses: Vec<Result<ChatResponse, BackendError>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl AssistantBackend for ScriptedBackend {
        fn chat_session(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
            self.requests.borrow_mut().push(request.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .expect("no scripted response left")
        }

        fn fetch_agent_log(&self, _download: bool) -> Result<String, BackendError> {
            Ok(String::new())
        }
    }

    fn patient() -> PatientReport {
        PatientReport {
            patient_name: "Avery Lee".into(),
            discharge_date: "2026-07-14".into(),
            diagnosis: "Chronic Kidney Disease Stage 3".into(),
            medications: vec!["ACE inhibitor".into()],
            dietary_restrictions: vec!["Low sodium".into()],
            follow_up_instructions: vec!["Check BMP in 1 week".into()],
            warning_signs: vec!["Swelling in legs or face".into()],
            discharge_instructions: vec!["Avoid NSAIDs".into()],
        }
    }

    fn clinical_response(session_id: &str) -> ChatResponse {
        ChatResponse {
            session_id: session_id.into(),
            response: "Based on nephrology reference [Diet; p. 4]: ...".into(),
            agent: "clinical".into(),
            handoff: Some("receptionist->clinical".into()),
            citations: vec![Citation {
                section: Some("Diet".into()),
                page: Some(4),
                score: Some(0.3),
            }],
        }
    }

    #[test]
    fn successful_turn_appends_both_entries_and_adopts_session_id() {
        let backend = ScriptedBackend::new(vec![Ok(clinical_response("sid-1"))]);
        let mut session = ChatSession::new(patient());

        let entry = session.send(&backend, "Is swelling normal?").unwrap();
        assert_eq!(entry.role, Role::Assistant);
        assert_eq!(entry.agent.as_deref(), Some("clinical"));

        assert_eq!(session.session_id(), Some("sid-1"));
        assert_eq!(session.entries().len(), 2);
        assert_eq!(session.entries()[0].role, Role::Patient);
        assert_eq!(session.last_citations().len(), 1);
        assert_eq!(session.last_handoff(), Some("receptionist->clinical"));

        // First turn carries no session id, but does carry the patient name.
        let requests = backend.requests.borrow();
        assert!(requests[0].session_id.is_none());
        assert_eq!(requests[0].patient_name.as_deref(), Some("Avery Lee"));
    }

    #[test]
    fn later_turns_echo_the_adopted_session_id() {
        let backend = ScriptedBackend::new(vec![
            Ok(clinical_response("sid-1")),
            Ok(clinical_response("sid-1")),
        ]);
        let mut session = ChatSession::new(patient());
        session.send(&backend, "first");
        session.send(&backend, "second");

        let requests = backend.requests.borrow();
        assert_eq!(requests[1].session_id.as_deref(), Some("sid-1"));
    }

    #[test]
    fn transport_failure_becomes_system_turn() {
        let backend = ScriptedBackend::new(vec![Err(BackendError::Connection(
            "http://localhost:8000".into(),
        ))]);
        let mut session = ChatSession::new(patient());

        let entry = session.send(&backend, "hello").unwrap();
        assert_eq!(entry.agent.as_deref(), Some("system"));
        assert_eq!(entry.content, "Error contacting server.");
        assert!(entry.citations.is_empty());
        // Session id untouched; next send retries as a first turn.
        assert!(session.session_id().is_none());
    }

    #[test]
    fn empty_input_sends_nothing() {
        let backend = ScriptedBackend::new(vec![]);
        let mut session = ChatSession::new(patient());
        assert!(session.send(&backend, "   ").is_none());
        assert!(session.entries().is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let backend = ScriptedBackend::new(vec![Ok(clinical_response("sid-1"))]);
        let mut session = ChatSession::new(patient());
        session.send(&backend, "hello");
        session.reset();

        assert!(session.session_id().is_none());
        assert!(session.entries().is_empty());
        assert!(session.last_citations().is_empty());
        assert!(session.last_handoff().is_none());
    }

    #[test]
    fn agent_labels() {
        assert_eq!(agent_label("clinical"), "Clinical AI");
        assert_eq!(agent_label("receptionist"), "Receptionist");
        assert_eq!(agent_label("system"), "System");
        assert_eq!(agent_label("anything-else"), "System");
    }

    #[test]
    fn handoff_descriptions() {
        assert_eq!(
            describe_handoff("receptionist->clinical"),
            "Routing to Clinical AI Agent..."
        );
        assert_eq!(describe_handoff("clinical->triage"), "clinical->triage");
    }
}
