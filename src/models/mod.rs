pub mod chat;
pub mod citation;
pub mod patient;

pub use chat::{ChatRequest, ChatResponse, RagQueryRequest, RagQueryResponse};
pub use citation::Citation;
pub use patient::{LookupStatus, PatientLookupResponse, PatientReport};
