use serde::{Deserialize, Serialize};

/// Discharge report for one patient, as served by `/patients/lookup`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientReport {
    pub patient_name: String,
    pub discharge_date: String,
    pub diagnosis: String,
    pub medications: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub follow_up_instructions: Vec<String>,
    pub warning_signs: Vec<String>,
    pub discharge_instructions: Vec<String>,
}

/// Outcome of a name lookup. The backend matches on a name substring, so
/// more than one report can come back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    /// Exactly one report matched.
    Ok,
    NotFound,
    /// Several reports matched; the caller must refine the name.
    Multiple,
}

/// Response body of `GET /patients/lookup?name=`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientLookupResponse {
    pub status: LookupStatus,
    #[serde(default)]
    pub matches: Vec<PatientReport>,
    #[serde(default)]
    pub message: Option<String>,
}
