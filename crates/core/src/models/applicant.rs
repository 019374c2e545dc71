use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Applicants live in the wider application-tracking tables and keep their integer keys.
pub type ApplicantId = i64;

/// Actor recorded in the applicant history for engine-driven status changes.
pub const SYSTEM_ACTOR: &str = "Sistema";

/// History notes for the status changes the interview flow makes.
pub const BOOKED_REASON: &str = "agendó entrevista";
pub const CANCELLED_REASON: &str = "canceló la cita de entrevista";
pub const DAY_DELETED_REASON: &str = "se eliminó el día de entrevista";

/// Pipeline stage of an applicant.
///
/// Only the stages the interview flow reads or writes are named; every other
/// label used by the recruiting team (e.g. `Contratado`) is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicantStatus {
    Applied,
    Interviewing,
    Preselected,
    Other(String),
}

impl ApplicantStatus {
    pub fn label(&self) -> &str {
        match self {
            ApplicantStatus::Applied => "Postulado",
            ApplicantStatus::Interviewing => "Entrevista",
            ApplicantStatus::Preselected => "Preseleccionado",
            ApplicantStatus::Other(label) => label,
        }
    }

    /// Whether an applicant at this stage may book an interview slot.
    pub fn can_schedule(&self) -> bool {
        matches!(
            self,
            ApplicantStatus::Applied | ApplicantStatus::Interviewing | ApplicantStatus::Preselected
        )
    }
}

impl From<String> for ApplicantStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Postulado" | "Applied" => ApplicantStatus::Applied,
            "Entrevista" | "Interviewing" => ApplicantStatus::Interviewing,
            "Preseleccionado" | "Preselected" => ApplicantStatus::Preselected,
            _ => ApplicantStatus::Other(label),
        }
    }
}

impl From<&str> for ApplicantStatus {
    fn from(label: &str) -> Self {
        ApplicantStatus::from(label.to_string())
    }
}

impl From<ApplicantStatus> for String {
    fn from(status: ApplicantStatus) -> Self {
        match status {
            ApplicantStatus::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for ApplicantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub id: ApplicantId,
    pub full_name: String,
    pub email: String,
    pub document_number: String,
    pub role: String,
    pub status: ApplicantStatus,
}

impl Applicant {
    pub fn summary(&self) -> ApplicantSummary {
        ApplicantSummary {
            full_name: self.full_name.clone(),
            document_number: self.document_number.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }
}

/// Contact and display fields shown next to a reservation in staff views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantSummary {
    pub full_name: String,
    pub document_number: String,
    pub email: String,
    pub role: String,
}

/// One line of the applicant's status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub applicant_id: ApplicantId,
    pub action: String,
    pub performed_by: String,
    pub note: String,
    pub created_at: DateTime<FixedOffset>,
}

impl HistoryEntry {
    pub fn status_change(
        applicant_id: ApplicantId,
        status: &ApplicantStatus,
        reason: &str,
        created_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            applicant_id,
            action: status.label().to_string(),
            performed_by: SYSTEM_ACTOR.to_string(),
            note: format!("Cambio de estado a '{}' realizado por {SYSTEM_ACTOR}: {reason}.", status),
            created_at,
        }
    }
}
