use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::errors::BookingError;

use super::applicant::{Applicant, ApplicantId, ApplicantSummary};
use super::interview_day::InterviewDay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AttendanceStatus {
    #[default]
    #[serde(rename = "Pendiente", alias = "Pending")]
    Pending,
    #[serde(rename = "Asistió", alias = "Attended")]
    Attended,
    #[serde(rename = "No Asistió", alias = "NotAttended")]
    NotAttended,
}

impl AttendanceStatus {
    pub fn label(self) -> &'static str {
        match self {
            AttendanceStatus::Pending => "Pendiente",
            AttendanceStatus::Attended => "Asistió",
            AttendanceStatus::NotAttended => "No Asistió",
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pendiente" | "Pending" => Ok(AttendanceStatus::Pending),
            "Asistió" | "Attended" => Ok(AttendanceStatus::Attended),
            "No Asistió" | "NotAttended" => Ok(AttendanceStatus::NotAttended),
            other => Err(BookingError::InvalidRequest(format!(
                "Invalid attendance status: {other}"
            ))),
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One applicant's claim on one interview day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub applicant_id: ApplicantId,
    pub interview_day_id: Uuid,
    pub time_window: String,
    pub ticket_code: String,
    pub attendance_status: AttendanceStatus,
    pub created_at: DateTime<FixedOffset>,
}

/// Everything the store needs to claim a slot in a single transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotClaim {
    pub applicant_id: ApplicantId,
    pub interview_day_id: Uuid,
    pub time_window: String,
    pub ticket_code: String,
    pub created_at: DateTime<FixedOffset>,
}

/// Result of a transactional slot claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Reservation inserted, capacity decremented and applicant advanced.
    Claimed {
        reservation: Reservation,
        applicant: Applicant,
        day: InterviewDay,
    },
    /// The applicant already held a reservation; nothing was written.
    AlreadyBooked(Reservation),
    /// The applicant's stage does not allow booking; nothing was written.
    Ineligible(Applicant),
    /// The ticket code is taken; the transaction was rolled back.
    TicketTaken,
}

/// Result of a transactional slot release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub reservation: Reservation,
    pub applicant: Option<Applicant>,
    pub day: Option<InterviewDay>,
}

/// A reservation together with the booked applicant, for staff views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDetail {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub applicant: ApplicantSummary,
}

/// A reservation together with its day, for applicant views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationWithDay {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub interview_day: InterviewDay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveRequest {
    #[serde(alias = "postulacion_id")]
    pub applicant_id: Option<ApplicantId>,
    #[serde(alias = "dia_entrevista_id")]
    pub interview_day_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    #[serde(alias = "postulacion_id")]
    pub applicant_id: Option<ApplicantId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceRequest {
    #[serde(alias = "estado_asistencia")]
    pub attendance_status: Option<String>,
}
