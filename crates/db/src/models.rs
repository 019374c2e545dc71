use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use talentgate_core::models::{
    applicant::{Applicant, ApplicantStatus, ApplicantSummary},
    interview_day::{DayStatus, InterviewDay},
    reservation::{AttendanceStatus, Reservation, ReservationDetail},
};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbInterviewDay {
    pub id: Uuid,
    pub date: NaiveDate,
    pub total_slots: i32,
    pub remaining_slots: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl DbInterviewDay {
    pub fn into_domain(self) -> Result<InterviewDay> {
        let status = self
            .status
            .parse::<DayStatus>()
            .map_err(|e| eyre!("interview day {} has a corrupt status: {e}", self.id))?;

        Ok(InterviewDay {
            id: self.id,
            date: self.date,
            total_slots: self.total_slots,
            remaining_slots: self.remaining_slots,
            status,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReservation {
    pub id: Uuid,
    pub applicant_id: i64,
    pub interview_day_id: Uuid,
    pub time_window: String,
    pub ticket_code: String,
    pub attendance_status: String,
    pub created_at: DateTime<Utc>,
}

impl DbReservation {
    /// Timestamps are stored in UTC and handed out in the service's civil timezone.
    pub fn into_domain(self, tz: Tz) -> Result<Reservation> {
        let attendance_status = self
            .attendance_status
            .parse::<AttendanceStatus>()
            .map_err(|e| eyre!("reservation {} has a corrupt attendance status: {e}", self.id))?;

        Ok(Reservation {
            id: self.id,
            applicant_id: self.applicant_id,
            interview_day_id: self.interview_day_id,
            time_window: self.time_window,
            ticket_code: self.ticket_code,
            attendance_status,
            created_at: self.created_at.with_timezone(&tz).fixed_offset(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbApplicant {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub document_number: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbApplicant> for Applicant {
    fn from(row: DbApplicant) -> Self {
        Applicant {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            document_number: row.document_number,
            role: row.role,
            status: ApplicantStatus::from(row.status),
        }
    }
}

/// A reservation row joined with the booked applicant's contact fields.
#[derive(Debug, Clone, FromRow)]
pub struct DbReservationDetail {
    #[sqlx(flatten)]
    pub reservation: DbReservation,
    pub full_name: String,
    pub document_number: String,
    pub email: String,
    pub role: String,
}

impl DbReservationDetail {
    pub fn into_domain(self, tz: Tz) -> Result<ReservationDetail> {
        Ok(ReservationDetail {
            reservation: self.reservation.into_domain(tz)?,
            applicant: ApplicantSummary {
                full_name: self.full_name,
                document_number: self.document_number,
                email: self.email,
                role: self.role,
            },
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbHistoryEntry {
    pub id: i64,
    pub applicant_id: i64,
    pub action: String,
    pub performed_by: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
}
