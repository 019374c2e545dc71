use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;
use eyre::WrapErr;
use sqlx::PgConnection;
use talentgate_core::{
    errors::{BookingError, BookingResult},
    models::{
        applicant::{
            Applicant, ApplicantId, ApplicantStatus, BOOKED_REASON, CANCELLED_REASON,
            DAY_DELETED_REASON, HistoryEntry,
        },
        interview_day::{DayStatus, InterviewDay, NewInterviewDay},
        reservation::{
            AttendanceStatus, ClaimOutcome, Release, Reservation, ReservationDetail, SlotClaim,
        },
    },
    store::InterviewStore,
};
use tracing::debug;
use uuid::Uuid;

use crate::DbPool;
use crate::repositories::{
    applicant,
    interview_day,
    reservation::{self, NewReservation},
};
use crate::schema::{DAY_DATE_UNIQUE, RESERVATION_APPLICANT_UNIQUE, RESERVATION_TICKET_UNIQUE};

/// PostgreSQL-backed [`InterviewStore`].
///
/// Multi-row operations run in one transaction and take row locks in a single
/// order: interview day, then reservation, then applicant. Two transactions
/// touching the same day therefore queue on the day row instead of holding
/// each other's locks.
#[derive(Clone)]
pub struct PgInterviewStore {
    pool: DbPool,
    tz: Tz,
}

impl PgInterviewStore {
    pub fn new(pool: DbPool, tz: Tz) -> Self {
        Self { pool, tz }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    fn reservation(&self, row: crate::models::DbReservation) -> BookingResult<Reservation> {
        Ok(row.into_domain(self.tz)?)
    }
}

/// Name of the unique constraint behind a failed write, if that is what failed.
fn unique_violation(report: &eyre::Report) -> Option<String> {
    match report.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Some(db_err.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

async fn record_status_change(
    conn: &mut PgConnection,
    applicant_id: ApplicantId,
    status: &ApplicantStatus,
    reason: &str,
    recorded_at: DateTime<FixedOffset>,
) -> eyre::Result<Option<Applicant>> {
    let Some(row) = applicant::update_status(&mut *conn, applicant_id, status.label()).await?
    else {
        return Ok(None);
    };

    let entry = HistoryEntry::status_change(applicant_id, status, reason, recorded_at);
    applicant::insert_history(
        &mut *conn,
        entry.applicant_id,
        &entry.action,
        &entry.performed_by,
        &entry.note,
        entry.created_at.with_timezone(&Utc),
    )
    .await?;

    Ok(Some(row.into()))
}

#[async_trait]
impl InterviewStore for PgInterviewStore {
    async fn find_day(&self, id: Uuid) -> BookingResult<Option<InterviewDay>> {
        let row = interview_day::get_day_by_id(&self.pool, id).await?;
        Ok(row.map(|row| row.into_domain()).transpose()?)
    }

    async fn find_day_by_date(&self, date: NaiveDate) -> BookingResult<Option<InterviewDay>> {
        let row = interview_day::get_day_by_date(&self.pool, date).await?;
        Ok(row.map(|row| row.into_domain()).transpose()?)
    }

    async fn insert_day(&self, day: NewInterviewDay) -> BookingResult<InterviewDay> {
        let result = interview_day::insert_day(
            &self.pool,
            day.date,
            day.total_slots,
            DayStatus::Active.label(),
        )
        .await;

        match result {
            Ok(row) => Ok(row.into_domain()?),
            Err(report) if unique_violation(&report).as_deref() == Some(DAY_DATE_UNIQUE) => Err(
                BookingError::Conflict(format!("An interview day already exists for {}", day.date)),
            ),
            Err(report) => Err(report.into()),
        }
    }

    async fn list_days(&self) -> BookingResult<Vec<InterviewDay>> {
        let rows = interview_day::list_days(&self.pool).await?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_domain())
            .collect::<eyre::Result<Vec<_>>>()?)
    }

    async fn list_available_days(&self, from: NaiveDate) -> BookingResult<Vec<InterviewDay>> {
        let rows =
            interview_day::list_bookable_days(&self.pool, from, DayStatus::Active.label()).await?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_domain())
            .collect::<eyre::Result<Vec<_>>>()?)
    }

    async fn set_day_status(
        &self,
        id: Uuid,
        status: DayStatus,
    ) -> BookingResult<Option<InterviewDay>> {
        let row = interview_day::update_status(&self.pool, id, status.label()).await?;
        Ok(row.map(|row| row.into_domain()).transpose()?)
    }

    async fn delete_day(
        &self,
        id: Uuid,
        recorded_at: DateTime<FixedOffset>,
    ) -> BookingResult<Option<usize>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        // Holding the day lock keeps new claims from landing on it meanwhile.
        if interview_day::lock_day(&mut *tx, id).await?.is_none() {
            return Ok(None);
        }

        let booked = reservation::list_reservations_for_day(&mut *tx, id).await?;
        for row in &booked {
            record_status_change(
                &mut tx,
                row.applicant_id,
                &ApplicantStatus::Applied,
                DAY_DELETED_REASON,
                recorded_at,
            )
            .await?;
        }
        let released = reservation::delete_reservations_for_day(&mut *tx, id).await?;
        interview_day::delete_day(&mut *tx, id).await?;

        tx.commit().await.wrap_err("Failed to commit transaction")?;

        debug!(interview_day_id = %id, released, "interview day removed");
        Ok(Some(booked.len()))
    }

    async fn find_reservation(&self, id: Uuid) -> BookingResult<Option<Reservation>> {
        reservation::get_reservation_by_id(&self.pool, id)
            .await?
            .map(|row| self.reservation(row))
            .transpose()
    }

    async fn find_reservation_for_applicant(
        &self,
        applicant_id: ApplicantId,
    ) -> BookingResult<Option<Reservation>> {
        reservation::get_reservation_for_applicant(&self.pool, applicant_id)
            .await?
            .map(|row| self.reservation(row))
            .transpose()
    }

    async fn list_day_reservations(&self, day_id: Uuid) -> BookingResult<Vec<ReservationDetail>> {
        let rows = reservation::list_details_for_day(&self.pool, day_id).await?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_domain(self.tz))
            .collect::<eyre::Result<Vec<_>>>()?)
    }

    async fn claim_slot(&self, claim: SlotClaim) -> BookingResult<ClaimOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        let day_exists = interview_day::lock_day(&mut *tx, claim.interview_day_id)
            .await?
            .is_some();
        let applicant: Applicant = applicant::lock_applicant(&mut *tx, claim.applicant_id)
            .await?
            .ok_or_else(|| BookingError::applicant_not_found(claim.applicant_id))?
            .into();

        if let Some(existing) =
            reservation::get_reservation_for_applicant(&mut *tx, claim.applicant_id).await?
        {
            return Ok(ClaimOutcome::AlreadyBooked(self.reservation(existing)?));
        }
        if !applicant.status.can_schedule() {
            return Ok(ClaimOutcome::Ineligible(applicant));
        }

        if !day_exists {
            return Err(BookingError::day_not_found(claim.interview_day_id));
        }
        let Some(day) =
            interview_day::take_slot(&mut *tx, claim.interview_day_id, DayStatus::Active.label())
                .await?
        else {
            return Err(BookingError::slot_unavailable());
        };

        let inserted = reservation::insert_reservation(
            &mut *tx,
            &NewReservation {
                applicant_id: claim.applicant_id,
                interview_day_id: claim.interview_day_id,
                time_window: &claim.time_window,
                ticket_code: &claim.ticket_code,
                attendance_status: AttendanceStatus::Pending.label(),
                created_at: claim.created_at.with_timezone(&Utc),
            },
        )
        .await;
        // A failed insert aborts the transaction; dropping `tx` rolls it back.
        let row = match inserted {
            Ok(row) => row,
            Err(report) => {
                return match unique_violation(&report).as_deref() {
                    Some(RESERVATION_TICKET_UNIQUE) => Ok(ClaimOutcome::TicketTaken),
                    Some(RESERVATION_APPLICANT_UNIQUE) => Err(BookingError::Conflict(
                        "Applicant already holds a reservation".to_string(),
                    )),
                    _ => Err(report.into()),
                };
            }
        };

        let applicant = record_status_change(
            &mut tx,
            claim.applicant_id,
            &ApplicantStatus::Interviewing,
            BOOKED_REASON,
            claim.created_at,
        )
        .await?
        .unwrap_or(applicant);

        tx.commit().await.wrap_err("Failed to commit transaction")?;

        Ok(ClaimOutcome::Claimed {
            reservation: self.reservation(row)?,
            applicant,
            day: day.into_domain()?,
        })
    }

    async fn release_slot(
        &self,
        reservation_id: Uuid,
        recorded_at: DateTime<FixedOffset>,
    ) -> BookingResult<Option<Release>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        // Only the day id is needed before locking; the row is re-read under the day lock.
        let Some(unlocked) = reservation::get_reservation_by_id(&mut *tx, reservation_id).await?
        else {
            return Ok(None);
        };
        interview_day::lock_day(&mut *tx, unlocked.interview_day_id).await?;

        // Gone if a concurrent cancel or day deletion committed first.
        let Some(row) = reservation::lock_reservation(&mut *tx, reservation_id).await? else {
            return Ok(None);
        };
        reservation::delete_reservation(&mut *tx, reservation_id).await?;
        let day = interview_day::return_slot(&mut *tx, row.interview_day_id)
            .await?
            .map(|day| day.into_domain())
            .transpose()?;
        let applicant = record_status_change(
            &mut tx,
            row.applicant_id,
            &ApplicantStatus::Applied,
            CANCELLED_REASON,
            recorded_at,
        )
        .await?;

        tx.commit().await.wrap_err("Failed to commit transaction")?;

        Ok(Some(Release {
            reservation: self.reservation(row)?,
            applicant,
            day,
        }))
    }

    async fn set_attendance(
        &self,
        reservation_id: Uuid,
        status: AttendanceStatus,
    ) -> BookingResult<Option<Reservation>> {
        reservation::update_attendance(&self.pool, reservation_id, status.label())
            .await?
            .map(|row| self.reservation(row))
            .transpose()
    }

    async fn find_applicant(&self, id: ApplicantId) -> BookingResult<Option<Applicant>> {
        let row = applicant::get_applicant_by_id(&self.pool, id).await?;
        Ok(row.map(Applicant::from))
    }

    async fn find_applicant_by_document(
        &self,
        document_number: &str,
    ) -> BookingResult<Option<Applicant>> {
        let row = applicant::get_applicant_by_document(&self.pool, document_number).await?;
        Ok(row.map(Applicant::from))
    }
}
