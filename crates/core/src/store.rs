use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use uuid::Uuid;

use crate::errors::BookingResult;
use crate::models::{
    applicant::{Applicant, ApplicantId},
    interview_day::{DayStatus, InterviewDay, NewInterviewDay},
    reservation::{
        AttendanceStatus, ClaimOutcome, Release, Reservation, ReservationDetail, SlotClaim,
    },
};

/// Persistence collaborator for interview days, reservations and the
/// applicant fields the interview flow touches.
///
/// The three multi-row operations (`claim_slot`, `release_slot`,
/// `delete_day`) must each be atomic: either every write lands or none does.
#[async_trait]
pub trait InterviewStore: Send + Sync {
    async fn find_day(&self, id: Uuid) -> BookingResult<Option<InterviewDay>>;

    async fn find_day_by_date(&self, date: NaiveDate) -> BookingResult<Option<InterviewDay>>;

    /// Fails with `Conflict` when a day already exists on that date.
    async fn insert_day(&self, day: NewInterviewDay) -> BookingResult<InterviewDay>;

    /// Every day, ordered by date ascending.
    async fn list_days(&self) -> BookingResult<Vec<InterviewDay>>;

    /// Active days on or after `from` with capacity left, ordered by date ascending.
    async fn list_available_days(&self, from: NaiveDate) -> BookingResult<Vec<InterviewDay>>;

    async fn set_day_status(
        &self,
        id: Uuid,
        status: DayStatus,
    ) -> BookingResult<Option<InterviewDay>>;

    /// Reverts every booked applicant to `Applied`, deletes the day's
    /// reservations and then the day. Returns the number of reservations
    /// released, or `None` if the day does not exist.
    async fn delete_day(
        &self,
        id: Uuid,
        recorded_at: DateTime<FixedOffset>,
    ) -> BookingResult<Option<usize>>;

    async fn find_reservation(&self, id: Uuid) -> BookingResult<Option<Reservation>>;

    async fn find_reservation_for_applicant(
        &self,
        applicant_id: ApplicantId,
    ) -> BookingResult<Option<Reservation>>;

    async fn list_day_reservations(&self, day_id: Uuid) -> BookingResult<Vec<ReservationDetail>>;

    /// Claims one slot of `claim.interview_day_id` for the applicant.
    ///
    /// Fails with `NotFound` when the applicant or day is missing and with
    /// `SlotUnavailable` when the day is not active or has no capacity left.
    async fn claim_slot(&self, claim: SlotClaim) -> BookingResult<ClaimOutcome>;

    /// Deletes the reservation, gives its slot back (never above the day's
    /// total) and reverts the applicant to `Applied`. `None` if the
    /// reservation no longer exists.
    async fn release_slot(
        &self,
        reservation_id: Uuid,
        recorded_at: DateTime<FixedOffset>,
    ) -> BookingResult<Option<Release>>;

    async fn set_attendance(
        &self,
        reservation_id: Uuid,
        status: AttendanceStatus,
    ) -> BookingResult<Option<Reservation>>;

    async fn find_applicant(&self, id: ApplicantId) -> BookingResult<Option<Applicant>>;

    async fn find_applicant_by_document(
        &self,
        document_number: &str,
    ) -> BookingResult<Option<Applicant>>;
}
