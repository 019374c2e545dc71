//! In-memory [`InterviewStore`] for engine and HTTP tests.
//!
//! A single async mutex guards all state, so every trait method is one atomic
//! step and the capacity rules hold under concurrent callers exactly as the
//! PostgreSQL transactions enforce them.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::models::{
    applicant::{
        Applicant, ApplicantId, ApplicantStatus, BOOKED_REASON, CANCELLED_REASON,
        DAY_DELETED_REASON, HistoryEntry,
    },
    interview_day::{DayStatus, InterviewDay, NewInterviewDay},
    reservation::{
        AttendanceStatus, ClaimOutcome, Release, Reservation, ReservationDetail, SlotClaim,
    },
};
use crate::store::InterviewStore;

#[derive(Default)]
struct State {
    days: HashMap<Uuid, InterviewDay>,
    reservations: Vec<Reservation>,
    applicants: HashMap<ApplicantId, Applicant>,
    history: Vec<HistoryEntry>,
}

impl State {
    fn revert_applicant(
        &mut self,
        applicant_id: ApplicantId,
        reason: &str,
        recorded_at: DateTime<FixedOffset>,
    ) -> Option<Applicant> {
        let applicant = self.applicants.get_mut(&applicant_id)?;
        applicant.status = ApplicantStatus::Applied;
        let applicant = applicant.clone();
        self.history.push(HistoryEntry::status_change(
            applicant_id,
            &applicant.status,
            reason,
            recorded_at,
        ));
        Some(applicant)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_day(&self, day: InterviewDay) -> InterviewDay {
        self.state.lock().await.days.insert(day.id, day.clone());
        day
    }

    pub async fn add_applicant(&self, applicant: Applicant) -> Applicant {
        self.state
            .lock()
            .await
            .applicants
            .insert(applicant.id, applicant.clone());
        applicant
    }

    pub async fn day(&self, id: Uuid) -> Option<InterviewDay> {
        self.state.lock().await.days.get(&id).cloned()
    }

    pub async fn days(&self) -> Vec<InterviewDay> {
        let mut days: Vec<_> = self.state.lock().await.days.values().cloned().collect();
        days.sort_by_key(|day| day.date);
        days
    }

    pub async fn applicant(&self, id: ApplicantId) -> Option<Applicant> {
        self.state.lock().await.applicants.get(&id).cloned()
    }

    pub async fn reservations(&self) -> Vec<Reservation> {
        self.state.lock().await.reservations.clone()
    }

    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.state.lock().await.history.clone()
    }

    /// Overwrites a day's capacity counter without touching reservations.
    pub async fn set_remaining(&self, id: Uuid, remaining_slots: i32) {
        if let Some(day) = self.state.lock().await.days.get_mut(&id) {
            day.remaining_slots = remaining_slots;
        }
    }

    pub async fn set_applicant_status(&self, id: ApplicantId, status: ApplicantStatus) {
        if let Some(applicant) = self.state.lock().await.applicants.get_mut(&id) {
            applicant.status = status;
        }
    }
}

#[async_trait]
impl InterviewStore for MemoryStore {
    async fn find_day(&self, id: Uuid) -> BookingResult<Option<InterviewDay>> {
        Ok(self.day(id).await)
    }

    async fn find_day_by_date(&self, date: NaiveDate) -> BookingResult<Option<InterviewDay>> {
        let state = self.state.lock().await;
        Ok(state.days.values().find(|day| day.date == date).cloned())
    }

    async fn insert_day(&self, new_day: NewInterviewDay) -> BookingResult<InterviewDay> {
        let mut state = self.state.lock().await;
        if state.days.values().any(|day| day.date == new_day.date) {
            return Err(BookingError::Conflict(format!(
                "An interview day already exists for {}",
                new_day.date
            )));
        }

        let day = InterviewDay {
            id: Uuid::new_v4(),
            date: new_day.date,
            total_slots: new_day.total_slots,
            remaining_slots: new_day.total_slots,
            status: DayStatus::Active,
        };
        state.days.insert(day.id, day.clone());
        Ok(day)
    }

    async fn list_days(&self) -> BookingResult<Vec<InterviewDay>> {
        Ok(self.days().await)
    }

    async fn list_available_days(&self, from: NaiveDate) -> BookingResult<Vec<InterviewDay>> {
        Ok(self
            .days()
            .await
            .into_iter()
            .filter(|day| day.is_available_on(from))
            .collect())
    }

    async fn set_day_status(
        &self,
        id: Uuid,
        status: DayStatus,
    ) -> BookingResult<Option<InterviewDay>> {
        let mut state = self.state.lock().await;
        Ok(state.days.get_mut(&id).map(|day| {
            day.status = status;
            day.clone()
        }))
    }

    async fn delete_day(
        &self,
        id: Uuid,
        recorded_at: DateTime<FixedOffset>,
    ) -> BookingResult<Option<usize>> {
        let mut state = self.state.lock().await;
        if !state.days.contains_key(&id) {
            return Ok(None);
        }

        let (released, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.reservations)
            .into_iter()
            .partition(|reservation| reservation.interview_day_id == id);
        state.reservations = kept;
        for reservation in &released {
            state.revert_applicant(reservation.applicant_id, DAY_DELETED_REASON, recorded_at);
        }
        state.days.remove(&id);

        Ok(Some(released.len()))
    }

    async fn find_reservation(&self, id: Uuid) -> BookingResult<Option<Reservation>> {
        let state = self.state.lock().await;
        Ok(state.reservations.iter().find(|r| r.id == id).cloned())
    }

    async fn find_reservation_for_applicant(
        &self,
        applicant_id: ApplicantId,
    ) -> BookingResult<Option<Reservation>> {
        let state = self.state.lock().await;
        Ok(state
            .reservations
            .iter()
            .find(|r| r.applicant_id == applicant_id)
            .cloned())
    }

    async fn list_day_reservations(&self, day_id: Uuid) -> BookingResult<Vec<ReservationDetail>> {
        let state = self.state.lock().await;
        let mut details: Vec<ReservationDetail> = state
            .reservations
            .iter()
            .filter(|r| r.interview_day_id == day_id)
            .filter_map(|reservation| {
                state
                    .applicants
                    .get(&reservation.applicant_id)
                    .map(|applicant| ReservationDetail {
                        reservation: reservation.clone(),
                        applicant: applicant.summary(),
                    })
            })
            .collect();
        details.sort_by_key(|detail| detail.reservation.created_at);
        Ok(details)
    }

    async fn claim_slot(&self, claim: SlotClaim) -> BookingResult<ClaimOutcome> {
        let mut state = self.state.lock().await;

        let applicant = state
            .applicants
            .get(&claim.applicant_id)
            .cloned()
            .ok_or_else(|| BookingError::applicant_not_found(claim.applicant_id))?;
        if let Some(existing) = state
            .reservations
            .iter()
            .find(|r| r.applicant_id == claim.applicant_id)
        {
            return Ok(ClaimOutcome::AlreadyBooked(existing.clone()));
        }
        if !applicant.status.can_schedule() {
            return Ok(ClaimOutcome::Ineligible(applicant));
        }

        let day = state
            .days
            .get(&claim.interview_day_id)
            .ok_or_else(|| BookingError::day_not_found(claim.interview_day_id))?;
        if !day.is_bookable() {
            return Err(BookingError::slot_unavailable());
        }
        if state
            .reservations
            .iter()
            .any(|r| r.ticket_code == claim.ticket_code)
        {
            return Ok(ClaimOutcome::TicketTaken);
        }

        let day = match state.days.get_mut(&claim.interview_day_id) {
            Some(day) => {
                day.remaining_slots -= 1;
                day.clone()
            }
            None => return Err(BookingError::day_not_found(claim.interview_day_id)),
        };

        let reservation = Reservation {
            id: Uuid::new_v4(),
            applicant_id: claim.applicant_id,
            interview_day_id: claim.interview_day_id,
            time_window: claim.time_window,
            ticket_code: claim.ticket_code,
            attendance_status: AttendanceStatus::Pending,
            created_at: claim.created_at,
        };
        state.reservations.push(reservation.clone());

        let mut applicant = applicant;
        applicant.status = ApplicantStatus::Interviewing;
        state.applicants.insert(applicant.id, applicant.clone());
        state.history.push(HistoryEntry::status_change(
            applicant.id,
            &applicant.status,
            BOOKED_REASON,
            claim.created_at,
        ));

        Ok(ClaimOutcome::Claimed {
            reservation,
            applicant,
            day,
        })
    }

    async fn release_slot(
        &self,
        reservation_id: Uuid,
        recorded_at: DateTime<FixedOffset>,
    ) -> BookingResult<Option<Release>> {
        let mut state = self.state.lock().await;
        let Some(position) = state.reservations.iter().position(|r| r.id == reservation_id)
        else {
            return Ok(None);
        };
        let reservation = state.reservations.remove(position);

        let day = state
            .days
            .get_mut(&reservation.interview_day_id)
            .map(|day| {
                day.remaining_slots = (day.remaining_slots + 1).min(day.total_slots);
                day.clone()
            });
        let applicant =
            state.revert_applicant(reservation.applicant_id, CANCELLED_REASON, recorded_at);

        Ok(Some(Release {
            reservation,
            applicant,
            day,
        }))
    }

    async fn set_attendance(
        &self,
        reservation_id: Uuid,
        status: AttendanceStatus,
    ) -> BookingResult<Option<Reservation>> {
        let mut state = self.state.lock().await;
        Ok(state
            .reservations
            .iter_mut()
            .find(|r| r.id == reservation_id)
            .map(|reservation| {
                reservation.attendance_status = status;
                reservation.clone()
            }))
    }

    async fn find_applicant(&self, id: ApplicantId) -> BookingResult<Option<Applicant>> {
        Ok(self.applicant(id).await)
    }

    async fn find_applicant_by_document(
        &self,
        document_number: &str,
    ) -> BookingResult<Option<Applicant>> {
        let state = self.state.lock().await;
        Ok(state
            .applicants
            .values()
            .find(|applicant| applicant.document_number == document_number)
            .cloned())
    }
}
