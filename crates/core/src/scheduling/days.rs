use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::models::{
    interview_day::{DayDetails, DayStatus, InterviewDay, NewInterviewDay},
    reservation::{AttendanceStatus, Reservation},
};

use super::Scheduler;

impl Scheduler {
    /// Opens a new interview day with all of its slots free.
    pub async fn create_day(
        &self,
        date: Option<NaiveDate>,
        total_slots: Option<i32>,
    ) -> BookingResult<InterviewDay> {
        let (Some(date), Some(total_slots)) = (date, total_slots) else {
            return Err(BookingError::InvalidRequest(
                "date and totalSlots are required to create an interview day".to_string(),
            ));
        };
        if total_slots < 1 {
            return Err(BookingError::InvalidRequest(
                "totalSlots must be at least 1".to_string(),
            ));
        }

        if self.store.find_day_by_date(date).await?.is_some() {
            return Err(BookingError::Conflict(format!(
                "An interview day already exists for {date}"
            )));
        }

        let day = self
            .store
            .insert_day(NewInterviewDay { date, total_slots })
            .await?;
        info!(interview_day_id = %day.id, %date, total_slots, "interview day created");
        Ok(day)
    }

    /// Deletes a day and its reservations, reverting the booked applicants.
    pub async fn delete_day(&self, day_id: Uuid) -> BookingResult<usize> {
        let released = self
            .store
            .delete_day(day_id, self.clock.now())
            .await?
            .ok_or_else(|| BookingError::day_not_found(day_id))?;

        info!(interview_day_id = %day_id, released, "interview day deleted");
        Ok(released)
    }

    /// Staff-driven status change; capacity never moves a day to `Full` on its own.
    pub async fn set_day_status(
        &self,
        day_id: Uuid,
        status: DayStatus,
    ) -> BookingResult<InterviewDay> {
        let day = self
            .store
            .set_day_status(day_id, status)
            .await?
            .ok_or_else(|| BookingError::day_not_found(day_id))?;

        info!(interview_day_id = %day_id, %status, "interview day status updated");
        Ok(day)
    }

    pub async fn set_attendance(
        &self,
        reservation_id: Uuid,
        status: AttendanceStatus,
    ) -> BookingResult<Reservation> {
        let reservation = self
            .store
            .set_attendance(reservation_id, status)
            .await?
            .ok_or_else(|| BookingError::reservation_not_found(reservation_id))?;

        info!(%reservation_id, %status, "attendance updated");
        Ok(reservation)
    }

    pub async fn list_days(&self) -> BookingResult<Vec<InterviewDay>> {
        self.store.list_days().await
    }

    pub async fn day_details(&self, day_id: Uuid) -> BookingResult<DayDetails> {
        let day = self
            .store
            .find_day(day_id)
            .await?
            .ok_or_else(|| BookingError::day_not_found(day_id))?;
        let reservations = self.store.list_day_reservations(day_id).await?;

        Ok(DayDetails { day, reservations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::models::applicant::ApplicantStatus;
    use crate::notify::MockNotifier;
    use crate::scheduling::test_support::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::sync::Arc;

    #[tokio::test]
    async fn created_day_starts_active_with_full_capacity() {
        let store = Arc::new(MemoryStore::new());
        let scheduler = scheduler(store.clone(), MockNotifier::new());
        let date = today() + chrono::Duration::days(3);

        let day = scheduler.create_day(Some(date), Some(12)).await.unwrap();

        assert_eq!(day.date, date);
        assert_eq!(day.total_slots, 12);
        assert_eq!(day.remaining_slots, 12);
        assert_eq!(day.status, DayStatus::Active);
        assert_eq!(store.day(day.id).await, Some(day));
    }

    #[tokio::test]
    async fn duplicate_date_is_a_conflict() {
        let store = Arc::new(MemoryStore::new());
        let scheduler = scheduler(store.clone(), MockNotifier::new());
        let date = today() + chrono::Duration::days(3);
        scheduler.create_day(Some(date), Some(5)).await.unwrap();

        let err = scheduler.create_day(Some(date), Some(8)).await.unwrap_err();

        assert!(matches!(err, BookingError::Conflict(_)));
    }

    #[rstest]
    #[case(None, Some(5))]
    #[case(Some(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()), None)]
    #[case(Some(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()), Some(0))]
    #[case(Some(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()), Some(-3))]
    #[tokio::test]
    async fn invalid_day_input_is_rejected(
        #[case] date: Option<NaiveDate>,
        #[case] total_slots: Option<i32>,
    ) {
        let store = Arc::new(MemoryStore::new());
        let scheduler = scheduler(store.clone(), MockNotifier::new());

        let err = scheduler.create_day(date, total_slots).await.unwrap_err();

        assert!(matches!(err, BookingError::InvalidRequest(_)));
        assert!(store.days().await.is_empty());
    }

    #[tokio::test]
    async fn deleting_a_day_reverts_every_booked_applicant() {
        let store = Arc::new(MemoryStore::new());
        let doomed = store.add_day(day(1, 5, DayStatus::Active)).await;
        let other = store.add_day(day(2, 5, DayStatus::Active)).await;
        for id in 1..=4 {
            store.add_applicant(applicant(id, ApplicantStatus::Applied)).await;
        }
        let scheduler = scheduler(store.clone(), quiet_notifier());
        for id in 1..=3 {
            scheduler.reserve_slot(Some(id), Some(doomed.id)).await.unwrap();
        }
        scheduler.reserve_slot(Some(4), Some(other.id)).await.unwrap();

        let released = scheduler.delete_day(doomed.id).await.unwrap();

        assert_eq!(released, 3);
        assert_eq!(store.day(doomed.id).await, None);
        for id in 1..=3 {
            assert_eq!(
                store.applicant(id).await.unwrap().status,
                ApplicantStatus::Applied
            );
        }
        assert_eq!(
            store.applicant(4).await.unwrap().status,
            ApplicantStatus::Interviewing
        );
        let remaining = store.reservations().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].applicant_id, 4);
    }

    #[tokio::test]
    async fn deleting_an_unknown_day_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let scheduler = scheduler(store, MockNotifier::new());

        let err = scheduler.delete_day(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, BookingError::NotFound(_)));
    }

    #[tokio::test]
    async fn status_changes_are_explicit_only() {
        let store = Arc::new(MemoryStore::new());
        let day = store.add_day(day(1, 1, DayStatus::Active)).await;
        store.add_applicant(applicant(1, ApplicantStatus::Applied)).await;
        let scheduler = scheduler(store.clone(), quiet_notifier());

        scheduler.reserve_slot(Some(1), Some(day.id)).await.unwrap();
        assert_eq!(store.day(day.id).await.unwrap().status, DayStatus::Active);

        let updated = scheduler
            .set_day_status(day.id, DayStatus::Finished)
            .await
            .unwrap();
        assert_eq!(updated.status, DayStatus::Finished);
        assert_eq!(updated.remaining_slots, 0);
    }

    #[tokio::test]
    async fn attendance_is_recorded_on_the_reservation() {
        let store = Arc::new(MemoryStore::new());
        let day = store.add_day(day(1, 1, DayStatus::Active)).await;
        store.add_applicant(applicant(1, ApplicantStatus::Applied)).await;
        let scheduler = scheduler(store.clone(), quiet_notifier());
        let booking = scheduler.reserve_slot(Some(1), Some(day.id)).await.unwrap();

        let reservation = scheduler
            .set_attendance(booking.reservation().id, AttendanceStatus::Attended)
            .await
            .unwrap();
        assert_eq!(reservation.attendance_status, AttendanceStatus::Attended);

        let err = scheduler
            .set_attendance(Uuid::new_v4(), AttendanceStatus::NotAttended)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::NotFound(_)));
    }

    #[tokio::test]
    async fn details_list_reservations_with_applicant_data() {
        let store = Arc::new(MemoryStore::new());
        let day = store.add_day(day(1, 3, DayStatus::Active)).await;
        store.add_applicant(applicant(1, ApplicantStatus::Applied)).await;
        let scheduler = scheduler(store.clone(), quiet_notifier());
        scheduler.reserve_slot(Some(1), Some(day.id)).await.unwrap();

        let details = scheduler.day_details(day.id).await.unwrap();

        assert_eq!(details.day.remaining_slots, 2);
        assert_eq!(details.reservations.len(), 1);
        assert_eq!(details.reservations[0].applicant.email, "applicant1@example.com");
        assert_eq!(details.reservations[0].applicant.role, "Auxiliar de bodega");
    }

    #[tokio::test]
    async fn admin_listing_is_ordered_by_date() {
        let store = Arc::new(MemoryStore::new());
        let later = store.add_day(day(5, 1, DayStatus::Inactive)).await;
        let past = store.add_day(day(-2, 1, DayStatus::Finished)).await;
        let soon = store.add_day(day(1, 1, DayStatus::Active)).await;
        let scheduler = scheduler(store, MockNotifier::new());

        let ids: Vec<Uuid> = scheduler
            .list_days()
            .await
            .unwrap()
            .into_iter()
            .map(|day| day.id)
            .collect();

        assert_eq!(ids, vec![past.id, soon.id, later.id]);
    }
}
