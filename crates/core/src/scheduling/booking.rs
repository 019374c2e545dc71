use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::models::{
    applicant::ApplicantId,
    reservation::{ClaimOutcome, Reservation, SlotClaim},
};
use crate::notifications;

use super::Scheduler;

/// Outcome of a booking request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Booking {
    Created {
        reservation: Reservation,
        ticket_code: String,
    },
    /// The applicant already holds this reservation; nothing was written.
    AlreadyBooked { reservation: Reservation },
}

impl Booking {
    pub fn reservation(&self) -> &Reservation {
        match self {
            Booking::Created { reservation, .. } | Booking::AlreadyBooked { reservation } => {
                reservation
            }
        }
    }
}

impl Scheduler {
    /// Books one slot of an interview day for an applicant.
    ///
    /// Capacity, the one-reservation-per-applicant rule and the applicant's
    /// stage are re-checked inside the store transaction, so the reads here
    /// only decide which error a caller sees first.
    pub async fn reserve_slot(
        &self,
        applicant_id: Option<ApplicantId>,
        interview_day_id: Option<Uuid>,
    ) -> BookingResult<Booking> {
        let (Some(applicant_id), Some(interview_day_id)) = (applicant_id, interview_day_id) else {
            return Err(BookingError::InvalidRequest(
                "applicantId and interviewDayId are required".to_string(),
            ));
        };

        if let Some(reservation) = self
            .store
            .find_reservation_for_applicant(applicant_id)
            .await?
        {
            info!(applicant_id, reservation_id = %reservation.id, "applicant already booked");
            return Ok(Booking::AlreadyBooked { reservation });
        }

        let day = self
            .store
            .find_day(interview_day_id)
            .await?
            .ok_or_else(|| BookingError::day_not_found(interview_day_id))?;
        if !day.is_bookable() {
            return Err(BookingError::slot_unavailable());
        }

        let applicant = self
            .store
            .find_applicant(applicant_id)
            .await?
            .ok_or_else(|| BookingError::applicant_not_found(applicant_id))?;
        if !applicant.status.can_schedule() {
            return Err(BookingError::ineligible(&applicant.status));
        }

        let attempts = self.settings.max_ticket_attempts.max(1);
        for attempt in 1..=attempts {
            let claim = SlotClaim {
                applicant_id,
                interview_day_id,
                time_window: self.settings.time_window.clone(),
                ticket_code: self.tickets.issue(),
                created_at: self.clock.now(),
            };

            match self.store.claim_slot(claim).await? {
                ClaimOutcome::Claimed {
                    reservation,
                    applicant,
                    day,
                } => {
                    info!(
                        applicant_id,
                        interview_day_id = %day.id,
                        reservation_id = %reservation.id,
                        remaining_slots = day.remaining_slots,
                        "interview slot reserved"
                    );
                    let email = notifications::booking_confirmation(
                        &applicant,
                        &day,
                        &reservation,
                        &self.settings,
                    );
                    self.notify(email).await;

                    return Ok(Booking::Created {
                        ticket_code: reservation.ticket_code.clone(),
                        reservation,
                    });
                }
                ClaimOutcome::AlreadyBooked(reservation) => {
                    info!(applicant_id, reservation_id = %reservation.id, "applicant already booked");
                    return Ok(Booking::AlreadyBooked { reservation });
                }
                ClaimOutcome::Ineligible(applicant) => {
                    return Err(BookingError::ineligible(&applicant.status));
                }
                ClaimOutcome::TicketTaken => {
                    warn!(applicant_id, attempt, "ticket code collision");
                }
            }
        }

        Err(BookingError::Conflict(
            "Could not issue a unique ticket code, please try again".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::models::{applicant::ApplicantStatus, interview_day::DayStatus};
    use crate::notify::MockNotifier;
    use crate::scheduling::test_support::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[tokio::test]
    async fn missing_ids_are_rejected_before_any_read() {
        let store = Arc::new(MemoryStore::new());
        let scheduler = scheduler(store.clone(), MockNotifier::new());

        let err = scheduler.reserve_slot(Some(1), None).await.unwrap_err();
        assert!(matches!(err, BookingError::InvalidRequest(_)));

        let err = scheduler.reserve_slot(None, Some(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, BookingError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn booking_issues_ticket_decrements_and_notifies() {
        let store = Arc::new(MemoryStore::new());
        let day = store.add_day(day(1, 1, DayStatus::Active)).await;
        store.add_applicant(applicant(1, ApplicantStatus::Applied)).await;

        let mut notifier = MockNotifier::new();
        notifier
            .expect_send()
            .withf(|email| {
                email.to == vec!["applicant1@example.com".to_string()]
                    && email.html.contains("Auxiliar de bodega")
                    && email.html.contains("7:00 AM - 11:00 AM")
            })
            .times(1)
            .returning(|_| Ok(()));
        let scheduler = scheduler(store.clone(), notifier);

        let booking = scheduler.reserve_slot(Some(1), Some(day.id)).await.unwrap();

        let Booking::Created { reservation, ticket_code } = booking else {
            panic!("expected a new reservation");
        };
        assert_eq!(reservation.ticket_code, ticket_code);
        assert_eq!(ticket_code.len(), 8);
        assert_eq!(reservation.time_window, "7:00 AM - 11:00 AM");
        assert_eq!(reservation.created_at, now());
        assert_eq!(store.day(day.id).await.unwrap().remaining_slots, 0);
        assert_eq!(
            store.applicant(1).await.unwrap().status,
            ApplicantStatus::Interviewing
        );
        assert_eq!(store.history().await.len(), 1);
    }

    #[tokio::test]
    async fn second_applicant_on_a_single_slot_day_is_turned_away() {
        let store = Arc::new(MemoryStore::new());
        let day = store.add_day(day(1, 1, DayStatus::Active)).await;
        store.add_applicant(applicant(1, ApplicantStatus::Applied)).await;
        store.add_applicant(applicant(2, ApplicantStatus::Applied)).await;
        let scheduler = scheduler(store.clone(), quiet_notifier());

        scheduler.reserve_slot(Some(1), Some(day.id)).await.unwrap();
        let err = scheduler.reserve_slot(Some(2), Some(day.id)).await.unwrap_err();

        assert!(matches!(err, BookingError::SlotUnavailable(_)));
        assert_eq!(store.reservations().await.len(), 1);
        assert_eq!(store.day(day.id).await.unwrap().remaining_slots, 0);
    }

    #[tokio::test]
    async fn repeat_booking_returns_the_existing_reservation() {
        let store = Arc::new(MemoryStore::new());
        let first_day = store.add_day(day(1, 5, DayStatus::Active)).await;
        let second_day = store.add_day(day(2, 5, DayStatus::Active)).await;
        store.add_applicant(applicant(1, ApplicantStatus::Applied)).await;
        let scheduler = scheduler(store.clone(), quiet_notifier());

        let first = scheduler.reserve_slot(Some(1), Some(first_day.id)).await.unwrap();
        let second = scheduler.reserve_slot(Some(1), Some(second_day.id)).await.unwrap();

        assert_eq!(
            second,
            Booking::AlreadyBooked {
                reservation: first.reservation().clone()
            }
        );
        assert_eq!(store.reservations().await.len(), 1);
        assert_eq!(store.day(second_day.id).await.unwrap().remaining_slots, 5);
    }

    #[tokio::test]
    async fn inactive_or_unknown_days_cannot_be_booked() {
        let store = Arc::new(MemoryStore::new());
        let inactive = store.add_day(day(1, 3, DayStatus::Inactive)).await;
        store.add_applicant(applicant(1, ApplicantStatus::Applied)).await;
        let scheduler = scheduler(store.clone(), MockNotifier::new());

        let err = scheduler.reserve_slot(Some(1), Some(inactive.id)).await.unwrap_err();
        assert!(matches!(err, BookingError::SlotUnavailable(_)));

        let err = scheduler
            .reserve_slot(Some(1), Some(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::NotFound(_)));
        assert!(store.reservations().await.is_empty());
    }

    #[tokio::test]
    async fn ineligible_applicant_is_rejected_with_its_status() {
        let store = Arc::new(MemoryStore::new());
        let day = store.add_day(day(1, 3, DayStatus::Active)).await;
        store
            .add_applicant(applicant(1, ApplicantStatus::from("Contratado")))
            .await;
        let scheduler = scheduler(store.clone(), MockNotifier::new());

        let err = scheduler.reserve_slot(Some(1), Some(day.id)).await.unwrap_err();

        match err {
            BookingError::InvalidRequest(message) => assert!(message.contains("Contratado")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.day(day.id).await.unwrap().remaining_slots, 3);
    }

    #[tokio::test]
    async fn ticket_collision_is_retried_with_a_fresh_code() {
        let store = Arc::new(MemoryStore::new());
        let day = store.add_day(day(1, 5, DayStatus::Active)).await;
        store.add_applicant(applicant(1, ApplicantStatus::Applied)).await;
        store.add_applicant(applicant(2, ApplicantStatus::Applied)).await;
        let scheduler = scheduler(store.clone(), quiet_notifier()).with_tickets(Arc::new(
            ScriptedTickets::new(&["AAAA0001", "AAAA0001", "BBBB0002"]),
        ));

        scheduler.reserve_slot(Some(1), Some(day.id)).await.unwrap();
        let booking = scheduler.reserve_slot(Some(2), Some(day.id)).await.unwrap();

        assert_eq!(booking.reservation().ticket_code, "BBBB0002");
        assert_eq!(store.reservations().await.len(), 2);
        assert_eq!(store.day(day.id).await.unwrap().remaining_slots, 3);
    }

    #[tokio::test]
    async fn exhausted_ticket_attempts_surface_conflict_without_writes() {
        let store = Arc::new(MemoryStore::new());
        let day = store.add_day(day(1, 5, DayStatus::Active)).await;
        store.add_applicant(applicant(1, ApplicantStatus::Applied)).await;
        store.add_applicant(applicant(2, ApplicantStatus::Applied)).await;
        let scheduler = scheduler(store.clone(), quiet_notifier()).with_tickets(Arc::new(
            ScriptedTickets::new(&["DUPE0000", "DUPE0000", "DUPE0000", "DUPE0000"]),
        ));

        scheduler.reserve_slot(Some(1), Some(day.id)).await.unwrap();
        let err = scheduler.reserve_slot(Some(2), Some(day.id)).await.unwrap_err();

        assert!(matches!(err, BookingError::Conflict(_)));
        assert_eq!(store.reservations().await.len(), 1);
        assert_eq!(store.day(day.id).await.unwrap().remaining_slots, 4);
        assert_eq!(
            store.applicant(2).await.unwrap().status,
            ApplicantStatus::Applied
        );
    }

    #[test_log::test(tokio::test)]
    async fn notifier_failure_keeps_the_booking() {
        let store = Arc::new(MemoryStore::new());
        let day = store.add_day(day(1, 2, DayStatus::Active)).await;
        store.add_applicant(applicant(1, ApplicantStatus::Applied)).await;
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send()
            .times(1)
            .returning(|_| Err(eyre::eyre!("smtp down")));
        let scheduler = scheduler(store.clone(), notifier);

        let booking = scheduler.reserve_slot(Some(1), Some(day.id)).await.unwrap();

        assert!(matches!(booking, Booking::Created { .. }));
        assert_eq!(store.day(day.id).await.unwrap().remaining_slots, 1);
    }

    #[tokio::test]
    async fn concurrent_bookings_never_oversubscribe() {
        let store = Arc::new(MemoryStore::new());
        let day = store.add_day(day(1, 3, DayStatus::Active)).await;
        for id in 1..=10 {
            store.add_applicant(applicant(id, ApplicantStatus::Applied)).await;
        }
        let scheduler = Arc::new(scheduler(store.clone(), quiet_notifier()));

        let handles: Vec<_> = (1..=10)
            .map(|id| {
                let scheduler = scheduler.clone();
                let day_id = day.id;
                tokio::spawn(async move { scheduler.reserve_slot(Some(id), Some(day_id)).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(Booking::Created { .. }) => created += 1,
                Ok(other) => panic!("unexpected booking: {other:?}"),
                Err(err) => assert!(matches!(
                    err,
                    BookingError::SlotUnavailable(_) | BookingError::Conflict(_)
                )),
            }
        }

        assert_eq!(created, 3);
        assert_eq!(store.reservations().await.len(), 3);
        assert_eq!(store.day(day.id).await.unwrap().remaining_slots, 0);
    }

    #[tokio::test]
    async fn concurrent_bookings_by_one_applicant_create_one_reservation() {
        let store = Arc::new(MemoryStore::new());
        let day = store.add_day(day(1, 10, DayStatus::Active)).await;
        store.add_applicant(applicant(1, ApplicantStatus::Applied)).await;
        let scheduler = Arc::new(scheduler(store.clone(), quiet_notifier()));

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let scheduler = scheduler.clone();
                let day_id = day.id;
                tokio::spawn(async move { scheduler.reserve_slot(Some(1), Some(day_id)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.reservations().await.len(), 1);
        assert_eq!(store.day(day.id).await.unwrap().remaining_slots, 9);
    }
}
