//! Runs against a real PostgreSQL only when `TEST_DATABASE_URL` is set.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{NaiveDate, TimeZone};
use pretty_assertions::assert_eq;
use talentgate_core::{
    clock::{DEFAULT_TIMEZONE, FixedClock},
    errors::BookingError,
    models::applicant::{ApplicantId, ApplicantStatus, SYSTEM_ACTOR},
    notify::MockNotifier,
    scheduling::{Booking, Scheduler, SchedulerSettings},
    store::InterviewStore,
    ticket::{RandomTickets, TicketIssuer},
};
use talentgate_db::{
    DbPool, PgInterviewStore, create_pool,
    repositories::applicant::{self, NewApplicant},
    schema::initialize_database,
};
use uuid::Uuid;

async fn test_pool() -> Option<DbPool> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return None;
    };
    let pool = create_pool(&url, 20, Duration::from_secs(10))
        .await
        .expect("Failed to connect to test database");
    initialize_database(&pool)
        .await
        .expect("Failed to initialize schema");
    Some(pool)
}

/// Far-future date unique per test run; `interview_days.date` is unique.
fn unique_date() -> NaiveDate {
    let offset = (Uuid::new_v4().as_u128() % 2_000_000) as u64;
    NaiveDate::from_ymd_opt(2200, 1, 1).unwrap() + chrono::Days::new(offset)
}

async fn seed_applicant(pool: &DbPool, status: &str) -> ApplicantId {
    let document = Uuid::new_v4().simple().to_string();
    let email = format!("{}@example.com", &document[..12]);
    applicant::insert_applicant(
        pool,
        &NewApplicant {
            full_name: "Prueba Integración",
            email: &email,
            document_number: &document[..20],
            role: "Operario",
            status,
        },
    )
    .await
    .expect("Failed to seed applicant")
    .id
}

fn quiet_notifier() -> MockNotifier {
    let mut notifier = MockNotifier::new();
    notifier.expect_send().returning(|_| Ok(()));
    notifier
}

fn scheduler(store: PgInterviewStore) -> Scheduler {
    let now = DEFAULT_TIMEZONE
        .with_ymd_and_hms(2025, 7, 1, 9, 0, 0)
        .unwrap()
        .fixed_offset();
    Scheduler::new(
        Arc::new(store),
        Arc::new(quiet_notifier()),
        Arc::new(FixedClock(now)),
        SchedulerSettings::default(),
    )
}

struct RepeatingTickets(Mutex<Vec<String>>);

impl TicketIssuer for RepeatingTickets {
    fn issue(&self) -> String {
        self.0
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| RandomTickets.issue())
    }
}

#[test_log::test(tokio::test)]
async fn concurrent_bookings_respect_capacity() {
    let Some(pool) = test_pool().await else { return };
    let store = PgInterviewStore::new(pool.clone(), DEFAULT_TIMEZONE);
    let scheduler = Arc::new(scheduler(store.clone()));
    let day = scheduler
        .create_day(Some(unique_date()), Some(3))
        .await
        .unwrap();

    let mut applicants = Vec::new();
    for _ in 0..10 {
        applicants.push(seed_applicant(&pool, "Postulado").await);
    }

    let handles: Vec<_> = applicants
        .iter()
        .map(|&id| {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.reserve_slot(Some(id), Some(day.id)).await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(Booking::Created { .. }) => created += 1,
            Ok(other) => panic!("unexpected booking: {other:?}"),
            Err(err) => assert!(matches!(err, BookingError::SlotUnavailable(_))),
        }
    }

    assert_eq!(created, 3);
    let day = store.find_day(day.id).await.unwrap().unwrap();
    assert_eq!(day.remaining_slots, 0);
    assert_eq!(store.list_day_reservations(day.id).await.unwrap().len(), 3);
}

#[test_log::test(tokio::test)]
async fn repeated_booking_by_one_applicant_keeps_one_reservation() {
    let Some(pool) = test_pool().await else { return };
    let store = PgInterviewStore::new(pool.clone(), DEFAULT_TIMEZONE);
    let scheduler = Arc::new(scheduler(store.clone()));
    let day = scheduler
        .create_day(Some(unique_date()), Some(10))
        .await
        .unwrap();
    let applicant_id = seed_applicant(&pool, "Preseleccionado").await;

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let scheduler = scheduler.clone();
            tokio::spawn(
                async move { scheduler.reserve_slot(Some(applicant_id), Some(day.id)).await },
            )
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let day = store.find_day(day.id).await.unwrap().unwrap();
    assert_eq!(day.remaining_slots, 9);
    assert_eq!(store.list_day_reservations(day.id).await.unwrap().len(), 1);
}

#[test_log::test(tokio::test)]
async fn cancel_restores_capacity_and_records_history() {
    let Some(pool) = test_pool().await else { return };
    let store = PgInterviewStore::new(pool.clone(), DEFAULT_TIMEZONE);
    let scheduler = scheduler(store.clone());
    let day = scheduler
        .create_day(Some(unique_date()), Some(1))
        .await
        .unwrap();
    let applicant_id = seed_applicant(&pool, "Postulado").await;

    let booking = scheduler
        .reserve_slot(Some(applicant_id), Some(day.id))
        .await
        .unwrap();
    let booked = store.find_applicant(applicant_id).await.unwrap().unwrap();
    assert_eq!(booked.status, ApplicantStatus::Interviewing);

    scheduler
        .cancel_reservation(booking.reservation().id, Some(applicant_id))
        .await
        .unwrap();

    let day = store.find_day(day.id).await.unwrap().unwrap();
    assert_eq!(day.remaining_slots, 1);
    let reverted = store.find_applicant(applicant_id).await.unwrap().unwrap();
    assert_eq!(reverted.status, ApplicantStatus::Applied);

    let history = applicant::list_history(&pool, applicant_id).await.unwrap();
    let actions: Vec<_> = history.iter().map(|h| h.action.as_str()).collect();
    assert_eq!(actions, vec!["Entrevista", "Postulado"]);
    assert!(history.iter().all(|h| h.performed_by == SYSTEM_ACTOR));
}

#[test_log::test(tokio::test)]
async fn deleting_a_day_reverts_its_applicants() {
    let Some(pool) = test_pool().await else { return };
    let store = PgInterviewStore::new(pool.clone(), DEFAULT_TIMEZONE);
    let scheduler = scheduler(store.clone());
    let day = scheduler
        .create_day(Some(unique_date()), Some(4))
        .await
        .unwrap();
    let mut applicants = Vec::new();
    for _ in 0..2 {
        let id = seed_applicant(&pool, "Postulado").await;
        scheduler.reserve_slot(Some(id), Some(day.id)).await.unwrap();
        applicants.push(id);
    }

    let released = scheduler.delete_day(day.id).await.unwrap();

    assert_eq!(released, 2);
    assert_eq!(store.find_day(day.id).await.unwrap(), None);
    for id in applicants {
        let applicant = store.find_applicant(id).await.unwrap().unwrap();
        assert_eq!(applicant.status, ApplicantStatus::Applied);
        assert_eq!(store.find_reservation_for_applicant(id).await.unwrap(), None);
    }
}

#[test_log::test(tokio::test)]
async fn duplicate_day_date_is_a_conflict() {
    let Some(pool) = test_pool().await else { return };
    let store = PgInterviewStore::new(pool, DEFAULT_TIMEZONE);
    let date = unique_date();

    store
        .insert_day(talentgate_core::models::interview_day::NewInterviewDay {
            date,
            total_slots: 2,
        })
        .await
        .unwrap();
    let err = store
        .insert_day(talentgate_core::models::interview_day::NewInterviewDay {
            date,
            total_slots: 5,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, BookingError::Conflict(_)));
}

#[test_log::test(tokio::test)]
async fn ticket_collision_is_classified_and_retried() {
    let Some(pool) = test_pool().await else { return };
    let store = PgInterviewStore::new(pool.clone(), DEFAULT_TIMEZONE);
    let taken = format!("{:08X}", Uuid::new_v4().as_u128() as u32);
    let fresh = format!("{:08X}", Uuid::new_v4().as_u128() as u32);
    let tickets = RepeatingTickets(Mutex::new(vec![fresh.clone(), taken.clone(), taken.clone()]));
    let scheduler = scheduler(store.clone()).with_tickets(Arc::new(tickets));
    let day = scheduler
        .create_day(Some(unique_date()), Some(5))
        .await
        .unwrap();
    let first = seed_applicant(&pool, "Postulado").await;
    let second = seed_applicant(&pool, "Postulado").await;

    scheduler.reserve_slot(Some(first), Some(day.id)).await.unwrap();
    let booking = scheduler.reserve_slot(Some(second), Some(day.id)).await.unwrap();

    assert_eq!(booking.reservation().ticket_code, fresh);
    let day = store.find_day(day.id).await.unwrap().unwrap();
    assert_eq!(day.remaining_slots, 3);
}

#[test_log::test(tokio::test)]
async fn cancellations_racing_a_day_deletion_settle_cleanly() {
    let Some(pool) = test_pool().await else { return };
    let store = PgInterviewStore::new(pool.clone(), DEFAULT_TIMEZONE);
    let scheduler = Arc::new(scheduler(store.clone()));

    for _ in 0..20 {
        let day = scheduler
            .create_day(Some(unique_date()), Some(4))
            .await
            .unwrap();
        let mut booked = Vec::new();
        for _ in 0..3 {
            let id = seed_applicant(&pool, "Postulado").await;
            let booking = scheduler.reserve_slot(Some(id), Some(day.id)).await.unwrap();
            booked.push((id, booking.reservation().id));
        }

        let cancels: Vec<_> = booked
            .iter()
            .map(|&(applicant_id, reservation_id)| {
                let scheduler = scheduler.clone();
                tokio::spawn(async move {
                    scheduler
                        .cancel_reservation(reservation_id, Some(applicant_id))
                        .await
                })
            })
            .collect();
        let deletion = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.delete_day(day.id).await })
        };

        let mut cancelled = 0;
        for handle in cancels {
            match handle.await.unwrap() {
                Ok(_) => cancelled += 1,
                Err(BookingError::NotFound(_)) => {}
                Err(err) => panic!("cancellation failed: {err:?}"),
            }
        }
        let released = deletion.await.unwrap().expect("day deletion failed");

        assert_eq!(cancelled + released, booked.len());
        assert_eq!(store.find_day(day.id).await.unwrap(), None);
        for (applicant_id, _) in booked {
            let applicant = store.find_applicant(applicant_id).await.unwrap().unwrap();
            assert_eq!(applicant.status, ApplicantStatus::Applied);
            assert_eq!(
                store.find_reservation_for_applicant(applicant_id).await.unwrap(),
                None
            );
        }
    }
}

#[test_log::test(tokio::test)]
async fn booking_and_deleting_the_same_day_never_leave_orphans() {
    let Some(pool) = test_pool().await else { return };
    let store = PgInterviewStore::new(pool.clone(), DEFAULT_TIMEZONE);
    let scheduler = Arc::new(scheduler(store.clone()));

    for _ in 0..20 {
        let day = scheduler
            .create_day(Some(unique_date()), Some(5))
            .await
            .unwrap();
        let mut applicants = Vec::new();
        for _ in 0..3 {
            applicants.push(seed_applicant(&pool, "Postulado").await);
        }

        let bookings: Vec<_> = applicants
            .iter()
            .map(|&id| {
                let scheduler = scheduler.clone();
                tokio::spawn(async move { scheduler.reserve_slot(Some(id), Some(day.id)).await })
            })
            .collect();
        let deletion = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.delete_day(day.id).await })
        };

        for handle in bookings {
            match handle.await.unwrap() {
                Ok(Booking::Created { .. }) | Err(BookingError::NotFound(_)) => {}
                other => panic!("unexpected booking result: {other:?}"),
            }
        }
        deletion.await.unwrap().expect("day deletion failed");

        // Bookings that landed before the deletion were released by it.
        for id in applicants {
            assert_eq!(store.find_reservation_for_applicant(id).await.unwrap(), None);
            let applicant = store.find_applicant(id).await.unwrap().unwrap();
            assert_eq!(applicant.status, ApplicantStatus::Applied);
        }
    }
}
