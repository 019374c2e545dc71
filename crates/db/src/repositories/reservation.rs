use crate::models::{DbReservation, DbReservationDetail};
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::PgExecutor;
use uuid::Uuid;

const COLUMNS: &str =
    "id, applicant_id, interview_day_id, time_window, ticket_code, attendance_status, created_at";

pub struct NewReservation<'a> {
    pub applicant_id: i64,
    pub interview_day_id: Uuid,
    pub time_window: &'a str,
    pub ticket_code: &'a str,
    pub attendance_status: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Inserts a reservation. Unique violations are returned untouched so the
/// caller can tell a duplicate ticket from a duplicate applicant.
pub async fn insert_reservation<'e>(
    executor: impl PgExecutor<'e>,
    new: &NewReservation<'_>,
) -> Result<DbReservation> {
    let id = Uuid::new_v4();
    tracing::debug!(
        %id,
        applicant_id = new.applicant_id,
        interview_day_id = %new.interview_day_id,
        "inserting reservation"
    );

    let reservation = sqlx::query_as::<_, DbReservation>(&format!(
        r#"
        INSERT INTO reservations
            (id, applicant_id, interview_day_id, time_window, ticket_code, attendance_status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(new.applicant_id)
    .bind(new.interview_day_id)
    .bind(new.time_window)
    .bind(new.ticket_code)
    .bind(new.attendance_status)
    .bind(new.created_at)
    .fetch_one(executor)
    .await?;

    Ok(reservation)
}

pub async fn get_reservation_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> Result<Option<DbReservation>> {
    let reservation = sqlx::query_as::<_, DbReservation>(&format!(
        "SELECT {COLUMNS} FROM reservations WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(reservation)
}

pub async fn lock_reservation<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> Result<Option<DbReservation>> {
    let reservation = sqlx::query_as::<_, DbReservation>(&format!(
        "SELECT {COLUMNS} FROM reservations WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(reservation)
}

pub async fn get_reservation_for_applicant<'e>(
    executor: impl PgExecutor<'e>,
    applicant_id: i64,
) -> Result<Option<DbReservation>> {
    let reservation = sqlx::query_as::<_, DbReservation>(&format!(
        "SELECT {COLUMNS} FROM reservations WHERE applicant_id = $1"
    ))
    .bind(applicant_id)
    .fetch_optional(executor)
    .await?;

    Ok(reservation)
}

pub async fn list_reservations_for_day<'e>(
    executor: impl PgExecutor<'e>,
    interview_day_id: Uuid,
) -> Result<Vec<DbReservation>> {
    let reservations = sqlx::query_as::<_, DbReservation>(&format!(
        "SELECT {COLUMNS} FROM reservations WHERE interview_day_id = $1 ORDER BY created_at ASC"
    ))
    .bind(interview_day_id)
    .fetch_all(executor)
    .await?;

    Ok(reservations)
}

pub async fn list_details_for_day<'e>(
    executor: impl PgExecutor<'e>,
    interview_day_id: Uuid,
) -> Result<Vec<DbReservationDetail>> {
    let details = sqlx::query_as::<_, DbReservationDetail>(
        r#"
        SELECT r.id, r.applicant_id, r.interview_day_id, r.time_window, r.ticket_code,
               r.attendance_status, r.created_at,
               a.full_name, a.document_number, a.email, a.role
        FROM reservations r
        JOIN applicants a ON a.id = r.applicant_id
        WHERE r.interview_day_id = $1
        ORDER BY r.created_at ASC
        "#,
    )
    .bind(interview_day_id)
    .fetch_all(executor)
    .await?;

    Ok(details)
}

pub async fn update_attendance<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    attendance_status: &str,
) -> Result<Option<DbReservation>> {
    let reservation = sqlx::query_as::<_, DbReservation>(&format!(
        "UPDATE reservations SET attendance_status = $2 WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(attendance_status)
    .fetch_optional(executor)
    .await?;

    Ok(reservation)
}

pub async fn delete_reservation<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_reservations_for_day<'e>(
    executor: impl PgExecutor<'e>,
    interview_day_id: Uuid,
) -> Result<u64> {
    let result = sqlx::query("DELETE FROM reservations WHERE interview_day_id = $1")
        .bind(interview_day_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
