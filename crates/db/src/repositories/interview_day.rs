use crate::models::DbInterviewDay;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use sqlx::PgExecutor;
use uuid::Uuid;

const COLUMNS: &str = "id, date, total_slots, remaining_slots, status, created_at";

pub async fn insert_day<'e>(
    executor: impl PgExecutor<'e>,
    date: NaiveDate,
    total_slots: i32,
    status: &str,
) -> Result<DbInterviewDay> {
    let id = Uuid::new_v4();
    tracing::debug!(%id, %date, total_slots, "inserting interview day");

    let day = sqlx::query_as::<_, DbInterviewDay>(&format!(
        r#"
        INSERT INTO interview_days (id, date, total_slots, remaining_slots, status, created_at)
        VALUES ($1, $2, $3, $3, $4, $5)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(date)
    .bind(total_slots)
    .bind(status)
    .bind(Utc::now())
    .fetch_one(executor)
    .await?;

    Ok(day)
}

pub async fn get_day_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> Result<Option<DbInterviewDay>> {
    let day = sqlx::query_as::<_, DbInterviewDay>(&format!(
        "SELECT {COLUMNS} FROM interview_days WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(day)
}

/// Row-locks the day until the surrounding transaction ends.
pub async fn lock_day<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> Result<Option<DbInterviewDay>> {
    let day = sqlx::query_as::<_, DbInterviewDay>(&format!(
        "SELECT {COLUMNS} FROM interview_days WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(day)
}

pub async fn get_day_by_date<'e>(
    executor: impl PgExecutor<'e>,
    date: NaiveDate,
) -> Result<Option<DbInterviewDay>> {
    let day = sqlx::query_as::<_, DbInterviewDay>(&format!(
        "SELECT {COLUMNS} FROM interview_days WHERE date = $1"
    ))
    .bind(date)
    .fetch_optional(executor)
    .await?;

    Ok(day)
}

pub async fn list_days<'e>(executor: impl PgExecutor<'e>) -> Result<Vec<DbInterviewDay>> {
    let days = sqlx::query_as::<_, DbInterviewDay>(&format!(
        "SELECT {COLUMNS} FROM interview_days ORDER BY date ASC"
    ))
    .fetch_all(executor)
    .await?;

    Ok(days)
}

pub async fn list_bookable_days<'e>(
    executor: impl PgExecutor<'e>,
    from: NaiveDate,
    active_status: &str,
) -> Result<Vec<DbInterviewDay>> {
    let days = sqlx::query_as::<_, DbInterviewDay>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM interview_days
        WHERE date >= $1 AND status = $2 AND remaining_slots > 0
        ORDER BY date ASC
        "#
    ))
    .bind(from)
    .bind(active_status)
    .fetch_all(executor)
    .await?;

    Ok(days)
}

pub async fn update_status<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    status: &str,
) -> Result<Option<DbInterviewDay>> {
    let day = sqlx::query_as::<_, DbInterviewDay>(&format!(
        "UPDATE interview_days SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(status)
    .fetch_optional(executor)
    .await?;

    Ok(day)
}

/// Decrements capacity only while the day is active and has a slot left.
///
/// `None` means nothing was taken: the day is missing, not active or full.
pub async fn take_slot<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    active_status: &str,
) -> Result<Option<DbInterviewDay>> {
    let day = sqlx::query_as::<_, DbInterviewDay>(&format!(
        r#"
        UPDATE interview_days
        SET remaining_slots = remaining_slots - 1
        WHERE id = $1 AND status = $2 AND remaining_slots > 0
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(active_status)
    .fetch_optional(executor)
    .await?;

    Ok(day)
}

/// Gives one slot back, capped at the day's total.
pub async fn return_slot<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> Result<Option<DbInterviewDay>> {
    let day = sqlx::query_as::<_, DbInterviewDay>(&format!(
        r#"
        UPDATE interview_days
        SET remaining_slots = LEAST(remaining_slots + 1, total_slots)
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(day)
}

pub async fn delete_day<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM interview_days WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
