use crate::models::{DbApplicant, DbHistoryEntry};
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::PgExecutor;

const COLUMNS: &str = "id, full_name, email, document_number, role, status, created_at";

pub struct NewApplicant<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub document_number: &'a str,
    pub role: &'a str,
    pub status: &'a str,
}

pub async fn insert_applicant<'e>(
    executor: impl PgExecutor<'e>,
    new: &NewApplicant<'_>,
) -> Result<DbApplicant> {
    let applicant = sqlx::query_as::<_, DbApplicant>(&format!(
        r#"
        INSERT INTO applicants (full_name, email, document_number, role, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(new.full_name)
    .bind(new.email)
    .bind(new.document_number)
    .bind(new.role)
    .bind(new.status)
    .bind(Utc::now())
    .fetch_one(executor)
    .await?;

    Ok(applicant)
}

pub async fn get_applicant_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: i64,
) -> Result<Option<DbApplicant>> {
    let applicant = sqlx::query_as::<_, DbApplicant>(&format!(
        "SELECT {COLUMNS} FROM applicants WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(applicant)
}

/// Row-locks the applicant so concurrent bookings for the same person queue up.
pub async fn lock_applicant<'e>(
    executor: impl PgExecutor<'e>,
    id: i64,
) -> Result<Option<DbApplicant>> {
    let applicant = sqlx::query_as::<_, DbApplicant>(&format!(
        "SELECT {COLUMNS} FROM applicants WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(applicant)
}

pub async fn get_applicant_by_document<'e>(
    executor: impl PgExecutor<'e>,
    document_number: &str,
) -> Result<Option<DbApplicant>> {
    let applicant = sqlx::query_as::<_, DbApplicant>(&format!(
        "SELECT {COLUMNS} FROM applicants WHERE document_number = $1"
    ))
    .bind(document_number)
    .fetch_optional(executor)
    .await?;

    Ok(applicant)
}

pub async fn update_status<'e>(
    executor: impl PgExecutor<'e>,
    id: i64,
    status: &str,
) -> Result<Option<DbApplicant>> {
    let applicant = sqlx::query_as::<_, DbApplicant>(&format!(
        "UPDATE applicants SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(status)
    .fetch_optional(executor)
    .await?;

    Ok(applicant)
}

pub async fn insert_history<'e>(
    executor: impl PgExecutor<'e>,
    applicant_id: i64,
    action: &str,
    performed_by: &str,
    note: &str,
    created_at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO applicant_history (applicant_id, action, performed_by, note, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(applicant_id)
    .bind(action)
    .bind(performed_by)
    .bind(note)
    .bind(created_at)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn list_history<'e>(
    executor: impl PgExecutor<'e>,
    applicant_id: i64,
) -> Result<Vec<DbHistoryEntry>> {
    let entries = sqlx::query_as::<_, DbHistoryEntry>(
        r#"
        SELECT id, applicant_id, action, performed_by, note, created_at
        FROM applicant_history
        WHERE applicant_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(applicant_id)
    .fetch_all(executor)
    .await?;

    Ok(entries)
}
