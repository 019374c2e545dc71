use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

/// Unique constraint names the store maps back to domain outcomes.
pub const DAY_DATE_UNIQUE: &str = "interview_days_date_unique";
pub const RESERVATION_APPLICANT_UNIQUE: &str = "reservations_applicant_unique";
pub const RESERVATION_TICKET_UNIQUE: &str = "reservations_ticket_code_unique";

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Applicants are owned by the application-tracking side; only the fields
    // the interview flow reads are required here.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS applicants (
            id BIGSERIAL PRIMARY KEY,
            full_name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            document_number VARCHAR(64) NOT NULL UNIQUE,
            role VARCHAR(255) NOT NULL,
            status VARCHAR(64) NOT NULL DEFAULT 'Postulado',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS applicant_history (
            id BIGSERIAL PRIMARY KEY,
            applicant_id BIGINT NOT NULL REFERENCES applicants(id) ON DELETE CASCADE,
            action VARCHAR(64) NOT NULL,
            performed_by VARCHAR(255) NOT NULL,
            note TEXT NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS interview_days (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            date DATE NOT NULL,
            total_slots INTEGER NOT NULL,
            remaining_slots INTEGER NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'Activo',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT interview_days_date_unique UNIQUE (date),
            CONSTRAINT interview_days_capacity CHECK (
                total_slots >= 1 AND remaining_slots >= 0 AND remaining_slots <= total_slots
            ),
            CONSTRAINT interview_days_status CHECK (
                status IN ('Activo', 'Inactivo', 'Lleno', 'Finalizado')
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reservations (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            applicant_id BIGINT NOT NULL REFERENCES applicants(id),
            interview_day_id UUID NOT NULL REFERENCES interview_days(id),
            time_window VARCHAR(64) NOT NULL,
            ticket_code VARCHAR(16) NOT NULL,
            attendance_status VARCHAR(32) NOT NULL DEFAULT 'Pendiente',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT reservations_applicant_unique UNIQUE (applicant_id),
            CONSTRAINT reservations_ticket_code_unique UNIQUE (ticket_code),
            CONSTRAINT reservations_attendance_status CHECK (
                attendance_status IN ('Pendiente', 'Asistió', 'No Asistió')
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    // One statement per call: prepared statements cannot hold several.
    for index in [
        "CREATE INDEX IF NOT EXISTS idx_interview_days_status ON interview_days(status)",
        "CREATE INDEX IF NOT EXISTS idx_reservations_interview_day_id ON reservations(interview_day_id)",
        "CREATE INDEX IF NOT EXISTS idx_applicant_history_applicant_id ON applicant_history(applicant_id)",
    ] {
        sqlx::query(index).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
