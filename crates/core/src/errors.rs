use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] eyre::Report),
}

impl BookingError {
    pub fn day_not_found(id: impl std::fmt::Display) -> Self {
        BookingError::NotFound(format!("Interview day {id} not found"))
    }

    pub fn reservation_not_found(id: impl std::fmt::Display) -> Self {
        BookingError::NotFound(format!("Reservation {id} not found"))
    }

    pub fn applicant_not_found(id: impl std::fmt::Display) -> Self {
        BookingError::NotFound(format!("Applicant {id} not found"))
    }

    pub fn slot_unavailable() -> Self {
        BookingError::SlotUnavailable(
            "No slots left for this day or the day is not active".to_string(),
        )
    }

    /// The applicant's pipeline stage no longer allows booking.
    pub fn ineligible(status: impl std::fmt::Display) -> Self {
        BookingError::InvalidRequest(format!(
            "Application is in status \"{status}\". Only applicants in the early stages can schedule an interview"
        ))
    }

    /// Short machine-readable code used in logs and response envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::InvalidRequest(_) => "invalid_request",
            BookingError::NotFound(_) => "not_found",
            BookingError::Conflict(_) => "conflict",
            BookingError::SlotUnavailable(_) => "slot_unavailable",
            BookingError::Forbidden(_) => "forbidden",
            BookingError::Unexpected(_) => "unexpected",
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
