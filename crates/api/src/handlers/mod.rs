/// Staff endpoints: day lifecycle and attendance
pub mod admin;
/// Applicant endpoints: eligibility, availability, booking and cancellation
pub mod entrevistas;

use uuid::Uuid;

use crate::middleware::error_handling::AppError;
use talentgate_core::errors::BookingError;

/// Path ids are taken as text so a malformed one is answered in the envelope.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError(BookingError::InvalidRequest(format!("Invalid {what} id: {raw}"))))
}
