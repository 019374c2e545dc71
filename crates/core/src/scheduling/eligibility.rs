use eyre::eyre;

use crate::errors::{BookingError, BookingResult};
use crate::models::{applicant::Applicant, reservation::ReservationWithDay};

use super::Scheduler;

/// Whether an applicant can go on to book an interview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    HasReservation {
        applicant: Applicant,
        reservation: ReservationWithDay,
    },
    CanSchedule { applicant: Applicant },
    /// The applicant's stage is past the point where booking is allowed.
    Ineligible { applicant: Applicant },
}

impl Scheduler {
    pub async fn check_applicant_eligibility(
        &self,
        document_number: &str,
    ) -> BookingResult<Eligibility> {
        let document_number = document_number.trim();
        if document_number.is_empty() {
            return Err(BookingError::InvalidRequest(
                "Document number is required".to_string(),
            ));
        }

        let applicant = self
            .store
            .find_applicant_by_document(document_number)
            .await?
            .ok_or_else(|| {
                BookingError::NotFound(
                    "No application found for this document number. Please complete the application form first"
                        .to_string(),
                )
            })?;

        if let Some(reservation) = self
            .store
            .find_reservation_for_applicant(applicant.id)
            .await?
        {
            let interview_day = self
                .store
                .find_day(reservation.interview_day_id)
                .await?
                .ok_or_else(|| {
                    eyre!(
                        "reservation {} points at missing interview day {}",
                        reservation.id,
                        reservation.interview_day_id
                    )
                })?;

            return Ok(Eligibility::HasReservation {
                applicant,
                reservation: ReservationWithDay {
                    reservation,
                    interview_day,
                },
            });
        }

        if applicant.status.can_schedule() {
            Ok(Eligibility::CanSchedule { applicant })
        } else {
            Ok(Eligibility::Ineligible { applicant })
        }
    }
}
