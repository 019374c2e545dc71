use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::models::{applicant::ApplicantId, reservation::Reservation};
use crate::notifications;

use super::Scheduler;

impl Scheduler {
    /// Cancels a reservation, returning its slot to the day.
    ///
    /// When `requesting_applicant_id` is given it must own the reservation.
    pub async fn cancel_reservation(
        &self,
        reservation_id: Uuid,
        requesting_applicant_id: Option<ApplicantId>,
    ) -> BookingResult<Reservation> {
        let reservation = self
            .store
            .find_reservation(reservation_id)
            .await?
            .ok_or_else(|| BookingError::reservation_not_found(reservation_id))?;

        if let Some(requester) = requesting_applicant_id {
            if requester != reservation.applicant_id {
                warn!(%reservation_id, requester, "cancellation by non-owner refused");
                return Err(BookingError::Forbidden(
                    "Not allowed to cancel this reservation".to_string(),
                ));
            }
        }

        // A concurrent cancel may have won the race since the read above.
        let release = self
            .store
            .release_slot(reservation_id, self.clock.now())
            .await?
            .ok_or_else(|| BookingError::reservation_not_found(reservation_id))?;

        info!(
            %reservation_id,
            applicant_id = release.reservation.applicant_id,
            interview_day_id = %release.reservation.interview_day_id,
            remaining_slots = release.day.as_ref().map(|day| day.remaining_slots),
            "interview reservation cancelled"
        );

        match &release.applicant {
            Some(applicant) => {
                let email = notifications::cancellation_notice(
                    applicant,
                    release.day.as_ref(),
                    &release.reservation,
                    &self.settings,
                );
                self.notify(email).await;
            }
            None => warn!(
                applicant_id = release.reservation.applicant_id,
                "cancelled reservation has no applicant record, skipping notification"
            ),
        }

        Ok(release.reservation)
    }
}
