use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use serde::Serialize;
use talentgate_core::{
    errors::BookingError,
    models::{
        applicant::{Applicant, ApplicantId},
        interview_day::InterviewDay,
        reservation::{CancelRequest, Reservation, ReservationWithDay, ReserveRequest},
    },
    scheduling::{Booking, Eligibility},
};

use super::parse_id;
use crate::{
    ApiState,
    middleware::error_handling::{AppError, Envelope, respond},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityData {
    pub applicant: Applicant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation: Option<ReservationWithDay>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingData {
    pub reservation: Reservation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_code: Option<String>,
}

#[axum::debug_handler]
pub async fn check_applicant(
    State(state): State<Arc<ApiState>>,
    Path(document_number): Path<String>,
) -> Result<Response, AppError> {
    match state
        .scheduler
        .check_applicant_eligibility(&document_number)
        .await?
    {
        Eligibility::HasReservation {
            applicant,
            reservation,
        } => Ok(respond(
            StatusCode::OK,
            Envelope::data(EligibilityData {
                applicant,
                reservation: Some(reservation),
            })
            .with_status("has_reservation")
            .with_message("Applicant already has an interview scheduled"),
        )),
        Eligibility::CanSchedule { applicant } => Ok(respond(
            StatusCode::OK,
            Envelope::data(EligibilityData {
                applicant,
                reservation: None,
            })
            .with_status("can_schedule"),
        )),
        Eligibility::Ineligible { applicant } => {
            Err(BookingError::ineligible(&applicant.status).into())
        }
    }
}

#[axum::debug_handler]
pub async fn available_days(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Envelope<Vec<InterviewDay>>>, AppError> {
    let days = state.scheduler.available_days().await?;
    Ok(Json(Envelope::data(days)))
}

#[axum::debug_handler]
pub async fn reserve_slot(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<ReserveRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;

    let response = match state
        .scheduler
        .reserve_slot(request.applicant_id, request.interview_day_id)
        .await?
    {
        Booking::Created {
            reservation,
            ticket_code,
        } => respond(
            StatusCode::CREATED,
            Envelope::data(BookingData {
                reservation,
                ticket_code: Some(ticket_code),
            })
            .with_message("Interview booked successfully"),
        ),
        Booking::AlreadyBooked { reservation } => respond(
            StatusCode::OK,
            Envelope::data(BookingData {
                reservation,
                ticket_code: None,
            })
            .with_status("already_booked")
            .with_message("Applicant already has an interview scheduled"),
        ),
    };

    Ok(response)
}

/// The body is optional; without it the cancellation is not ownership-checked.
#[axum::debug_handler]
pub async fn cancel_reservation(
    State(state): State<Arc<ApiState>>,
    Path(reservation_id): Path<String>,
    body: Bytes,
) -> Result<Json<Envelope<Reservation>>, AppError> {
    let reservation_id = parse_id(&reservation_id, "reservation")?;
    let requester = cancel_requester(&body)?;

    let reservation = state
        .scheduler
        .cancel_reservation(reservation_id, requester)
        .await?;

    Ok(Json(
        Envelope::data(reservation).with_message("Reservation cancelled successfully"),
    ))
}

/// An empty body names no requester; anything else has to parse, whatever its content type.
fn cancel_requester(body: &[u8]) -> Result<Option<ApplicantId>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let request: CancelRequest = serde_json::from_slice(body).map_err(|e| {
        AppError(BookingError::InvalidRequest(format!(
            "Invalid cancellation body: {e}"
        )))
    })?;
    Ok(request.applicant_id)
}
