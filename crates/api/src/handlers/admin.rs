use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use talentgate_core::{
    errors::BookingError,
    models::{
        interview_day::{
            CreateDayRequest, DayDetails, DayStatus, DeleteDayResponse, InterviewDay,
            UpdateDayStatusRequest,
        },
        reservation::{AttendanceStatus, Reservation, UpdateAttendanceRequest},
    },
};

use super::parse_id;
use crate::{
    ApiState,
    middleware::error_handling::{AppError, Envelope, respond},
};

#[axum::debug_handler]
pub async fn create_day(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CreateDayRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;

    let day = state
        .scheduler
        .create_day(request.date, request.total_slots)
        .await?;

    Ok(respond(
        StatusCode::CREATED,
        Envelope::data(day).with_message("Interview day created successfully"),
    ))
}

#[axum::debug_handler]
pub async fn list_days(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Envelope<Vec<InterviewDay>>>, AppError> {
    let days = state.scheduler.list_days().await?;
    Ok(Json(Envelope::data(days)))
}

#[axum::debug_handler]
pub async fn day_details(
    State(state): State<Arc<ApiState>>,
    Path(day_id): Path<String>,
) -> Result<Json<Envelope<DayDetails>>, AppError> {
    let day_id = parse_id(&day_id, "interview day")?;
    let details = state.scheduler.day_details(day_id).await?;
    Ok(Json(Envelope::data(details)))
}

#[axum::debug_handler]
pub async fn delete_day(
    State(state): State<Arc<ApiState>>,
    Path(day_id): Path<String>,
) -> Result<Json<Envelope<DeleteDayResponse>>, AppError> {
    let day_id = parse_id(&day_id, "interview day")?;
    let released_reservations = state.scheduler.delete_day(day_id).await?;

    Ok(Json(
        Envelope::data(DeleteDayResponse {
            id: day_id,
            released_reservations,
        })
        .with_message("Interview day and its reservations deleted"),
    ))
}

#[axum::debug_handler]
pub async fn update_day_status(
    State(state): State<Arc<ApiState>>,
    Path(day_id): Path<String>,
    payload: Result<Json<UpdateDayStatusRequest>, JsonRejection>,
) -> Result<Json<Envelope<InterviewDay>>, AppError> {
    let day_id = parse_id(&day_id, "interview day")?;
    let Json(request) = payload?;
    let status: DayStatus = request
        .status
        .ok_or_else(|| BookingError::InvalidRequest("status is required".to_string()))?
        .parse()?;

    let day = state.scheduler.set_day_status(day_id, status).await?;
    Ok(Json(
        Envelope::data(day).with_message("Interview day status updated"),
    ))
}

#[axum::debug_handler]
pub async fn update_attendance(
    State(state): State<Arc<ApiState>>,
    Path(reservation_id): Path<String>,
    payload: Result<Json<UpdateAttendanceRequest>, JsonRejection>,
) -> Result<Json<Envelope<Reservation>>, AppError> {
    let reservation_id = parse_id(&reservation_id, "reservation")?;
    let Json(request) = payload?;
    let status: AttendanceStatus = request
        .attendance_status
        .ok_or_else(|| BookingError::InvalidRequest("attendanceStatus is required".to_string()))?
        .parse()?;

    let reservation = state.scheduler.set_attendance(reservation_id, status).await?;
    Ok(Json(
        Envelope::data(reservation).with_message("Attendance updated"),
    ))
}
