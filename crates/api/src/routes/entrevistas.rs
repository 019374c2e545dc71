use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/entrevistas/check-postulante/:document_number",
            get(handlers::entrevistas::check_applicant),
        )
        .route(
            "/api/entrevistas/disponibilidad",
            get(handlers::entrevistas::available_days),
        )
        .route(
            "/api/entrevistas/reservar",
            post(handlers::entrevistas::reserve_slot),
        )
        .route(
            "/api/entrevistas/cancelar/:reservation_id",
            delete(handlers::entrevistas::cancel_reservation),
        )
}
