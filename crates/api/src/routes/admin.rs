use axum::{
    Router,
    routing::{get, patch, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/admin/entrevistas/day", post(handlers::admin::create_day))
        .route("/api/admin/entrevistas/days", get(handlers::admin::list_days))
        .route(
            "/api/admin/entrevistas/day/:id",
            get(handlers::admin::day_details).delete(handlers::admin::delete_day),
        )
        .route(
            "/api/admin/entrevistas/day/:id/status",
            patch(handlers::admin::update_day_status),
        )
        .route(
            "/api/admin/entrevistas/reservation/:id/attendance",
            patch(handlers::admin::update_attendance),
        )
}
