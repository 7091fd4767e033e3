use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::handlers;
use crate::AppointmentCellState;

pub fn appointment_routes(state: AppointmentCellState) -> Router {
    Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/", get(handlers::list_appointments))
        .route("/counts", get(handlers::get_daily_counts))
        .route("/archive", get(handlers::get_archive))
        .route("/archive", delete(handlers::purge_archive))
        .route("/cleanup", post(handlers::run_cleanup))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/status", patch(handlers::update_appointment_status))
        .route("/{appointment_id}/archive", post(handlers::archive_appointment))
        .with_state(state)
}
