use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use appointment_cell::AppointmentCellState;
use doctor_cell::router::doctor_routes;
use shared_config::ClinicConfig;

pub fn create_router(config: Arc<ClinicConfig>, appointment_state: AppointmentCellState) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic booking API is running!" }))
        .nest("/doctors", doctor_routes(config))
        .nest("/appointments", appointment_routes(appointment_state))
}
