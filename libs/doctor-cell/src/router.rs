use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use shared_config::ClinicConfig;

use crate::handlers;

pub fn doctor_routes(state: Arc<ClinicConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/", post(handlers::create_doctor))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route("/{doctor_id}", put(handlers::update_doctor))
        .route("/{doctor_id}", delete(handlers::delete_doctor))
        .route("/{doctor_id}/slots", get(handlers::get_available_slots))
        .with_state(state)
}
