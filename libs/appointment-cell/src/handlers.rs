use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_models::{AppError, AppointmentStatus};

use crate::models::{BookAppointmentRequest, UpdateStatusRequest};
use crate::services::{ArchiveService, BookingService};
use crate::AppointmentCellState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Deserialize)]
pub struct CountsQuery {
    pub date: NaiveDate,
}

/// Public booking submission.
pub async fn book_appointment(
    State(state): State<AppointmentCellState>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state.config, state.limiter.clone());
    let confirmation = service.book(request, Utc::now()).await?;

    Ok(Json(json!(confirmation)))
}

pub async fn list_appointments(
    State(state): State<AppointmentCellState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state.config, state.limiter.clone());
    let appointments = service.list_appointments(query.status).await?;

    Ok(Json(json!(appointments)))
}

pub async fn get_appointment(
    State(state): State<AppointmentCellState>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state.config, state.limiter.clone());
    let appointment = service.get_appointment(&appointment_id).await?;

    Ok(Json(json!(appointment)))
}

/// Admin confirm/cancel.
pub async fn update_appointment_status(
    State(state): State<AppointmentCellState>,
    Path(appointment_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state.config, state.limiter.clone());
    let appointment = service.set_status(&appointment_id, request.status).await?;

    Ok(Json(json!({
        "id": appointment_id,
        "appointment": appointment,
    })))
}

/// Live bookings per doctor on one date, for the dashboard capacity column.
pub async fn get_daily_counts(
    State(state): State<AppointmentCellState>,
    Query(query): Query<CountsQuery>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state.config, state.limiter.clone());
    let counts = service.daily_counts(query.date).await?;

    Ok(Json(json!({ "date": query.date, "counts": counts })))
}

/// Manual trigger for the cleanup sweep.
pub async fn run_cleanup(
    State(state): State<AppointmentCellState>,
) -> Result<Json<Value>, AppError> {
    let service = ArchiveService::new(&state.config);
    let summary = service
        .run_sweep(Utc::now(), state.config.local_now().date())
        .await?;

    let message = if summary.archived > 0 {
        format!(
            "Cleanup completed! Archived {} old appointments and cleaned main list.",
            summary.archived
        )
    } else {
        "No old appointments found to clean up.".to_string()
    };

    Ok(Json(json!({
        "expired": summary.expired,
        "archived": summary.archived,
        "message": message,
    })))
}

pub async fn get_archive(
    State(state): State<AppointmentCellState>,
) -> Result<Json<Value>, AppError> {
    let service = ArchiveService::new(&state.config);
    let history = service.merged_history(state.config.local_now().date()).await?;

    Ok(Json(json!(history)))
}

pub async fn purge_archive(
    State(state): State<AppointmentCellState>,
) -> Result<Json<Value>, AppError> {
    let service = ArchiveService::new(&state.config);
    service.purge().await?;

    Ok(Json(json!({
        "message": "All archived appointments deleted!",
    })))
}

/// Move one appointment into the archive immediately.
pub async fn archive_appointment(
    State(state): State<AppointmentCellState>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = ArchiveService::new(&state.config);
    service.archive_one(&appointment_id, Utc::now()).await?;

    Ok(Json(json!({
        "id": appointment_id,
        "message": "Appointment moved to archive successfully!",
    })))
}
