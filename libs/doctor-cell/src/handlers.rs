use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::ClinicConfig;
use shared_models::AppError;
use shared_utils::format::format_time_12h;

use crate::models::{CreateDoctorRequest, UpdateDoctorRequest};
use crate::services::{AvailabilityService, DoctorService};

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

pub async fn list_doctors(
    State(config): State<Arc<ClinicConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&config);
    let doctors = service.list_doctors().await?;

    Ok(Json(json!(doctors)))
}

pub async fn get_doctor(
    State(config): State<Arc<ClinicConfig>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&config);
    let doctor = service.get_doctor(&doctor_id).await?;

    Ok(Json(json!(doctor)))
}

pub async fn create_doctor(
    State(config): State<Arc<ClinicConfig>>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&config);
    let (id, doctor) = service.create_doctor(request, Utc::now()).await?;

    Ok(Json(json!({
        "id": id,
        "doctor": doctor,
        "message": format!("Doctor added successfully with ID: {}", id),
    })))
}

pub async fn update_doctor(
    State(config): State<Arc<ClinicConfig>>,
    Path(doctor_id): Path<String>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&config);
    let doctor = service.update_doctor(&doctor_id, request, Utc::now()).await?;

    Ok(Json(json!({
        "id": doctor_id,
        "doctor": doctor,
        "message": "Doctor updated successfully",
    })))
}

pub async fn delete_doctor(
    State(config): State<Arc<ClinicConfig>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(&config);
    let deleted = service
        .delete_doctor(&doctor_id, config.local_now().date())
        .await?;

    Ok(Json(json!(deleted)))
}

/// Open slots for one doctor on one date, in the `{value, display}` shape the
/// booking page's time dropdown consumes.
pub async fn get_available_slots(
    State(config): State<Arc<ClinicConfig>>,
    Path(doctor_id): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&config);
    let slots = service
        .list_available_slots(&doctor_id, query.date, config.local_now())
        .await?;

    let entries: Vec<Value> = slots
        .into_iter()
        .map(|slot| {
            json!({
                "value": slot.format("%H:%M").to_string(),
                "display": format_time_12h(slot),
            })
        })
        .collect();

    Ok(Json(json!({ "date": query.date, "slots": entries })))
}
