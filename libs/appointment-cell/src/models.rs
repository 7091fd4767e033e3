use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use doctor_cell::models::{DoctorError, SlotRejection};
use shared_models::{AppError, AppointmentStatus};

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// Appointment record as stored under `appointments/{id}` and, after
/// archival, `appointmentArchive/{id}`. The store key is the identifier and
/// is carried next to the record, not inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub doctor: String,
    pub date: NaiveDate,
    #[serde(with = "shared_utils::hhmm")]
    pub time: NaiveTime,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub doctor: String,
    pub date: NaiveDate,
    #[serde(with = "shared_utils::hhmm")]
    pub time: NaiveTime,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub id: String,
    pub appointment: Appointment,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SweepSummary {
    pub expired: usize,
    pub archived: usize,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),

    #[error("Too many appointment attempts. Please try again in an hour.")]
    RateLimited,

    #[error("{0}")]
    SlotRejected(SlotRejection),

    #[error("A patient named \"{name}\" already has an appointment on {date}. Please choose a different date or contact the clinic if you need to reschedule.")]
    DuplicateBooking { name: String, date: String },

    #[error("Appointment not found")]
    NotFound,

    #[error("Appointment cannot change status from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<DoctorError> for BookingError {
    fn from(err: DoctorError) -> Self {
        BookingError::Database(err.to_string())
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(_) => AppError::ValidationError(err.to_string()),
            BookingError::RateLimited => AppError::TooManyRequests(err.to_string()),
            BookingError::SlotRejected(_) | BookingError::DuplicateBooking { .. } => {
                AppError::Conflict(err.to_string())
            }
            BookingError::NotFound => AppError::NotFound(err.to_string()),
            BookingError::InvalidStatusTransition { .. } => AppError::BadRequest(err.to_string()),
            BookingError::Database(msg) => AppError::Database(msg),
        }
    }
}
