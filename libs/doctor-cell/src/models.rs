use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::{AppError, AppointmentStatus};

// ==============================================================================
// DOCTOR MODELS
// ==============================================================================

/// Doctor record as stored under `doctors/{id}`.
///
/// The shift times are a recurring daily window; `shift_end` earlier than
/// `shift_start` means the window wraps past midnight. Records are only
/// accepted with an exact 12-hour window, which is not re-validated on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub name: String,
    pub specialty: String,
    #[serde(with = "shared_utils::hhmm")]
    pub shift_start: NaiveTime,
    #[serde(with = "shared_utils::hhmm")]
    pub shift_end: NaiveTime,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorRequest {
    pub name: String,
    pub specialty: String,
    #[serde(with = "shared_utils::hhmm")]
    pub shift_start: NaiveTime,
    #[serde(with = "shared_utils::hhmm")]
    pub shift_end: NaiveTime,
}

/// The admin edit form always submits the full record, so updates carry
/// every field rather than a sparse patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorRequest {
    pub name: String,
    pub specialty: String,
    #[serde(with = "shared_utils::hhmm")]
    pub shift_start: NaiveTime,
    #[serde(with = "shared_utils::hhmm")]
    pub shift_end: NaiveTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedDoctor {
    pub id: String,
    /// Appointments dated today or later that still reference the doctor.
    /// They are left in place; historical bookings outlive the doctor record.
    pub upcoming_appointments: usize,
}

// ==============================================================================
// AVAILABILITY MODELS
// ==============================================================================

/// The slice of an appointment record availability checks need. Extra fields
/// on the stored record are ignored here; the full schema lives in the
/// appointment cell.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedAppointment {
    pub doctor: String,
    pub date: NaiveDate,
    #[serde(with = "shared_utils::hhmm")]
    pub time: NaiveTime,
    pub status: AppointmentStatus,
}

/// Outcome of validating one requested (doctor, date, time) slot. Rejections
/// are values, not errors; only store failures surface as `DoctorError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotDecision {
    Available,
    Rejected(SlotRejection),
}

/// Why a requested slot cannot be booked. The messages are shown to the
/// patient verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotRejection {
    #[error("Doctor information not found")]
    DoctorUnavailable,

    #[error("Cannot book appointments in the past")]
    PastInstant,

    #[error("Doctor is only available from {shift_start} to {shift_end}. Please choose a time within these hours.")]
    OutsideShift {
        shift_start: String,
        shift_end: String,
    },

    #[error("Doctor has reached the maximum appointments for this day. Please choose another date or doctor.")]
    AtCapacity,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Shift must be exactly 12 hours")]
    InvalidShiftDuration,

    #[error("A doctor with id \"{0}\" already exists")]
    AlreadyExists(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::MissingFields | DoctorError::InvalidShiftDuration => {
                AppError::ValidationError(err.to_string())
            }
            DoctorError::AlreadyExists(_) => AppError::Conflict(err.to_string()),
            DoctorError::Database(msg) => AppError::Database(msg),
        }
    }
}
