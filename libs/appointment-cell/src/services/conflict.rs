use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use shared_config::ClinicConfig;
use shared_database::FirebaseClient;
use shared_models::AppointmentStatus;

use crate::models::{Appointment, BookingError};

/// Duplicate-booking detection: the same patient name may not hold two
/// non-cancelled appointments on the same calendar date.
pub struct ConflictGuard {
    firebase: FirebaseClient,
}

impl ConflictGuard {
    pub fn new(config: &ClinicConfig) -> Self {
        Self {
            firebase: FirebaseClient::new(config),
        }
    }

    /// First active appointment matching the candidate name and date, if any.
    /// The caller turns a hit into a rejection before anything is written;
    /// the check and the subsequent write are not atomic (accepted race).
    pub async fn check(
        &self,
        candidate_name: &str,
        candidate_date: NaiveDate,
    ) -> Result<Option<Appointment>, BookingError> {
        debug!(
            "Checking duplicate booking for \"{}\" on {}",
            candidate_name, candidate_date
        );

        let appointments: BTreeMap<String, Appointment> = self
            .firebase
            .get("appointments")
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?
            .unwrap_or_default();

        Ok(find_duplicate(candidate_name, candidate_date, &appointments)
            .map(|(_, apt)| apt.clone()))
    }
}

/// Match rule: case-insensitive, whitespace-trimmed name equality, exact date
/// equality, and the existing appointment is not cancelled. The first match
/// is enough.
pub fn find_duplicate<'a>(
    candidate_name: &str,
    candidate_date: NaiveDate,
    appointments: &'a BTreeMap<String, Appointment>,
) -> Option<(&'a str, &'a Appointment)> {
    let wanted = candidate_name.trim().to_lowercase();

    appointments
        .iter()
        .find(|(_, apt)| {
            apt.name.trim().to_lowercase() == wanted
                && apt.date == candidate_date
                && apt.status != AppointmentStatus::Cancelled
        })
        .map(|(id, apt)| (id.as_str(), apt))
}
