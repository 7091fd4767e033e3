use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use serde_json::json;
use tracing::{debug, info};

use shared_config::ClinicConfig;
use shared_database::FirebaseClient;
use shared_models::AppointmentStatus;

use crate::models::{
    BookedAppointment, CreateDoctorRequest, DeletedDoctor, Doctor, DoctorError,
    UpdateDoctorRequest,
};
use crate::schedule::{shift_duration_minutes, REQUIRED_SHIFT_MINUTES};

/// Identifier derived from the doctor's display name: lowercased, leading
/// "Dr."/"Dr" tokens stripped, whitespace turned into hyphens, anything
/// outside `[a-z0-9-]` dropped, hyphen runs collapsed.
pub fn doctor_slug(name: &str) -> String {
    let lowered = name.to_lowercase();
    let no_prefix = Regex::new(r"^(?:dr\.?\s*)+").unwrap().replace(&lowered, "");
    let hyphenated = Regex::new(r"\s+")
        .unwrap()
        .replace_all(no_prefix.trim(), "-")
        .into_owned();
    let cleaned: String = hyphenated
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    Regex::new(r"-+")
        .unwrap()
        .replace_all(&cleaned, "-")
        .trim_matches('-')
        .to_string()
}

pub struct DoctorService {
    firebase: FirebaseClient,
}

impl DoctorService {
    pub fn new(config: &ClinicConfig) -> Self {
        Self {
            firebase: FirebaseClient::new(config),
        }
    }

    pub async fn list_doctors(&self) -> Result<BTreeMap<String, Doctor>, DoctorError> {
        debug!("Fetching doctor directory");

        let doctors: Option<BTreeMap<String, Doctor>> = self
            .firebase
            .get("doctors")
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        Ok(doctors.unwrap_or_default())
    }

    pub async fn get_doctor(&self, doctor_id: &str) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor: {}", doctor_id);

        self.firebase
            .get(&format!("doctors/{}", doctor_id))
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?
            .ok_or(DoctorError::NotFound)
    }

    /// Create a doctor record keyed by the name-derived slug. The 12-hour
    /// shift rule is enforced here and nowhere else.
    pub async fn create_doctor(
        &self,
        request: CreateDoctorRequest,
        now: DateTime<Utc>,
    ) -> Result<(String, Doctor), DoctorError> {
        validate_doctor_fields(&request.name, &request.specialty)?;
        validate_shift(request.shift_start, request.shift_end)?;

        let doctor = Doctor {
            name: request.name.trim().to_string(),
            specialty: request.specialty.trim().to_string(),
            shift_start: request.shift_start,
            shift_end: request.shift_end,
            added_at: now,
            updated_at: now,
        };

        let slug = doctor_slug(&doctor.name);
        let id = if slug.is_empty() {
            // Nothing usable left of the name; let the store pick a key.
            self.firebase
                .push("doctors", &doctor)
                .await
                .map_err(|e| DoctorError::Database(e.to_string()))?
        } else {
            let existing: Option<Doctor> = self
                .firebase
                .get(&format!("doctors/{}", slug))
                .await
                .map_err(|e| DoctorError::Database(e.to_string()))?;
            if existing.is_some() {
                return Err(DoctorError::AlreadyExists(slug));
            }

            self.firebase
                .set(&format!("doctors/{}", slug), &doctor)
                .await
                .map_err(|e| DoctorError::Database(e.to_string()))?;
            slug
        };

        info!("Doctor added with ID: {}", id);
        Ok((id, doctor))
    }

    pub async fn update_doctor(
        &self,
        doctor_id: &str,
        request: UpdateDoctorRequest,
        now: DateTime<Utc>,
    ) -> Result<Doctor, DoctorError> {
        validate_doctor_fields(&request.name, &request.specialty)?;
        validate_shift(request.shift_start, request.shift_end)?;

        let current = self.get_doctor(doctor_id).await?;

        let update = json!({
            "name": request.name.trim(),
            "specialty": request.specialty.trim(),
            "shiftStart": request.shift_start.format("%H:%M").to_string(),
            "shiftEnd": request.shift_end.format("%H:%M").to_string(),
            "updatedAt": now,
        });
        self.firebase
            .update(&format!("doctors/{}", doctor_id), &update)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        info!("Doctor {} updated", doctor_id);
        Ok(Doctor {
            name: request.name.trim().to_string(),
            specialty: request.specialty.trim().to_string(),
            shift_start: request.shift_start,
            shift_end: request.shift_end,
            added_at: current.added_at,
            updated_at: now,
        })
    }

    /// Remove a doctor record. Appointments are never cascade-deleted; the
    /// response reports how many upcoming bookings still reference the id.
    pub async fn delete_doctor(
        &self,
        doctor_id: &str,
        today: NaiveDate,
    ) -> Result<DeletedDoctor, DoctorError> {
        self.get_doctor(doctor_id).await?;

        let appointments: BTreeMap<String, BookedAppointment> = self
            .firebase
            .get("appointments")
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?
            .unwrap_or_default();

        let upcoming_appointments = appointments
            .values()
            .filter(|apt| apt.doctor == doctor_id && apt.date >= today)
            .filter(|apt| apt.status != AppointmentStatus::Cancelled)
            .count();

        self.firebase
            .delete(&format!("doctors/{}", doctor_id))
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        info!(
            "Doctor {} removed ({} upcoming appointments left in place)",
            doctor_id, upcoming_appointments
        );
        Ok(DeletedDoctor {
            id: doctor_id.to_string(),
            upcoming_appointments,
        })
    }
}

fn validate_doctor_fields(name: &str, specialty: &str) -> Result<(), DoctorError> {
    if name.trim().is_empty() || specialty.trim().is_empty() {
        return Err(DoctorError::MissingFields);
    }
    Ok(())
}

fn validate_shift(shift_start: NaiveTime, shift_end: NaiveTime) -> Result<(), DoctorError> {
    if shift_duration_minutes(shift_start, shift_end) != REQUIRED_SHIFT_MINUTES {
        return Err(DoctorError::InvalidShiftDuration);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_strips_title_and_normalizes() {
        assert_eq!(doctor_slug("Dr. Maria Santos"), "maria-santos");
        assert_eq!(doctor_slug("Dr Juan  Dela Cruz"), "juan-dela-cruz");
        assert_eq!(doctor_slug("dr. dr. Ana Reyes"), "ana-reyes");
    }

    #[test]
    fn slug_drops_punctuation_and_collapses_hyphens() {
        assert_eq!(doctor_slug("Dr. José María (Peds)"), "jos-mara-peds");
        assert_eq!(doctor_slug("Dr. A---B"), "a-b");
    }

    #[test]
    fn slug_keeps_dr_inside_names() {
        // Only the leading title is stripped, not letters inside a name.
        assert_eq!(doctor_slug("Dr. Sandra Cruz"), "sandra-cruz");
    }

    #[test]
    fn slug_of_title_only_name_is_empty() {
        assert_eq!(doctor_slug("Dr."), "");
    }
}
