use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use regex::Regex;
use serde_json::json;
use tracing::{debug, info, warn};

use doctor_cell::models::SlotDecision;
use doctor_cell::services::{AvailabilityService, DoctorService};
use notification_cell::services::EmailService;
use shared_config::ClinicConfig;
use shared_database::FirebaseClient;
use shared_models::AppointmentStatus;
use shared_utils::format::format_display_date;

use crate::models::{Appointment, BookAppointmentRequest, BookingConfirmation, BookingError};
use crate::services::conflict::ConflictGuard;
use crate::services::lifecycle;
use crate::services::rate_limit::BookingRateLimiter;

pub struct BookingService {
    firebase: FirebaseClient,
    availability: AvailabilityService,
    conflict: ConflictGuard,
    doctors: DoctorService,
    email: EmailService,
    limiter: Arc<BookingRateLimiter>,
    clinic_offset: FixedOffset,
    phone_pattern: Regex,
    email_pattern: Regex,
}

impl BookingService {
    pub fn new(config: &ClinicConfig, limiter: Arc<BookingRateLimiter>) -> Self {
        Self {
            firebase: FirebaseClient::new(config),
            availability: AvailabilityService::new(config),
            conflict: ConflictGuard::new(config),
            doctors: DoctorService::new(config),
            email: EmailService::new(config),
            limiter,
            clinic_offset: config.clinic_offset(),
            phone_pattern: Regex::new(r"^(\+63|0)?9\d{9}$").unwrap(),
            email_pattern: Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap(),
        }
    }

    /// The public booking flow: field validation, rate limit, slot
    /// validation, duplicate guard, then the write. The duplicate check and
    /// the write are not atomic with respect to the store; near-simultaneous
    /// submissions can both pass (accepted race, serialized only per path).
    pub async fn book(
        &self,
        request: BookAppointmentRequest,
        now: DateTime<Utc>,
    ) -> Result<BookingConfirmation, BookingError> {
        info!(
            "Booking request for doctor {} on {} {}",
            request.doctor, request.date, request.time
        );

        let local_now = now.with_timezone(&self.clinic_offset).naive_local();

        let errors = self.validate_request(&request, local_now.date());
        if let Some(first) = errors.into_iter().next() {
            return Err(BookingError::Validation(first));
        }

        if !self.limiter.check_and_record(request.phone.trim(), now) {
            return Err(BookingError::RateLimited);
        }

        let decision = self
            .availability
            .validate_requested_slot(&request.doctor, request.date, request.time, local_now)
            .await?;
        if let SlotDecision::Rejected(rejection) = decision {
            return Err(BookingError::SlotRejected(rejection));
        }

        if self.conflict.check(&request.name, request.date).await?.is_some() {
            return Err(BookingError::DuplicateBooking {
                name: request.name.trim().to_string(),
                date: format_display_date(request.date),
            });
        }

        let appointment = Appointment {
            doctor: request.doctor.trim().to_string(),
            date: request.date,
            time: request.time,
            name: request.name.trim().to_string(),
            phone: request.phone.trim().to_string(),
            email: normalize_optional(&request.email),
            reason: normalize_optional(&request.reason),
            status: AppointmentStatus::Pending,
            created_at: now,
            expired_at: None,
            archived_at: None,
        };

        let id = self
            .firebase
            .push("appointments", &appointment)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        self.record_booking_metric(local_now.date()).await;
        let message = self.send_confirmation_email(&appointment).await;

        info!("Appointment {} booked for doctor {}", id, appointment.doctor);
        Ok(BookingConfirmation {
            id,
            appointment,
            message,
        })
    }

    pub async fn list_appointments(
        &self,
        status: Option<AppointmentStatus>,
    ) -> Result<BTreeMap<String, Appointment>, BookingError> {
        let mut appointments: BTreeMap<String, Appointment> = self
            .firebase
            .get("appointments")
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?
            .unwrap_or_default();

        if let Some(status) = status {
            appointments.retain(|_, apt| apt.status == status);
        }

        Ok(appointments)
    }

    pub async fn get_appointment(&self, id: &str) -> Result<Appointment, BookingError> {
        self.firebase
            .get(&format!("appointments/{}", id))
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?
            .ok_or(BookingError::NotFound)
    }

    /// Administrator decision on a pending booking. Transitions outside the
    /// lifecycle table are rejected before anything is written.
    pub async fn set_status(
        &self,
        id: &str,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, BookingError> {
        let current = self.get_appointment(id).await?;
        lifecycle::validate_status_transition(&current.status, &new_status)?;

        self.firebase
            .update(
                &format!("appointments/{}", id),
                &json!({ "status": new_status }),
            )
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        info!("Appointment {} moved to {}", id, new_status);
        Ok(Appointment {
            status: new_status,
            ..current
        })
    }

    /// Live bookings per doctor for one date, for the dashboard capacity
    /// column. Uses the same predicate as the booking-time capacity check.
    pub async fn daily_counts(
        &self,
        date: NaiveDate,
    ) -> Result<BTreeMap<String, u32>, BookingError> {
        let appointments = self.list_appointments(None).await?;

        let mut counts: BTreeMap<String, u32> = BTreeMap::new();
        for appointment in appointments.values() {
            if appointment.date == date && appointment.status.counts_against_capacity() {
                *counts.entry(appointment.doctor.clone()).or_default() += 1;
            }
        }

        Ok(counts)
    }

    /// First error wins; the booking form surfaces one message at a time.
    fn validate_request(&self, request: &BookAppointmentRequest, today: NaiveDate) -> Vec<String> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("doctor", &request.doctor),
            ("name", &request.name),
            ("phone", &request.phone),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{} is required", field));
            }
        }

        if request.date < today {
            errors.push("Please select a future date".to_string());
        }

        let cleaned_phone: String = request
            .phone
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();
        if !cleaned_phone.is_empty() && !self.phone_pattern.is_match(&cleaned_phone) {
            errors.push("Please enter a valid Philippine phone number".to_string());
        }

        if let Some(email) = normalize_optional(&request.email) {
            if !self.email_pattern.is_match(&email) {
                errors.push("Please enter a valid email address".to_string());
            }
        }

        if !request.name.trim().is_empty() && request.name.trim().chars().count() < 2 {
            errors.push("Please enter a valid name".to_string());
        }

        errors
    }

    /// Best-effort analytics counter; a failed increment never unwinds a
    /// booking that was already written.
    async fn record_booking_metric(&self, today: NaiveDate) {
        let path = format!("analytics/appointments/{}", today);
        if let Err(e) = self.firebase.increment(&path, 1).await {
            warn!("Failed to record booking metric: {}", e);
        }
    }

    /// Confirmation e-mail is fire-and-forget: the returned message reflects
    /// whether the send worked, the booking itself stands either way.
    async fn send_confirmation_email(&self, appointment: &Appointment) -> String {
        let Some(address) = appointment.email.as_deref() else {
            return "Appointment booked successfully! We will confirm shortly.".to_string();
        };

        if !self.email_pattern.is_match(address) {
            return "Appointment booked successfully! We will confirm shortly.".to_string();
        }

        let doctor_name = match self.doctors.get_doctor(&appointment.doctor).await {
            Ok(doctor) => doctor.name,
            Err(e) => {
                debug!("Falling back to generic doctor name: {}", e);
                "the Doctor".to_string()
            }
        };

        match self
            .email
            .send_confirmation(
                address,
                &appointment.name,
                &doctor_name,
                appointment.date,
                appointment.time,
                &appointment.phone,
                appointment.reason.as_deref(),
            )
            .await
        {
            Ok(()) => {
                "Appointment booked successfully! Confirmation email will be sent shortly."
                    .to_string()
            }
            Err(e) => {
                warn!("Confirmation email failed: {}", e);
                "Appointment booked! Email notification failed.".to_string()
            }
        }
    }
}

fn normalize_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
