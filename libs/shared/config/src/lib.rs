use std::env;

use chrono::{FixedOffset, NaiveDateTime, Utc};
use tracing::warn;

/// Hard limit on bookings one doctor may hold on one calendar day.
pub const DEFAULT_MAX_APPOINTMENTS_PER_DOCTOR_PER_DAY: u32 = 4;

/// Booking attempts allowed per phone number inside the rate window.
pub const DEFAULT_BOOKING_RATE_LIMIT: u32 = 3;

#[derive(Debug, Clone)]
pub struct ClinicConfig {
    pub firebase_database_url: String,
    pub firebase_auth_token: String,
    pub max_appointments_per_doctor_per_day: u32,
    pub booking_rate_limit: u32,
    pub booking_rate_window_secs: u64,
    pub store_timeout_secs: u64,
    pub cleanup_interval_secs: u64,
    /// The clinic runs in a single fixed timezone; all calendar math uses this offset.
    pub clinic_utc_offset_hours: i32,
    pub clinic_phone: String,
    pub clinic_address: String,
    pub emailjs_base_url: String,
    pub emailjs_service_id: String,
    pub emailjs_template_id: String,
    pub emailjs_public_key: String,
}

impl ClinicConfig {
    pub fn from_env() -> Self {
        let config = Self {
            firebase_database_url: env::var("FIREBASE_DATABASE_URL").unwrap_or_else(|_| {
                warn!("FIREBASE_DATABASE_URL not set, using empty value");
                String::new()
            }),
            firebase_auth_token: env::var("FIREBASE_AUTH_TOKEN").unwrap_or_default(),
            max_appointments_per_doctor_per_day: parse_env(
                "MAX_APPOINTMENTS_PER_DOCTOR_PER_DAY",
                DEFAULT_MAX_APPOINTMENTS_PER_DOCTOR_PER_DAY,
            ),
            booking_rate_limit: parse_env("BOOKING_RATE_LIMIT", DEFAULT_BOOKING_RATE_LIMIT),
            booking_rate_window_secs: parse_env("BOOKING_RATE_WINDOW_SECS", 3600),
            store_timeout_secs: parse_env("STORE_TIMEOUT_SECS", 10),
            cleanup_interval_secs: parse_env("CLEANUP_INTERVAL_SECS", 3600),
            clinic_utc_offset_hours: parse_env("CLINIC_UTC_OFFSET_HOURS", 8),
            clinic_phone: env::var("CLINIC_PHONE")
                .unwrap_or_else(|_| "+63 905 517 7314".to_string()),
            clinic_address: env::var("CLINIC_ADDRESS")
                .unwrap_or_else(|_| "123 Healthcare St., Marikina, Philippines".to_string()),
            emailjs_base_url: env::var("EMAILJS_BASE_URL")
                .unwrap_or_else(|_| "https://api.emailjs.com/api/v1.0".to_string()),
            emailjs_service_id: env::var("EMAILJS_SERVICE_ID").unwrap_or_default(),
            emailjs_template_id: env::var("EMAILJS_TEMPLATE_ID").unwrap_or_default(),
            emailjs_public_key: env::var("EMAILJS_PUBLIC_KEY").unwrap_or_default(),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.firebase_database_url.is_empty()
    }

    pub fn is_email_configured(&self) -> bool {
        !self.emailjs_service_id.is_empty()
            && !self.emailjs_template_id.is_empty()
            && !self.emailjs_public_key.is_empty()
    }

    pub fn clinic_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.clinic_utc_offset_hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }

    /// Wall-clock "now" in the clinic's timezone. Read once at the request
    /// edge and passed down; resolver logic never touches the clock itself.
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.clinic_offset()).naive_local()
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} is not a valid value, using default", name);
            default
        }),
        Err(_) => default,
    }
}
