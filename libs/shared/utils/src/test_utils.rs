//! Fixtures shared by the cell test suites.

use serde_json::{json, Value};

use shared_config::ClinicConfig;

pub struct TestConfig;

impl TestConfig {
    /// Config pointing the store client at a mock server.
    pub fn with_store_url(url: &str) -> ClinicConfig {
        ClinicConfig {
            firebase_database_url: url.to_string(),
            firebase_auth_token: String::new(),
            max_appointments_per_doctor_per_day: 4,
            booking_rate_limit: 3,
            booking_rate_window_secs: 3600,
            store_timeout_secs: 5,
            cleanup_interval_secs: 3600,
            clinic_utc_offset_hours: 8,
            clinic_phone: "+63 905 517 7314".to_string(),
            clinic_address: "123 Healthcare St., Marikina, Philippines".to_string(),
            emailjs_base_url: String::new(),
            emailjs_service_id: String::new(),
            emailjs_template_id: String::new(),
            emailjs_public_key: String::new(),
        }
    }
}

/// Canned store documents in the shapes the cells read back.
pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn doctor(name: &str, specialty: &str, shift_start: &str, shift_end: &str) -> Value {
        json!({
            "name": name,
            "specialty": specialty,
            "shiftStart": shift_start,
            "shiftEnd": shift_end,
            "addedAt": "2025-01-15T08:00:00Z",
            "updatedAt": "2025-01-15T08:00:00Z"
        })
    }

    pub fn appointment(
        doctor_id: &str,
        date: &str,
        time: &str,
        patient: &str,
        status: &str,
    ) -> Value {
        json!({
            "doctor": doctor_id,
            "date": date,
            "time": time,
            "name": patient,
            "phone": "09171234567",
            "status": status,
            "createdAt": "2025-03-01T09:00:00Z"
        })
    }
}
