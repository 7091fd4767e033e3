use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notification_cell::models::NotificationError;
use notification_cell::services::EmailService;
use shared_utils::test_utils::TestConfig;

fn email_config(base_url: &str) -> shared_config::ClinicConfig {
    let mut config = TestConfig::with_store_url("http://localhost:9000");
    config.emailjs_base_url = base_url.to_string();
    config.emailjs_service_id = "service_test".to_string();
    config.emailjs_template_id = "template_test".to_string();
    config.emailjs_public_key = "public_test".to_string();
    config
}

fn march_10() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn nine_am() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap()
}

#[tokio::test]
async fn confirmation_carries_the_template_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/email/send"))
        .and(body_partial_json(serde_json::json!({
            "service_id": "service_test",
            "template_id": "template_test",
            "user_id": "public_test",
            "template_params": {
                "to_email": "juan@example.com",
                "patient_name": "Juan Dela Cruz",
                "doctor_name": "Dr. Maria Santos",
                "appointment_date": "Monday, March 10, 2025",
                "appointment_time": "9:00 AM",
                "reason": "Not specified"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = EmailService::new(&email_config(&mock_server.uri()));
    let result = service
        .send_confirmation(
            "juan@example.com",
            "Juan Dela Cruz",
            "Dr. Maria Santos",
            march_10(),
            nine_am(),
            "09171234567",
            None,
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn provider_rejection_surfaces_as_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/email/send"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad template"))
        .mount(&mock_server)
        .await;

    let service = EmailService::new(&email_config(&mock_server.uri()));
    let result = service
        .send_confirmation(
            "juan@example.com",
            "Juan Dela Cruz",
            "Dr. Maria Santos",
            march_10(),
            nine_am(),
            "09171234567",
            Some("Follow-up"),
        )
        .await;

    assert_matches!(result, Err(NotificationError::Provider(_)));
}

#[tokio::test]
async fn missing_credentials_short_circuit_before_any_request() {
    let config = TestConfig::with_store_url("http://localhost:9000");
    let service = EmailService::new(&config);

    let result = service
        .send_confirmation(
            "juan@example.com",
            "Juan Dela Cruz",
            "Dr. Maria Santos",
            march_10(),
            nine_am(),
            "09171234567",
            None,
        )
        .await;

    assert_matches!(result, Err(NotificationError::NotConfigured));
}
