use serde::Serialize;
use thiserror::Error;

/// Payload for the transactional-email provider's send endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EmailSendRequest {
    pub service_id: String,
    pub template_id: String,
    pub user_id: String,
    pub template_params: TemplateParams,
}

/// Variables the confirmation template interpolates.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateParams {
    pub to_email: String,
    pub patient_name: String,
    pub doctor_name: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub patient_phone: String,
    pub reason: String,
    pub clinic_phone: String,
    pub clinic_address: String,
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Email service is not configured")]
    NotConfigured,

    #[error("Email provider error: {0}")]
    Provider(String),

    #[error("Email request failed: {0}")]
    Transport(String),
}
