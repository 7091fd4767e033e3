use chrono::{NaiveDate, NaiveTime};
use reqwest::Client;
use tracing::{debug, error, info};

use shared_config::ClinicConfig;
use shared_utils::format::{format_display_date, format_time_12h};

use crate::models::{EmailSendRequest, NotificationError, TemplateParams};

/// Client for the EmailJS-compatible transactional-email endpoint.
///
/// Sending is a side effect of a booking that already happened; callers log
/// failures and move on, they never roll the booking back.
pub struct EmailService {
    client: Client,
    base_url: String,
    service_id: String,
    template_id: String,
    public_key: String,
    clinic_phone: String,
    clinic_address: String,
    configured: bool,
}

impl EmailService {
    pub fn new(config: &ClinicConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.emailjs_base_url.trim_end_matches('/').to_string(),
            service_id: config.emailjs_service_id.clone(),
            template_id: config.emailjs_template_id.clone(),
            public_key: config.emailjs_public_key.clone(),
            clinic_phone: config.clinic_phone.clone(),
            clinic_address: config.clinic_address.clone(),
            configured: config.is_email_configured(),
        }
    }

    /// POST the confirmation request to the provider. The caller has already
    /// validated the address shape.
    #[allow(clippy::too_many_arguments)]
    pub async fn send_confirmation(
        &self,
        to_email: &str,
        patient_name: &str,
        doctor_name: &str,
        date: NaiveDate,
        time: NaiveTime,
        patient_phone: &str,
        reason: Option<&str>,
    ) -> Result<(), NotificationError> {
        if !self.configured {
            return Err(NotificationError::NotConfigured);
        }

        let request = EmailSendRequest {
            service_id: self.service_id.clone(),
            template_id: self.template_id.clone(),
            user_id: self.public_key.clone(),
            template_params: TemplateParams {
                to_email: to_email.to_string(),
                patient_name: patient_name.to_string(),
                doctor_name: doctor_name.to_string(),
                appointment_date: format_display_date(date),
                appointment_time: format_time_12h(time),
                patient_phone: patient_phone.to_string(),
                reason: reason.unwrap_or("Not specified").to_string(),
                clinic_phone: self.clinic_phone.clone(),
                clinic_address: self.clinic_address.clone(),
            },
        };

        let url = format!("{}/email/send", self.base_url);
        debug!("Sending confirmation email via {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Email provider rejected request ({}): {}", status, body);
            return Err(NotificationError::Provider(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        info!("Confirmation email queued for {}", to_email);
        Ok(())
    }
}
