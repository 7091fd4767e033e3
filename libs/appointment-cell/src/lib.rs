use std::sync::Arc;

use shared_config::ClinicConfig;

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{Appointment, BookAppointmentRequest, BookingError};
pub use services::{ArchiveService, BookingRateLimiter, BookingService};

/// Shared state for the appointment routes. The rate limiter must outlive
/// individual requests, so it rides alongside the config instead of being
/// rebuilt per handler call.
#[derive(Clone)]
pub struct AppointmentCellState {
    pub config: Arc<ClinicConfig>,
    pub limiter: Arc<services::BookingRateLimiter>,
}

impl AppointmentCellState {
    pub fn new(config: Arc<ClinicConfig>) -> Self {
        let limiter = Arc::new(services::BookingRateLimiter::from_config(&config));
        Self { config, limiter }
    }
}
