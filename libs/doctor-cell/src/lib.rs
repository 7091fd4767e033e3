pub mod handlers;
pub mod models;
pub mod router;
pub mod schedule;
pub mod services;

pub use models::{Doctor, SlotDecision, SlotRejection};
pub use services::{AvailabilityService, DoctorService};
