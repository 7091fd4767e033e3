pub mod appointment;
pub mod error;

pub use appointment::AppointmentStatus;
pub use error::AppError;
