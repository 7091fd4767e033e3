pub mod models;
pub mod services;

pub use models::NotificationError;
pub use services::EmailService;
