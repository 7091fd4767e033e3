pub mod archive;
pub mod booking;
pub mod conflict;
pub mod lifecycle;
pub mod rate_limit;

pub use archive::ArchiveService;
pub use booking::BookingService;
pub use conflict::ConflictGuard;
pub use rate_limit::BookingRateLimiter;
