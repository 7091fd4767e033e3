use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a booking in the active collection.
///
/// `pending` is the only state a public submission can create. Administrators
/// move bookings to `confirmed` or `cancelled`; the cleanup sweep moves stale
/// pending bookings to `expired` and relocates past confirmed/cancelled ones
/// into the archive collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Expired,
}

impl AppointmentStatus {
    /// Whether a booking in this state occupies one of the doctor's daily
    /// slots. Both the booking-time capacity check and the admin dashboard
    /// counts go through this predicate. Expired bookings only exist on past
    /// dates and are excluded.
    pub fn counts_against_capacity(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Expired => write!(f, "expired"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_predicate_counts_only_live_bookings() {
        assert!(AppointmentStatus::Pending.counts_against_capacity());
        assert!(AppointmentStatus::Confirmed.counts_against_capacity());
        assert!(!AppointmentStatus::Cancelled.counts_against_capacity());
        assert!(!AppointmentStatus::Expired.counts_against_capacity());
    }

    #[test]
    fn status_round_trips_through_wire_format() {
        let json = serde_json::to_string(&AppointmentStatus::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
        let back: AppointmentStatus = serde_json::from_str("\"expired\"").unwrap();
        assert_eq!(back, AppointmentStatus::Expired);
    }
}
