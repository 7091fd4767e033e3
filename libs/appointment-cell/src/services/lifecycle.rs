use chrono::NaiveDate;

use shared_models::AppointmentStatus;

use crate::models::BookingError;

/// What the cleanup sweep does with one appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAction {
    /// Leave the record alone.
    Keep,
    /// Past-date pending booking: mark expired in place.
    Expire,
    /// Past-date confirmed/cancelled booking: copy to the archive, then
    /// delete the active record.
    Archive,
}

/// Statuses an appointment may move to from `current`. Pending bookings are
/// decided by an administrator (confirmed/cancelled) or aged out by the
/// sweep (expired); everything else is terminal in the active collection.
pub fn valid_transitions(current: &AppointmentStatus) -> Vec<AppointmentStatus> {
    match current {
        AppointmentStatus::Pending => vec![
            AppointmentStatus::Confirmed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Expired,
        ],
        AppointmentStatus::Confirmed
        | AppointmentStatus::Cancelled
        | AppointmentStatus::Expired => vec![],
    }
}

pub fn validate_status_transition(
    current: &AppointmentStatus,
    new: &AppointmentStatus,
) -> Result<(), BookingError> {
    if !valid_transitions(current).contains(new) {
        return Err(BookingError::InvalidStatusTransition {
            from: *current,
            to: *new,
        });
    }
    Ok(())
}

/// Sweep rule: only appointments dated strictly before `today` are touched.
pub fn sweep_action(status: &AppointmentStatus, date: NaiveDate, today: NaiveDate) -> SweepAction {
    if date >= today {
        return SweepAction::Keep;
    }

    match status {
        AppointmentStatus::Pending => SweepAction::Expire,
        AppointmentStatus::Confirmed | AppointmentStatus::Cancelled => SweepAction::Archive,
        // Already expired records stay put in the active collection.
        AppointmentStatus::Expired => SweepAction::Keep,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    #[test]
    fn pending_can_be_confirmed_or_cancelled_or_expired() {
        assert!(validate_status_transition(
            &AppointmentStatus::Pending,
            &AppointmentStatus::Confirmed
        )
        .is_ok());
        assert!(validate_status_transition(
            &AppointmentStatus::Pending,
            &AppointmentStatus::Cancelled
        )
        .is_ok());
        assert!(validate_status_transition(
            &AppointmentStatus::Pending,
            &AppointmentStatus::Expired
        )
        .is_ok());
    }

    #[test]
    fn settled_statuses_are_terminal() {
        let result = validate_status_transition(
            &AppointmentStatus::Cancelled,
            &AppointmentStatus::Confirmed,
        );
        assert_matches!(
            result,
            Err(BookingError::InvalidStatusTransition {
                from: AppointmentStatus::Cancelled,
                to: AppointmentStatus::Confirmed,
            })
        );
        assert!(validate_status_transition(
            &AppointmentStatus::Expired,
            &AppointmentStatus::Confirmed
        )
        .is_err());
    }

    #[test]
    fn sweep_only_touches_strictly_past_dates() {
        let today = d(10);
        assert_eq!(
            sweep_action(&AppointmentStatus::Pending, d(10), today),
            SweepAction::Keep
        );
        assert_eq!(
            sweep_action(&AppointmentStatus::Pending, d(11), today),
            SweepAction::Keep
        );
        assert_eq!(
            sweep_action(&AppointmentStatus::Pending, d(9), today),
            SweepAction::Expire
        );
    }

    #[test]
    fn past_settled_bookings_are_archived_and_expired_ones_stay() {
        let today = d(10);
        assert_eq!(
            sweep_action(&AppointmentStatus::Confirmed, d(9), today),
            SweepAction::Archive
        );
        assert_eq!(
            sweep_action(&AppointmentStatus::Cancelled, d(9), today),
            SweepAction::Archive
        );
        assert_eq!(
            sweep_action(&AppointmentStatus::Expired, d(9), today),
            SweepAction::Keep
        );
    }
}
