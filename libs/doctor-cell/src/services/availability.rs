use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use shared_config::ClinicConfig;
use shared_database::FirebaseClient;
use shared_utils::format::format_time_12h;

use crate::models::{BookedAppointment, Doctor, DoctorError, SlotDecision, SlotRejection};
use crate::schedule::{self, ShiftWindow};

/// Resolves which slots a doctor can still take on a given date, and whether
/// one specific requested slot is bookable.
///
/// The store reads and the decision logic are split: `available_slots` and
/// `validate_slot` below are pure so the temporal rules can be tested without
/// a store, and the service methods only fetch their inputs.
pub struct AvailabilityService {
    firebase: FirebaseClient,
    max_per_day: u32,
}

impl AvailabilityService {
    pub fn new(config: &ClinicConfig) -> Self {
        Self {
            firebase: FirebaseClient::new(config),
            max_per_day: config.max_appointments_per_doctor_per_day,
        }
    }

    /// Bookable slots for (doctor, date), ascending. Empty once the day is at
    /// capacity, regardless of which individual slots are free.
    pub async fn list_available_slots(
        &self,
        doctor_id: &str,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<Vec<NaiveTime>, DoctorError> {
        debug!("Listing available slots for doctor {} on {}", doctor_id, date);

        let doctor = self
            .get_doctor(doctor_id)
            .await?
            .ok_or(DoctorError::NotFound)?;
        let booked = self.booked_times(doctor_id, date).await?;

        Ok(available_slots(&doctor, date, &booked, now, self.max_per_day))
    }

    /// Validate one requested slot against shift window, clock and capacity.
    /// Rejections come back as a `SlotDecision`; only store failures error.
    pub async fn validate_requested_slot(
        &self,
        doctor_id: &str,
        date: NaiveDate,
        time: NaiveTime,
        now: NaiveDateTime,
    ) -> Result<SlotDecision, DoctorError> {
        debug!(
            "Validating requested slot {} {} for doctor {}",
            date, time, doctor_id
        );

        let doctor = match self.get_doctor(doctor_id).await? {
            Some(doctor) => doctor,
            None => return Ok(SlotDecision::Rejected(SlotRejection::DoctorUnavailable)),
        };
        let booked = self.booked_times(doctor_id, date).await?;

        Ok(validate_slot(&doctor, date, time, booked.len(), now, self.max_per_day))
    }

    async fn get_doctor(&self, doctor_id: &str) -> Result<Option<Doctor>, DoctorError> {
        self.firebase
            .get(&format!("doctors/{}", doctor_id))
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))
    }

    /// Times already occupied by live bookings for this doctor and date.
    async fn booked_times(
        &self,
        doctor_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, DoctorError> {
        let appointments: BTreeMap<String, BookedAppointment> = self
            .firebase
            .get("appointments")
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?
            .unwrap_or_default();

        Ok(appointments
            .values()
            .filter(|apt| apt.doctor == doctor_id && apt.date == date)
            .filter(|apt| apt.status.counts_against_capacity())
            .map(|apt| apt.time)
            .collect())
    }
}

/// TimeGrid ∩ ShiftWindow, minus already-booked times; empty once the day is
/// at capacity no matter which slots are free.
pub fn available_slots(
    doctor: &Doctor,
    date: NaiveDate,
    booked: &[NaiveTime],
    now: NaiveDateTime,
    max_per_day: u32,
) -> Vec<NaiveTime> {
    if schedule::remaining_capacity(booked.len(), max_per_day) == 0 {
        return Vec::new();
    }

    let window = ShiftWindow::new(doctor.shift_start, doctor.shift_end);
    schedule::slots_for_date(now, date)
        .into_iter()
        .filter(|slot| window.contains(*slot))
        .filter(|slot| !booked.contains(slot))
        .collect()
}

/// Decision for a single requested slot. Checks run in the order the booking
/// page reports them: past instant, shift window, then daily capacity.
pub fn validate_slot(
    doctor: &Doctor,
    date: NaiveDate,
    time: NaiveTime,
    booked_count: usize,
    now: NaiveDateTime,
    max_per_day: u32,
) -> SlotDecision {
    let requested = date.and_time(time);
    if requested <= now {
        return SlotDecision::Rejected(SlotRejection::PastInstant);
    }

    let window = ShiftWindow::new(doctor.shift_start, doctor.shift_end);
    if !window.contains(time) {
        return SlotDecision::Rejected(SlotRejection::OutsideShift {
            shift_start: format_time_12h(doctor.shift_start),
            shift_end: format_time_12h(doctor.shift_end),
        });
    }

    if schedule::remaining_capacity(booked_count, max_per_day) == 0 {
        return SlotDecision::Rejected(SlotRejection::AtCapacity);
    }

    SlotDecision::Available
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

    fn t(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
    }

    fn doctor(shift_start: u32, shift_end: u32) -> Doctor {
        let added = Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap();
        Doctor {
            name: "Dr. Maria Santos".to_string(),
            specialty: "Pediatrics".to_string(),
            shift_start: t(shift_start),
            shift_end: t(shift_end),
            added_at: added,
            updated_at: added,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn earlier_now() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 9).unwrap().and_time(t(12))
    }

    #[test]
    fn slots_stay_inside_the_shift_window() {
        let slots = available_slots(&doctor(8, 20), date(), &[], earlier_now(), 4);
        assert_eq!(slots.first(), Some(&t(8)));
        assert_eq!(slots.last(), Some(&t(19)));
        assert!(slots.iter().all(|s| *s >= t(8) && *s < t(20)));
    }

    #[test]
    fn booked_times_are_removed() {
        let booked = vec![t(9), t(11)];
        let slots = available_slots(&doctor(8, 20), date(), &booked, earlier_now(), 4);
        assert!(!slots.contains(&t(9)));
        assert!(!slots.contains(&t(11)));
        assert!(slots.contains(&t(10)));
    }

    #[test]
    fn full_day_returns_no_slots_at_all() {
        let booked = vec![t(9), t(11), t(13), t(15)];
        let slots = available_slots(&doctor(8, 20), date(), &booked, earlier_now(), 4);
        assert!(slots.is_empty());
    }

    #[test]
    fn capacity_rejection_wins_over_free_slots() {
        // Four confirmed bookings; 17:00 itself is free and inside the shift.
        let decision = validate_slot(&doctor(8, 20), date(), t(17), 4, earlier_now(), 4);
        assert_eq!(decision, SlotDecision::Rejected(SlotRejection::AtCapacity));
    }

    #[test]
    fn overnight_shift_accepts_small_hours_and_rejects_midday() {
        let night_doctor = doctor(20, 8);

        let at_three = validate_slot(&night_doctor, date(), t(3), 0, earlier_now(), 4);
        assert_eq!(at_three, SlotDecision::Available);

        let at_ten = validate_slot(&night_doctor, date(), t(10), 0, earlier_now(), 4);
        match at_ten {
            SlotDecision::Rejected(SlotRejection::OutsideShift { shift_start, shift_end }) => {
                assert_eq!(shift_start, "8:00 PM");
                assert_eq!(shift_end, "8:00 AM");
            }
            other => panic!("expected outside-shift rejection, got {:?}", other),
        }
    }

    #[test]
    fn instants_not_strictly_in_the_future_are_rejected() {
        let now = date().and_time(NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        let decision = validate_slot(&doctor(8, 20), date(), t(9), 0, now, 4);
        assert_eq!(decision, SlotDecision::Rejected(SlotRejection::PastInstant));

        let exactly_now = validate_slot(
            &doctor(8, 20),
            date(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            0,
            now,
            4,
        );
        assert_eq!(exactly_now, SlotDecision::Rejected(SlotRejection::PastInstant));
    }
}
