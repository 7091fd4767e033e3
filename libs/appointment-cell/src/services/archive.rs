use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::BoxFuture;
use serde_json::json;
use tracing::{debug, info};

use shared_config::ClinicConfig;
use shared_database::FirebaseClient;

use crate::models::{Appointment, BookingError, SweepSummary};
use crate::services::lifecycle::{self, SweepAction};

/// Applies the archival state machine to the active collection and serves
/// the merged history view over both collections.
pub struct ArchiveService {
    firebase: FirebaseClient,
}

impl ArchiveService {
    pub fn new(config: &ClinicConfig) -> Self {
        Self {
            firebase: FirebaseClient::new(config),
        }
    }

    /// One cleanup pass: expire stale pending bookings in place, move past
    /// confirmed/cancelled bookings into the archive. Runs at startup, on the
    /// configured interval, and on demand from the admin dashboard.
    pub async fn run_sweep(
        &self,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<SweepSummary, BookingError> {
        debug!("Running appointment cleanup sweep for {}", today);

        let appointments: BTreeMap<String, Appointment> = self
            .firebase
            .get("appointments")
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?
            .unwrap_or_default();

        let mut summary = SweepSummary::default();
        let mut jobs: Vec<BoxFuture<'_, Result<(), BookingError>>> = Vec::new();

        for (id, appointment) in appointments {
            match lifecycle::sweep_action(&appointment.status, appointment.date, today) {
                SweepAction::Keep => {}
                SweepAction::Expire => {
                    summary.expired += 1;
                    jobs.push(Box::pin(self.expire_record(id, now)));
                }
                SweepAction::Archive => {
                    summary.archived += 1;
                    jobs.push(Box::pin(self.archive_record(id, appointment, now)));
                }
            }
        }

        futures::future::try_join_all(jobs).await?;

        info!(
            "Cleanup sweep finished: {} expired, {} archived",
            summary.expired, summary.archived
        );
        Ok(summary)
    }

    /// Move one appointment into the archive immediately, whatever its date.
    pub async fn archive_one(&self, id: &str, now: DateTime<Utc>) -> Result<(), BookingError> {
        let appointment: Appointment = self
            .firebase
            .get(&format!("appointments/{}", id))
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?
            .ok_or(BookingError::NotFound)?;

        self.archive_record(id.to_string(), appointment, now).await
    }

    /// History view: archived records plus past-dated active ones. When an
    /// interrupted copy-then-delete left a record in both collections, the
    /// archive copy wins.
    pub async fn merged_history(
        &self,
        today: NaiveDate,
    ) -> Result<BTreeMap<String, Appointment>, BookingError> {
        let (archive, active) = futures::future::try_join(
            self.firebase
                .get::<BTreeMap<String, Appointment>>("appointmentArchive"),
            self.firebase.get::<BTreeMap<String, Appointment>>("appointments"),
        )
        .await
        .map_err(|e| BookingError::Database(e.to_string()))?;

        let mut merged: BTreeMap<String, Appointment> = active
            .unwrap_or_default()
            .into_iter()
            .filter(|(_, apt)| apt.date < today)
            .collect();
        merged.extend(archive.unwrap_or_default());

        Ok(merged)
    }

    /// Permanently delete every archived appointment.
    pub async fn purge(&self) -> Result<(), BookingError> {
        info!("Purging appointment archive");
        self.firebase
            .delete("appointmentArchive")
            .await
            .map_err(|e| BookingError::Database(e.to_string()))
    }

    async fn expire_record(&self, id: String, now: DateTime<Utc>) -> Result<(), BookingError> {
        let update = json!({
            "status": "expired",
            "expiredAt": now,
        });
        self.firebase
            .update(&format!("appointments/{}", id), &update)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))
    }

    /// Copy first, then delete. The two writes are not atomic; a failure in
    /// between leaves both copies, which `merged_history` tolerates.
    async fn archive_record(
        &self,
        id: String,
        mut appointment: Appointment,
        now: DateTime<Utc>,
    ) -> Result<(), BookingError> {
        appointment.archived_at = Some(now);

        self.firebase
            .set(&format!("appointmentArchive/{}", id), &appointment)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;
        self.firebase
            .delete(&format!("appointments/{}", id))
            .await
            .map_err(|e| BookingError::Database(e.to_string()))
    }
}
