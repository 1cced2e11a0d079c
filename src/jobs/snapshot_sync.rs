use tokio::time::{Duration, interval};

use crate::services::run_controller::{RunController, TriggerOutcome};

/// Start the scheduled snapshot job. The first tick fires immediately, so a
/// fresh deployment gets a snapshot without waiting a full interval. Runs go
/// through the same single-flight controller as the HTTP trigger.
pub async fn start_snapshot_sync_job(controller: RunController, interval_secs: u64) {
    tokio::spawn(async move {
        let mut interval = interval(Duration::from_secs(interval_secs));

        loop {
            interval.tick().await;
            tracing::info!("Starting scheduled snapshot pipeline run");

            match controller.trigger() {
                TriggerOutcome::Accepted { run_id } => {
                    tracing::info!(run_id = %run_id, "Scheduled run dispatched");
                }
                TriggerOutcome::AlreadyRunning => {
                    tracing::warn!("Previous run still in flight, skipping this tick");
                }
            }
        }
    });
}
