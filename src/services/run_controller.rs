//! Fire-and-forget trigger with a single-flight guard and a readiness probe.
//!
//! `trigger` dispatches the pipeline on a background task and returns
//! immediately; callers poll `check_ready` until the published artifact
//! exists. Run faults only reach the log, there is no error channel back to
//! the trigger.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use uuid::Uuid;

use crate::services::pipeline::PipelineOrchestrator;

/// At most one run in flight at a time; a second trigger is rejected, never
/// queued.
pub struct RunGuard {
    in_flight: AtomicBool,
}

impl RunGuard {
    pub fn new() -> Self {
        Self {
            in_flight: AtomicBool::new(false),
        }
    }

    /// Claim the slot. Returns false when a run already holds it.
    pub fn try_begin(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn finish(&self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

impl Default for RunGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A run was dispatched in the background.
    Accepted { run_id: Uuid },
    /// A previous run is still in flight; nothing was started.
    AlreadyRunning,
}

#[derive(Clone)]
pub struct RunController {
    inner: Arc<Inner>,
}

struct Inner {
    orchestrator: PipelineOrchestrator,
    guard: RunGuard,
}

impl RunController {
    pub fn new(orchestrator: PipelineOrchestrator) -> Self {
        Self {
            inner: Arc::new(Inner {
                orchestrator,
                guard: RunGuard::new(),
            }),
        }
    }

    /// Start a pipeline run on a background task and return immediately.
    pub fn trigger(&self) -> TriggerOutcome {
        if !self.inner.guard.try_begin() {
            tracing::warn!("Pipeline trigger rejected: a run is already in flight");
            return TriggerOutcome::AlreadyRunning;
        }

        let run_id = Uuid::new_v4();
        let inner = self.inner.clone();

        tokio::spawn(async move {
            tracing::info!(run_id = %run_id, "Pipeline run started");

            match inner.orchestrator.run().await {
                Ok(result) => tracing::info!(
                    run_id = %run_id,
                    outcome = ?result.outcome,
                    record_count = result.record_count,
                    published = result.published,
                    "Pipeline run finished"
                ),
                Err(e) => tracing::error!(run_id = %run_id, error = %e, "Pipeline run failed"),
            }

            inner.guard.finish();
        });

        TriggerOutcome::Accepted { run_id }
    }

    /// Cheap existence probe on the published artifact.
    pub async fn check_ready(&self) -> bool {
        tokio::fs::try_exists(self.inner.orchestrator.published_path())
            .await
            .unwrap_or(false)
    }

    pub fn published_path(&self) -> PathBuf {
        self.inner.orchestrator.published_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_rejects_second_claim() {
        let guard = RunGuard::new();

        assert!(guard.try_begin());
        assert!(!guard.try_begin());
    }

    #[test]
    fn test_guard_reopens_after_finish() {
        let guard = RunGuard::new();

        assert!(guard.try_begin());
        guard.finish();
        assert!(guard.try_begin());
    }
}
