//! Background job scheduling.
//!
//! Per-account pipeline jobs are owned by the [`ObservableRegistry`]; the
//! nightly reconciliation sweep is registered once at startup. Both go
//! through a [`TriggerSource`] so tests can fire jobs by hand.

mod registry;
mod triggers;

use std::sync::Arc;

use thiserror::Error;
use tokio_cron_scheduler::{JobScheduler, JobSchedulerError};
use tweetwatch_pipeline::{run_sweep, Backend};

pub use registry::{ObservableRegistry, ScheduledJob, UpsertOutcome};
pub use triggers::{validate_schedule, BoxFuture, CronTriggers, FireFn, TriggerId, TriggerSource};

#[cfg(test)]
pub use triggers::ManualTriggers;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("account name must not be empty")]
    EmptyAccountName,

    #[error("invalid schedule expression {expression:?}: {reason}")]
    InvalidSchedule { expression: String, reason: String },

    #[error("scheduler error: {0}")]
    Scheduler(#[from] JobSchedulerError),
}

impl ScheduleError {
    /// `true` when the caller supplied a bad config, as opposed to the
    /// scheduler itself failing.
    #[must_use]
    pub fn is_invalid_config(&self) -> bool {
        matches!(
            self,
            Self::EmptyAccountName | Self::InvalidSchedule { .. }
        )
    }
}

/// Creates the cron scheduler and the trigger source backed by it.
///
/// The scheduler is returned unstarted so jobs restored at startup are
/// registered before anything can fire. The [`JobScheduler`] handle must be
/// kept alive for the lifetime of the process.
///
/// # Errors
///
/// Returns [`ScheduleError::Scheduler`] if the scheduler cannot be created.
pub async fn build_scheduler() -> Result<(JobScheduler, Arc<CronTriggers>), ScheduleError> {
    let scheduler = JobScheduler::new().await?;
    let triggers = Arc::new(CronTriggers::new(scheduler.clone()));
    Ok((scheduler, triggers))
}

/// Register the reconciliation sweep on `expression` (daily at midnight by
/// default).
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidSchedule`] for an unparseable expression,
/// or [`ScheduleError::Scheduler`] if the job cannot be added.
pub async fn register_sweep_job(
    triggers: &dyn TriggerSource,
    expression: &str,
    backend: Arc<dyn Backend>,
) -> Result<TriggerId, ScheduleError> {
    validate_schedule(expression)?;

    let fire: FireFn = Arc::new(move || -> BoxFuture {
        let backend = Arc::clone(&backend);
        Box::pin(async move {
            tracing::info!("scheduler: starting reconciliation sweep");
            let report = run_sweep(backend.as_ref()).await;
            tracing::info!(
                accounts = report.accounts_visited,
                classified = report.tweets_classified,
                "scheduler: reconciliation sweep complete"
            );
        })
    });

    let id = triggers.install(expression, fire).await?;
    tracing::info!(expression, "scheduler: reconciliation sweep registered");
    Ok(id)
}
