//! Trigger sources: where scheduled jobs actually get their clock.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

use super::ScheduleError;

pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// The work a trigger performs each time it fires.
pub type FireFn = Arc<dyn Fn() -> BoxFuture + Send + Sync>;

/// Opaque handle to an installed trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerId(pub Uuid);

/// Installs and stops recurring triggers.
#[async_trait]
pub trait TriggerSource: Send + Sync {
    /// Install a trigger that calls `fire` on every match of `expression`.
    async fn install(&self, expression: &str, fire: FireFn) -> Result<TriggerId, ScheduleError>;

    /// Stop a trigger. In-flight runs are not cancelled.
    async fn stop(&self, id: TriggerId) -> Result<(), ScheduleError>;
}

/// Checks that `expression` is a cron expression the scheduler accepts
/// (six fields, leading seconds).
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidSchedule`] when it does not parse.
pub fn validate_schedule(expression: &str) -> Result<(), ScheduleError> {
    Job::new_async(expression, |_uuid, _lock| Box::pin(async {}))
        .map(|_| ())
        .map_err(|e| ScheduleError::InvalidSchedule {
            expression: expression.to_owned(),
            reason: e.to_string(),
        })
}

/// Production trigger source backed by `tokio-cron-scheduler`.
pub struct CronTriggers {
    scheduler: JobScheduler,
}

impl CronTriggers {
    #[must_use]
    pub fn new(scheduler: JobScheduler) -> Self {
        Self { scheduler }
    }
}

#[async_trait]
impl TriggerSource for CronTriggers {
    async fn install(&self, expression: &str, fire: FireFn) -> Result<TriggerId, ScheduleError> {
        let job = Job::new_async(expression, move |_uuid, _lock| {
            let fire = Arc::clone(&fire);
            Box::pin(async move {
                // Detached: stopping the trigger does not cancel a running fire.
                tokio::spawn(fire());
            })
        })
        .map_err(|e| ScheduleError::InvalidSchedule {
            expression: expression.to_owned(),
            reason: e.to_string(),
        })?;

        let id = self.scheduler.add(job).await?;
        Ok(TriggerId(id))
    }

    async fn stop(&self, id: TriggerId) -> Result<(), ScheduleError> {
        self.scheduler.remove(&id.0).await?;
        Ok(())
    }
}

#[cfg(test)]
pub use manual::ManualTriggers;
