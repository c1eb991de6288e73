//! In-memory table of watched accounts and their running triggers.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tweetwatch_core::{resolve_interval, ObservableConfig};

use super::triggers::{validate_schedule, FireFn, TriggerId, TriggerSource};
use super::ScheduleError;

/// A watched account bound to its installed trigger.
#[derive(Debug, Clone)]
pub struct ScheduledJob {
    pub config: ObservableConfig,
    /// Cron expression the interval resolved to.
    pub expression: String,
    trigger: TriggerId,
}

/// What [`ObservableRegistry::upsert`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
    Unchanged,
}

impl UpsertOutcome {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        }
    }
}

/// Single source of truth for which accounts are observed and how.
///
/// At most one trigger is active per account. Every mutation holds the write
/// lock across stopping the old trigger and installing the new one, so no
/// reader ever sees an account whose trigger disagrees with its config.
pub struct ObservableRegistry {
    triggers: Arc<dyn TriggerSource>,
    jobs: RwLock<HashMap<String, ScheduledJob>>,
}

impl ObservableRegistry {
    #[must_use]
    pub fn new(triggers: Arc<dyn TriggerSource>) -> Self {
        Self {
            triggers,
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Start observing `config`, replacing any job with a different config.
    ///
    /// An identical config leaves the running trigger untouched. The
    /// schedule is validated before the old trigger is stopped, so a bad
    /// interval leaves the registry exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::EmptyAccountName`] or
    /// [`ScheduleError::InvalidSchedule`] for a bad config, and
    /// [`ScheduleError::Scheduler`] if the trigger source fails. If the new
    /// trigger fails to install after the old one was stopped, the account
    /// is left unobserved.
    pub async fn upsert(
        &self,
        config: ObservableConfig,
        fire: FireFn,
    ) -> Result<UpsertOutcome, ScheduleError> {
        if config.account_name.trim().is_empty() {
            return Err(ScheduleError::EmptyAccountName);
        }

        let mut jobs = self.jobs.write().await;
        if jobs
            .get(&config.account_name)
            .is_some_and(|job| job.config == config)
        {
            return Ok(UpsertOutcome::Unchanged);
        }

        let expression = resolve_interval(&config.interval);
        if let Err(e) = validate_schedule(&expression) {
            tracing::warn!(
                account = %config.account_name,
                interval = %config.interval,
                error = %e,
                "scheduler: rejecting observable with invalid schedule"
            );
            return Err(e);
        }

        let outcome = match jobs.remove(&config.account_name) {
            Some(old) => {
                if let Err(e) = self.triggers.stop(old.trigger).await {
                    tracing::error!(
                        account = %config.account_name,
                        error = %e,
                        "scheduler: failed to stop previous trigger"
                    );
                    jobs.insert(config.account_name.clone(), old);
                    return Err(e);
                }
                UpsertOutcome::Updated
            }
            None => UpsertOutcome::Created,
        };

        let trigger = self.triggers.install(&expression, fire).await?;
        tracing::info!(
            account = %config.account_name,
            lang = %config.lang,
            expression = %expression,
            outcome = outcome.as_str(),
            "scheduler: observable scheduled"
        );
        jobs.insert(
            config.account_name.clone(),
            ScheduledJob {
                config,
                expression,
                trigger,
            },
        );
        Ok(outcome)
    }

    /// Stop observing `account_name`, handing back the config it was
    /// observed with. Returns `None`, with no side effect, if it was not
    /// observed.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Scheduler`] if the trigger cannot be stopped;
    /// the account then stays registered.
    pub async fn remove(
        &self,
        account_name: &str,
    ) -> Result<Option<ObservableConfig>, ScheduleError> {
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.remove(account_name) else {
            return Ok(None);
        };
        if let Err(e) = self.triggers.stop(job.trigger).await {
            tracing::error!(
                account = account_name,
                error = %e,
                "scheduler: failed to stop trigger"
            );
            jobs.insert(account_name.to_owned(), job);
            return Err(e);
        }
        tracing::info!(account = account_name, "scheduler: observable removed");
        Ok(Some(job.config))
    }

    /// Every observed config, in no particular order.
    pub async fn snapshot(&self) -> Vec<ObservableConfig> {
        self.jobs
            .read()
            .await
            .values()
            .map(|job| job.config.clone())
            .collect()
    }

    pub async fn get(&self, account_name: &str) -> Option<ScheduledJob> {
        self.jobs.read().await.get(account_name).cloned()
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
