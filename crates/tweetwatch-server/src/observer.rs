//! Watch/unwatch commands and on-demand runs.
//!
//! The [`Observer`] glues the registry to the backend: it confirms an
//! account exists before scheduling it, persists the observable so it
//! survives a restart, and builds the closure each trigger fires.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tweetwatch_client::ClientError;
use tweetwatch_core::{resolve_interval, CrawlMode, ObservableConfig};
use tweetwatch_pipeline::{run_pipeline, run_sweep, Backend};

use crate::scheduler::{
    validate_schedule, BoxFuture, FireFn, ObservableRegistry, ScheduleError, ScheduledJob,
    TriggerSource, UpsertOutcome,
};

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("invalid observable: {0}")]
    InvalidConfig(#[source] ScheduleError),

    #[error("account {0} does not exist")]
    AccountNotFound(String),

    #[error("could not confirm account {account} exists: {source}")]
    AccountCheckUnavailable {
        account: String,
        #[source]
        source: ClientError,
    },

    #[error(transparent)]
    Schedule(ScheduleError),
}

impl From<ScheduleError> for WatchError {
    fn from(e: ScheduleError) -> Self {
        if e.is_invalid_config() {
            Self::InvalidConfig(e)
        } else {
            Self::Schedule(e)
        }
    }
}

pub struct Observer {
    backend: Arc<dyn Backend>,
    registry: ObservableRegistry,
    /// Held across a registry change and the matching repository write, so
    /// persisted observables follow the registry's order of changes.
    writes: Mutex<()>,
}

impl Observer {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, triggers: Arc<dyn TriggerSource>) -> Self {
        Self {
            backend,
            registry: ObservableRegistry::new(triggers),
            writes: Mutex::new(()),
        }
    }

    /// Start (or reconfigure) observing an account.
    ///
    /// The config is validated first, then the account's existence is
    /// confirmed with the crawler. A crawler that cannot answer counts as a
    /// rejection. Created and updated observables are persisted; a failed
    /// persist is logged and does not undo the schedule. Registry changes and
    /// their repository writes never interleave with another watch or unwatch.
    ///
    /// # Errors
    ///
    /// See [`WatchError`]. On any error the registry is unchanged.
    pub async fn watch(&self, config: ObservableConfig) -> Result<UpsertOutcome, WatchError> {
        if config.account_name.trim().is_empty() {
            return Err(WatchError::InvalidConfig(ScheduleError::EmptyAccountName));
        }
        validate_schedule(&resolve_interval(&config.interval)).map_err(WatchError::InvalidConfig)?;

        match self.backend.account_exists(&config.account_name).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(account = %config.account_name, "observer: account does not exist");
                return Err(WatchError::AccountNotFound(config.account_name));
            }
            Err(e) => {
                tracing::warn!(
                    account = %config.account_name,
                    error = %e,
                    "observer: existence check failed"
                );
                return Err(WatchError::AccountCheckUnavailable {
                    account: config.account_name,
                    source: e,
                });
            }
        }

        let fire = self.fire_for(&config);
        let _writes = self.writes.lock().await;
        let outcome = self.registry.upsert(config.clone(), fire).await?;
        if outcome != UpsertOutcome::Unchanged {
            if let Err(e) = self.backend.store_observable(&config).await {
                tracing::warn!(
                    account = %config.account_name,
                    error = %e,
                    "observer: persisting observable failed"
                );
            }
        }
        Ok(outcome)
    }

    /// Stop observing an account and delete its persisted observable.
    /// Returns `false` if the account was not observed.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Schedule`] if the trigger cannot be stopped.
    pub async fn unwatch(&self, account_name: &str) -> Result<bool, WatchError> {
        let _writes = self.writes.lock().await;
        let Some(config) = self.registry.remove(account_name).await? else {
            return Ok(false);
        };
        if let Err(e) = self.backend.delete_observable(&config).await {
            tracing::warn!(
                account = account_name,
                error = %e,
                "observer: deleting persisted observable failed"
            );
        }
        Ok(true)
    }

    /// Re-schedule every observable the repository knows about.
    ///
    /// Used at startup. Existence is not re-checked, and nothing is written
    /// back. Returns how many observables were scheduled.
    pub async fn restore(&self) -> usize {
        let observables = match self.backend.list_observables().await {
            Ok(observables) => observables,
            Err(e) => {
                tracing::warn!(error = %e, "observer: could not list persisted observables");
                return 0;
            }
        };

        let mut restored = 0;
        for config in observables {
            let fire = self.fire_for(&config);
            let account = config.account_name.clone();
            let _writes = self.writes.lock().await;
            match self.registry.upsert(config, fire).await {
                Ok(_) => restored += 1,
                Err(e) => {
                    tracing::warn!(
                        account = %account,
                        error = %e,
                        "observer: skipping persisted observable"
                    );
                }
            }
        }
        tracing::info!(restored, "observer: persisted observables restored");
        restored
    }

    /// Run the pipeline for one account now, in the background.
    pub fn run_now(&self, account_name: String, lang: String, mode: CrawlMode) {
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            run_pipeline(backend.as_ref(), &account_name, &lang, mode).await;
        });
    }

    /// Run the reconciliation sweep now, in the background.
    pub fn sweep_now(&self) {
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            run_sweep(backend.as_ref()).await;
        });
    }

    /// Every observed config, sorted by account name.
    pub async fn observables(&self) -> Vec<ObservableConfig> {
        let mut observables = self.registry.snapshot().await;
        observables.sort_by(|a, b| a.account_name.cmp(&b.account_name));
        observables
    }

    /// The observed config for one account and the cron expression it runs on.
    pub async fn observable(&self, account_name: &str) -> Option<ScheduledJob> {
        self.registry.get(account_name).await
    }

    pub async fn observed_count(&self) -> usize {
        self.registry.len().await
    }

    /// A scheduled fire always crawls in fast mode.
    fn fire_for(&self, config: &ObservableConfig) -> FireFn {
        let backend = Arc::clone(&self.backend);
        let account = config.account_name.clone();
        let lang = config.lang.clone();
        Arc::new(move || -> BoxFuture {
            let backend = Arc::clone(&backend);
            let account = account.clone();
            let lang = lang.clone();
            Box::pin(async move {
                tracing::info!(account = %account, lang = %lang, "scheduler: observation fired");
                run_pipeline(backend.as_ref(), &account, &lang, CrawlMode::Fast).await;
            })
        })
    }
}
