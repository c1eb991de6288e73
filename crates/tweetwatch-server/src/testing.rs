//! In-memory backend for server tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tweetwatch_client::ClientError;
use tweetwatch_core::{CrawlMode, ObservableConfig, Tweet, TweetTopics};
use tweetwatch_pipeline::Backend;

/// Answers existence checks from `accounts` (unknown accounts fail as if
/// the crawler were down), lists `stored` as the persisted observables, and
/// records every write. Observable writes also land in one ordered log.
#[derive(Default)]
pub struct StubBackend {
    pub accounts: HashMap<String, bool>,
    pub stored: Vec<ObservableConfig>,
    store_delay: Option<Duration>,
    observable_writes: Mutex<Vec<String>>,
    existence_checks: Mutex<Vec<String>>,
    crawls: Mutex<Vec<(String, String, CrawlMode)>>,
    persisted: Mutex<Vec<ObservableConfig>>,
    deleted: Mutex<Vec<ObservableConfig>>,
    unclassified: Mutex<Vec<String>>,
}

impl StubBackend {
    pub fn with_accounts(accounts: &[&str]) -> Self {
        Self {
            accounts: accounts.iter().map(|a| ((*a).to_owned(), true)).collect(),
            ..Self::default()
        }
    }

    pub fn with_stored(stored: Vec<ObservableConfig>) -> Self {
        Self {
            stored,
            ..Self::default()
        }
    }

    /// Makes every `store_observable` call take `delay` before recording.
    #[must_use]
    pub fn slow_store(mut self, delay: Duration) -> Self {
        self.store_delay = Some(delay);
        self
    }

    /// `store <account>` and `delete <account>` in the order they completed.
    pub fn observable_writes(&self) -> Vec<String> {
        self.observable_writes.lock().expect("lock").clone()
    }

    pub fn existence_checks(&self) -> Vec<String> {
        self.existence_checks.lock().expect("lock").clone()
    }

    pub fn crawls(&self) -> Vec<(String, String, CrawlMode)> {
        self.crawls.lock().expect("lock").clone()
    }

    pub fn persisted(&self) -> Vec<ObservableConfig> {
        self.persisted.lock().expect("lock").clone()
    }

    pub fn deleted(&self) -> Vec<ObservableConfig> {
        self.deleted.lock().expect("lock").clone()
    }

    pub fn unclassified_requests(&self) -> Vec<String> {
        self.unclassified.lock().expect("lock").clone()
    }
}

fn unavailable() -> ClientError {
    ClientError::UnexpectedStatus {
        status: 503,
        url: "http://backend.test".to_owned(),
    }
}

#[async_trait]
impl Backend for StubBackend {
    async fn account_exists(&self, account_name: &str) -> Result<bool, ClientError> {
        self.existence_checks
            .lock()
            .expect("lock")
            .push(account_name.to_owned());
        self.accounts.get(account_name).copied().ok_or_else(unavailable)
    }

    async fn crawl_tweets(
        &self,
        account_name: &str,
        lang: &str,
        mode: CrawlMode,
    ) -> Result<Vec<Tweet>, ClientError> {
        self.crawls
            .lock()
            .expect("lock")
            .push((account_name.to_owned(), lang.to_owned(), mode));
        Ok(Vec::new())
    }

    async fn classify_tweets(
        &self,
        tweets: &[Tweet],
        _lang: &str,
    ) -> Result<Vec<Tweet>, ClientError> {
        Ok(tweets.to_vec())
    }

    async fn extract_topics(&self, _tweet: &Tweet) -> Result<TweetTopics, ClientError> {
        Err(unavailable())
    }

    async fn store_tweets(&self, _tweets: &[Tweet]) -> Result<(), ClientError> {
        Ok(())
    }

    async fn store_classified_tweets(&self, _tweets: &[Tweet]) -> Result<(), ClientError> {
        Ok(())
    }

    async fn store_tweet_topics(&self, _tweet: &Tweet) -> Result<(), ClientError> {
        Ok(())
    }

    async fn list_observables(&self) -> Result<Vec<ObservableConfig>, ClientError> {
        Ok(self.stored.clone())
    }

    async fn store_observable(&self, observable: &ObservableConfig) -> Result<(), ClientError> {
        if let Some(delay) = self.store_delay {
            tokio::time::sleep(delay).await;
        }
        self.persisted.lock().expect("lock").push(observable.clone());
        self.observable_writes
            .lock()
            .expect("lock")
            .push(format!("store {}", observable.account_name));
        Ok(())
    }

    async fn delete_observable(&self, observable: &ObservableConfig) -> Result<(), ClientError> {
        self.deleted.lock().expect("lock").push(observable.clone());
        self.observable_writes
            .lock()
            .expect("lock")
            .push(format!("delete {}", observable.account_name));
        Ok(())
    }

    async fn unclassified_tweets(
        &self,
        account_name: &str,
        _lang: &str,
    ) -> Result<Vec<Tweet>, ClientError> {
        self.unclassified
            .lock()
            .expect("lock")
            .push(account_name.to_owned());
        Ok(Vec::new())
    }
}
