//! The seam between orchestration and the backend services.

use async_trait::async_trait;
use tweetwatch_client::{BackendClient, ClientError};
use tweetwatch_core::{CrawlMode, ObservableConfig, Tweet, TweetTopics};

/// Everything a pipeline run, a sweep, or a watch request needs from the
/// outside world.
///
/// [`BackendClient`] is the production implementation. Tests substitute an
/// in-memory recorder.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn account_exists(&self, account_name: &str) -> Result<bool, ClientError>;

    async fn crawl_tweets(
        &self,
        account_name: &str,
        lang: &str,
        mode: CrawlMode,
    ) -> Result<Vec<Tweet>, ClientError>;

    async fn classify_tweets(&self, tweets: &[Tweet], lang: &str)
        -> Result<Vec<Tweet>, ClientError>;

    async fn extract_topics(&self, tweet: &Tweet) -> Result<TweetTopics, ClientError>;

    async fn store_tweets(&self, tweets: &[Tweet]) -> Result<(), ClientError>;

    async fn store_classified_tweets(&self, tweets: &[Tweet]) -> Result<(), ClientError>;

    async fn store_tweet_topics(&self, tweet: &Tweet) -> Result<(), ClientError>;

    async fn list_observables(&self) -> Result<Vec<ObservableConfig>, ClientError>;

    async fn store_observable(&self, observable: &ObservableConfig) -> Result<(), ClientError>;

    async fn delete_observable(&self, observable: &ObservableConfig) -> Result<(), ClientError>;

    async fn unclassified_tweets(
        &self,
        account_name: &str,
        lang: &str,
    ) -> Result<Vec<Tweet>, ClientError>;
}

#[async_trait]
impl Backend for BackendClient {
    async fn account_exists(&self, account_name: &str) -> Result<bool, ClientError> {
        BackendClient::account_exists(self, account_name).await
    }

    async fn crawl_tweets(
        &self,
        account_name: &str,
        lang: &str,
        mode: CrawlMode,
    ) -> Result<Vec<Tweet>, ClientError> {
        BackendClient::crawl_tweets(self, account_name, lang, mode).await
    }

    async fn classify_tweets(
        &self,
        tweets: &[Tweet],
        lang: &str,
    ) -> Result<Vec<Tweet>, ClientError> {
        BackendClient::classify_tweets(self, tweets, lang).await
    }

    async fn extract_topics(&self, tweet: &Tweet) -> Result<TweetTopics, ClientError> {
        BackendClient::extract_topics(self, tweet).await
    }

    async fn store_tweets(&self, tweets: &[Tweet]) -> Result<(), ClientError> {
        BackendClient::store_tweets(self, tweets).await
    }

    async fn store_classified_tweets(&self, tweets: &[Tweet]) -> Result<(), ClientError> {
        BackendClient::store_classified_tweets(self, tweets).await
    }

    async fn store_tweet_topics(&self, tweet: &Tweet) -> Result<(), ClientError> {
        BackendClient::store_tweet_topics(self, tweet).await
    }

    async fn list_observables(&self) -> Result<Vec<ObservableConfig>, ClientError> {
        BackendClient::list_observables(self).await
    }

    async fn store_observable(&self, observable: &ObservableConfig) -> Result<(), ClientError> {
        BackendClient::store_observable(self, observable).await
    }

    async fn delete_observable(&self, observable: &ObservableConfig) -> Result<(), ClientError> {
        BackendClient::delete_observable(self, observable).await
    }

    async fn unclassified_tweets(
        &self,
        account_name: &str,
        lang: &str,
    ) -> Result<Vec<Tweet>, ClientError> {
        BackendClient::unclassified_tweets(self, account_name, lang).await
    }
}
