//! HTTP client for the crawler, classifier, topic extractor, and repository.
//!
//! Every service sits behind the same base URL and bearer token. Reads are
//! retried on transient failures (see [`crate::retry`]); classification and
//! writes are sent once.

use std::path::Path;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Certificate, Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tweetwatch_core::{AppConfig, CrawlMode, ObservableConfig, Tweet, TweetTopics};

use crate::error::ClientError;
use crate::retry::retry_with_backoff;
use crate::types::{AccountExistsResponse, TopicExtractionRequest};

/// Client for the backend services a pipeline run talks to.
///
/// Use [`BackendClient::from_app_config`] in the server, or
/// [`BackendClient::new`] to point at a mock server in tests.
pub struct BackendClient {
    client: Client,
    base_url: Url,
    bearer_token: Option<String>,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl BackendClient {
    /// Creates a client with no auth token and no retries.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute URL.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        Self::build(base_url, timeout_secs, Vec::new())
    }

    /// Creates a client from application config: base URL, timeout, bearer
    /// token, extra CA roots, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Certificate`] if the configured CA bundle
    /// cannot be read or parsed, plus anything [`BackendClient::new`] returns.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ClientError> {
        let roots = match config.backend_ca_cert.as_deref() {
            Some(path) => load_ca_bundle(path)?,
            None => Vec::new(),
        };
        Ok(
            Self::build(&config.backend_url, config.backend_timeout_secs, roots)?
                .with_bearer_token(config.backend_token.clone())
                .with_retry(config.backend_max_retries, config.backend_retry_backoff_ms),
        )
    }

    fn build(
        base_url: &str,
        timeout_secs: u64,
        roots: Vec<Certificate>,
    ) -> Result<Self, ClientError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tweetwatch/0.1 (observation-orchestrator)");
        for root in roots {
            builder = builder.add_root_certificate(root);
        }
        let client = builder.build()?;

        // Normalise to exactly one trailing slash so path segments are
        // appended below any prefix the base URL carries.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: "URL cannot carry a path".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            bearer_token: None,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    #[must_use]
    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Asks the crawler whether `account_name` exists on the platform.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the crawler cannot be reached or answers
    /// with something other than the expected JSON. Callers should treat that
    /// as "unknown", not as "does not exist".
    pub async fn account_exists(&self, account_name: &str) -> Result<bool, ClientError> {
        let url = self.build_url(&["hitec", "crawl", "tweets", account_name, "exists"]);
        let response: AccountExistsResponse = self.get_json(url).await?;
        if !response.account_exists {
            tracing::debug!(
                account = account_name,
                message = %response.message,
                "backend: crawler reports account missing"
            );
        }
        Ok(response.account_exists)
    }

    /// Crawls tweets mentioning `account_name` in `lang`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network failure, non-2xx status, or an
    /// undecodable body.
    pub async fn crawl_tweets(
        &self,
        account_name: &str,
        lang: &str,
        mode: CrawlMode,
    ) -> Result<Vec<Tweet>, ClientError> {
        let base = ["hitec", "crawl", "tweets", "mention", account_name, "lang", lang];
        let url = match mode {
            CrawlMode::Fast => {
                let mut segments = base.to_vec();
                segments.push("fast");
                self.build_url(&segments)
            }
            CrawlMode::Full => self.build_url(&base),
        };
        self.get_list(url).await
    }

    /// Submits one batch to the classifier and returns the enriched tweets.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network failure, non-2xx status, or an
    /// undecodable body.
    pub async fn classify_tweets(
        &self,
        tweets: &[Tweet],
        lang: &str,
    ) -> Result<Vec<Tweet>, ClientError> {
        let url = self.build_url(&["hitec", "classify", "domain", "tweets", "lang", lang]);
        let response = self.send(self.client.post(url.clone()).json(tweets)).await?;
        let classified: Option<Vec<Tweet>> = Self::decode(response, url.as_str()).await?;
        Ok(classified.unwrap_or_default())
    }

    /// Extracts the two leading topics from a tweet's text.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network failure, non-2xx status, or an
    /// undecodable body.
    pub async fn extract_topics(&self, tweet: &Tweet) -> Result<TweetTopics, ClientError> {
        let url = self.build_url(&["analytics-backend", "tweetClassification"]);
        let body = TopicExtractionRequest {
            message: &tweet.text,
        };
        let response = self.send(self.client.post(url.clone()).json(&body)).await?;
        Self::decode(response, url.as_str()).await
    }

    /// Upserts raw crawled tweets by status id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network failure or non-2xx status.
    pub async fn store_tweets(&self, tweets: &[Tweet]) -> Result<(), ClientError> {
        let url = self.build_url(&["hitec", "repository", "twitter", "store", "tweet", ""]);
        self.post_json(url, tweets).await
    }

    /// Stores the classifier's output for a batch.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network failure or non-2xx status.
    pub async fn store_classified_tweets(&self, tweets: &[Tweet]) -> Result<(), ClientError> {
        let url = self.build_url(&[
            "hitec",
            "repository",
            "twitter",
            "store",
            "classified",
            "tweet",
            "",
        ]);
        self.post_json(url, tweets).await
    }

    /// Stores the topics attached to a single tweet.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network failure or non-2xx status.
    pub async fn store_tweet_topics(&self, tweet: &Tweet) -> Result<(), ClientError> {
        let url = self.build_url(&["hitec", "repository", "twitter", "store", "topics"]);
        self.post_json(url, tweet).await
    }

    /// Lists every observable the repository knows about.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network failure, non-2xx status, or an
    /// undecodable body.
    pub async fn list_observables(&self) -> Result<Vec<ObservableConfig>, ClientError> {
        let url = self.build_url(&["hitec", "repository", "twitter", "observables"]);
        self.get_list(url).await
    }

    /// Persists an observable so it survives a restart.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network failure or non-2xx status.
    pub async fn store_observable(&self, observable: &ObservableConfig) -> Result<(), ClientError> {
        let url = self.build_url(&["hitec", "repository", "twitter", "store", "observable", ""]);
        self.post_json(url, observable).await
    }

    /// Deletes a persisted observable.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network failure or non-2xx status.
    pub async fn delete_observable(
        &self,
        observable: &ObservableConfig,
    ) -> Result<(), ClientError> {
        let url = self.build_url(&["hitec", "repository", "twitter", "observables"]);
        self.send(self.client.delete(url).json(observable)).await?;
        Ok(())
    }

    /// Fetches stored tweets for an account that have no classification yet.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on network failure, non-2xx status, or an
    /// undecodable body.
    pub async fn unclassified_tweets(
        &self,
        account_name: &str,
        lang: &str,
    ) -> Result<Vec<Tweet>, ClientError> {
        let url = self.build_url(&[
            "hitec",
            "repository",
            "twitter",
            "account_name",
            account_name,
            "lang",
            lang,
            "unclassified",
        ]);
        self.get_list(url).await
    }

    /// Appends percent-encoded path segments to the base URL. An empty final
    /// segment yields a trailing slash.
    fn build_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Attaches auth and `Accept` headers, sends, and rejects non-2xx statuses.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let request = match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.header(ACCEPT, "application/json").send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self.send(self.client.get(url.clone())).await?;
                Self::decode(response, url.as_str()).await
            }
        })
        .await
    }

    /// GETs a JSON array. The repository encodes an empty list as `null`.
    async fn get_list<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, ClientError> {
        let items: Option<Vec<T>> = self.get_json(url).await?;
        Ok(items.unwrap_or_default())
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<(), ClientError> {
        self.send(self.client.post(url).json(body)).await?;
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        context: &str,
    ) -> Result<T, ClientError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// Reads every certificate in a PEM bundle such as `ca_chain.crt`.
fn load_ca_bundle(path: &Path) -> Result<Vec<Certificate>, ClientError> {
    let pem = std::fs::read(path).map_err(|e| ClientError::Certificate {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Certificate::from_pem_bundle(&pem).map_err(|e| ClientError::Certificate {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
