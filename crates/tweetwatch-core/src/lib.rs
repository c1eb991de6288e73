//! Shared domain types and configuration for tweetwatch.

pub mod app_config;
pub mod config;
pub mod interval;
pub mod observable;
pub mod tweet;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use interval::resolve_interval;
pub use observable::{extracts_topics, CrawlMode, ObservableConfig, TOPIC_EXTRACTION_LANG};
pub use tweet::{Sentiment, TopicScore, Tweet, TweetClass, TweetTopics};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
