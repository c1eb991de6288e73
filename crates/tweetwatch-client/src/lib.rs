//! HTTP client for the services tweetwatch coordinates: the tweet crawler,
//! the classifier, the topic extractor, and the tweet/observable repository.

pub mod client;
pub mod error;
pub mod types;

mod retry;

pub use client::BackendClient;
pub use error::ClientError;
