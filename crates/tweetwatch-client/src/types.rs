//! Wire shapes that only exist at the HTTP boundary.

use serde::{Deserialize, Serialize};

/// Response of the crawler's account-existence check.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountExistsResponse {
    pub account_exists: bool,
    #[serde(default)]
    pub message: String,
}

/// Body sent to the topic extractor.
#[derive(Debug, Serialize)]
pub(crate) struct TopicExtractionRequest<'a> {
    pub message: &'a str,
}
