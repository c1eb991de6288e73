//! Watched-account configuration.

use serde::{Deserialize, Serialize};

/// Language whose tweets additionally go through topic extraction.
pub const TOPIC_EXTRACTION_LANG: &str = "it";

/// Returns `true` when tweets in `lang` should have topics extracted.
#[must_use]
pub fn extracts_topics(lang: &str) -> bool {
    lang == TOPIC_EXTRACTION_LANG
}

/// One watched account and the cadence it is crawled at.
///
/// Two configs are the same observation only if all three fields match
/// exactly; any difference means the running job must be replaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObservableConfig {
    pub account_name: String,
    /// Symbolic interval (`"2h"`, `"daily"`, ...) or a raw cron expression.
    pub interval: String,
    pub lang: String,
}

impl ObservableConfig {
    pub fn new(
        account_name: impl Into<String>,
        interval: impl Into<String>,
        lang: impl Into<String>,
    ) -> Self {
        Self {
            account_name: account_name.into(),
            interval: interval.into(),
            lang: lang.into(),
        }
    }

    #[must_use]
    pub fn extracts_topics(&self) -> bool {
        extracts_topics(&self.lang)
    }
}

/// How much history a crawl asks the collector for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlMode {
    /// Only the most recent window of posts.
    #[default]
    Fast,
    /// The maximum backlog the collector can return.
    Full,
}

impl std::fmt::Display for CrawlMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrawlMode::Fast => write!(f, "fast"),
            CrawlMode::Full => write!(f, "full"),
        }
    }
}
