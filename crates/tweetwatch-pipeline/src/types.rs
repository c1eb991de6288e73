//! Reports returned by pipeline runs and sweeps.

use tweetwatch_core::CrawlMode;

/// What the crawl stage produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStatus {
    /// The crawler answered with at least one tweet.
    Fetched(usize),
    /// The crawler answered, with nothing new.
    Empty,
    /// The crawler could not be reached or gave an unusable answer.
    Unavailable,
}

/// Outcome of classifying and storing a set of tweets batch by batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub batches: usize,
    pub failed_batches: usize,
    /// Tweets the classifier returned across all successful batches.
    pub classified: usize,
    /// Classified batches whose store call failed. The tweets still count
    /// as classified; the nightly sweep picks them up again.
    pub failed_stores: usize,
    pub topics_stored: usize,
    pub topic_failures: usize,
}

/// Summary of one pipeline run for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub account: String,
    pub lang: String,
    pub mode: CrawlMode,
    pub crawl: CrawlStatus,
    pub stored_raw: bool,
    pub batches: usize,
    pub failed_batches: usize,
    pub classified: usize,
    pub topics_stored: usize,
    pub topic_failures: usize,
}

impl RunReport {
    pub(crate) fn new(account: &str, lang: &str, mode: CrawlMode, crawl: CrawlStatus) -> Self {
        Self {
            account: account.to_owned(),
            lang: lang.to_owned(),
            mode,
            crawl,
            stored_raw: false,
            batches: 0,
            failed_batches: 0,
            classified: 0,
            topics_stored: 0,
            topic_failures: 0,
        }
    }

    pub(crate) fn absorb(&mut self, batches: &BatchReport) {
        self.batches = batches.batches;
        self.failed_batches = batches.failed_batches;
        self.classified = batches.classified;
        self.topics_stored = batches.topics_stored;
        self.topic_failures = batches.topic_failures;
    }
}

/// Summary of one reconciliation sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Observables listed by the repository.
    pub accounts_visited: usize,
    /// Accounts with nothing left unclassified.
    pub accounts_skipped: usize,
    /// Accounts whose unclassified tweets could not be fetched.
    pub accounts_failed: usize,
    pub tweets_classified: usize,
    pub failed_batches: usize,
}
