//! Pipeline orchestration for a single account and trigger.

use tweetwatch_core::{extracts_topics, CrawlMode, Tweet};

use crate::backend::Backend;
use crate::chunk::{chunk_tweets, BATCH_SIZE};
use crate::types::{BatchReport, CrawlStatus, RunReport};

/// Run the full pipeline for one account.
///
/// 1. Crawl recent (`fast`) or all (`full`) tweets mentioning the account.
/// 2. Store the raw tweets.
/// 3. Classify and store them batch by batch (see [`classify_and_store`]).
///
/// Never fails: every collaborator error is logged and reflected in the
/// returned [`RunReport`]. Stores already made are not rolled back.
pub async fn run_pipeline(
    backend: &dyn Backend,
    account_name: &str,
    lang: &str,
    mode: CrawlMode,
) -> RunReport {
    let tweets = match backend.crawl_tweets(account_name, lang, mode).await {
        Ok(tweets) => tweets,
        Err(e) => {
            tracing::warn!(
                account = account_name,
                lang,
                %mode,
                error = %e,
                "pipeline: crawl failed, ending run"
            );
            return RunReport::new(account_name, lang, mode, CrawlStatus::Unavailable);
        }
    };

    if tweets.is_empty() {
        tracing::info!(account = account_name, lang, %mode, "pipeline: no new tweets");
        return RunReport::new(account_name, lang, mode, CrawlStatus::Empty);
    }

    let mut report = RunReport::new(
        account_name,
        lang,
        mode,
        CrawlStatus::Fetched(tweets.len()),
    );

    match backend.store_tweets(&tweets).await {
        Ok(()) => report.stored_raw = true,
        Err(e) => {
            tracing::warn!(
                account = account_name,
                count = tweets.len(),
                error = %e,
                "pipeline: storing raw tweets failed"
            );
        }
    }

    let batches = classify_and_store(backend, tweets, lang).await;
    report.absorb(&batches);

    tracing::info!(
        account = account_name,
        lang,
        %mode,
        batches = report.batches,
        classified = report.classified,
        failed_batches = report.failed_batches,
        topics_stored = report.topics_stored,
        "pipeline: run complete"
    );
    report
}

/// Classify `tweets` in batches of [`BATCH_SIZE`] and store each result.
///
/// Batches run strictly one after another. A batch the classifier rejects
/// is skipped and the next batch proceeds. Tweets the classifier returns
/// without labels are stored but not counted. For Italian tweets, topics
/// are then extracted and stored per labelled tweet; one tweet's failure
/// does not affect the others.
pub async fn classify_and_store(
    backend: &dyn Backend,
    tweets: Vec<Tweet>,
    lang: &str,
) -> BatchReport {
    let batches = chunk_tweets(tweets, BATCH_SIZE);
    let mut report = BatchReport {
        batches: batches.len(),
        ..BatchReport::default()
    };
    let mut classified: Vec<Tweet> = Vec::new();

    for (index, batch) in batches.iter().enumerate() {
        let result = match backend.classify_tweets(batch, lang).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    batch = index,
                    size = batch.len(),
                    lang,
                    error = %e,
                    "pipeline: classification failed, skipping batch"
                );
                report.failed_batches += 1;
                continue;
            }
        };

        if let Err(e) = backend.store_classified_tweets(&result).await {
            tracing::warn!(
                batch = index,
                size = result.len(),
                error = %e,
                "pipeline: storing classified tweets failed"
            );
            report.failed_stores += 1;
        }
        let returned = result.len();
        let before = classified.len();
        classified.extend(result.into_iter().filter(Tweet::is_classified));
        let unlabelled = returned - (classified.len() - before);
        if unlabelled > 0 {
            tracing::debug!(
                batch = index,
                unlabelled,
                "pipeline: classifier returned tweets without labels"
            );
        }
        report.classified = classified.len();
    }

    if extracts_topics(lang) {
        for tweet in classified {
            let topics = match backend.extract_topics(&tweet).await {
                Ok(topics) => topics,
                Err(e) => {
                    tracing::warn!(
                        status_id = %tweet.status_id,
                        error = %e,
                        "pipeline: topic extraction failed"
                    );
                    report.topic_failures += 1;
                    continue;
                }
            };
            let enriched = tweet.with_topics(topics);
            match backend.store_tweet_topics(&enriched).await {
                Ok(()) => report.topics_stored += 1,
                Err(e) => {
                    tracing::warn!(
                        status_id = %enriched.status_id,
                        error = %e,
                        "pipeline: storing topics failed"
                    );
                    report.topic_failures += 1;
                }
            }
        }
    }

    report
}
