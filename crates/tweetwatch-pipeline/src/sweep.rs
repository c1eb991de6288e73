//! Nightly reconciliation of stored-but-unclassified tweets.

use crate::backend::Backend;
use crate::pipeline::classify_and_store;
use crate::types::SweepReport;

/// Re-run classification for every account the repository knows about.
///
/// Accounts come from the observable store rather than the in-memory
/// registry, so accounts watched before a restart are still reconciled.
/// Accounts with nothing unclassified are skipped silently. A listing
/// failure yields an empty report.
pub async fn run_sweep(backend: &dyn Backend) -> SweepReport {
    let mut report = SweepReport::default();

    let observables = match backend.list_observables().await {
        Ok(observables) => observables,
        Err(e) => {
            tracing::warn!(error = %e, "sweep: listing observables failed");
            return report;
        }
    };

    for observable in observables {
        report.accounts_visited += 1;
        let account = observable.account_name.as_str();
        let lang = observable.lang.as_str();

        let tweets = match backend.unclassified_tweets(account, lang).await {
            Ok(tweets) => tweets,
            Err(e) => {
                tracing::warn!(
                    account,
                    lang,
                    error = %e,
                    "sweep: fetching unclassified tweets failed"
                );
                report.accounts_failed += 1;
                continue;
            }
        };

        if tweets.is_empty() {
            report.accounts_skipped += 1;
            continue;
        }

        let pending = tweets.len();
        let batches = classify_and_store(backend, tweets, lang).await;
        tracing::info!(
            account,
            lang,
            pending,
            classified = batches.classified,
            failed_batches = batches.failed_batches,
            "sweep: account reconciled"
        );
        report.tweets_classified += batches.classified;
        report.failed_batches += batches.failed_batches;
    }

    tracing::info!(
        accounts = report.accounts_visited,
        skipped = report.accounts_skipped,
        failed = report.accounts_failed,
        classified = report.tweets_classified,
        "sweep: complete"
    );
    report
}
