//! Fixed-size batching for the classifier.

use tweetwatch_core::Tweet;

/// Largest batch the classifier is sent in one request.
pub const BATCH_SIZE: usize = 25;

/// Splits `tweets` into consecutive batches of at most `max_size`.
///
/// Batch *k* holds input items `[k * max_size, (k + 1) * max_size)` in input
/// order. Every batch except the last is full. A `max_size` of zero is
/// treated as one.
#[must_use]
pub fn chunk_tweets(tweets: Vec<Tweet>, max_size: usize) -> Vec<Vec<Tweet>> {
    let max_size = max_size.max(1);
    let mut batches = Vec::with_capacity(tweets.len().div_ceil(max_size));
    let mut iter = tweets.into_iter().peekable();
    while iter.peek().is_some() {
        batches.push(iter.by_ref().take(max_size).collect());
    }
    batches
}
