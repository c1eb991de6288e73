//! Crawl → classify → store orchestration for watched accounts.
//!
//! All real work happens in backend services reached through the
//! [`Backend`] trait. This crate decides what to call, in which order, and
//! how far a failure is allowed to spread: a failed batch never stops the
//! next one, and a failed topic extraction never stops the next tweet.

pub mod backend;
pub mod chunk;
pub mod pipeline;
pub mod sweep;
pub mod types;

pub use backend::Backend;
pub use chunk::{chunk_tweets, BATCH_SIZE};
pub use pipeline::{classify_and_store, run_pipeline};
pub use sweep::run_sweep;
pub use types::{BatchReport, CrawlStatus, RunReport, SweepReport};
