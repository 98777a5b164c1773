//! Collaborator traits consumed by the pipeline.
//!
//! The pipeline never talks to the network directly. It consumes:
//! - [`SentimentProvider`]: one external classification call, returning
//!   the classifier's raw text answer;
//! - [`ItemSource`]: fetches the items of one named group;
//! - [`TrendSource`]: an item source that can also list trending groups.
//!
//! Implementations report failures as [`Error`](crate::Error) values;
//! quota exhaustion should surface as `RateLimited` or `QuotaExceeded` so
//! the classifier can apply its cooldown.
//!
//! # Example
//!
//! ```ignore
//! struct Canned;
//!
//! #[async_trait]
//! impl SentimentProvider for Canned {
//!     fn name(&self) -> &str { "canned" }
//!     async fn classify_raw(&self, _text: &str) -> Result<String> {
//!         Ok("Positive".into())
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::Result;
use crate::types::Item;

// ============================================================================
// Sentiment Provider
// ============================================================================

/// External sentiment classification capability.
///
/// Owns only the transport; mapping the answer to a
/// [`Label`](crate::Label) and the failure policy belong to the
/// [`Classifier`](crate::Classifier).
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// Provider name for logging/metrics.
    fn name(&self) -> &str;

    /// Classify already-normalized text, returning the raw answer.
    async fn classify_raw(&self, text: &str) -> Result<String>;
}

// ============================================================================
// Item Sources
// ============================================================================

/// Source of items for a named group.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Fetch at most `limit` items belonging to `group`, in source order.
    async fn fetch_group_items(&self, group: &str, limit: usize) -> Result<Vec<Item>>;
}

/// Item source that also knows which groups are currently trending.
#[async_trait]
pub trait TrendSource: ItemSource {
    /// List up to `limit` trending group names, most trending first.
    async fn list_trending(&self, limit: usize) -> Result<Vec<String>>;

    /// Human-readable origin recorded in batch metadata (e.g. an instance host).
    fn source_name(&self) -> Option<String> {
        None
    }
}
