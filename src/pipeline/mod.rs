//! The sentiment pipeline.
//!
//! Layers, innermost first:
//!
//! - [`ItemClassifier`]: cache lookup, rate-limiter token, classifier call;
//! - [`GroupAggregator`]: all items of one group, distribution, overall label;
//! - [`BatchOrchestrator`]: many groups, dropping the ones that fail.
//!
//! [`SentimentPipeline`] owns one of each, wired to a single shared
//! [`RateLimiter`] and [`LabelCache`]. Build it with
//! [`Trendmood::builder()`](crate::Trendmood::builder).

mod batch;
mod builder;
mod group;
mod item;

pub use batch::{BatchConfig, BatchOrchestrator};
pub use builder::{PipelineBuilder, Trendmood};
pub use group::GroupAggregator;
pub use item::ItemClassifier;

use crate::cache::LabelCache;
use crate::limiter::RateLimiter;
use crate::providers::{ItemSource, TrendSource};
use crate::types::{BatchResult, GroupResult, Item, Label};
use crate::{Error, Result};

/// Fully wired sentiment pipeline.
///
/// Cheap to clone; clones share the limiter and cache.
#[derive(Clone)]
pub struct SentimentPipeline {
    batch: BatchOrchestrator,
}

impl SentimentPipeline {
    pub(crate) fn new(batch: BatchOrchestrator) -> Self {
        Self { batch }
    }

    fn items(&self) -> &ItemClassifier {
        self.batch.group_aggregator().item_classifier()
    }

    /// Classify a single item.
    pub async fn classify_item(&self, item: &Item) -> Label {
        self.items().classify_item(item).await
    }

    /// Classify free text.
    pub async fn classify_text(&self, text: &str) -> Label {
        self.items().classify_text(text).await
    }

    /// Classify and aggregate one group of items.
    pub async fn aggregate(&self, name: &str, items: Vec<Item>) -> GroupResult {
        self.batch.group_aggregator().aggregate(name, items).await
    }

    /// Fetch and aggregate each named group, dropping groups that fail.
    pub async fn run_batch<S>(
        &self,
        group_names: &[String],
        items_per_group: usize,
        source: &S,
    ) -> BatchResult
    where
        S: ItemSource + ?Sized,
    {
        self.batch
            .run_batch(group_names, items_per_group, source)
            .await
    }

    /// Analyse the sentiment of the currently trending groups of `source`.
    ///
    /// Lists up to `num_groups` trending groups (spending one rate-limiter
    /// token alongside the listing), then runs a batch over them. Fails
    /// only on invalid counts or when the trend listing itself fails;
    /// individual groups are dropped as in [`run_batch`](Self::run_batch).
    pub async fn analyze_trending<S>(
        &self,
        source: &S,
        num_groups: usize,
        items_per_group: usize,
    ) -> Result<BatchResult>
    where
        S: TrendSource + ?Sized,
    {
        if num_groups < 1 || items_per_group < 1 {
            return Err(Error::InvalidInput(
                "minimum 1 group and 1 item per group required".to_string(),
            ));
        }

        let (trending, ()) = tokio::join!(
            source.list_trending(num_groups),
            self.limiter().acquire(1)
        );
        let mut names = trending?;
        names.truncate(num_groups);

        let mut result = self.run_batch(&names, items_per_group, source).await;
        result.meta.requested_groups = num_groups;
        result.meta.source = source.source_name();
        Ok(result)
    }

    /// The rate limiter shared by every classification of this pipeline.
    pub fn limiter(&self) -> &RateLimiter {
        self.items().limiter()
    }

    /// The label cache shared by every classification of this pipeline.
    pub fn cache(&self) -> &LabelCache {
        self.items().cache()
    }
}
