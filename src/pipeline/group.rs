//! Group aggregation: classify every item of a group and summarise.

use futures_util::StreamExt;
use futures_util::future::join_all;
use futures_util::stream;

use super::item::ItemClassifier;
use crate::types::{ClassifiedItem, GroupResult, Item, LabelCounts};

/// Classifies all items of a group concurrently and computes the label
/// distribution and overall label.
///
/// Concurrency is bounded by the shared rate limiter; `max_concurrent_items`
/// additionally caps how many item futures one group keeps in flight.
#[derive(Clone)]
pub struct GroupAggregator {
    items: ItemClassifier,
    max_concurrent_items: Option<usize>,
}

impl GroupAggregator {
    pub fn new(items: ItemClassifier) -> Self {
        Self {
            items,
            max_concurrent_items: None,
        }
    }

    /// Cap the number of items classified at once within one group.
    pub fn max_concurrent_items(mut self, limit: Option<usize>) -> Self {
        self.max_concurrent_items = limit.filter(|n| *n > 0);
        self
    }

    pub fn item_classifier(&self) -> &ItemClassifier {
        &self.items
    }

    /// Classify `items` and aggregate them into a [`GroupResult`].
    ///
    /// Never fails: item-level failures are already `Neutral`. Items keep
    /// their input order. An empty group yields an all-zero distribution
    /// with a `Neutral` overall label.
    pub async fn aggregate(&self, name: &str, items: Vec<Item>) -> GroupResult {
        let labels = match self.max_concurrent_items {
            Some(limit) => {
                stream::iter(items.iter().map(|item| self.items.classify_item(item)))
                    .buffered(limit)
                    .collect::<Vec<_>>()
                    .await
            }
            None => join_all(items.iter().map(|item| self.items.classify_item(item))).await,
        };

        let counts = LabelCounts::tally(&labels);
        let items = items
            .into_iter()
            .zip(labels)
            .map(|(item, label)| ClassifiedItem { item, label })
            .collect();

        GroupResult {
            name: name.to_string(),
            items,
            distribution: counts.distribution(),
            overall_label: counts.overall(),
        }
    }
}
