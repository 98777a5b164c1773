//! Single-item classification: cache, then rate limiter, then classifier.

use std::sync::Arc;

use tracing::debug;

use crate::cache::{LabelCache, fingerprint, normalize};
use crate::classifier::{Classification, Classifier};
use crate::limiter::RateLimiter;
use crate::types::{Item, Label};

/// Classifies one item, consulting the shared cache before spending a
/// rate-limiter token on an external call.
///
/// Cheap to clone; clones share the same limiter and cache.
#[derive(Clone)]
pub struct ItemClassifier {
    classifier: Classifier,
    limiter: Arc<RateLimiter>,
    cache: Arc<LabelCache>,
}

impl ItemClassifier {
    pub fn new(classifier: Classifier, limiter: Arc<RateLimiter>, cache: Arc<LabelCache>) -> Self {
        Self {
            classifier,
            limiter,
            cache,
        }
    }

    /// Classify an item's content.
    pub async fn classify_item(&self, item: &Item) -> Label {
        self.classify_text(&item.content).await
    }

    /// Classify raw text.
    ///
    /// A cache hit returns without touching the limiter. On a miss one
    /// caller per fingerprint waits for a token, calls the classifier and
    /// caches the answer; concurrent callers for the same text share that
    /// result. Fallback labels from a failed call are returned but not
    /// cached.
    pub async fn classify_text(&self, text: &str) -> Label {
        let normalized = normalize(text);
        let key = fingerprint(&normalized);

        let classify = async {
            self.limiter.acquire(1).await;
            match self.classifier.classify_detailed(&normalized).await {
                Classification::Answered(label) => Some(label),
                Classification::Fallback => {
                    debug!(fingerprint = %key, "not caching fallback label");
                    None
                }
            }
        };

        self.cache
            .get_or_insert_with(key.clone(), classify)
            .await
            .unwrap_or(Label::Neutral)
    }

    pub fn cache(&self) -> &LabelCache {
        &self.cache
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}
