//! TTL cache of computed sentiment labels.
//!
//! [`LabelCache`] maps a content fingerprint (see [`super::fingerprint`])
//! to the [`Label`] the classifier produced for it. Entries expire a fixed
//! time after insertion; expiry is checked when an entry is read, and an
//! expired entry is never returned.
//!
//! The cache is a pure accelerator. A [`LabelCache::disabled()`] instance
//! always misses, which is how the pipeline runs when no cache is wanted.

use std::future::Future;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use crate::telemetry;
use crate::types::Label;
use crate::{Error, Result};

/// Longest time-to-live the cache accepts (1000 years).
pub const MAX_TTL: Duration = Duration::from_secs(1000 * 365 * 24 * 60 * 60);

/// Configuration for the label cache.
///
/// ```rust
/// # use trendmood::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(10_000)
///     .ttl(Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 10,000.
    pub max_entries: u64,
    /// Time-to-live for cached entries, measured from insertion. Default: 1 hour.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Reject a zero TTL or one beyond [`MAX_TTL`].
    pub fn validate(&self) -> Result<()> {
        if self.ttl.is_zero() {
            return Err(Error::Configuration(
                "cache ttl must be greater than zero".to_string(),
            ));
        }
        if self.ttl > MAX_TTL {
            return Err(Error::Configuration(format!(
                "cache ttl must not exceed {} seconds, got {}",
                MAX_TTL.as_secs(),
                self.ttl.as_secs()
            )));
        }
        Ok(())
    }
}

/// In-memory, fingerprint-keyed label cache.
///
/// Safe to share across tasks; concurrent inserts on one key resolve to
/// the last writer.
#[derive(Clone)]
pub struct LabelCache {
    cache: Option<Cache<String, Label>>,
}

impl LabelCache {
    /// Create a new label cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self { cache: Some(cache) }
    }

    /// A cache that stores nothing and always misses.
    pub fn disabled() -> Self {
        Self { cache: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Look up the label for a fingerprint.
    ///
    /// Returns `None` on miss or expiry. Emits cache hit/miss metrics.
    pub async fn get(&self, fingerprint: &str) -> Option<Label> {
        let hit = match &self.cache {
            Some(cache) => cache.get(fingerprint).await,
            None => None,
        };
        match hit {
            Some(label) => {
                debug!(fingerprint, %label, "label cache hit");
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Some(label)
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Return the cached label, or run `init` and cache what it yields.
    ///
    /// Concurrent calls for the same missing fingerprint are coalesced:
    /// only one of them polls its `init`, the others wait for it. `init`
    /// is not polled at all on a hit. A `None` from `init` is not cached.
    pub async fn get_or_insert_with<F>(&self, fingerprint: String, init: F) -> Option<Label>
    where
        F: Future<Output = Option<Label>>,
    {
        let Some(cache) = &self.cache else {
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
            return init.await;
        };

        let entry = cache
            .entry(fingerprint)
            .or_optionally_insert_with(init)
            .await;
        match entry {
            Some(entry) if !entry.is_fresh() => {
                debug!(fingerprint = %entry.key(), label = %entry.value(), "label cache hit");
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Some(entry.into_value())
            }
            fresh_or_none => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                fresh_or_none.map(|entry| entry.into_value())
            }
        }
    }

    /// Insert (or overwrite) the label for a fingerprint.
    pub async fn insert(&self, fingerprint: String, label: Label) {
        if let Some(cache) = &self.cache {
            cache.insert(fingerprint, label).await;
        }
    }

    /// Approximate number of live entries.
    pub fn len(&self) -> u64 {
        self.cache.as_ref().map_or(0, |c| c.entry_count())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evict all entries.
    pub fn clear(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }
}

impl Default for LabelCache {
    fn default() -> Self {
        Self::with_valid_config(&CacheConfig::default())
    }
}
