//! Builder for configuring pipeline instances

use std::sync::Arc;

use super::{BatchConfig, BatchOrchestrator, GroupAggregator, ItemClassifier, SentimentPipeline};
use crate::cache::{CacheConfig, LabelCache};
use crate::classifier::{Classifier, ClassifierConfig};
use crate::limiter::{RateLimitConfig, RateLimiter};
use crate::providers::SentimentProvider;
use crate::{Error, Result};

/// Main entry point for creating pipeline instances.
pub struct Trendmood;

impl Trendmood {
    /// Create a new builder for configuring the pipeline.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }
}

/// Builder for configuring pipeline instances.
///
/// All configuration is validated in [`build()`](Self::build); a pipeline
/// that builds never fails on configuration at request time.
pub struct PipelineBuilder {
    provider: Option<Arc<dyn SentimentProvider>>,
    #[cfg(feature = "gemini")]
    gemini_key: Option<String>,
    #[cfg(feature = "gemini")]
    gemini_model: Option<String>,
    rate_limit: RateLimitConfig,
    shared_limiter: Option<Arc<RateLimiter>>,
    cache: Option<CacheConfig>,
    classifier: ClassifierConfig,
    batch: BatchConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            #[cfg(feature = "gemini")]
            gemini_key: None,
            #[cfg(feature = "gemini")]
            gemini_model: None,
            rate_limit: RateLimitConfig::default(),
            shared_limiter: None,
            cache: Some(CacheConfig::default()),
            classifier: ClassifierConfig::default(),
            batch: BatchConfig::default(),
        }
    }

    /// Use a custom sentiment provider. Takes precedence over `gemini()`.
    pub fn provider(mut self, provider: Arc<dyn SentimentProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Classify with Google Gemini.
    #[cfg(feature = "gemini")]
    pub fn gemini(mut self, api_key: impl Into<String>) -> Self {
        self.gemini_key = Some(api_key.into());
        self
    }

    /// Override the Gemini model (default: `gemini-1.5-flash`).
    #[cfg(feature = "gemini")]
    pub fn gemini_model(mut self, model: impl Into<String>) -> Self {
        self.gemini_model = Some(model.into());
        self
    }

    /// Configure the outbound rate limit.
    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = config;
        self
    }

    /// Share an existing limiter (e.g. one quota across several pipelines).
    ///
    /// Overrides `rate_limit()`.
    pub fn shared_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.shared_limiter = Some(limiter);
        self
    }

    /// Configure the label cache.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = Some(config);
        self
    }

    /// Run without a label cache: every classification is an external call.
    pub fn disable_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    /// Configure classifier failure handling.
    pub fn classifier(mut self, config: ClassifierConfig) -> Self {
        self.classifier = config;
        self
    }

    /// Configure batch limits.
    pub fn batch(mut self, config: BatchConfig) -> Self {
        self.batch = config;
        self
    }

    fn resolve_provider(&self) -> Result<Arc<dyn SentimentProvider>> {
        if let Some(provider) = &self.provider {
            return Ok(provider.clone());
        }

        #[cfg(feature = "gemini")]
        if let Some(key) = &self.gemini_key {
            let mut client = crate::providers::GeminiClient::new(key.clone())?;
            if let Some(model) = &self.gemini_model {
                client = client.model(model.clone());
            }
            return Ok(Arc::new(client));
        }

        Err(Error::NoProvider)
    }

    fn validate(&self) -> Result<()> {
        if self.shared_limiter.is_none() {
            self.rate_limit.validate()?;
        }
        if let Some(cache) = &self.cache {
            cache.validate()?;
        }
        if self.batch.max_concurrent_items == Some(0) {
            return Err(Error::Configuration(
                "max_concurrent_items must be at least 1".to_string(),
            ));
        }
        if self.batch.group_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::Configuration(
                "group_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the pipeline.
    pub fn build(self) -> Result<SentimentPipeline> {
        self.validate()?;
        let provider = self.resolve_provider()?;

        let limiter = match self.shared_limiter {
            Some(limiter) => limiter,
            None => Arc::new(RateLimiter::new(self.rate_limit)?),
        };
        let cache = Arc::new(match &self.cache {
            Some(config) => LabelCache::new(config)?,
            None => LabelCache::disabled(),
        });

        let classifier = Classifier::new(provider, self.classifier);
        let items = ItemClassifier::new(classifier, limiter, cache);
        let batch = BatchOrchestrator::new(GroupAggregator::new(items), &self.batch);

        Ok(SentimentPipeline::new(batch))
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
