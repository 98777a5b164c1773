//! Configuration loading for the `trendmood` CLI.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.trendmood/config.toml` (user)
//! 3. `/etc/trendmood/config.toml` (system)
//!
//! When no file exists, built-in defaults are used.
//!
//! Secrets live in `secrets.toml` at the same two locations and must not
//! be readable by group or others. Missing keys fall back to the
//! `GEMINI_API_KEY` / `MASTODON_TOKEN` environment variables.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::cache::CacheConfig;
use crate::classifier::ClassifierConfig;
use crate::limiter::RateLimitConfig;
use crate::pipeline::{BatchConfig, PipelineBuilder, Trendmood};
use crate::{Error, Result};

/// CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub classifier: ClassifierSection,
    #[serde(default)]
    pub batch: BatchSection,
    #[serde(default)]
    pub mastodon: MastodonSection,
}

/// Outbound rate limit.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Classifier calls per second (default: 8).
    #[serde(default = "default_refill")]
    pub refill_per_sec: f64,
    /// Token bucket capacity (default: 1).
    #[serde(default = "default_burst")]
    pub burst: f64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            refill_per_sec: default_refill(),
            burst: default_burst(),
        }
    }
}

fn default_refill() -> f64 {
    8.0
}

fn default_burst() -> f64 {
    1.0
}

/// Label cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum cached labels (default: 10000).
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    /// Seconds a label stays valid (default: 3600).
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_max_entries(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_entries() -> u64 {
    10_000
}

fn default_ttl_secs() -> u64 {
    3600
}

/// Classifier settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierSection {
    /// Gemini model (default: provider default).
    #[serde(default)]
    pub model: Option<String>,
    /// Cooldown after a quota error, in milliseconds (default: 2000).
    #[serde(default = "default_quota_backoff_ms")]
    pub quota_backoff_ms: u64,
}

impl Default for ClassifierSection {
    fn default() -> Self {
        Self {
            model: None,
            quota_backoff_ms: default_quota_backoff_ms(),
        }
    }
}

fn default_quota_backoff_ms() -> u64 {
    2000
}

/// Batch limits.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchSection {
    #[serde(default)]
    pub max_concurrent_items: Option<usize>,
    #[serde(default)]
    pub group_timeout_secs: Option<u64>,
}

/// Mastodon item source.
#[derive(Debug, Clone, Deserialize)]
pub struct MastodonSection {
    /// Instance host (default: mastodon.social).
    #[serde(default = "default_instance")]
    pub instance: String,
}

impl Default for MastodonSection {
    fn default() -> Self {
        Self {
            instance: default_instance(),
        }
    }
}

fn default_instance() -> String {
    "mastodon.social".to_string()
}

/// Secrets configuration (API keys and tokens).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub gemini: Option<ApiKeySecret>,
    #[serde(default)]
    pub mastodon: Option<ApiKeySecret>,
}

/// A single secret value.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

/// Service name → environment variable name mapping.
const SECRET_ENV_VARS: &[(&str, &str)] = &[
    ("gemini", "GEMINI_API_KEY"),
    ("mastodon", "MASTODON_TOKEN"),
];

/// Directory name under `$HOME` and `/etc`.
const APP_DIR: &str = "trendmood";

/// `~/.trendmood/<file>` then `/etc/trendmood/<file>`.
fn standard_locations(file: &str) -> Vec<PathBuf> {
    let user = dirs::home_dir().map(|home| home.join(format!(".{APP_DIR}")).join(file));
    let system = Path::new("/etc").join(APP_DIR).join(file);
    user.into_iter().chain([system]).collect()
}

fn first_existing(file: &str) -> Option<PathBuf> {
    standard_locations(file).into_iter().find(|p| p.exists())
}

/// Read and deserialize a TOML file; `kind` names it in errors.
fn read_toml<T: DeserializeOwned>(path: &Path, kind: &str) -> Result<T> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Configuration(format!("Failed to read {kind} file {path:?}: {e}")))?;
    toml::from_str(&content)
        .map_err(|e| Error::Configuration(format!("Failed to parse {kind} file {path:?}: {e}")))
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist; otherwise the first existing standard
    /// location is used, or defaults when there is none.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = match explicit_path {
            Some(path) if path.exists() => Some(path.to_path_buf()),
            Some(path) => {
                return Err(Error::Configuration(format!(
                    "Config file not found: {path:?}"
                )));
            }
            None => first_existing("config.toml"),
        };
        path.map_or_else(|| Ok(Self::default()), |p| read_toml(&p, "config"))
    }

    pub fn rate_limit_config(&self) -> RateLimitConfig {
        RateLimitConfig::new()
            .refill_per_sec(self.limits.refill_per_sec)
            .burst(self.limits.burst)
    }

    /// Cache config, or `None` when the cache is disabled.
    pub fn cache_config(&self) -> Option<CacheConfig> {
        self.cache.enabled.then(|| {
            CacheConfig::new()
                .max_entries(self.cache.max_entries)
                .ttl(Duration::from_secs(self.cache.ttl_secs))
        })
    }

    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig::new().quota_backoff(Duration::from_millis(self.classifier.quota_backoff_ms))
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            max_concurrent_items: self.batch.max_concurrent_items,
            group_timeout: self.batch.group_timeout_secs.map(Duration::from_secs),
        }
    }

    /// A pipeline builder with every configured section applied.
    ///
    /// The sentiment provider still has to be set on the returned builder.
    pub fn pipeline_builder(&self) -> PipelineBuilder {
        let mut builder = Trendmood::builder()
            .rate_limit(self.rate_limit_config())
            .classifier(self.classifier_config())
            .batch(self.batch_config());
        builder = match self.cache_config() {
            Some(cache) => builder.cache(cache),
            None => builder.disable_cache(),
        };
        #[cfg(feature = "gemini")]
        if let Some(model) = &self.classifier.model {
            builder = builder.gemini_model(model.clone());
        }
        builder
    }
}

impl Secrets {
    /// Load `secrets.toml` from the standard locations.
    ///
    /// No file means empty secrets; keys may still come from the environment.
    pub fn load() -> Result<Self> {
        match first_existing("secrets.toml") {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load a secrets file, refusing one readable by group or others.
    pub fn load_from(path: &Path) -> Result<Self> {
        ensure_owner_only(path)?;
        read_toml(path, "secrets")
    }

    /// Secret for `service` from the file, else from its environment variable.
    pub fn get(&self, service: &str) -> Option<String> {
        let stored = match service {
            "gemini" => self.gemini.as_ref(),
            "mastodon" => self.mastodon.as_ref(),
            _ => None,
        };
        if let Some(secret) = stored {
            return Some(secret.api_key.clone());
        }
        let (_, var) = SECRET_ENV_VARS.iter().find(|(name, _)| *name == service)?;
        std::env::var(var).ok()
    }
}

#[cfg(unix)]
fn ensure_owner_only(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = fs::metadata(path)
        .map_err(|e| Error::Configuration(format!("Failed to stat secrets file {path:?}: {e}")))?
        .permissions()
        .mode()
        & 0o777;
    if mode & 0o077 != 0 {
        return Err(Error::Configuration(format!(
            "Secrets file {path:?} has mode {mode:o}; expected 0600 or 0400"
        )));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_owner_only(_path: &Path) -> Result<()> {
    Ok(())
}
