//! Token-bucket rate limiter shared by all outbound classifier calls.
//!
//! One [`RateLimiter`] is created per pipeline and shared by `Arc` across
//! every concurrent item and group. [`RateLimiter::acquire`] is the only
//! intentional suspension point of the pipeline.
//!
//! # Cancellation
//!
//! Tokens are checked and debited inside a single critical section; the
//! wait for refill happens outside the lock. Dropping an `acquire` future
//! at any await point therefore never debits a partial amount.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::telemetry;
use crate::{Error, Result};

/// Configuration for the token bucket.
///
/// ```rust
/// # use trendmood::RateLimitConfig;
/// let config = RateLimitConfig::new().refill_per_sec(4.0).burst(2.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    /// Tokens added per second. Default: 8.
    pub refill_per_sec: f64,
    /// Bucket capacity. Default: 1, which spaces admissions evenly so that
    /// no one-second window admits more than `refill_per_sec` calls.
    pub burst: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            refill_per_sec: 8.0,
            burst: 1.0,
        }
    }
}

impl RateLimitConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the refill rate in tokens per second.
    pub fn refill_per_sec(mut self, rate: f64) -> Self {
        self.refill_per_sec = rate;
        self
    }

    /// Set the bucket capacity.
    pub fn burst(mut self, burst: f64) -> Self {
        self.burst = burst;
        self
    }

    /// Reject configurations that could never admit a call.
    pub fn validate(&self) -> Result<()> {
        if !self.refill_per_sec.is_finite() || self.refill_per_sec <= 0.0 {
            return Err(Error::Configuration(format!(
                "rate limit refill must be a positive number, got {}",
                self.refill_per_sec
            )));
        }
        if !self.burst.is_finite() || self.burst < 1.0 {
            return Err(Error::Configuration(format!(
                "rate limit burst must be at least 1, got {}",
                self.burst
            )));
        }
        Ok(())
    }
}

/// Point-in-time view of the limiter.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimiterSnapshot {
    pub refill_per_sec: f64,
    pub burst: f64,
    /// Tokens currently available (negative while in debt).
    pub tokens: f64,
    /// Estimated wait until one token is available, if currently empty.
    pub estimated_wait: Option<Duration>,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last: Instant,
}

impl Bucket {
    fn refill(&mut self, cfg: &RateLimitConfig) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last).as_secs_f64();
        if elapsed > 0.0 {
            self.tokens = (self.tokens + elapsed * cfg.refill_per_sec).min(cfg.burst);
            self.last = now;
        }
    }

    /// Debit `need` tokens if available, otherwise report how long to wait.
    fn try_take(&mut self, cfg: &RateLimitConfig, need: f64) -> std::result::Result<(), Duration> {
        self.refill(cfg);
        // Requests larger than the bucket wait for a full bucket and go into debt.
        let threshold = need.min(cfg.burst);
        if self.tokens >= threshold {
            self.tokens -= need;
            return Ok(());
        }
        let missing = threshold - self.tokens;
        Err(seconds(missing / cfg.refill_per_sec))
    }
}

/// Wait of `secs` seconds, saturating for waits beyond `Duration::MAX`.
fn seconds(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Token-bucket rate limiter.
///
/// Admission is first-come-ish: waiters race for the lock after sleeping,
/// no strict ordering is guaranteed.
#[derive(Debug)]
pub struct RateLimiter {
    cfg: RateLimitConfig,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    /// Create a limiter with a full bucket.
    ///
    /// Fails with `Error::Configuration` when `cfg` does not validate.
    pub fn new(cfg: RateLimitConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self::with_valid_config(cfg))
    }

    fn with_valid_config(cfg: RateLimitConfig) -> Self {
        let bucket = Mutex::new(Bucket {
            tokens: cfg.burst,
            last: Instant::now(),
        });
        Self { cfg, bucket }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.cfg
    }

    /// Wait until `n` tokens are available, then debit them.
    pub async fn acquire(&self, n: u32) {
        let need = f64::from(n);
        let started = Instant::now();
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                match bucket.try_take(&self.cfg, need) {
                    Ok(()) => break,
                    Err(wait) => wait,
                }
            };
            debug!(wait_ms = wait.as_millis() as u64, "rate limiter waiting for tokens");
            tokio::time::sleep(wait.max(Duration::from_micros(1))).await;
        }
        metrics::histogram!(telemetry::LIMITER_WAIT_SECONDS)
            .record(started.elapsed().as_secs_f64());
    }

    /// Debit `n` tokens without waiting. Returns whether tokens were taken.
    pub async fn try_acquire(&self, n: u32) -> bool {
        let mut bucket = self.bucket.lock().await;
        bucket.try_take(&self.cfg, f64::from(n)).is_ok()
    }

    pub async fn snapshot(&self) -> RateLimiterSnapshot {
        let mut bucket = self.bucket.lock().await;
        bucket.refill(&self.cfg);
        let estimated_wait =
            (bucket.tokens < 1.0).then(|| seconds((1.0 - bucket.tokens) / self.cfg.refill_per_sec));
        RateLimiterSnapshot {
            refill_per_sec: self.cfg.refill_per_sec,
            burst: self.cfg.burst,
            tokens: bucket.tokens,
            estimated_wait,
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::with_valid_config(RateLimitConfig::default())
    }
}
