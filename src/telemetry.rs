//! Telemetry metric name constants.
//!
//! Centralised metric names for the sentiment pipeline. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `trendmood_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider`: sentiment provider name (e.g. "gemini")
//! - `outcome`: classification outcome: "ok" or "fallback"
//! - `status`: group outcome: "ok", "fetch_error", "panicked", "timed_out"

/// Total external classifier calls.
///
/// Labels: `provider`, `outcome` ("ok" | "fallback").
pub const CLASSIFICATIONS_TOTAL: &str = "trendmood_classifications_total";

/// External classifier call duration in seconds.
///
/// Labels: `provider`.
pub const CLASSIFY_DURATION_SECONDS: &str = "trendmood_classify_duration_seconds";

/// Total quota cooldowns applied after a quota/rate-limit signal.
///
/// Labels: `provider`.
pub const QUOTA_BACKOFFS_TOTAL: &str = "trendmood_quota_backoffs_total";

/// Total label cache hits.
pub const CACHE_HITS_TOTAL: &str = "trendmood_cache_hits_total";

/// Total label cache misses.
pub const CACHE_MISSES_TOTAL: &str = "trendmood_cache_misses_total";

/// Time spent waiting for rate limiter tokens, in seconds.
pub const LIMITER_WAIT_SECONDS: &str = "trendmood_limiter_wait_seconds";

/// Total groups processed by the batch orchestrator.
///
/// Labels: `status`.
pub const GROUPS_TOTAL: &str = "trendmood_groups_total";
