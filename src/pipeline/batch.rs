//! Batch orchestration over many groups with per-group failure isolation.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::join_all;
use tracing::{info, warn};

use super::group::GroupAggregator;
use crate::providers::ItemSource;
use crate::telemetry;
use crate::types::{BatchMeta, BatchResult, GroupResult};

/// Batch-level limits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchConfig {
    /// Maximum items classified concurrently within one group. Default: unbounded
    /// (the rate limiter is the only bound).
    pub max_concurrent_items: Option<usize>,
    /// Time budget for one group (fetch + classification). A group that
    /// exceeds it is dropped. Default: none.
    pub group_timeout: Option<Duration>,
}

impl BatchConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap in-flight item classifications per group.
    pub fn max_concurrent_items(mut self, n: usize) -> Self {
        self.max_concurrent_items = Some(n);
        self
    }

    /// Drop groups that take longer than `timeout`.
    pub fn group_timeout(mut self, timeout: Duration) -> Self {
        self.group_timeout = Some(timeout);
        self
    }
}

/// Why a group was left out of a batch.
#[derive(Debug)]
enum GroupFailure {
    Fetch(crate::Error),
    Panicked,
    TimedOut(Duration),
}

impl GroupFailure {
    fn status(&self) -> &'static str {
        match self {
            GroupFailure::Fetch(_) => "fetch_error",
            GroupFailure::Panicked => "panicked",
            GroupFailure::TimedOut(_) => "timed_out",
        }
    }
}

/// Runs the group aggregator over many groups.
///
/// Groups are processed concurrently and independently. A group whose
/// fetch fails, whose processing panics, or which exceeds the group
/// timeout is dropped; the others are returned in input order.
#[derive(Clone)]
pub struct BatchOrchestrator {
    groups: GroupAggregator,
    group_timeout: Option<Duration>,
}

impl BatchOrchestrator {
    pub fn new(groups: GroupAggregator, config: &BatchConfig) -> Self {
        Self {
            groups: groups.max_concurrent_items(config.max_concurrent_items),
            group_timeout: config.group_timeout,
        }
    }

    pub fn group_aggregator(&self) -> &GroupAggregator {
        &self.groups
    }

    /// Fetch and aggregate every group in `group_names`.
    ///
    /// Always returns a result. `meta` reports requested versus delivered
    /// counts so callers can detect dropped groups.
    pub async fn run_batch<S>(
        &self,
        group_names: &[String],
        items_per_group: usize,
        source: &S,
    ) -> BatchResult
    where
        S: ItemSource + ?Sized,
    {
        let outcomes = join_all(
            group_names
                .iter()
                .map(|name| self.run_group(name, items_per_group, source)),
        )
        .await;

        let groups: Vec<GroupResult> = outcomes.into_iter().flatten().collect();
        let total_items: usize = groups.iter().map(|g| g.items.len()).sum();

        info!(
            source = source.name(),
            requested = group_names.len(),
            succeeded = groups.len(),
            total_items,
            "batch complete"
        );

        BatchResult {
            meta: BatchMeta {
                total_groups: groups.len(),
                total_items,
                requested_groups: group_names.len(),
                requested_items_per_group: items_per_group,
                source: None,
            },
            groups,
        }
    }

    async fn run_group<S>(&self, name: &str, limit: usize, source: &S) -> Option<GroupResult>
    where
        S: ItemSource + ?Sized,
    {
        let work = AssertUnwindSafe(self.fetch_and_aggregate(name, limit, source)).catch_unwind();

        let outcome = match self.group_timeout {
            Some(budget) => match tokio::time::timeout(budget, work).await {
                Ok(outcome) => outcome,
                Err(_) => Ok(Err(GroupFailure::TimedOut(budget))),
            },
            None => work.await,
        };

        let failure = match outcome {
            Ok(Ok(group)) => {
                metrics::counter!(telemetry::GROUPS_TOTAL, "status" => "ok").increment(1);
                return Some(group);
            }
            Ok(Err(failure)) => failure,
            Err(_) => GroupFailure::Panicked,
        };

        metrics::counter!(telemetry::GROUPS_TOTAL, "status" => failure.status()).increment(1);
        match &failure {
            GroupFailure::Fetch(e) => warn!(group = name, error = %e, "dropping group: fetch failed"),
            GroupFailure::Panicked => warn!(group = name, "dropping group: processing panicked"),
            GroupFailure::TimedOut(budget) => warn!(
                group = name,
                timeout_ms = budget.as_millis() as u64,
                "dropping group: timed out"
            ),
        }
        None
    }

    async fn fetch_and_aggregate<S>(
        &self,
        name: &str,
        limit: usize,
        source: &S,
    ) -> std::result::Result<GroupResult, GroupFailure>
    where
        S: ItemSource + ?Sized,
    {
        let mut items = source
            .fetch_group_items(name, limit)
            .await
            .map_err(GroupFailure::Fetch)?;
        items.truncate(limit);
        Ok(self.groups.aggregate(name, items).await)
    }
}
