//! Group and batch result types.

use serde::{Deserialize, Serialize};

use super::{ClassifiedItem, Label};

/// Per-label item counts for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl LabelCounts {
    /// Count labels.
    pub fn tally<'a>(labels: impl IntoIterator<Item = &'a Label>) -> Self {
        let mut counts = Self::default();
        for label in labels {
            match label {
                Label::Positive => counts.positive += 1,
                Label::Neutral => counts.neutral += 1,
                Label::Negative => counts.negative += 1,
            }
        }
        counts
    }

    pub fn get(&self, label: Label) -> usize {
        match label {
            Label::Positive => self.positive,
            Label::Neutral => self.neutral,
            Label::Negative => self.negative,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Percentage distribution over `max(1, total)`, one decimal place.
    pub fn distribution(&self) -> Distribution {
        let total = self.total().max(1) as f64;
        let pct = |n: usize| round_one_decimal(n as f64 / total * 100.0);
        Distribution {
            positive: pct(self.positive),
            neutral: pct(self.neutral),
            negative: pct(self.negative),
        }
    }

    /// The label with the strictly highest count.
    ///
    /// A tie for the highest count (including the all-zero case) resolves
    /// to `Neutral`: without a clear majority the group has no dominant
    /// sentiment.
    pub fn overall(&self) -> Label {
        let best = Label::ALL
            .iter()
            .map(|label| self.get(*label))
            .max()
            .unwrap_or(0);
        let mut leaders = Label::ALL.iter().filter(|label| self.get(**label) == best);
        match (leaders.next(), leaders.next()) {
            (Some(label), None) => *label,
            _ => Label::Neutral,
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Label distribution of a group, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

/// Aggregated sentiment of one group (e.g. one trending hashtag).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupResult {
    pub name: String,
    /// Items in fetch order.
    pub items: Vec<ClassifiedItem>,
    pub distribution: Distribution,
    pub overall_label: Label,
}

/// Request/outcome counts of a batch run.
///
/// Comparing `total_groups` with `requested_groups` is the only way for a
/// caller to detect dropped groups; fallback `Neutral` labels are not
/// distinguishable from real ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMeta {
    /// Groups that produced a result.
    pub total_groups: usize,
    /// Items across all returned groups.
    pub total_items: usize,
    pub requested_groups: usize,
    pub requested_items_per_group: usize,
    /// Item source the batch ran against, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result of a batch run. Failed groups are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub groups: Vec<GroupResult>,
    pub meta: BatchMeta,
}
