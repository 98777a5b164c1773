//! Group aggregation: distribution, overall label, ordering.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use trendmood::{
    BatchConfig, Distribution, Error, Item, Label, Result, SentimentProvider, Trendmood,
};

/// Reads the expected label out of the text ("pos: ...", "neg: ...").
struct KeywordProvider;

#[async_trait]
impl SentimentProvider for KeywordProvider {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn classify_raw(&self, text: &str) -> Result<String> {
        let reply = if text.starts_with("pos") {
            "Positive"
        } else if text.starts_with("neg") {
            "Negative"
        } else {
            "Neutral"
        };
        Ok(reply.to_string())
    }
}

struct DownProvider;

#[async_trait]
impl SentimentProvider for DownProvider {
    fn name(&self) -> &str {
        "down"
    }

    async fn classify_raw(&self, _text: &str) -> Result<String> {
        Err(Error::Api {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }
}

fn items(texts: &[&str]) -> Vec<Item> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| Item::new(i.to_string(), *text, "tester"))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn distribution_is_rounded_to_one_decimal() {
    let pipeline = Trendmood::builder()
        .provider(Arc::new(KeywordProvider))
        .build()
        .unwrap();

    let group = pipeline
        .aggregate("rust", items(&["pos: love it", "pos: great", "neg: meh"]))
        .await;

    assert_eq!(
        group.distribution,
        Distribution {
            positive: 66.7,
            neutral: 0.0,
            negative: 33.3,
        }
    );
    assert_eq!(group.overall_label, Label::Positive);
    assert_eq!(group.name, "rust");
}

#[tokio::test(start_paused = true)]
async fn classifier_outage_yields_all_neutral() {
    let pipeline = Trendmood::builder()
        .provider(Arc::new(DownProvider))
        .build()
        .unwrap();

    let group = pipeline.aggregate("outage", items(&["a", "b", "c", "d"])).await;

    assert_eq!(group.items.len(), 4);
    assert!(group.items.iter().all(|i| i.label == Label::Neutral));
    assert_eq!(group.distribution.neutral, 100.0);
    assert_eq!(group.distribution.positive, 0.0);
    assert_eq!(group.distribution.negative, 0.0);
    assert_eq!(group.overall_label, Label::Neutral);
}

#[tokio::test]
async fn empty_group_is_neutral_with_zero_distribution() {
    let pipeline = Trendmood::builder()
        .provider(Arc::new(KeywordProvider))
        .build()
        .unwrap();

    let group = pipeline.aggregate("quiet", Vec::new()).await;

    assert!(group.items.is_empty());
    assert_eq!(group.distribution, Distribution::default());
    assert_eq!(group.overall_label, Label::Neutral);
}

#[tokio::test(start_paused = true)]
async fn tie_for_first_is_neutral() {
    let pipeline = Trendmood::builder()
        .provider(Arc::new(KeywordProvider))
        .build()
        .unwrap();

    let group = pipeline
        .aggregate("split", items(&["pos: yes", "neg: no"]))
        .await;

    assert_eq!(group.distribution.positive, 50.0);
    assert_eq!(group.distribution.negative, 50.0);
    assert_eq!(group.overall_label, Label::Neutral);
}

#[tokio::test(start_paused = true)]
async fn items_keep_input_order() {
    let pipeline = Trendmood::builder()
        .provider(Arc::new(KeywordProvider))
        .build()
        .unwrap();

    let texts = ["neg: first", "pos: second", "third", "pos: fourth"];
    let group = pipeline.aggregate("order", items(&texts)).await;

    let ids: Vec<&str> = group.items.iter().map(|i| i.item.id.as_str()).collect();
    assert_eq!(ids, ["0", "1", "2", "3"]);
    let labels: Vec<Label> = group.items.iter().map(|i| i.label).collect();
    assert_eq!(
        labels,
        [Label::Negative, Label::Positive, Label::Neutral, Label::Positive]
    );
}

/// Tracks the highest number of simultaneous calls.
#[derive(Default)]
struct ConcurrencyProbe {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl SentimentProvider for ConcurrencyProbe {
    fn name(&self) -> &str {
        "probe"
    }

    async fn classify_raw(&self, _text: &str) -> Result<String> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(1)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok("Positive".to_string())
    }
}

#[tokio::test(start_paused = true)]
async fn max_concurrent_items_caps_in_flight_calls() {
    let probe = Arc::new(ConcurrencyProbe::default());
    let pipeline = Trendmood::builder()
        .provider(probe.clone())
        .batch(BatchConfig::new().max_concurrent_items(2))
        .build()
        .unwrap();

    let texts: Vec<String> = (0..6).map(|i| format!("post {i}")).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let group = pipeline.aggregate("capped", items(&refs)).await;

    assert_eq!(group.items.len(), 6);
    assert!(probe.peak.load(Ordering::SeqCst) <= 2);
    assert_eq!(group.overall_label, Label::Positive);
}

#[tokio::test(start_paused = true)]
async fn unbounded_group_overlaps_slow_calls() {
    let probe = Arc::new(ConcurrencyProbe::default());
    let pipeline = Trendmood::builder()
        .provider(probe.clone())
        .build()
        .unwrap();

    let group = pipeline.aggregate("free", items(&["a", "b", "c", "d"])).await;

    assert_eq!(group.items.len(), 4);
    assert!(probe.peak.load(Ordering::SeqCst) > 1);
}
