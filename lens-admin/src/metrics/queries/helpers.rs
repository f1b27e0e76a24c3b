//! Helpers turning Prometheus vectors into labeled metric series

use std::collections::HashMap;

use chrono::DateTime;
use lens_core::{BrokerId, LabeledSeries, Sample, TimeWindow};

use crate::errors::MetricsError;
use crate::metrics::client::{InstantVector, MetricsSource, RangeVector};

pub const TOPIC_LABEL: &str = "topic";

/// Run `query` as an instant query without a window, as a range query with one.
/// Instant results carry one sample per series, range results the samples in
/// ascending time order as returned by the source (no gap filling).
pub async fn fetch_series<M>(
    client: &dyn MetricsSource,
    query: &str,
    window: Option<&TimeWindow>,
) -> Result<Vec<LabeledSeries<M>>, MetricsError> {
    let label = client.broker_label();
    match window {
        None => Ok(client
            .query_instant(query)
            .await?
            .into_iter()
            .map(|v| from_instant(v, label))
            .collect()),
        Some(w) => Ok(client
            .query_range(query, w)
            .await?
            .into_iter()
            .map(|v| from_range(v, label))
            .collect()),
    }
}

fn from_instant<M>(vector: InstantVector, broker_label: &str) -> LabeledSeries<M> {
    let (broker_id, topic) = entity_labels(&vector.metric, broker_label);
    LabeledSeries {
        broker_id,
        topic,
        values: to_sample(&vector.value).into_iter().collect(),
    }
}

fn from_range<M>(vector: RangeVector, broker_label: &str) -> LabeledSeries<M> {
    let (broker_id, topic) = entity_labels(&vector.metric, broker_label);
    let mut points = vector.values;
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    LabeledSeries {
        broker_id,
        topic,
        values: points.iter().filter_map(to_sample).collect(),
    }
}

fn entity_labels(
    metric: &HashMap<String, String>,
    broker_label: &str,
) -> (Option<BrokerId>, Option<String>) {
    let broker_id = metric.get(broker_label).and_then(|v| v.parse().ok());
    let topic = metric.get(TOPIC_LABEL).cloned();
    (broker_id, topic)
}

// NaN and +Inf readings are dropped rather than reported
fn to_sample<M>((ts, value): &(f64, String)) -> Option<Sample<M>> {
    let value = value.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(Sample::new(value, to_rfc3339(*ts)?))
}

pub fn to_rfc3339(unix_seconds: f64) -> Option<String> {
    let secs = unix_seconds.trunc() as i64;
    let nanos = ((unix_seconds.fract()) * 1e9).round() as u32;
    DateTime::from_timestamp(secs, nanos.min(999_999_999)).map(|t| t.to_rfc3339())
}

/// Escape a value for use inside a double-quoted PromQL label matcher
pub fn escape_label(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// `label=~"1|2|3"` matcher, `None` when there is nothing to filter on
pub fn broker_matcher(label: &str, broker_ids: Option<&[BrokerId]>) -> Option<String> {
    let ids = broker_ids.filter(|ids| !ids.is_empty())?;
    let alternatives: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    Some(format!("{}=~\"{}\"", label, alternatives.join("|")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_core::metric::CpuUsage;

    #[test]
    fn range_points_are_time_ascending_and_skip_nan() {
        let vector = RangeVector {
            metric: HashMap::from([
                ("broker_id".to_string(), "2".to_string()),
                ("topic".to_string(), "orders".to_string()),
            ]),
            values: vec![
                (1700000060.0, "3".to_string()),
                (1700000000.0, "1".to_string()),
                (1700000030.0, "NaN".to_string()),
            ],
        };
        let series: LabeledSeries<CpuUsage> = from_range(vector, "broker_id");
        assert_eq!(series.broker_id, Some(2));
        assert_eq!(series.topic.as_deref(), Some("orders"));
        let values: Vec<f64> = series.values.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1.0, 3.0]);
        assert_eq!(series.values[0].time, "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn broker_label_is_configurable() {
        let vector = InstantVector {
            metric: HashMap::from([("kafka_broker".to_string(), "7".to_string())]),
            value: (1700000000.0, "1".to_string()),
        };
        let series: LabeledSeries<CpuUsage> = from_instant(vector, "kafka_broker");
        assert_eq!(series.broker_id, Some(7));
        assert_eq!(series.values.len(), 1);
    }

    #[test]
    fn matchers_and_escaping() {
        assert_eq!(
            broker_matcher("broker_id", Some(&[1, 3][..])),
            Some("broker_id=~\"1|3\"".to_string())
        );
        assert_eq!(broker_matcher("broker_id", Some(&[][..])), None);
        assert_eq!(broker_matcher("broker_id", None), None);
        assert_eq!(escape_label(r#"a"b\c"#), r#"a\"b\\c"#);
    }
}
