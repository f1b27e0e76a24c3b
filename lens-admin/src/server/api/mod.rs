pub mod brokers;
pub mod cluster;
pub mod metrics;
pub mod reassignments;
pub mod topics;

use lens_core::{BrokerId, TimeWindow};
use serde::Deserialize;

use crate::resolve::BrokerFields;

const DEFAULT_LOOKBACK_SECS: i64 = 3600;
const DEFAULT_STEP: &str = "60s";

/// Query string shared by the read endpoints; each handler uses what it needs
#[derive(Debug, Default, Deserialize)]
pub struct Params {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub step: Option<String>,
    /// Comma separated broker ids
    pub broker_ids: Option<String>,
    /// Comma separated topic names
    pub topics: Option<String>,
    /// Comma separated field names
    pub fields: Option<String>,
    /// Comma separated broker field names for brokers nested in the cluster
    pub broker_fields: Option<String>,
    pub request: Option<String>,
}

impl Params {
    /// The window when `start`, `end` and `step` are all given, `None` when none is.
    pub fn window(&self) -> Result<Option<TimeWindow>, String> {
        match (self.start, self.end, self.step.as_deref()) {
            (None, None, None) => Ok(None),
            (Some(start), Some(end), Some(step)) => {
                if end < start {
                    return Err(format!("end ({}) is before start ({})", end, start));
                }
                if step.trim().is_empty() {
                    return Err("step must not be empty".to_string());
                }
                Ok(Some(TimeWindow::new(start, end, step.trim())))
            }
            _ => Err("start, end and step must be given together".to_string()),
        }
    }

    /// Like `window`, falling back to the last hour in 60s steps.
    pub fn window_or_recent(&self) -> Result<TimeWindow, String> {
        if let Some(w) = self.window()? {
            return Ok(w);
        }
        let now = chrono::Utc::now().timestamp();
        Ok(TimeWindow::new(now - DEFAULT_LOOKBACK_SECS, now, DEFAULT_STEP))
    }

    pub fn broker_ids(&self) -> Result<Option<Vec<BrokerId>>, String> {
        let Some(raw) = self.broker_ids.as_deref() else {
            return Ok(None);
        };
        split(raw)
            .map(|id| {
                id.parse::<BrokerId>()
                    .map_err(|_| format!("invalid broker id '{}'", id))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Nested broker fields; none unless asked for, an empty list selects all
    pub fn broker_fields(&self) -> Result<BrokerFields, String> {
        match self.broker_fields.as_deref() {
            Some(raw) => BrokerFields::parse(Some(raw)),
            None => Ok(BrokerFields::default()),
        }
    }

    pub fn topics(&self) -> Option<Vec<String>> {
        self.topics
            .as_deref()
            .map(|raw| split(raw).map(String::from).collect())
    }
}

fn split(raw: &str) -> impl Iterator<Item = &str> + '_ {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_needs_all_three_parts() {
        let p = Params {
            start: Some(100),
            end: Some(200),
            step: Some("15s".into()),
            ..Default::default()
        };
        assert_eq!(p.window(), Ok(Some(TimeWindow::new(100, 200, "15s"))));

        let partial = Params {
            start: Some(100),
            ..Default::default()
        };
        assert!(partial.window().is_err());
        assert_eq!(Params::default().window(), Ok(None));
    }

    #[test]
    fn recent_window_defaults_to_last_hour() {
        let w = Params::default().window_or_recent().unwrap();
        assert_eq!(w.end - w.start, DEFAULT_LOOKBACK_SECS);
        assert_eq!(w.step, DEFAULT_STEP);
    }

    #[test]
    fn nested_broker_fields_are_opt_in() {
        assert_eq!(Params::default().broker_fields(), Ok(BrokerFields::default()));

        let p = Params {
            broker_fields: Some("cpuUsage".into()),
            ..Default::default()
        };
        let fields = p.broker_fields().unwrap();
        assert!(fields.cpu_usage);
        assert!(!fields.jvm_memory_usage);

        let bad = Params {
            broker_fields: Some("cpu".into()),
            ..Default::default()
        };
        assert!(bad.broker_fields().is_err());
    }

    #[test]
    fn broker_ids_are_parsed_or_rejected() {
        let p = Params {
            broker_ids: Some("3, 1,".into()),
            ..Default::default()
        };
        assert_eq!(p.broker_ids(), Ok(Some(vec![3, 1])));

        let bad = Params {
            broker_ids: Some("one".into()),
            ..Default::default()
        };
        assert!(bad.broker_ids().is_err());
    }
}
