//! Best-effort analytics events. Dispatch never blocks or fails the caller.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

/// Campaign parameters carried over from the landing URL.
pub const UTM_KEYS: [&str; 5] = [
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_content",
    "utm_term",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsEvent {
    pub name: &'static str,
    pub occurred_at: DateTime<Utc>,
    pub properties: BTreeMap<String, String>,
}

impl AnalyticsEvent {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            occurred_at: Utc::now(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_utms(mut self, utms: &UtmParams) -> Self {
        for (key, value) in &utms.0 {
            self.properties.insert(key.clone(), value.clone());
        }
        self
    }
}

/// Non-empty UTM values picked out of arbitrary query pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtmParams(BTreeMap<String, String>);

impl UtmParams {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let values = pairs
            .into_iter()
            .filter(|(key, value)| UTM_KEYS.contains(&key.as_ref()) && !value.as_ref().is_empty())
            .map(|(key, value)| (key.as_ref().to_string(), value.as_ref().to_string()))
            .collect();
        Self(values)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("analytics sink unavailable: {0}")]
    Unavailable(String),
}

/// Outbound analytics hook (tag manager, log pipeline, ...).
pub trait AnalyticsSink: Send + Sync {
    fn emit(&self, event: AnalyticsEvent) -> Result<(), AnalyticsError>;
}

/// Fire-and-forget dispatch: failures are logged and dropped.
pub fn dispatch<S: AnalyticsSink + ?Sized>(sink: &S, event: AnalyticsEvent) {
    let name = event.name;
    if let Err(err) = sink.emit(event) {
        warn!(event = name, error = %err, "analytics dispatch failed");
    }
}

/// Writes every event to the tracing pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn emit(&self, event: AnalyticsEvent) -> Result<(), AnalyticsError> {
        info!(
            event = event.name,
            properties = ?event.properties,
            "analytics event"
        );
        Ok(())
    }
}

/// Keeps events in memory; used by the CLI demo and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingAnalytics {
    events: Arc<Mutex<Vec<AnalyticsEvent>>>,
}

impl RecordingAnalytics {
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(|event| event.name).collect()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn emit(&self, event: AnalyticsEvent) -> Result<(), AnalyticsError> {
        let mut guard = self
            .events
            .lock()
            .map_err(|_| AnalyticsError::Unavailable("recorder mutex poisoned".to_string()))?;
        guard.push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSink;

    impl AnalyticsSink for FailingSink {
        fn emit(&self, _event: AnalyticsEvent) -> Result<(), AnalyticsError> {
            Err(AnalyticsError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn collects_only_known_non_empty_utms() {
        let utms = UtmParams::from_pairs([
            ("utm_source", "instagram"),
            ("utm_medium", ""),
            ("ref", "bio"),
            ("utm_campaign", "printemps"),
        ]);
        assert_eq!(utms.get("utm_source"), Some("instagram"));
        assert_eq!(utms.get("utm_campaign"), Some("printemps"));
        assert_eq!(utms.get("utm_medium"), None);
        assert_eq!(utms.get("ref"), None);
    }

    #[test]
    fn events_carry_utm_properties() {
        let utms = UtmParams::from_pairs([("utm_source", "google")]);
        let event = AnalyticsEvent::new("estimation_flow_start")
            .with("step", "localisation")
            .with_utms(&utms);
        assert_eq!(event.properties.get("step").map(String::as_str), Some("localisation"));
        assert_eq!(event.properties.get("utm_source").map(String::as_str), Some("google"));
    }

    #[test]
    fn dispatch_swallows_sink_failures() {
        dispatch(&FailingSink, AnalyticsEvent::new("qualification_step_view"));
    }

    #[test]
    fn recorder_keeps_emission_order() {
        let recorder = RecordingAnalytics::default();
        dispatch(&recorder, AnalyticsEvent::new("first"));
        dispatch(&recorder, AnalyticsEvent::new("second"));
        assert_eq!(recorder.names(), vec!["first", "second"]);
    }
}
