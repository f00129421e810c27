//! Entry of the estimation funnel on the hub page: the location prompt that
//! reports its first interaction, placeholder submit and out-of-area leads.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::analytics::{dispatch, AnalyticsEvent, AnalyticsSink, UtmParams};

pub const DEFAULT_PAGE_SOURCE: &str = "hub_matthis";

/// Viewports narrower than this count as mobile.
pub const MOBILE_BREAKPOINT: u32 = 768;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Mobile,
    Desktop,
    Unknown,
}

impl DeviceType {
    pub fn from_viewport_width(width: Option<u32>) -> Self {
        match width {
            Some(width) if width < MOBILE_BREAKPOINT => Self::Mobile,
            Some(_) => Self::Desktop,
            None => Self::Unknown,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationSignal {
    Start,
    Submit,
    SectorIneligible,
}

impl EstimationSignal {
    fn event(self) -> AnalyticsEvent {
        match self {
            Self::Start => {
                AnalyticsEvent::new("estimation_flow_start").with("step", "localisation")
            }
            Self::Submit => {
                AnalyticsEvent::new("estimation_submit").with("status", "placeholder")
            }
            Self::SectorIneligible => AnalyticsEvent::new("sector_ineligible")
                .with("step", "localisation")
                .with("reason", "self_declared"),
        }
    }
}

/// Page-level context attached to every estimation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimationContext {
    pub page_source: String,
    pub device: DeviceType,
    pub utms: UtmParams,
}

impl Default for EstimationContext {
    fn default() -> Self {
        Self {
            page_source: DEFAULT_PAGE_SOURCE.to_string(),
            device: DeviceType::Unknown,
            utms: UtmParams::default(),
        }
    }
}

pub fn estimation_event(signal: EstimationSignal, context: &EstimationContext) -> AnalyticsEvent {
    signal
        .event()
        .with("page_source", context.page_source.clone())
        .with("device", context.device.code())
        .with_utms(&context.utms)
}

/// One visitor's starter. The start event is reported once per starter.
pub struct EstimationStarter<A> {
    analytics: Arc<A>,
    context: EstimationContext,
    started: bool,
}

impl<A> EstimationStarter<A>
where
    A: AnalyticsSink + 'static,
{
    pub fn new(analytics: Arc<A>, context: EstimationContext) -> Self {
        Self {
            analytics,
            context,
            started: false,
        }
    }

    /// Returns whether this call reported the start.
    pub fn start(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        self.send(EstimationSignal::Start);
        true
    }

    pub fn submit(&self) {
        self.send(EstimationSignal::Submit);
    }

    pub fn mark_sector_ineligible(&self) {
        self.send(EstimationSignal::SectorIneligible);
    }

    fn send(&self, signal: EstimationSignal) {
        dispatch(
            self.analytics.as_ref(),
            estimation_event(signal, &self.context),
        );
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationEventRequest {
    pub signal: EstimationSignal,
    #[serde(default)]
    pub page_source: Option<String>,
    #[serde(default)]
    pub viewport_width: Option<u32>,
    /// Raw landing-page query pairs; only UTM keys are kept.
    #[serde(default)]
    pub query: BTreeMap<String, String>,
}

impl EstimationEventRequest {
    fn context(&self) -> EstimationContext {
        EstimationContext {
            page_source: self
                .page_source
                .clone()
                .filter(|source| !source.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PAGE_SOURCE.to_string()),
            device: DeviceType::from_viewport_width(self.viewport_width),
            utms: UtmParams::from_pairs(&self.query),
        }
    }
}

/// Router builder for the browser-side estimation signals.
pub fn estimation_router<A>(analytics: Arc<A>) -> Router
where
    A: AnalyticsSink + 'static,
{
    Router::new()
        .route("/api/v1/estimation/events", post(event_handler::<A>))
        .with_state(analytics)
}

pub(crate) async fn event_handler<A>(State(analytics): State<Arc<A>>, body: Bytes) -> Response
where
    A: AnalyticsSink + 'static,
{
    let request: EstimationEventRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => {
            warn!(error = %error, "unreadable estimation event");
            let payload = json!({ "error": format!("invalid estimation event: {error}") });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    let event = estimation_event(request.signal, &request.context());
    let name = event.name;
    dispatch(analytics.as_ref(), event);
    (StatusCode::ACCEPTED, Json(json!({ "event": name }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::RecordingAnalytics;
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn starter(analytics: &RecordingAnalytics) -> EstimationStarter<RecordingAnalytics> {
        EstimationStarter::new(
            Arc::new(analytics.clone()),
            EstimationContext {
                device: DeviceType::from_viewport_width(Some(390)),
                utms: UtmParams::from_pairs([("utm_source", "instagram")]),
                ..EstimationContext::default()
            },
        )
    }

    #[test]
    fn device_follows_viewport_breakpoint() {
        assert_eq!(DeviceType::from_viewport_width(Some(767)), DeviceType::Mobile);
        assert_eq!(DeviceType::from_viewport_width(Some(768)), DeviceType::Desktop);
        assert_eq!(DeviceType::from_viewport_width(None), DeviceType::Unknown);
    }

    #[test]
    fn start_is_reported_once() {
        let analytics = RecordingAnalytics::default();
        let mut starter = starter(&analytics);

        assert!(starter.start());
        assert!(!starter.start());
        starter.mark_sector_ineligible();
        starter.submit();

        assert_eq!(
            analytics.names(),
            vec!["estimation_flow_start", "sector_ineligible", "estimation_submit"]
        );
        let start = &analytics.events()[0];
        assert_eq!(start.properties.get("step").map(String::as_str), Some("localisation"));
        assert_eq!(
            start.properties.get("page_source").map(String::as_str),
            Some("hub_matthis")
        );
        assert_eq!(start.properties.get("device").map(String::as_str), Some("mobile"));
        assert_eq!(
            start.properties.get("utm_source").map(String::as_str),
            Some("instagram")
        );
    }

    fn post_event(body: &str) -> Request<Body> {
        Request::post("/api/v1/estimation/events")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn endpoint_records_signal_with_page_context() {
        let analytics = RecordingAnalytics::default();
        let router = estimation_router(Arc::new(analytics.clone()));

        let response = router
            .oneshot(post_event(
                r#"{"signal":"start","viewportWidth":1280,"query":{"utm_campaign":"printemps","ref":"bio"}}"#,
            ))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let events = analytics.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "estimation_flow_start");
        assert_eq!(
            events[0].properties.get("device").map(String::as_str),
            Some("desktop")
        );
        assert_eq!(
            events[0].properties.get("utm_campaign").map(String::as_str),
            Some("printemps")
        );
        assert!(!events[0].properties.contains_key("ref"));
    }

    #[tokio::test]
    async fn unknown_signal_is_json_error() {
        let analytics = RecordingAnalytics::default();
        let router = estimation_router(Arc::new(analytics.clone()));

        let response = router
            .oneshot(post_event(r#"{"signal":"launch"}"#))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(analytics.events().is_empty());
    }
}
