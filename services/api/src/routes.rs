use crate::infra::AppState;
use agent_card::analytics::AnalyticsSink;
use agent_card::catalog::GuideCatalog;
use agent_card::contacts::VCardSource;
use agent_card::workflows::estimation::estimation_router;
use agent_card::workflows::leads::{lead_router, LeadCaptureService, Mailer};
use agent_card::workflows::qualification::{qualification_router, QualificationService};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GuidesResponse<'a> {
    pub(crate) contact: &'static str,
    #[serde(flatten)]
    pub(crate) catalog: &'a GuideCatalog,
}

pub(crate) fn with_card_routes<A, M>(
    qualification: Arc<QualificationService<A>>,
    leads: Arc<LeadCaptureService<M>>,
    analytics: Arc<A>,
) -> Router
where
    A: AnalyticsSink + 'static,
    M: Mailer + 'static,
{
    qualification_router(qualification)
        .merge(lead_router(leads))
        .merge(estimation_router(analytics))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/contacts/:slug", get(contact_endpoint))
        .route("/api/v1/contacts/:slug/guides", get(guides_endpoint))
        .route("/api/vcard/:slug", get(vcard_endpoint))
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn contact_endpoint(
    Extension(state): Extension<AppState>,
    Path(slug): Path<String>,
) -> Response {
    match state.directory.by_slug(&slug) {
        Some(contact) => (StatusCode::OK, Json(contact)).into_response(),
        None => not_found(),
    }
}

pub(crate) async fn guides_endpoint(
    Extension(state): Extension<AppState>,
    Path(slug): Path<String>,
) -> Response {
    let Some(contact) = state.directory.by_slug(&slug) else {
        return not_found();
    };

    let payload = GuidesResponse {
        contact: contact.slug,
        catalog: state.catalog.as_ref(),
    };
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn vcard_endpoint(
    Extension(state): Extension<AppState>,
    Path(slug): Path<String>,
) -> Response {
    let Some((body, source)) = state.vcards.resolve(&slug) else {
        return not_found();
    };
    debug!(
        %slug,
        static_file = source == VCardSource::StaticFile,
        "serving vcard"
    );

    let disposition = format!("attachment; filename=contact-{slug}.vcf");
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/vcard; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CACHE_CONTROL, "public, max-age=600".to_string()),
        ],
        body,
    )
        .into_response()
}
