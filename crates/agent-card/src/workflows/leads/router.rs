use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{error, warn};

use super::domain::LeadKind;
use super::mailer::Mailer;
use super::service::{LeadCaptureService, LeadError};

/// Router builder for the two sign-up endpoints.
pub fn lead_router<M>(service: Arc<LeadCaptureService<M>>) -> Router
where
    M: Mailer + 'static,
{
    Router::new()
        .route("/api/newsletter", post(newsletter_handler::<M>))
        .route("/api/private-access", post(private_access_handler::<M>))
        .with_state(service)
}

pub(crate) async fn newsletter_handler<M>(
    State(service): State<Arc<LeadCaptureService<M>>>,
    body: Bytes,
) -> Response
where
    M: Mailer + 'static,
{
    capture(service, LeadKind::Newsletter, body).await
}

pub(crate) async fn private_access_handler<M>(
    State(service): State<Arc<LeadCaptureService<M>>>,
    body: Bytes,
) -> Response
where
    M: Mailer + 'static,
{
    capture(service, LeadKind::PrivateAccess, body).await
}

async fn capture<M>(service: Arc<LeadCaptureService<M>>, kind: LeadKind, body: Bytes) -> Response
where
    M: Mailer + 'static,
{
    // Unparsable bodies are treated like a missing email.
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let outcome = tokio::task::spawn_blocking(move || service.capture(kind, &payload)).await;
    match outcome {
        Ok(Ok(receipt)) => (StatusCode::OK, Json(receipt)).into_response(),
        Ok(Err(LeadError::InvalidEmail)) => {
            warn!(kind = kind.tag(), "rejected sign-up without a valid email");
            let payload = json!({ "error": LeadError::InvalidEmail.to_string() });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Ok(Err(err @ LeadError::Delivery(_))) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
        Err(join_error) => {
            error!(kind = kind.tag(), error = %join_error, "lead capture task failed");
            let payload = json!({ "error": "Erreur lors de l'envoi de l'email" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
