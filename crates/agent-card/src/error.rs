use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::qualification::FieldError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Answers(FieldError),
    Input(serde_json::Error),
    UnknownContact(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Answers(err) => write!(f, "invalid answer: {}", err),
            AppError::Input(err) => write!(f, "invalid input: {}", err),
            AppError::UnknownContact(slug) => write!(f, "no contact with slug '{}'", slug),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Answers(err) => Some(err),
            AppError::Input(err) => Some(err),
            AppError::UnknownContact(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Answers(_) | AppError::Input(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::UnknownContact(_) => StatusCode::NOT_FOUND,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<FieldError> for AppError {
    fn from(value: FieldError) -> Self {
        Self::Answers(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Input(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::qualification::FieldKey;

    #[test]
    fn maps_errors_to_status_codes() {
        let unknown = AppError::UnknownContact("ghost".to_string()).into_response();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

        let answers = AppError::from(FieldError::OutOfRange {
            field: FieldKey::MotivationLevel,
            value: 12,
        })
        .into_response();
        assert_eq!(answers.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let config = AppError::from(ConfigError::InvalidPort).into_response();
        assert_eq!(config.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unknown_contact_has_no_source() {
        let error = AppError::UnknownContact("ghost".to_string());
        assert_eq!(error.to_string(), "no contact with slug 'ghost'");
        assert!(std::error::Error::source(&error).is_none());
    }
}
