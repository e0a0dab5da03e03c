use crate::calendar::InvalidDateError;
use crate::config::ConfigError;
use crate::listings::{ImportError, ListingServiceError, MediaError, RepositoryError};
use crate::telemetry::TelemetryError;
use crate::visits::VisitError;
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
    Server(axum::Error),
    InvalidDate(InvalidDateError),
    Listing(ListingServiceError),
    Import(ImportError),
    Media(MediaError),
    Visit(VisitError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::InvalidDate(err) => write!(f, "invalid date: {}", err),
            AppError::Listing(err) => write!(f, "listing error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Media(err) => write!(f, "media error: {}", err),
            AppError::Visit(err) => write!(f, "visit error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::InvalidDate(err) => Some(err),
            AppError::Listing(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Media(err) => Some(err),
            AppError::Visit(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            AppError::Visit(VisitError::DateInPast { .. })
            | AppError::Visit(VisitError::SlotUnavailable { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Listing(ListingServiceError::Validation(_)) | AppError::Import(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Listing(ListingServiceError::NotOwner { .. }) => StatusCode::FORBIDDEN,
            AppError::Listing(ListingServiceError::Repository(RepositoryError::NotFound)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Listing(ListingServiceError::Repository(RepositoryError::Conflict)) => {
                StatusCode::CONFLICT
            }
            AppError::Media(MediaError::NoFolder { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Media(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Listing(_)
            | AppError::Visit(_) => StatusCode::INTERNAL_SERVER_ERROR,
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

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<InvalidDateError> for AppError {
    fn from(value: InvalidDateError) -> Self {
        Self::InvalidDate(value)
    }
}

impl From<ListingServiceError> for AppError {
    fn from(value: ListingServiceError) -> Self {
        Self::Listing(value)
    }
}

impl From<ImportError> for AppError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<MediaError> for AppError {
    fn from(value: MediaError) -> Self {
        Self::Media(value)
    }
}

impl From<VisitError> for AppError {
    fn from(value: VisitError) -> Self {
        Self::Visit(value)
    }
}
