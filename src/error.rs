use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Message shown when a discovery or search legitimately finds nothing
pub const NO_RESULTS_MESSAGE: &str = "No results found. Try different filters!";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// No usable catalog credential; no catalog call can succeed this session
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The catalog API answered with a failure (or could not be reached)
    #[error("{message}")]
    Remote { message: String },

    #[error("{}", NO_RESULTS_MESSAGE)]
    NoResults,

    /// A persisted value could not be decoded. Never leaves the store.
    #[error("Persisted state error: {0}")]
    PersistedState(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("A discovery is already in progress")]
    Busy,

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl AppError {
    pub fn remote(message: impl Into<String>) -> Self {
        AppError::Remote {
            message: message.into(),
        }
    }

    /// Stable machine-readable kind reported to the presentation layer
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "configuration",
            AppError::Remote { .. } => "remote",
            AppError::NoResults => "no_results",
            AppError::PersistedState(_) => "internal",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::NotFound(_) => "not_found",
            AppError::Busy => "busy",
            AppError::Storage(_) => "storage",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Remote { .. } => StatusCode::BAD_GATEWAY,
            AppError::NoResults | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Busy => StatusCode::CONFLICT,
            AppError::PersistedState(_) | AppError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::remote("Catalog request timed out")
        } else if err.is_decode() {
            AppError::remote(format!("Invalid catalog response: {}", err))
        } else {
            AppError::remote(format!("Catalog request failed: {}", err))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, kind = self.kind(), "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
