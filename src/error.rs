use thiserror::Error;

// Import Axum types for HTTP response conversion
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// The custom error type for the storefront.
///
/// Every failure the dialogue engine or its collaborators can produce maps to
/// exactly one variant, so the dispatcher can decide on logging and the HTTP
/// layer on a status code without inspecting messages.
#[derive(Debug, Error)]
pub enum Error {
    /// The inbound event does not fit the shape expected in the current state.
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// The catalog backend could not be reached (connect, timeout, TLS).
    #[error("Catalog backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The catalog backend answered with a non-success status or an
    /// unexpected payload.
    #[error("Catalog backend error: {0}")]
    BackendError(String),

    /// The catalog backend reported the resource as unknown.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The persisted dialogue state is not one of the recognised names.
    #[error("Unknown dialogue state: {0}")]
    UnknownState(String),

    /// The session store could not be read or written.
    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// An internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, Error>` to simplify function signatures.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Stable machine-readable code used in HTTP error bodies and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Error::MalformedEvent(_) => "MALFORMED_EVENT",
            Error::BackendUnavailable(_) => "BACKEND_UNAVAILABLE",
            Error::BackendError(_) => "BACKEND_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::UnknownState(_) => "UNKNOWN_STATE",
            Error::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Error::MalformedEvent(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::BackendError(_) => StatusCode::BAD_GATEWAY,
            Error::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::UnknownState(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Transport failures become `BackendUnavailable`; anything that made it to
/// a response (status, decode) is a `BackendError`.
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            Error::BackendUnavailable(err.to_string())
        } else {
            Error::BackendError(err.to_string())
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::StoreUnavailable(err.to_string())
    }
}

/// Convert custom Error to HTTP response
///
/// Infrastructure failures are reported with a generic message so backend
/// details never leak to the channel bridge.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = match &self {
            Error::MalformedEvent(msg) | Error::NotFound(msg) => msg.clone(),
            Error::BackendUnavailable(_) => "Catalog backend unavailable".to_string(),
            Error::BackendError(_) => "Catalog backend error".to_string(),
            Error::StoreUnavailable(_) => "Session store unavailable".to_string(),
            Error::UnknownState(_) | Error::Config(_) | Error::Internal(_) => {
                "Internal error".to_string()
            }
        };

        let body = serde_json::json!({
            "error": message,
            "code": self.code(),
        });

        (self.status(), Json(body)).into_response()
    }
}
