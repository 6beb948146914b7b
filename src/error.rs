use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Missing or malformed process configuration (environment, service binding).
    /// Display is the bare message: callers match on some of these texts.
    #[error("{0}")]
    Config(String),

    #[error("Upstream returned {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("{0}")]
    NotFound(String),

    /// An external response had an unexpected shape.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

// Every pipeline failure collapses to a 500 with an {"error": ...} envelope,
// regardless of kind. Callers cannot distinguish a bad binding from an
// upstream outage via the status code; that is the documented contract.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Pipeline error: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

// Implement alias for Result to simplify usage
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_bare_message() {
        let err = AppError::Config("VCAP_SERVICES environment variable is not set".into());
        assert_eq!(
            err.to_string(),
            "VCAP_SERVICES environment variable is not set"
        );
    }

    #[test]
    fn upstream_error_carries_status() {
        let err = AppError::Upstream {
            status: StatusCode::BAD_GATEWAY,
            body: "boom".into(),
        };
        assert!(err.to_string().contains("502"));
    }
}
