use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Cache(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Outcome of a failed catalog call
///
/// Never reaches an HTTP client: the recommendation pipeline turns every
/// variant into "zero results for this stage", and the lookups turn it into
/// a fallback-catalog answer.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// No credential configured; no network call was attempted
    #[error("Catalog API key is not configured")]
    MissingCredential,

    #[error("Catalog request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog API returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Failed to parse catalog response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog request failed after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<CatalogError>,
    },
}

impl CatalogError {
    /// Whether the transport should spend another attempt on this failure
    ///
    /// Every non-OK status counts against the retry budget; only a missing
    /// credential fails immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::MissingCredential | CatalogError::Exhausted { .. } => false,
            CatalogError::Upstream { .. }
            | CatalogError::Timeout(_)
            | CatalogError::Http(_)
            | CatalogError::Parse(_) => true,
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let response = AppError::NotFound("movie 42".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::InvalidInput("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_retryability() {
        let unauthorized = CatalogError::Upstream {
            status: 401,
            body: String::new(),
        };
        let rate_limited = CatalogError::Upstream {
            status: 429,
            body: String::new(),
        };
        let unavailable = CatalogError::Upstream {
            status: 503,
            body: String::new(),
        };

        assert!(unauthorized.is_retryable());
        assert!(rate_limited.is_retryable());
        assert!(unavailable.is_retryable());
        assert!(CatalogError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(!CatalogError::MissingCredential.is_retryable());
        assert!(!CatalogError::Exhausted {
            attempts: 3,
            last: Box::new(unauthorized),
        }
        .is_retryable());
    }
}
