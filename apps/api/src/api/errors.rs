use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::api::validation::FieldErrors;
use crate::domain::repositories::RepositoryError;

/// Body shapes an error response can take
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// `{"error": "<message>"}`
    Message(String),
    /// `{"error": {"<field>": ["<message>", ...]}}`
    Fields(FieldErrors),
    /// `{"data": []}`, used by lookups keyed on a name
    EmptyData,
}

/// API error type with HTTP status code and body
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    /// Creates a new API error carrying a message
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody::Message(message.into()),
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 400 Bad Request error with per-field messages
    pub fn validation(errors: FieldErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody::Fields(errors),
        }
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 404 Not Found error whose body is `{"data": []}`
    pub fn not_found_empty() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorBody::EmptyData,
        }
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.body {
            ErrorBody::Message(message) => json!({ "error": message }),
            ErrorBody::Fields(fields) => json!({ "error": fields }),
            ErrorBody::EmptyData => json!({ "data": [] }),
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } => Self::not_found(capitalize(&err.to_string())),
            RepositoryError::Conflict { field, .. } => {
                let message = capitalize(&err.to_string());
                Self::validation(FieldErrors::single(field, message))
            }
            RepositoryError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                Self::internal_server_error("Internal server error")
            }
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn message_body() {
        let (status, body) = body_json(ApiError::not_found("Review not found.")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Review not found." }));
    }

    #[tokio::test]
    async fn empty_data_body() {
        let (status, body) = body_json(ApiError::not_found_empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "data": [] }));
    }

    #[tokio::test]
    async fn conflict_becomes_field_error() {
        let err = ApiError::from(RepositoryError::Conflict {
            entity: "school",
            field: "short_name",
        });
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "error": { "short_name": ["School with this short_name already exists."] } })
        );
    }

    #[tokio::test]
    async fn database_error_hides_details() {
        let err = ApiError::from(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }
}
