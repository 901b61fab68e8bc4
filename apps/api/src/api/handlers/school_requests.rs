use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::Payload;
use crate::api::response::Envelope;
use crate::api::state::AppState;
use crate::api::validation::FieldErrors;
use crate::domain::repositories::RepositoryError;
use crate::domain::school::SchoolRequest;

/// Request body for suggesting a school
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SchoolRequestPayload {
    pub school_name: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SchoolRequestResponse {
    pub id: Uuid,
    pub school_name: String,
    pub website: String,
    pub created_at: DateTime<Utc>,
}

impl From<&SchoolRequest> for SchoolRequestResponse {
    fn from(request: &SchoolRequest) -> Self {
        Self {
            id: request.id,
            school_name: request.school_name.clone(),
            website: request.website.clone(),
            created_at: request.created_at,
        }
    }
}

/// List all school requests
///
/// GET /api/v1/request-school/
#[utoipa::path(
    get,
    path = "/api/v1/request-school/",
    responses((status = 200, description = "All school requests under `data`, oldest first")),
    tag = "request-school"
)]
pub async fn list_school_requests(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<SchoolRequestResponse>>>, ApiError> {
    let requests = state.school_requests.list().await?;

    Ok(Json(Envelope::new(
        requests.iter().map(SchoolRequestResponse::from).collect(),
    )))
}

/// Request that a school be added
///
/// POST /api/v1/request-school/
#[utoipa::path(
    post,
    path = "/api/v1/request-school/",
    request_body = SchoolRequestPayload,
    responses(
        (status = 201, description = "Request recorded"),
        (status = 400, description = "Missing school_name, or already requested")
    ),
    tag = "request-school"
)]
pub async fn create_school_request(
    State(state): State<AppState>,
    Payload(payload): Payload<SchoolRequestPayload>,
) -> Result<(StatusCode, Json<Envelope<SchoolRequestResponse>>), ApiError> {
    let mut errors = FieldErrors::new();
    let school_name = errors.required_text(
        "school_name",
        payload.school_name,
        SchoolRequest::TEXT_MAX_LEN,
    );
    let website = errors.optional_text("website", payload.website, SchoolRequest::TEXT_MAX_LEN);
    errors.finish()?;

    let request = SchoolRequest {
        id: Uuid::new_v4(),
        school_name: school_name.unwrap_or_default(),
        website: website.unwrap_or_default(),
        created_at: Utc::now(),
    };

    state.school_requests.create(&request).await?;
    tracing::info!(school_name = %request.school_name, "School requested");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(SchoolRequestResponse::from(&request))),
    ))
}

/// Get a school request by school name
///
/// GET /api/v1/request-school/:school_name/
#[utoipa::path(
    get,
    path = "/api/v1/request-school/{school_name}/",
    params(("school_name" = String, Path, description = "Requested school name")),
    responses(
        (status = 200, description = "The request under `data`"),
        (status = 404, description = "No such request; body is `{\"data\": []}`")
    ),
    tag = "request-school"
)]
pub async fn get_school_request(
    State(state): State<AppState>,
    Path(school_name): Path<String>,
) -> Result<Json<Envelope<SchoolRequestResponse>>, ApiError> {
    let request = state
        .school_requests
        .find_by_school_name(&school_name)
        .await?
        .ok_or_else(ApiError::not_found_empty)?;

    Ok(Json(Envelope::new(SchoolRequestResponse::from(&request))))
}

/// Withdraw a school request
///
/// DELETE /api/v1/request-school/:school_name/
#[utoipa::path(
    delete,
    path = "/api/v1/request-school/{school_name}/",
    params(("school_name" = String, Path, description = "Requested school name")),
    responses(
        (status = 204, description = "Request deleted"),
        (status = 404, description = "No such request; body is `{\"data\": []}`")
    ),
    tag = "request-school"
)]
pub async fn delete_school_request(
    State(state): State<AppState>,
    Path(school_name): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .school_requests
        .delete_by_school_name(&school_name)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound { .. } => ApiError::not_found_empty(),
            other => ApiError::from(other),
        })?;

    Ok(StatusCode::NO_CONTENT)
}
