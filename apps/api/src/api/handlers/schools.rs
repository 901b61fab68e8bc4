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
use crate::domain::school::School;

/// Request body for creating or updating a school
///
/// Every field is optional at the JSON level so that missing fields are
/// reported per field rather than as a parse failure.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SchoolPayload {
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub website: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// School as returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct SchoolResponse {
    pub id: Uuid,
    pub short_name: String,
    pub long_name: String,
    pub website: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&School> for SchoolResponse {
    fn from(school: &School) -> Self {
        Self {
            id: school.id,
            short_name: school.short_name.clone(),
            long_name: school.long_name.clone(),
            website: school.website.clone(),
            city: school.city.clone(),
            state: school.state.clone(),
            country: school.country.clone(),
            created_at: school.created_at,
            updated_at: school.updated_at,
        }
    }
}

/// Validated school fields; location fields are `None` when omitted on update
struct SchoolFields {
    short_name: String,
    long_name: String,
    website: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl SchoolPayload {
    /// Creation requires the location; updates may leave it out
    fn validate(self, require_location: bool) -> Result<SchoolFields, ApiError> {
        let mut errors = FieldErrors::new();

        let short_name =
            errors.required_text("short_name", self.short_name, School::SHORT_NAME_MAX_LEN);
        let long_name = errors.required_text("long_name", self.long_name, School::TEXT_MAX_LEN);
        let website = errors.optional_text("website", self.website, School::TEXT_MAX_LEN);

        let mut location = |field: &str, value: Option<String>| {
            if require_location {
                errors.required_text(field, value, School::TEXT_MAX_LEN)
            } else {
                errors.optional_text(field, value, School::TEXT_MAX_LEN)
            }
        };
        let city = location("city", self.city);
        let state = location("state", self.state);
        let country = location("country", self.country);

        errors.finish()?;

        Ok(SchoolFields {
            short_name: short_name.unwrap_or_default(),
            long_name: long_name.unwrap_or_default(),
            website,
            city,
            state,
            country,
        })
    }
}

/// List all schools
///
/// GET /api/v1/school/
#[utoipa::path(
    get,
    path = "/api/v1/school/",
    responses((status = 200, description = "All schools under `data`")),
    tag = "school"
)]
pub async fn list_schools(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<SchoolResponse>>>, ApiError> {
    let schools = state.schools.list().await?;

    Ok(Json(Envelope::new(
        schools.iter().map(SchoolResponse::from).collect(),
    )))
}

/// Create a school
///
/// POST /api/v1/school/
#[utoipa::path(
    post,
    path = "/api/v1/school/",
    request_body = SchoolPayload,
    responses(
        (status = 201, description = "School created"),
        (status = 400, description = "Missing or invalid fields, or short_name taken")
    ),
    tag = "school"
)]
pub async fn create_school(
    State(state): State<AppState>,
    Payload(payload): Payload<SchoolPayload>,
) -> Result<(StatusCode, Json<Envelope<SchoolResponse>>), ApiError> {
    let fields = payload.validate(true)?;

    let now = Utc::now();
    let school = School {
        id: Uuid::new_v4(),
        short_name: fields.short_name,
        long_name: fields.long_name,
        website: fields.website.unwrap_or_default(),
        city: fields.city.unwrap_or_default(),
        state: fields.state.unwrap_or_default(),
        country: fields.country.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };

    state.schools.create(&school).await?;
    tracing::info!(short_name = %school.short_name, "School created");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(SchoolResponse::from(&school))),
    ))
}

/// Get a school by short name
///
/// GET /api/v1/school/:short_name/
#[utoipa::path(
    get,
    path = "/api/v1/school/{short_name}/",
    params(("short_name" = String, Path, description = "Unique short name of the school")),
    responses(
        (status = 200, description = "The school under `data`"),
        (status = 404, description = "No such school; body is `{\"data\": []}`")
    ),
    tag = "school"
)]
pub async fn get_school(
    State(state): State<AppState>,
    Path(short_name): Path<String>,
) -> Result<Json<Envelope<SchoolResponse>>, ApiError> {
    let school = state
        .schools
        .find_by_short_name(&short_name)
        .await?
        .ok_or_else(ApiError::not_found_empty)?;

    Ok(Json(Envelope::new(SchoolResponse::from(&school))))
}

/// Update a school
///
/// PUT /api/v1/school/:short_name/
///
/// `short_name` and `long_name` are required; omitted location fields keep
/// their stored values.
#[utoipa::path(
    put,
    path = "/api/v1/school/{short_name}/",
    params(("short_name" = String, Path, description = "Current short name of the school")),
    request_body = SchoolPayload,
    responses(
        (status = 200, description = "Updated school under `data`"),
        (status = 400, description = "Missing or invalid fields, or short_name taken"),
        (status = 404, description = "No such school; body is `{\"data\": []}`")
    ),
    tag = "school"
)]
pub async fn update_school(
    State(state): State<AppState>,
    Path(short_name): Path<String>,
    Payload(payload): Payload<SchoolPayload>,
) -> Result<Json<Envelope<SchoolResponse>>, ApiError> {
    let mut school = state
        .schools
        .find_by_short_name(&short_name)
        .await?
        .ok_or_else(ApiError::not_found_empty)?;

    let fields = payload.validate(false)?;

    school.short_name = fields.short_name;
    school.long_name = fields.long_name;
    if let Some(website) = fields.website {
        school.website = website;
    }
    if let Some(city) = fields.city {
        school.city = city;
    }
    if let Some(region) = fields.state {
        school.state = region;
    }
    if let Some(country) = fields.country {
        school.country = country;
    }
    school.updated_at = Utc::now();

    state.schools.update(&school).await.map_err(|e| match e {
        RepositoryError::NotFound { .. } => ApiError::not_found_empty(),
        other => ApiError::from(other),
    })?;

    Ok(Json(Envelope::new(SchoolResponse::from(&school))))
}

/// Delete a school and all of its reviews
///
/// DELETE /api/v1/school/:short_name/
#[utoipa::path(
    delete,
    path = "/api/v1/school/{short_name}/",
    params(("short_name" = String, Path, description = "Unique short name of the school")),
    responses(
        (status = 204, description = "School and its reviews deleted"),
        (status = 404, description = "No such school; body is `{\"data\": []}`")
    ),
    tag = "school"
)]
pub async fn delete_school(
    State(state): State<AppState>,
    Path(short_name): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .schools
        .delete_by_short_name(&short_name)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound { .. } => ApiError::not_found_empty(),
            other => ApiError::from(other),
        })?;

    tracing::info!(short_name = %short_name, "School deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> SchoolPayload {
        SchoolPayload {
            short_name: Some("TEST".into()),
            long_name: Some("The Test University".into()),
            website: Some("https://test.university.edu".into()),
            city: Some("Test City".into()),
            state: Some("Test State".into()),
            country: Some("Test Country".into()),
        }
    }

    #[test]
    fn create_requires_location() {
        let payload = SchoolPayload {
            city: None,
            ..full_payload()
        };
        assert!(payload.validate(true).is_err());
    }

    #[test]
    fn update_allows_missing_location() {
        let payload = SchoolPayload {
            city: None,
            state: None,
            country: None,
            ..full_payload()
        };
        let fields = payload.validate(false).expect("valid update");
        assert!(fields.city.is_none());
        assert_eq!(fields.short_name, "TEST");
    }

    #[test]
    fn short_name_length_is_bounded() {
        let payload = SchoolPayload {
            short_name: Some("X".repeat(School::SHORT_NAME_MAX_LEN + 1)),
            ..full_payload()
        };
        assert!(payload.validate(true).is_err());
    }
}
