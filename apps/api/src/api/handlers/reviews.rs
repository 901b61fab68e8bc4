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
use crate::domain::course::Course;
use crate::domain::repositories::RepositoryError;
use crate::domain::review::{DeliveryMethod, Grade, Review, Term};
use crate::domain::school::school::SchoolIdentifier;
use crate::domain::school::School;

pub const SCHOOL_NOT_FOUND: &str = "School not found with the provided identifier.";
pub const COURSE_NOT_FOUND: &str = "Course not found with the provided identifier.";
pub const REVIEW_NOT_FOUND: &str = "Review not found.";

/// Request body for creating or replacing a review
///
/// `school` accepts either the school's UUID or its short name.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReviewPayload {
    pub school: Option<String>,
    pub course: Option<Uuid>,
    pub review_text: Option<String>,
    pub term: Option<String>,
    pub grade_received: Option<String>,
    pub delivery_method: Option<String>,
    pub helpful_count: Option<i32>,
    pub year_taken: Option<i32>,
    pub textbook_required: Option<bool>,
    pub recommended: Option<bool>,
}

/// Review as returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub school: Option<Uuid>,
    pub course: Option<Uuid>,
    pub review_text: String,
    pub term: Term,
    pub grade_received: Grade,
    pub delivery_method: DeliveryMethod,
    pub helpful_count: i32,
    pub year_taken: i32,
    pub textbook_required: bool,
    pub recommended: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id,
            school: review.school_id,
            course: review.course_id,
            review_text: review.review_text.clone(),
            term: review.term,
            grade_received: review.grade_received,
            delivery_method: review.delivery_method,
            helpful_count: review.helpful_count,
            year_taken: review.year_taken,
            textbook_required: review.textbook_required,
            recommended: review.recommended,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

/// Validated scalar fields of a review payload
struct ReviewFields {
    review_text: String,
    term: Term,
    grade_received: Grade,
    delivery_method: DeliveryMethod,
    helpful_count: Option<i32>,
    year_taken: Option<i32>,
    textbook_required: Option<bool>,
    recommended: Option<bool>,
}

/// Payload split into validated fields and the references still to resolve
struct ValidatedReview {
    fields: ReviewFields,
    school: Option<String>,
    course: Option<Uuid>,
}

impl ReviewPayload {
    fn validate(self) -> Result<ValidatedReview, ApiError> {
        let mut errors = FieldErrors::new();

        let review_text =
            errors.required_text("review_text", self.review_text, Review::MAX_TEXT_LEN);
        let term = errors.required_choice::<Term>("term", self.term);
        let grade_received = errors.required_choice::<Grade>("grade_received", self.grade_received);
        let delivery_method =
            errors.required_choice::<DeliveryMethod>("delivery_method", self.delivery_method);

        errors.finish()?;

        match (review_text, term, grade_received, delivery_method) {
            (Some(review_text), Some(term), Some(grade_received), Some(delivery_method)) => {
                Ok(ValidatedReview {
                    fields: ReviewFields {
                        review_text,
                        term,
                        grade_received,
                        delivery_method,
                        helpful_count: self.helpful_count,
                        year_taken: self.year_taken,
                        textbook_required: self.textbook_required,
                        recommended: self.recommended,
                    },
                    school: self.school,
                    course: self.course,
                })
            }
            _ => Err(ApiError::bad_request("Invalid review")),
        }
    }
}

/// Looks a school up by UUID or short name
async fn resolve_school(state: &AppState, identifier: &str) -> Result<School, ApiError> {
    let school = match SchoolIdentifier::parse(identifier) {
        SchoolIdentifier::Id(id) => state.schools.find_by_id(id).await?,
        SchoolIdentifier::ShortName(short_name) => {
            state.schools.find_by_short_name(&short_name).await?
        }
    };

    school.ok_or_else(|| {
        tracing::debug!(identifier = %identifier, "Review references unknown school");
        ApiError::not_found(SCHOOL_NOT_FOUND)
    })
}

async fn resolve_course(state: &AppState, id: Uuid) -> Result<Course, ApiError> {
    state
        .courses
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(COURSE_NOT_FOUND))
}

/// Review ids that are not UUIDs cannot exist, so they are 404 rather than 400
fn parse_review_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(REVIEW_NOT_FOUND))
}

fn map_review_not_found(err: RepositoryError) -> ApiError {
    match err {
        RepositoryError::NotFound { .. } => ApiError::not_found(REVIEW_NOT_FOUND),
        other => ApiError::from(other),
    }
}

/// List all reviews
///
/// GET /api/v1/reviews/
#[utoipa::path(
    get,
    path = "/api/v1/reviews/",
    responses((status = 200, description = "All reviews under `data`, oldest first")),
    tag = "reviews"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<ReviewResponse>>>, ApiError> {
    let reviews = state.reviews.list().await?;

    Ok(Json(Envelope::new(
        reviews.iter().map(ReviewResponse::from).collect(),
    )))
}

/// List the reviews of one school
///
/// GET /api/v1/school/:short_name/reviews/
#[utoipa::path(
    get,
    path = "/api/v1/school/{short_name}/reviews/",
    params(("short_name" = String, Path, description = "Unique short name of the school")),
    responses(
        (status = 200, description = "The school's reviews under `data`, oldest first"),
        (status = 404, description = "No such school")
    ),
    tag = "reviews"
)]
pub async fn list_school_reviews(
    State(state): State<AppState>,
    Path(short_name): Path<String>,
) -> Result<Json<Envelope<Vec<ReviewResponse>>>, ApiError> {
    let school = state
        .schools
        .find_by_short_name(&short_name)
        .await?
        .ok_or_else(|| ApiError::not_found("School not found."))?;

    let reviews = state.reviews.list_by_school(school.id).await?;

    Ok(Json(Envelope::new(
        reviews.iter().map(ReviewResponse::from).collect(),
    )))
}

/// Create a review
///
/// POST /api/v1/reviews/
#[utoipa::path(
    post,
    path = "/api/v1/reviews/",
    request_body = ReviewPayload,
    responses(
        (status = 201, description = "Review created"),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "Referenced school or course does not exist")
    ),
    tag = "reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    Payload(payload): Payload<ReviewPayload>,
) -> Result<(StatusCode, Json<Envelope<ReviewResponse>>), ApiError> {
    let ValidatedReview {
        fields,
        school,
        course,
    } = payload.validate()?;

    let school = match school {
        Some(identifier) => Some(resolve_school(&state, &identifier).await?),
        None => None,
    };
    let course = match course {
        Some(id) => Some(resolve_course(&state, id).await?),
        None => None,
    };

    let now = Utc::now();
    let review = Review {
        id: Uuid::new_v4(),
        school_id: school.as_ref().map(|s| s.id),
        course_id: course.as_ref().map(|c| c.id),
        review_text: fields.review_text,
        term: fields.term,
        grade_received: fields.grade_received,
        delivery_method: fields.delivery_method,
        helpful_count: fields
            .helpful_count
            .unwrap_or(Review::DEFAULT_HELPFUL_COUNT),
        year_taken: fields.year_taken.unwrap_or_else(Review::default_year_taken),
        textbook_required: fields
            .textbook_required
            .unwrap_or(Review::DEFAULT_TEXTBOOK_REQUIRED),
        recommended: fields.recommended.unwrap_or(Review::DEFAULT_RECOMMENDED),
        created_at: now,
        updated_at: now,
    };

    state.reviews.create(&review).await?;
    tracing::info!(
        review_id = %review.id,
        school = school.as_ref().map(|s| s.short_name.as_str()).unwrap_or("-"),
        course = %course.as_ref().map(Course::label).unwrap_or_default(),
        "Review created"
    );

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(ReviewResponse::from(&review))),
    ))
}

/// Get a review by ID
///
/// GET /api/v1/reviews/:review_id/
#[utoipa::path(
    get,
    path = "/api/v1/reviews/{review_id}/",
    params(("review_id" = Uuid, Path, description = "Review UUID")),
    responses(
        (status = 200, description = "The review under `data`"),
        (status = 404, description = "No such review")
    ),
    tag = "reviews"
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> Result<Json<Envelope<ReviewResponse>>, ApiError> {
    let id = parse_review_id(&review_id)?;
    let review = state
        .reviews
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(REVIEW_NOT_FOUND))?;

    Ok(Json(Envelope::new(ReviewResponse::from(&review))))
}

/// Replace a review
///
/// PUT /api/v1/reviews/:review_id/
///
/// Required fields are validated as on creation; omitted optional fields,
/// including `school` and `course`, keep their stored values.
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{review_id}/",
    params(("review_id" = Uuid, Path, description = "Review UUID")),
    request_body = ReviewPayload,
    responses(
        (status = 200, description = "Updated review under `data`"),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "No such review, or referenced school/course does not exist")
    ),
    tag = "reviews"
)]
pub async fn update_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    Payload(payload): Payload<ReviewPayload>,
) -> Result<Json<Envelope<ReviewResponse>>, ApiError> {
    let id = parse_review_id(&review_id)?;
    let mut review = state
        .reviews
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(REVIEW_NOT_FOUND))?;

    let ValidatedReview {
        fields,
        school,
        course,
    } = payload.validate()?;

    if let Some(identifier) = school {
        review.school_id = Some(resolve_school(&state, &identifier).await?.id);
    }
    if let Some(course_id) = course {
        review.course_id = Some(resolve_course(&state, course_id).await?.id);
    }

    review.review_text = fields.review_text;
    review.term = fields.term;
    review.grade_received = fields.grade_received;
    review.delivery_method = fields.delivery_method;
    if let Some(helpful_count) = fields.helpful_count {
        review.helpful_count = helpful_count;
    }
    if let Some(year_taken) = fields.year_taken {
        review.year_taken = year_taken;
    }
    if let Some(textbook_required) = fields.textbook_required {
        review.textbook_required = textbook_required;
    }
    if let Some(recommended) = fields.recommended {
        review.recommended = recommended;
    }
    review.updated_at = Utc::now();

    state
        .reviews
        .update(&review)
        .await
        .map_err(map_review_not_found)?;

    Ok(Json(Envelope::new(ReviewResponse::from(&review))))
}

/// Delete a review
///
/// DELETE /api/v1/reviews/:review_id/
#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{review_id}/",
    params(("review_id" = Uuid, Path, description = "Review UUID")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 404, description = "No such review")
    ),
    tag = "reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_review_id(&review_id)?;
    state
        .reviews
        .delete(id)
        .await
        .map_err(map_review_not_found)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::errors::ErrorBody;

    fn valid_payload() -> ReviewPayload {
        ReviewPayload {
            review_text: Some("This is a sample review.".into()),
            term: Some("Spring".into()),
            grade_received: Some("A".into()),
            delivery_method: Some("Online".into()),
            ..ReviewPayload::default()
        }
    }

    #[test]
    fn valid_payload_passes() {
        let validated = valid_payload().validate().expect("valid review");
        assert_eq!(validated.fields.term, Term::Spring);
        assert_eq!(validated.fields.delivery_method, DeliveryMethod::Online);
        assert!(validated.school.is_none());
    }

    #[test]
    fn invalid_term_is_a_field_error() {
        let payload = ReviewPayload {
            term: Some("Invalid Term".into()),
            ..valid_payload()
        };

        let err = payload.validate().err().expect("invalid review");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        match err.body {
            ErrorBody::Fields(fields) => {
                assert_eq!(
                    fields.get("term").unwrap()[0],
                    "\"Invalid Term\" is not a valid choice."
                );
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn school_only_payload_is_rejected() {
        let payload = ReviewPayload {
            school: Some("TS".into()),
            ..ReviewPayload::default()
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn review_text_over_limit_is_rejected() {
        let payload = ReviewPayload {
            review_text: Some("a".repeat(Review::MAX_TEXT_LEN + 1)),
            ..valid_payload()
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn non_uuid_review_id_is_not_found() {
        let err = parse_review_id("not-a-uuid").unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
