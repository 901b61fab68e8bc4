// OpenAPI document, served at /swagger.json and rendered by Swagger UI and ReDoc

use utoipa::OpenApi;

use crate::api::handlers::{auth, health, reviews, school_requests, schools};
use crate::domain::review::{DeliveryMethod, Grade, Term};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "My Course Evaluation API",
        version = "1.0.0",
        description = "Reviews of college courses, keyed by school and course",
        contact(email = "contact@mycourseevaluation.com"),
        license(name = "MIT License")
    ),
    paths(
        health::health_check,
        schools::list_schools,
        schools::create_school,
        schools::get_school,
        schools::update_school,
        schools::delete_school,
        reviews::list_reviews,
        reviews::list_school_reviews,
        reviews::create_review,
        reviews::get_review,
        reviews::update_review,
        reviews::delete_review,
        school_requests::list_school_requests,
        school_requests::create_school_request,
        school_requests::get_school_request,
        school_requests::delete_school_request,
        auth::register,
        auth::verify_email,
        auth::login,
    ),
    components(schemas(
        schools::SchoolPayload,
        schools::SchoolResponse,
        reviews::ReviewPayload,
        reviews::ReviewResponse,
        school_requests::SchoolRequestPayload,
        school_requests::SchoolRequestResponse,
        auth::RegisterRequest,
        auth::RegisterResponse,
        auth::VerifyEmailResponse,
        auth::LoginRequest,
        auth::LoginResponse,
        auth::TokensResponse,
        Term,
        Grade,
        DeliveryMethod,
    )),
    tags(
        (name = "school", description = "Schools whose courses can be reviewed"),
        (name = "reviews", description = "Course reviews"),
        (name = "request-school", description = "Requests to add a school"),
        (name = "auth", description = "Registration, email verification and login"),
        (name = "health", description = "Liveness probe"),
    )
)]
pub struct ApiDoc;
