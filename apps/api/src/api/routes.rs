use axum::{
    response::Redirect,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::docs::ApiDoc;
use crate::api::errors::ApiError;
use crate::api::handlers::{auth, health, reviews, school_requests, schools};
use crate::api::state::AppState;

/// Builds the full application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // School routes
        .route(
            "/school/",
            get(schools::list_schools).post(schools::create_school),
        )
        .route(
            "/school/:short_name/",
            get(schools::get_school)
                .put(schools::update_school)
                .delete(schools::delete_school),
        )
        .route(
            "/school/:short_name/reviews/",
            get(reviews::list_school_reviews),
        )
        // Review routes
        .route(
            "/reviews/",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/reviews/:review_id/",
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
        // School request routes
        .route(
            "/request-school/",
            get(school_requests::list_school_requests)
                .post(school_requests::create_school_request),
        )
        .route(
            "/request-school/:school_name/",
            get(school_requests::get_school_request)
                .delete(school_requests::delete_school_request),
        )
        // Auth routes
        .route("/auth/register/", post(auth::register))
        .route("/auth/email-verify/", get(auth::verify_email))
        .route("/auth/login/", post(auth::login));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/", get(|| async { Redirect::temporary("/swagger-ui/") }))
        .merge(SwaggerUi::new("/swagger-ui").url("/swagger.json", ApiDoc::openapi()))
        .merge(Redoc::with_url("/redoc/", ApiDoc::openapi()))
        .nest("/api/v1", api)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Unmatched paths get the same `{"error": ...}` envelope as every other 404
async fn not_found() -> ApiError {
    ApiError::not_found("Not found.")
}
