// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory;
pub mod postgres_course_repository;
pub mod postgres_review_repository;
pub mod postgres_school_repository;
pub mod postgres_school_request_repository;
pub mod postgres_user_repository;

pub use in_memory::InMemoryStore;
pub use postgres_course_repository::PostgresCourseRepository;
pub use postgres_review_repository::PostgresReviewRepository;
pub use postgres_school_repository::PostgresSchoolRepository;
pub use postgres_school_request_repository::PostgresSchoolRequestRepository;
pub use postgres_user_repository::PostgresUserRepository;

use crate::domain::repositories::RepositoryError;

/// Translates a failed write into a `RepositoryError`
///
/// Unique violations become `Conflict`; `constraints` maps constraint names
/// to the field reported back to the client.
pub(crate) fn write_error(
    err: sqlx::Error,
    entity: &'static str,
    constraints: &[(&str, &'static str)],
) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let field = db_err
                .constraint()
                .and_then(|name| {
                    constraints
                        .iter()
                        .find(|(constraint, _)| *constraint == name)
                        .map(|(_, field)| *field)
                })
                .unwrap_or("value");
            return RepositoryError::Conflict { entity, field };
        }
    }
    RepositoryError::Database(err)
}
