// Repository ports
// Each trait has a PostgreSQL adapter and an in-memory adapter in
// crate::infrastructure::repositories

pub mod course_repository;
pub mod review_repository;
pub mod school_repository;
pub mod school_request_repository;
pub mod user_repository;

pub use course_repository::CourseRepository;
pub use review_repository::ReviewRepository;
pub use school_repository::SchoolRepository;
pub use school_request_repository::SchoolRequestRepository;
pub use user_repository::{User, UserRepository};

use thiserror::Error;

/// Errors surfaced by every repository implementation
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No row matched the given key
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A unique constraint rejected the write; `field` names the column
    #[error("{entity} with this {field} already exists")]
    Conflict {
        entity: &'static str,
        field: &'static str,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
