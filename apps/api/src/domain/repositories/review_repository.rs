use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::review::Review;

/// Repository trait for reviews
///
/// Listings are ordered oldest first.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: &Review) -> RepositoryResult<()>;

    async fn list(&self) -> RepositoryResult<Vec<Review>>;

    async fn list_by_school(&self, school_id: Uuid) -> RepositoryResult<Vec<Review>>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Review>>;

    /// Overwrite the row with `review.id`; `NotFound` if it vanished
    async fn update(&self, review: &Review) -> RepositoryResult<()>;

    /// Hard delete; `NotFound` if no such review
    async fn delete(&self, id: Uuid) -> RepositoryResult<()>;
}
