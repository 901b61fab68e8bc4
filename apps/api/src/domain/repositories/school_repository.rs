use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::school::School;

/// Repository trait for schools
#[async_trait]
pub trait SchoolRepository: Send + Sync {
    /// Insert a new school; `Conflict` if the short name is taken
    async fn create(&self, school: &School) -> RepositoryResult<()>;

    /// All schools ordered by short name
    async fn list(&self) -> RepositoryResult<Vec<School>>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<School>>;

    async fn find_by_short_name(&self, short_name: &str) -> RepositoryResult<Option<School>>;

    /// Overwrite the row with `school.id`; `NotFound` if it vanished
    async fn update(&self, school: &School) -> RepositoryResult<()>;

    /// Delete a school and, through the cascade, all of its reviews
    async fn delete_by_short_name(&self, short_name: &str) -> RepositoryResult<()>;
}
