use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::course::Course;

/// Repository trait for courses
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create(&self, course: &Course) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Course>>;
}
