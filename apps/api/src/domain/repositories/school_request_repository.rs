use async_trait::async_trait;

use super::RepositoryResult;
use crate::domain::school::SchoolRequest;

/// Repository trait for school-addition requests, keyed by school name
#[async_trait]
pub trait SchoolRequestRepository: Send + Sync {
    /// Insert a request; `Conflict` if the school name was already requested
    async fn create(&self, request: &SchoolRequest) -> RepositoryResult<()>;

    /// All requests, oldest first
    async fn list(&self) -> RepositoryResult<Vec<SchoolRequest>>;

    async fn find_by_school_name(&self, school_name: &str)
        -> RepositoryResult<Option<SchoolRequest>>;

    async fn delete_by_school_name(&self, school_name: &str) -> RepositoryResult<()>;
}
