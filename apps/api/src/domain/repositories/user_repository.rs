use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::user::value_objects::{Email, Username};

/// User data for persistence
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: Email,
    pub username: Username,
    pub password_hash: String,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Repository trait for registered users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user; `Conflict` names `email` or `username`
    async fn create(&self, user: User) -> RepositoryResult<Uuid>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>>;

    /// Flag the user's email as confirmed
    async fn mark_verified(&self, user_id: Uuid) -> RepositoryResult<()>;

    /// Update user's last login timestamp
    async fn update_last_login(&self, user_id: Uuid) -> RepositoryResult<()>;
}
