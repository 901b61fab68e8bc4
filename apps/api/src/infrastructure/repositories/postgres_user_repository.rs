use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::write_error;
use crate::domain::repositories::user_repository::{User, UserRepository};
use crate::domain::repositories::{RepositoryError, RepositoryResult};
use crate::domain::user::value_objects::{Email, Username};

const ENTITY: &str = "user";
const CONSTRAINTS: &[(&str, &str)] = &[
    ("users_email_key", "email"),
    ("users_username_key", "username"),
];

#[derive(sqlx::FromRow)]
struct UserRecord {
    id: Uuid,
    email: String,
    username: String,
    password_hash: String,
    is_verified: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

impl TryFrom<UserRecord> for User {
    type Error = RepositoryError;

    fn try_from(r: UserRecord) -> Result<Self, Self::Error> {
        let email = Email::new(&r.email)
            .map_err(|e| RepositoryError::Database(sqlx::Error::Decode(e.into())))?;
        let username = Username::new(&r.username)
            .map_err(|e| RepositoryError::Database(sqlx::Error::Decode(e.into())))?;

        Ok(User {
            id: r.id,
            email,
            username,
            password_hash: r.password_hash,
            is_verified: r.is_verified,
            is_active: r.is_active,
            created_at: r.created_at,
            last_login: r.last_login,
        })
    }
}

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn touch(&self, user_id: Uuid, statement: &'static str) -> RepositoryResult<()> {
        let result = sqlx::query(statement)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { entity: ENTITY });
        }

        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> RepositoryResult<Uuid> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, username, password_hash, is_verified, is_active, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(user.email.as_str())
        .bind(user.username.as_str())
        .bind(&user.password_hash)
        .bind(user.is_verified)
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, ENTITY, CONSTRAINTS))?;

        Ok(user.id)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, username, password_hash, is_verified, is_active,
                   created_at, last_login
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, username, password_hash, is_verified, is_active,
                   created_at, last_login
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn mark_verified(&self, user_id: Uuid) -> RepositoryResult<()> {
        self.touch(
            user_id,
            "UPDATE users SET is_verified = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .await
    }

    async fn update_last_login(&self, user_id: Uuid) -> RepositoryResult<()> {
        self.touch(
            user_id,
            "UPDATE users SET last_login = NOW(), updated_at = NOW() WHERE id = $1",
        )
        .await
    }
}
