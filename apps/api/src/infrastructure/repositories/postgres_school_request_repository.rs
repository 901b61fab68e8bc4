use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::write_error;
use crate::domain::repositories::{RepositoryError, RepositoryResult, SchoolRequestRepository};
use crate::domain::school::SchoolRequest;

const ENTITY: &str = "school request";
const CONSTRAINTS: &[(&str, &str)] = &[("school_requests_school_name_key", "school_name")];

#[derive(sqlx::FromRow)]
struct SchoolRequestRecord {
    id: Uuid,
    school_name: String,
    website: String,
    created_at: DateTime<Utc>,
}

impl From<SchoolRequestRecord> for SchoolRequest {
    fn from(r: SchoolRequestRecord) -> Self {
        SchoolRequest {
            id: r.id,
            school_name: r.school_name,
            website: r.website,
            created_at: r.created_at,
        }
    }
}

/// PostgreSQL implementation of SchoolRequestRepository
pub struct PostgresSchoolRequestRepository {
    pool: PgPool,
}

impl PostgresSchoolRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchoolRequestRepository for PostgresSchoolRequestRepository {
    async fn create(&self, request: &SchoolRequest) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO school_requests (id, school_name, website, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(request.id)
        .bind(&request.school_name)
        .bind(&request.website)
        .bind(request.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, ENTITY, CONSTRAINTS))?;

        Ok(())
    }

    async fn list(&self) -> RepositoryResult<Vec<SchoolRequest>> {
        let rows = sqlx::query_as::<_, SchoolRequestRecord>(
            r#"
            SELECT id, school_name, website, created_at
            FROM school_requests
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SchoolRequest::from).collect())
    }

    async fn find_by_school_name(
        &self,
        school_name: &str,
    ) -> RepositoryResult<Option<SchoolRequest>> {
        let row = sqlx::query_as::<_, SchoolRequestRecord>(
            r#"
            SELECT id, school_name, website, created_at
            FROM school_requests
            WHERE school_name = $1
            "#,
        )
        .bind(school_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SchoolRequest::from))
    }

    async fn delete_by_school_name(&self, school_name: &str) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM school_requests WHERE school_name = $1")
            .bind(school_name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { entity: ENTITY });
        }

        Ok(())
    }
}
