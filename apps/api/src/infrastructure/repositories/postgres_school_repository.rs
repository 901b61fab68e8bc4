use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::write_error;
use crate::domain::repositories::{RepositoryError, RepositoryResult, SchoolRepository};
use crate::domain::school::School;

const ENTITY: &str = "school";
const CONSTRAINTS: &[(&str, &str)] = &[("schools_short_name_key", "short_name")];

#[derive(sqlx::FromRow)]
struct SchoolRecord {
    id: Uuid,
    short_name: String,
    long_name: String,
    website: String,
    city: String,
    state: String,
    country: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SchoolRecord> for School {
    fn from(r: SchoolRecord) -> Self {
        School {
            id: r.id,
            short_name: r.short_name,
            long_name: r.long_name,
            website: r.website,
            city: r.city,
            state: r.state,
            country: r.country,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL implementation of SchoolRepository
pub struct PostgresSchoolRepository {
    pool: PgPool,
}

impl PostgresSchoolRepository {
    /// Creates a new PostgresSchoolRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchoolRepository for PostgresSchoolRepository {
    async fn create(&self, school: &School) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO schools (
                id, short_name, long_name, website, city, state, country,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(school.id)
        .bind(&school.short_name)
        .bind(&school.long_name)
        .bind(&school.website)
        .bind(&school.city)
        .bind(&school.state)
        .bind(&school.country)
        .bind(school.created_at)
        .bind(school.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, ENTITY, CONSTRAINTS))?;

        Ok(())
    }

    async fn list(&self) -> RepositoryResult<Vec<School>> {
        let rows = sqlx::query_as::<_, SchoolRecord>(
            r#"
            SELECT id, short_name, long_name, website, city, state, country,
                   created_at, updated_at
            FROM schools
            ORDER BY short_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(School::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<School>> {
        let row = sqlx::query_as::<_, SchoolRecord>(
            r#"
            SELECT id, short_name, long_name, website, city, state, country,
                   created_at, updated_at
            FROM schools
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(School::from))
    }

    async fn find_by_short_name(&self, short_name: &str) -> RepositoryResult<Option<School>> {
        let row = sqlx::query_as::<_, SchoolRecord>(
            r#"
            SELECT id, short_name, long_name, website, city, state, country,
                   created_at, updated_at
            FROM schools
            WHERE short_name = $1
            "#,
        )
        .bind(short_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(School::from))
    }

    async fn update(&self, school: &School) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE schools
            SET short_name = $2, long_name = $3, website = $4,
                city = $5, state = $6, country = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(school.id)
        .bind(&school.short_name)
        .bind(&school.long_name)
        .bind(&school.website)
        .bind(&school.city)
        .bind(&school.state)
        .bind(&school.country)
        .bind(school.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, ENTITY, CONSTRAINTS))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { entity: ENTITY });
        }

        Ok(())
    }

    async fn delete_by_short_name(&self, short_name: &str) -> RepositoryResult<()> {
        // reviews go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM schools WHERE short_name = $1")
            .bind(short_name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { entity: ENTITY });
        }

        Ok(())
    }
}
