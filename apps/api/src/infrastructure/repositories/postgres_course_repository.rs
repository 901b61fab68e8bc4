use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::course::Course;
use crate::domain::repositories::{CourseRepository, RepositoryResult};

/// PostgreSQL implementation of CourseRepository
pub struct PostgresCourseRepository {
    pool: PgPool,
}

impl PostgresCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn create(&self, course: &Course) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO courses (id, subject, catalog_number, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(course.id)
        .bind(&course.subject)
        .bind(&course.catalog_number)
        .bind(course.created_at)
        .bind(course.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Course>> {
        let row: Option<(Uuid, String, String, chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>)> =
            sqlx::query_as(
                r#"
                SELECT id, subject, catalog_number, created_at, updated_at
                FROM courses
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(
            |(id, subject, catalog_number, created_at, updated_at)| Course {
                id,
                subject,
                catalog_number,
                created_at,
                updated_at,
            },
        ))
    }
}
