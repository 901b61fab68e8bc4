use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::repositories::{RepositoryError, RepositoryResult, ReviewRepository};
use crate::domain::review::{DeliveryMethod, Grade, Review, Term};

const ENTITY: &str = "review";

const SELECT_REVIEW: &str = r#"
    SELECT id, school_id, course_id, review_text, term, grade_received,
           delivery_method, helpful_count, year_taken, textbook_required,
           recommended, created_at, updated_at
    FROM reviews
"#;

#[derive(sqlx::FromRow)]
struct ReviewRecord {
    id: Uuid,
    school_id: Option<Uuid>,
    course_id: Option<Uuid>,
    review_text: String,
    term: Term,
    grade_received: Grade,
    delivery_method: DeliveryMethod,
    helpful_count: i32,
    year_taken: i32,
    textbook_required: bool,
    recommended: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReviewRecord> for Review {
    fn from(r: ReviewRecord) -> Self {
        Review {
            id: r.id,
            school_id: r.school_id,
            course_id: r.course_id,
            review_text: r.review_text,
            term: r.term,
            grade_received: r.grade_received,
            delivery_method: r.delivery_method,
            helpful_count: r.helpful_count,
            year_taken: r.year_taken,
            textbook_required: r.textbook_required,
            recommended: r.recommended,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL implementation of ReviewRepository
///
/// Enum columns map onto the `review_term`, `review_grade` and
/// `review_delivery_method` PostgreSQL types.
pub struct PostgresReviewRepository {
    pool: PgPool,
}

impl PostgresReviewRepository {
    /// Creates a new PostgresReviewRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn create(&self, review: &Review) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reviews (
                id, school_id, course_id, review_text, term, grade_received,
                delivery_method, helpful_count, year_taken, textbook_required,
                recommended, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(review.id)
        .bind(review.school_id)
        .bind(review.course_id)
        .bind(&review.review_text)
        .bind(review.term)
        .bind(review.grade_received)
        .bind(review.delivery_method)
        .bind(review.helpful_count)
        .bind(review.year_taken)
        .bind(review.textbook_required)
        .bind(review.recommended)
        .bind(review.created_at)
        .bind(review.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self) -> RepositoryResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRecord>(&format!(
            "{SELECT_REVIEW} ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn list_by_school(&self, school_id: Uuid) -> RepositoryResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRecord>(&format!(
            "{SELECT_REVIEW} WHERE school_id = $1 ORDER BY created_at, id"
        ))
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Review>> {
        let row = sqlx::query_as::<_, ReviewRecord>(&format!("{SELECT_REVIEW} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Review::from))
    }

    async fn update(&self, review: &Review) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE reviews
            SET school_id = $2, course_id = $3, review_text = $4, term = $5,
                grade_received = $6, delivery_method = $7, helpful_count = $8,
                year_taken = $9, textbook_required = $10, recommended = $11,
                updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(review.id)
        .bind(review.school_id)
        .bind(review.course_id)
        .bind(&review.review_text)
        .bind(review.term)
        .bind(review.grade_received)
        .bind(review.delivery_method)
        .bind(review.helpful_count)
        .bind(review.year_taken)
        .bind(review.textbook_required)
        .bind(review.recommended)
        .bind(review.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { entity: ENTITY });
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { entity: ENTITY });
        }

        Ok(())
    }
}
