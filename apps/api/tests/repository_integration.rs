//! Integration tests for repository layer
//!
//! These tests verify that the PostgreSQL repositories honour the same
//! contracts as the in-memory store: unique keys, cascades and ordering.
//! They need a live database; run with `DATABASE_URL=... cargo test -- --ignored`.

use chrono::Utc;
use course_review_api::auth::password::hash_password;
use course_review_api::domain::course::Course;
use course_review_api::domain::repositories::{
    CourseRepository, RepositoryError, ReviewRepository, SchoolRepository,
    SchoolRequestRepository, User, UserRepository,
};
use course_review_api::domain::review::{DeliveryMethod, Grade, Review, Term};
use course_review_api::domain::school::{School, SchoolRequest};
use course_review_api::domain::user::{Email, Username};
use course_review_api::infrastructure::repositories::{
    PostgresCourseRepository, PostgresReviewRepository, PostgresSchoolRepository,
    PostgresSchoolRequestRepository, PostgresUserRepository,
};
use sqlx::PgPool;
use uuid::Uuid;

/// Set up test database connection pool with the schema applied
async fn setup_test_db() -> PgPool {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for integration tests");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Short names are limited to 20 characters, so use a random suffix
fn unique_short_name() -> String {
    format!("T{}", &Uuid::new_v4().simple().to_string()[..12])
}

fn test_school(short_name: &str) -> School {
    let now = Utc::now();
    School {
        id: Uuid::new_v4(),
        short_name: short_name.to_string(),
        long_name: "The Test University".to_string(),
        website: "https://test.university.edu".to_string(),
        city: "Test City".to_string(),
        state: "Test State".to_string(),
        country: "Test Country".to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn test_review(school_id: Option<Uuid>, course_id: Option<Uuid>) -> Review {
    let now = Utc::now();
    Review {
        id: Uuid::new_v4(),
        school_id,
        course_id,
        review_text: "This is a sample review.".to_string(),
        term: Term::Spring,
        grade_received: Grade::BPlus,
        delivery_method: DeliveryMethod::InPerson,
        helpful_count: Review::DEFAULT_HELPFUL_COUNT,
        year_taken: Review::default_year_taken(),
        textbook_required: Review::DEFAULT_TEXTBOOK_REQUIRED,
        recommended: Review::DEFAULT_RECOMMENDED,
        created_at: now,
        updated_at: now,
    }
}

/// Clean up a school created by a test (reviews go with it)
async fn cleanup_school(pool: &PgPool, short_name: &str) {
    sqlx::query("DELETE FROM schools WHERE short_name = $1")
        .bind(short_name)
        .execute(pool)
        .await
        .expect("Failed to cleanup test school");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_school_repository_crud() {
    let pool = setup_test_db().await;
    let repo = PostgresSchoolRepository::new(pool.clone());
    let short_name = unique_short_name();

    let mut school = test_school(&short_name);
    repo.create(&school).await.expect("Failed to create school");

    let found = repo
        .find_by_short_name(&short_name)
        .await
        .expect("Failed to find school")
        .expect("School should exist");
    assert_eq!(found.id, school.id);
    assert_eq!(found.city, "Test City");

    let by_id = repo.find_by_id(school.id).await.expect("find by id");
    assert!(by_id.is_some(), "School should be found by id");

    school.long_name = "Renamed University".to_string();
    repo.update(&school).await.expect("Failed to update school");
    let found = repo.find_by_id(school.id).await.unwrap().unwrap();
    assert_eq!(found.long_name, "Renamed University");

    repo.delete_by_short_name(&short_name)
        .await
        .expect("Failed to delete school");
    assert!(repo.find_by_short_name(&short_name).await.unwrap().is_none());

    let result = repo.delete_by_short_name(&short_name).await;
    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_school_repository_duplicate_short_name_fails() {
    let pool = setup_test_db().await;
    let repo = PostgresSchoolRepository::new(pool.clone());
    let short_name = unique_short_name();

    repo.create(&test_school(&short_name))
        .await
        .expect("First school creation should succeed");

    let result = repo.create(&test_school(&short_name)).await;
    assert!(
        matches!(
            result,
            Err(RepositoryError::Conflict {
                field: "short_name",
                ..
            })
        ),
        "Duplicate short_name should conflict: {:?}",
        result
    );

    cleanup_school(&pool, &short_name).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_review_repository_cascade_on_school_delete() {
    let pool = setup_test_db().await;
    let schools = PostgresSchoolRepository::new(pool.clone());
    let courses = PostgresCourseRepository::new(pool.clone());
    let reviews = PostgresReviewRepository::new(pool.clone());

    let short_name = unique_short_name();
    let school = test_school(&short_name);
    schools.create(&school).await.unwrap();

    let course = Course {
        id: Uuid::new_v4(),
        subject: "CS".to_string(),
        catalog_number: "101".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    courses.create(&course).await.unwrap();

    let review = test_review(Some(school.id), Some(course.id));
    reviews.create(&review).await.expect("Failed to create review");

    let found = reviews.find_by_id(review.id).await.unwrap().unwrap();
    assert_eq!(found.grade_received, Grade::BPlus);
    assert_eq!(found.delivery_method, DeliveryMethod::InPerson);
    assert_eq!(found.course_id, Some(course.id));

    let for_school = reviews.list_by_school(school.id).await.unwrap();
    assert_eq!(for_school.len(), 1);

    schools.delete_by_short_name(&short_name).await.unwrap();
    assert!(
        reviews.find_by_id(review.id).await.unwrap().is_none(),
        "Review should be deleted with its school"
    );
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_review_repository_update_and_delete() {
    let pool = setup_test_db().await;
    let reviews = PostgresReviewRepository::new(pool.clone());

    let mut review = test_review(None, None);
    reviews.create(&review).await.unwrap();

    review.term = Term::Fall;
    review.recommended = false;
    reviews.update(&review).await.expect("Failed to update review");

    let found = reviews.find_by_id(review.id).await.unwrap().unwrap();
    assert_eq!(found.term, Term::Fall);
    assert!(!found.recommended);

    reviews.delete(review.id).await.expect("Failed to delete review");
    let result = reviews.delete(review.id).await;
    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_school_request_repository() {
    let pool = setup_test_db().await;
    let repo = PostgresSchoolRequestRepository::new(pool.clone());
    let school_name = format!("Requested University {}", Uuid::new_v4());

    let request = SchoolRequest {
        id: Uuid::new_v4(),
        school_name: school_name.clone(),
        website: String::new(),
        created_at: Utc::now(),
    };
    repo.create(&request).await.expect("Failed to create request");

    let duplicate = SchoolRequest {
        id: Uuid::new_v4(),
        ..request.clone()
    };
    assert!(matches!(
        repo.create(&duplicate).await,
        Err(RepositoryError::Conflict {
            field: "school_name",
            ..
        })
    ));

    let found = repo.find_by_school_name(&school_name).await.unwrap();
    assert_eq!(found.map(|r| r.id), Some(request.id));

    repo.delete_by_school_name(&school_name).await.unwrap();
    assert!(repo.find_by_school_name(&school_name).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_user_repository_lifecycle() {
    let pool = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool.clone());

    let suffix = Uuid::new_v4().simple().to_string();
    let email = Email::new(format!("user-{}@example.com", suffix)).expect("valid email");
    let user = User {
        id: Uuid::new_v4(),
        email: email.clone(),
        username: Username::new(format!("user{}", &suffix[..12])).expect("valid username"),
        password_hash: hash_password("testpassword").expect("hash password"),
        is_verified: false,
        is_active: true,
        created_at: Utc::now(),
        last_login: None,
    };

    let user_id = repo.create(user.clone()).await.expect("Failed to create user");
    assert_eq!(user_id, user.id, "User ID should match");

    let duplicate = User {
        id: Uuid::new_v4(),
        username: Username::new(format!("other{}", &suffix[..12])).expect("valid username"),
        ..user.clone()
    };
    assert!(matches!(
        repo.create(duplicate).await,
        Err(RepositoryError::Conflict { field: "email", .. })
    ));

    repo.mark_verified(user_id).await.expect("Failed to verify");
    repo.update_last_login(user_id)
        .await
        .expect("Failed to update last login");

    let found = repo
        .find_by_email(&email)
        .await
        .expect("Failed to find user by email")
        .expect("User should be found");
    assert!(found.is_verified, "User should be verified");
    assert!(found.last_login.is_some(), "Last login should be recorded");

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await
        .expect("Failed to cleanup test user");
}
