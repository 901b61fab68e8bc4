use std::sync::Arc;

use sqlx::PgPool;

use crate::domain::notifications::Mailer;
use crate::domain::repositories::{
    CourseRepository, ReviewRepository, SchoolRepository, SchoolRequestRepository,
    UserRepository,
};
use crate::infrastructure::repositories::{
    InMemoryStore, PostgresCourseRepository, PostgresReviewRepository, PostgresSchoolRepository,
    PostgresSchoolRequestRepository, PostgresUserRepository,
};

/// Settings the auth handlers need at request time
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Externally reachable origin used to build verification links
    pub public_base_url: String,
}

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub schools: Arc<dyn SchoolRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub school_requests: Arc<dyn SchoolRequestRepository>,
    pub users: Arc<dyn UserRepository>,
    pub mailer: Arc<dyn Mailer>,
    pub auth: Arc<AuthSettings>,
}

impl AppState {
    /// State backed by PostgreSQL repositories sharing one pool
    pub fn postgres(pool: PgPool, mailer: Arc<dyn Mailer>, auth: AuthSettings) -> Self {
        Self {
            schools: Arc::new(PostgresSchoolRepository::new(pool.clone())),
            courses: Arc::new(PostgresCourseRepository::new(pool.clone())),
            reviews: Arc::new(PostgresReviewRepository::new(pool.clone())),
            school_requests: Arc::new(PostgresSchoolRequestRepository::new(pool.clone())),
            users: Arc::new(PostgresUserRepository::new(pool)),
            mailer,
            auth: Arc::new(auth),
        }
    }

    /// State backed by a single in-memory store
    pub fn in_memory(store: InMemoryStore, mailer: Arc<dyn Mailer>, auth: AuthSettings) -> Self {
        Self {
            schools: Arc::new(store.clone()),
            courses: Arc::new(store.clone()),
            reviews: Arc::new(store.clone()),
            school_requests: Arc::new(store.clone()),
            users: Arc::new(store),
            mailer,
            auth: Arc::new(auth),
        }
    }
}
