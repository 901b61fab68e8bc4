use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::course::Course;
use crate::domain::repositories::{
    CourseRepository, RepositoryError, RepositoryResult, ReviewRepository, SchoolRepository,
    SchoolRequestRepository, User, UserRepository,
};
use crate::domain::review::Review;
use crate::domain::school::{School, SchoolRequest};
use crate::domain::user::value_objects::Email;

#[derive(Debug, Default)]
struct Tables {
    schools: Vec<School>,
    courses: Vec<Course>,
    // insertion order doubles as creation order
    reviews: Vec<Review>,
    school_requests: Vec<SchoolRequest>,
    users: Vec<User>,
}

/// In-memory implementation of every repository trait.
///
/// All tables sit behind one lock so that cascades (school → reviews) are
/// atomic, mirroring the foreign keys of the PostgreSQL schema. Intended
/// for tests and for running the API without a database.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means a writer panicked mid-test; the data is
    // still usable.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl SchoolRepository for InMemoryStore {
    async fn create(&self, school: &School) -> RepositoryResult<()> {
        let mut tables = self.write();
        if tables
            .schools
            .iter()
            .any(|s| s.short_name == school.short_name)
        {
            return Err(RepositoryError::Conflict {
                entity: "school",
                field: "short_name",
            });
        }
        tables.schools.push(school.clone());
        Ok(())
    }

    async fn list(&self) -> RepositoryResult<Vec<School>> {
        let mut schools = self.read().schools.clone();
        schools.sort_by(|a, b| a.short_name.cmp(&b.short_name));
        Ok(schools)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<School>> {
        Ok(self.read().schools.iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_short_name(&self, short_name: &str) -> RepositoryResult<Option<School>> {
        Ok(self
            .read()
            .schools
            .iter()
            .find(|s| s.short_name == short_name)
            .cloned())
    }

    async fn update(&self, school: &School) -> RepositoryResult<()> {
        let mut tables = self.write();
        if tables
            .schools
            .iter()
            .any(|s| s.id != school.id && s.short_name == school.short_name)
        {
            return Err(RepositoryError::Conflict {
                entity: "school",
                field: "short_name",
            });
        }
        let existing = tables
            .schools
            .iter_mut()
            .find(|s| s.id == school.id)
            .ok_or(RepositoryError::NotFound { entity: "school" })?;
        *existing = school.clone();
        Ok(())
    }

    async fn delete_by_short_name(&self, short_name: &str) -> RepositoryResult<()> {
        let mut tables = self.write();
        let position = tables
            .schools
            .iter()
            .position(|s| s.short_name == short_name)
            .ok_or(RepositoryError::NotFound { entity: "school" })?;
        let school = tables.schools.remove(position);
        tables.reviews.retain(|r| !r.is_for_school(school.id));
        Ok(())
    }
}

#[async_trait]
impl CourseRepository for InMemoryStore {
    async fn create(&self, course: &Course) -> RepositoryResult<()> {
        self.write().courses.push(course.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Course>> {
        Ok(self.read().courses.iter().find(|c| c.id == id).cloned())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn create(&self, review: &Review) -> RepositoryResult<()> {
        self.write().reviews.push(review.clone());
        Ok(())
    }

    async fn list(&self) -> RepositoryResult<Vec<Review>> {
        Ok(self.read().reviews.clone())
    }

    async fn list_by_school(&self, school_id: Uuid) -> RepositoryResult<Vec<Review>> {
        Ok(self
            .read()
            .reviews
            .iter()
            .filter(|r| r.is_for_school(school_id))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Review>> {
        Ok(self.read().reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn update(&self, review: &Review) -> RepositoryResult<()> {
        let mut tables = self.write();
        let existing = tables
            .reviews
            .iter_mut()
            .find(|r| r.id == review.id)
            .ok_or(RepositoryError::NotFound { entity: "review" })?;
        *existing = review.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let mut tables = self.write();
        let before = tables.reviews.len();
        tables.reviews.retain(|r| r.id != id);
        if tables.reviews.len() == before {
            return Err(RepositoryError::NotFound { entity: "review" });
        }
        Ok(())
    }
}

#[async_trait]
impl SchoolRequestRepository for InMemoryStore {
    async fn create(&self, request: &SchoolRequest) -> RepositoryResult<()> {
        let mut tables = self.write();
        if tables
            .school_requests
            .iter()
            .any(|r| r.school_name == request.school_name)
        {
            return Err(RepositoryError::Conflict {
                entity: "school request",
                field: "school_name",
            });
        }
        tables.school_requests.push(request.clone());
        Ok(())
    }

    async fn list(&self) -> RepositoryResult<Vec<SchoolRequest>> {
        Ok(self.read().school_requests.clone())
    }

    async fn find_by_school_name(
        &self,
        school_name: &str,
    ) -> RepositoryResult<Option<SchoolRequest>> {
        Ok(self
            .read()
            .school_requests
            .iter()
            .find(|r| r.school_name == school_name)
            .cloned())
    }

    async fn delete_by_school_name(&self, school_name: &str) -> RepositoryResult<()> {
        let mut tables = self.write();
        let before = tables.school_requests.len();
        tables.school_requests.retain(|r| r.school_name != school_name);
        if tables.school_requests.len() == before {
            return Err(RepositoryError::NotFound {
                entity: "school request",
            });
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> RepositoryResult<Uuid> {
        let mut tables = self.write();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict {
                entity: "user",
                field: "email",
            });
        }
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::Conflict {
                entity: "user",
                field: "username",
            });
        }
        let id = user.id;
        tables.users.push(user);
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        Ok(self.read().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        Ok(self.read().users.iter().find(|u| &u.email == email).cloned())
    }

    async fn mark_verified(&self, user_id: Uuid) -> RepositoryResult<()> {
        let mut tables = self.write();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(RepositoryError::NotFound { entity: "user" })?;
        user.is_verified = true;
        Ok(())
    }

    async fn update_last_login(&self, user_id: Uuid) -> RepositoryResult<()> {
        let mut tables = self.write();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(RepositoryError::NotFound { entity: "user" })?;
        user.last_login = Some(Utc::now());
        Ok(())
    }
}
