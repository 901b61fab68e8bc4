use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A course offering, identified by subject and catalog number (e.g. CS 101)
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: Uuid,
    pub subject: String,
    pub catalog_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Human readable label, e.g. `CS 101`
    pub fn label(&self) -> String {
        format!("{} {}", self.subject, self.catalog_number)
    }
}
