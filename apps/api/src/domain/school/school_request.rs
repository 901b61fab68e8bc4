use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A visitor's suggestion that a school be added to the catalogue
///
/// Requests live independently of [`super::School`]; approving one is an
/// administrative action outside this API.
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolRequest {
    pub id: Uuid,
    pub school_name: String,
    pub website: String,
    pub created_at: DateTime<Utc>,
}

impl SchoolRequest {
    /// Maximum length of `school_name` and `website`
    pub const TEXT_MAX_LEN: usize = 255;
}
