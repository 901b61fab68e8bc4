use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A school whose courses can be reviewed
///
/// `short_name` is unique and doubles as the public lookup key
/// (e.g. `/api/v1/school/UCLA/`).
#[derive(Debug, Clone, PartialEq)]
pub struct School {
    pub id: Uuid,
    pub short_name: String,
    pub long_name: String,
    pub website: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl School {
    /// Maximum length of `short_name`
    pub const SHORT_NAME_MAX_LEN: usize = 20;

    /// Maximum length of the other text columns
    pub const TEXT_MAX_LEN: usize = 255;
}

/// A reference to a school as supplied by a client
///
/// Clients may name a school either by its UUID or by its short name.
///
/// # Example
/// ```
/// use course_review_api::domain::school::school::SchoolIdentifier;
///
/// assert!(matches!(SchoolIdentifier::parse("UCLA"), SchoolIdentifier::ShortName(_)));
/// assert!(matches!(
///     SchoolIdentifier::parse("6f1c1a8e-57a4-4bde-9a39-0b7b1e3f2c11"),
///     SchoolIdentifier::Id(_)
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchoolIdentifier {
    Id(Uuid),
    ShortName(String),
}

impl SchoolIdentifier {
    /// Classifies a raw identifier; anything that is not a UUID is a short name
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match Uuid::parse_str(raw) {
            Ok(id) => SchoolIdentifier::Id(id),
            Err(_) => SchoolIdentifier::ShortName(raw.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_uuid_identifier() {
        let id = Uuid::new_v4();
        assert_eq!(
            SchoolIdentifier::parse(&id.to_string()),
            SchoolIdentifier::Id(id)
        );
    }

    #[test]
    fn parse_short_name_identifier() {
        assert_eq!(
            SchoolIdentifier::parse("not-a-uuid"),
            SchoolIdentifier::ShortName("not-a-uuid".to_string())
        );
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(
            SchoolIdentifier::parse("  TS "),
            SchoolIdentifier::ShortName("TS".to_string())
        );
    }
}
