use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

use super::value_objects::{DeliveryMethod, Grade, Term};

/// A student's review of a course taken at a school
///
/// # Invariants
/// - `review_text` is non-blank and at most [`Review::MAX_TEXT_LEN`] characters
/// - Deleting the referenced school or course deletes the review
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: Uuid,
    pub school_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub review_text: String,
    pub term: Term,
    pub grade_received: Grade,
    pub delivery_method: DeliveryMethod,
    pub helpful_count: i32,
    pub year_taken: i32,
    pub textbook_required: bool,
    pub recommended: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Maximum length of the review body, in characters
    pub const MAX_TEXT_LEN: usize = 500;

    /// Default for `helpful_count` on new reviews
    pub const DEFAULT_HELPFUL_COUNT: i32 = 0;

    /// Default for `textbook_required` on new reviews
    pub const DEFAULT_TEXTBOOK_REQUIRED: bool = false;

    /// Default for `recommended` on new reviews
    pub const DEFAULT_RECOMMENDED: bool = true;

    /// Default for `year_taken`: the current calendar year (UTC)
    pub fn default_year_taken() -> i32 {
        Utc::now().year()
    }

    /// Returns true if this review is attached to the given school
    pub fn is_for_school(&self, school_id: Uuid) -> bool {
        self.school_id == Some(school_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_review(school_id: Option<Uuid>) -> Review {
        let now = Utc::now();
        Review {
            id: Uuid::new_v4(),
            school_id,
            course_id: None,
            review_text: "Great lectures".to_string(),
            term: Term::Fall,
            grade_received: Grade::A,
            delivery_method: DeliveryMethod::Online,
            helpful_count: Review::DEFAULT_HELPFUL_COUNT,
            year_taken: Review::default_year_taken(),
            textbook_required: Review::DEFAULT_TEXTBOOK_REQUIRED,
            recommended: Review::DEFAULT_RECOMMENDED,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn default_year_is_current_year() {
        assert_eq!(Review::default_year_taken(), Utc::now().year());
    }

    #[test]
    fn is_for_school_matches_only_attached_school() {
        let school_id = Uuid::new_v4();
        let review = sample_review(Some(school_id));

        assert!(review.is_for_school(school_id));
        assert!(!review.is_for_school(Uuid::new_v4()));
        assert!(!sample_review(None).is_for_school(school_id));
    }
}
