// Request field validation
// Collects every problem in a payload before answering 400, so clients see
// all offending fields at once.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;

use crate::api::errors::ApiError;
use crate::domain::review::InvalidChoice;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";

/// Field name → messages, serialized as a JSON object
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map holding one message for one field
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Present, non-blank text of at most `max_len` characters, trimmed
    pub fn required_text(
        &mut self,
        field: &str,
        value: Option<String>,
        max_len: usize,
    ) -> Option<String> {
        match value {
            None => {
                self.add(field, REQUIRED);
                None
            }
            Some(value) => {
                let value = value.trim();
                if value.is_empty() {
                    self.add(field, BLANK);
                    None
                } else {
                    self.check_len(field, value, max_len)
                }
            }
        }
    }

    /// Optional text; blank is allowed, absent stays `None`
    pub fn optional_text(
        &mut self,
        field: &str,
        value: Option<String>,
        max_len: usize,
    ) -> Option<String> {
        let value = value?;
        self.check_len(field, value.trim(), max_len)
    }

    /// Present value naming one of `T`'s choices
    pub fn required_choice<T>(&mut self, field: &str, value: Option<String>) -> Option<T>
    where
        T: FromStr<Err = InvalidChoice>,
    {
        let Some(value) = value else {
            self.add(field, REQUIRED);
            return None;
        };
        match value.parse() {
            Ok(choice) => Some(choice),
            Err(err) => {
                self.add(field, err.to_string());
                None
            }
        }
    }

    /// `Ok(())` when nothing was recorded, otherwise a 400 with every message
    pub fn finish(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(self))
        }
    }

    fn check_len(&mut self, field: &str, value: &str, max_len: usize) -> Option<String> {
        if value.chars().count() > max_len {
            self.add(
                field,
                format!("Ensure this field has no more than {max_len} characters."),
            );
            None
        } else {
            Some(value.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::review::Term;

    #[test]
    fn missing_and_blank_are_distinguished() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.required_text("short_name", None, 20), None);
        assert_eq!(errors.required_text("long_name", Some("  ".into()), 20), None);

        assert_eq!(errors.get("short_name"), Some(&[REQUIRED.to_string()][..]));
        assert_eq!(errors.get("long_name"), Some(&[BLANK.to_string()][..]));
    }

    #[test]
    fn required_text_is_trimmed() {
        let mut errors = FieldErrors::new();
        let value = errors.required_text("city", Some("  Boston ".into()), 255);
        assert_eq!(value.as_deref(), Some("Boston"));
        assert!(errors.finish().is_ok());
    }

    #[test]
    fn too_long_text_is_rejected() {
        let mut errors = FieldErrors::new();
        assert!(errors.required_text("review_text", Some("x".repeat(501)), 500).is_none());
        assert_eq!(
            errors.get("review_text").unwrap()[0],
            "Ensure this field has no more than 500 characters."
        );
    }

    #[test]
    fn optional_text_allows_absent_and_blank() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.optional_text("website", None, 255), None);
        assert_eq!(
            errors.optional_text("website", Some(String::new()), 255),
            Some(String::new())
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn invalid_choice_message() {
        let mut errors = FieldErrors::new();
        let term: Option<Term> = errors.required_choice("term", Some("Invalid Term".into()));

        assert!(term.is_none());
        assert_eq!(
            errors.get("term").unwrap()[0],
            "\"Invalid Term\" is not a valid choice."
        );
    }

    #[test]
    fn finish_reports_all_fields() {
        let mut errors = FieldErrors::new();
        let _: Option<Term> = errors.required_choice("term", None);
        errors.required_text("review_text", None, 500);

        let err = errors.finish().unwrap_err();
        match err.body {
            crate::api::errors::ErrorBody::Fields(fields) => {
                assert!(fields.get("term").is_some());
                assert!(fields.get("review_text").is_some());
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }
}
