use serde::{Deserialize, Serialize};
use std::fmt;

/// Email value object representing a plausibly deliverable address
///
/// # Invariants
/// - Exactly one '@' with a non-empty local part and domain
/// - Domain contains a '.' that is neither its first nor last character
/// - No whitespace; stored trimmed, with the domain lowercased
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Maximum accepted length
    pub const MAX_LEN: usize = 255;

    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use course_review_api::domain::user::value_objects::Email;
    ///
    /// let email = Email::new(" Student@Example.EDU ").expect("valid email");
    /// assert_eq!(email.as_str(), "Student@example.edu");
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, String> {
        let email = email.into();
        let trimmed = email.trim();

        match trimmed.split_once('@') {
            Some((local, domain)) if Self::is_valid(trimmed, local, domain) => {
                Ok(Email(format!("{}@{}", local, domain.to_lowercase())))
            }
            _ => Err("Enter a valid email address.".to_string()),
        }
    }

    fn is_valid(full: &str, local: &str, domain: &str) -> bool {
        !local.is_empty()
            && !domain.is_empty()
            && !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !full.chars().any(char::is_whitespace)
            && full.len() <= Self::MAX_LEN
    }

    /// Returns the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public handle chosen at registration
///
/// Only ASCII letters and digits are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Maximum accepted length
    pub const MAX_LEN: usize = 255;

    pub fn new(username: impl Into<String>) -> Result<Self, String> {
        let username = username.into();
        let username = username.trim();

        if username.is_empty() {
            return Err("This field may not be blank.".to_string());
        }
        if username.len() > Self::MAX_LEN {
            return Err(format!(
                "Ensure this field has no more than {} characters.",
                Self::MAX_LEN
            ));
        }
        if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err("The username should only contain alphanumeric characters".to_string());
        }

        Ok(Username(username.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email() {
        assert!(Email::new("test@example.com").is_ok());
    }

    #[test]
    fn valid_email_with_subdomain() {
        assert!(Email::new("user@mail.example.com").is_ok());
    }

    #[test]
    fn email_domain_is_lowercased() {
        let email = Email::new("Jane.Doe@School.EDU").unwrap();
        assert_eq!(email.as_str(), "Jane.Doe@school.edu");
    }

    #[test]
    fn invalid_email_no_at_symbol() {
        assert!(Email::new("invalid").is_err());
    }

    #[test]
    fn invalid_email_missing_parts() {
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("user@").is_err());
        assert!(Email::new("user@localhost").is_err());
    }

    #[test]
    fn invalid_email_two_at_symbols() {
        assert!(Email::new("a@b@example.com").is_err());
    }

    #[test]
    fn invalid_email_inner_whitespace() {
        assert!(Email::new("john doe@example.com").is_err());
    }

    #[test]
    fn invalid_email_empty() {
        assert!(Email::new("").is_err());
    }

    #[test]
    fn email_display() {
        let email = Email::new("test@example.com").unwrap();
        assert_eq!(format!("{}", email), "test@example.com");
    }

    #[test]
    fn username_alphanumeric() {
        assert_eq!(Username::new("student42").unwrap().as_str(), "student42");
    }

    #[test]
    fn username_rejects_symbols() {
        let err = Username::new("john_doe").unwrap_err();
        assert!(err.contains("alphanumeric"));
    }

    #[test]
    fn username_rejects_blank() {
        assert!(Username::new("   ").is_err());
    }
}
