// Password hashing and password policy
// Hashes are bcrypt with the library's default cost

use bcrypt::{hash, verify, DEFAULT_COST};

/// Shortest accepted password
pub const MIN_PASSWORD_LEN: usize = 8;

/// Longest accepted password, in UTF-8 bytes
///
/// bcrypt only reads the first 72 bytes, so multi-byte input is bounded by
/// its encoded length rather than its character count.
pub const MAX_PASSWORD_LEN: usize = 68;

/// Checks a candidate password against the length policy
///
/// # Returns
/// * `Ok(())` - Password is acceptable
/// * `Err(String)` - Client-facing reason it was rejected
pub fn check_password_policy(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Ensure this field has at least {} characters.",
            MIN_PASSWORD_LEN
        ));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(format!(
            "Ensure this field has no more than {} characters.",
            MAX_PASSWORD_LEN
        ));
    }
    Ok(())
}

/// Hashes a password using bcrypt
///
/// # Example
/// ```
/// use course_review_api::auth::password::{hash_password, verify_password};
///
/// let hash = hash_password("correct horse").unwrap();
/// assert!(verify_password("correct horse", &hash).unwrap());
/// ```
pub fn hash_password(password: &str) -> Result<String, String> {
    hash(password, DEFAULT_COST).map_err(|e| e.to_string())
}

/// Verifies a password against a bcrypt hash
///
/// # Returns
/// * `Ok(bool)` - Whether the password matches
/// * `Err(String)` - If the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    verify(password, hash).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() {
        let hash = hash_password("test_password_123").expect("valid hash");
        assert!(verify_password("test_password_123", &hash).expect("valid verification"));
    }

    #[test]
    fn verify_wrong_password() {
        let hash = hash_password("test_password_123").expect("valid hash");
        assert!(!verify_password("wrong_password", &hash).expect("valid verification"));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
    }

    #[test]
    fn policy_rejects_short_password() {
        let err = check_password_policy("short").unwrap_err();
        assert!(err.contains("at least 8"));
    }

    #[test]
    fn policy_rejects_long_password() {
        assert!(check_password_policy(&"x".repeat(MAX_PASSWORD_LEN + 1)).is_err());
    }

    #[test]
    fn policy_accepts_bounds() {
        assert!(check_password_policy(&"x".repeat(MIN_PASSWORD_LEN)).is_ok());
        assert!(check_password_policy(&"x".repeat(MAX_PASSWORD_LEN)).is_ok());
    }

    #[test]
    fn policy_bounds_multibyte_password_by_bytes() {
        // 68 characters but 136 bytes
        let wide = "é".repeat(MAX_PASSWORD_LEN);
        assert_eq!(wide.chars().count(), MAX_PASSWORD_LEN);

        let err = check_password_policy(&wide).unwrap_err();
        assert!(err.contains("no more than 68"));

        assert!(check_password_policy(&"é".repeat(MAX_PASSWORD_LEN / 2)).is_ok());
    }
}
