// JWT token creation and verification
// Access tokens last 8 hours, refresh tokens 7 days, email verification
// links 24 hours. All tokens are HS256 and carry their kind as a claim.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// What a token may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
    EmailVerification,
}

impl TokenKind {
    /// How long a freshly issued token of this kind stays valid
    pub fn lifetime(self) -> Duration {
        match self {
            TokenKind::Access => Duration::hours(8),
            TokenKind::Refresh => Duration::days(7),
            TokenKind::EmailVerification => Duration::hours(24),
        }
    }
}

/// JWT claims structure
///
/// # Fields
/// * `sub` - Subject (user_id)
/// * `exp` - Expiry time (seconds since epoch)
/// * `kind` - Intended use of the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub kind: TokenKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("expected a {expected:?} token")]
    WrongKind { expected: TokenKind },

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// An access/refresh pair handed out at login
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Creates a signed token of the given kind for a user
///
/// # Example
/// ```
/// use course_review_api::auth::jwt::{create_token, verify_token, TokenKind};
/// use uuid::Uuid;
///
/// let user_id = Uuid::new_v4();
/// let token = create_token(user_id, TokenKind::Access, "secret").unwrap();
/// let claims = verify_token(&token, TokenKind::Access, "secret").unwrap();
/// assert_eq!(claims.sub, user_id);
/// ```
pub fn create_token(user_id: Uuid, kind: TokenKind, secret: &str) -> Result<String, TokenError> {
    let expiry = Utc::now() + kind.lifetime();
    let claims = Claims {
        sub: user_id,
        exp: expiry.timestamp() as usize,
        kind,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verifies signature, expiry and kind of a token and returns its claims
pub fn verify_token(token: &str, expected: TokenKind, secret: &str) -> Result<Claims, TokenError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(e.to_string()),
    })?;

    if claims.kind != expected {
        return Err(TokenError::WrongKind { expected });
    }

    Ok(claims)
}

/// Issues the access and refresh tokens returned by login
pub fn issue_token_pair(user_id: Uuid, secret: &str) -> Result<TokenPair, TokenError> {
    Ok(TokenPair {
        access: create_token(user_id, TokenKind::Access, secret)?,
        refresh: create_token(user_id, TokenKind::Refresh, secret)?,
    })
}
