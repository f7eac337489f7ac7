//! Access-token verification
//!
//! The identity provider signs HS256 access tokens; this service verifies
//! them and turns their claims into a [`Session`].

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vidshare_core::{Session, Snowflake};

use crate::error::AppError;

/// Token type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    pub token_type: TokenType,
    /// Sign-in session the token belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Unique token id; names the session when `session_id` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Get the user ID as a Snowflake
    ///
    /// # Errors
    /// Returns an error if the subject cannot be parsed as a Snowflake
    pub fn user_id(&self) -> Result<Snowflake, AppError> {
        self.sub
            .parse::<Snowflake>()
            .map_err(|_| AppError::InvalidToken)
    }

    #[must_use]
    pub fn is_access_token(&self) -> bool {
        self.token_type == TokenType::Access
    }

    /// Build the caller session these claims describe
    ///
    /// # Errors
    /// Returns an error if the subject or timestamps are malformed, or if the
    /// token carries neither a `session_id` nor a `jti`
    pub fn into_session(self) -> Result<Session, AppError> {
        let user_id = self.user_id()?;
        let issued_at = timestamp(self.iat)?;
        let expires_at = timestamp(self.exp)?;
        let id = self
            .session_id
            .or(self.jti)
            .filter(|id| !id.is_empty())
            .ok_or(AppError::InvalidToken)?;

        Ok(Session::new(id, user_id, issued_at, expires_at))
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, AppError> {
    DateTime::from_timestamp(secs, 0).ok_or(AppError::InvalidToken)
}

/// Verifies access tokens and resolves them to sessions
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: i64,
}

impl JwtService {
    #[must_use]
    pub fn new(secret: &str, access_token_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry,
        }
    }

    /// Mint an access token with the shared secret (local tooling and tests)
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_access_token(
        &self,
        user_id: Snowflake,
        session_id: Option<String>,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            token_type: TokenType::Access,
            session_id,
            jti: Some(Uuid::new_v4().to_string()),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to encode JWT")))
    }

    /// Decode and validate a JWT token
    ///
    /// # Errors
    /// Returns an error if the token is invalid or expired
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            }
        })?;

        Ok(token_data.claims)
    }

    /// Validate an access token and return the claims
    ///
    /// # Errors
    /// Returns an error if the token is invalid, expired, or not an access token
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;

        if !claims.is_access_token() {
            return Err(AppError::InvalidToken);
        }

        Ok(claims)
    }

    /// Verify an access token and open the session it carries
    ///
    /// # Errors
    /// Returns an error if the token is not a valid access token
    pub fn session_from_token(&self, token: &str) -> Result<Session, AppError> {
        self.validate_access_token(token)?.into_session()
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry", &self.access_token_expiry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret-key-that-is-long-enough", 900)
    }

    #[test]
    fn test_issue_and_validate() {
        let service = create_test_service();
        let user_id = Snowflake::new(12345);

        let token = service.issue_access_token(user_id, None).unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, "12345");
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert!(claims.is_access_token());
    }

    #[test]
    fn test_session_from_token() {
        let service = create_test_service();
        let user_id = Snowflake::new(777);

        let token = service
            .issue_access_token(user_id, Some("sess-1".to_string()))
            .unwrap();
        let session = service.session_from_token(&token).unwrap();

        assert_eq!(session.id, "sess-1");
        assert_eq!(session.user_id, user_id);
        assert!(session.is_active());
        assert_eq!(session.subject().unwrap(), user_id);
    }

    #[test]
    fn test_refresh_token_rejected() {
        let service = create_test_service();
        let now = Utc::now();
        let claims = Claims {
            sub: "1".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(60)).timestamp(),
            token_type: TokenType::Refresh,
            session_id: None,
            jti: None,
        };
        let token = encode(&Header::default(), &claims, &service.encoding_key).unwrap();

        assert!(matches!(
            service.validate_access_token(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::new("test-secret-key-that-is-long-enough", -3600);
        let token = service.issue_access_token(Snowflake::new(1), None).unwrap();

        assert!(matches!(
            service.session_from_token(&token),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();
        assert!(matches!(
            service.decode_token("invalid.token.here"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let token = create_test_service()
            .issue_access_token(Snowflake::new(1), None)
            .unwrap();
        let other = JwtService::new("a-different-secret-entirely", 900);
        assert!(other.session_from_token(&token).is_err());
    }

    #[test]
    fn test_session_id_falls_back_to_jti() {
        let claims = Claims {
            sub: "42".to_string(),
            iat: 1_700_000_000,
            exp: i64::from(u32::MAX),
            token_type: TokenType::Access,
            session_id: None,
            jti: Some("token-a".to_string()),
        };
        let session = claims.into_session().unwrap();
        assert_eq!(session.id, "token-a");
        assert_eq!(session.user_id, Snowflake::new(42));
    }

    #[test]
    fn test_claims_without_session_or_jti_rejected() {
        let claims = Claims {
            sub: "42".to_string(),
            iat: 1_700_000_000,
            exp: i64::from(u32::MAX),
            token_type: TokenType::Access,
            session_id: None,
            jti: None,
        };
        assert!(matches!(claims.into_session(), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_same_second_tokens_get_distinct_sessions() {
        let service = create_test_service();
        let user_id = Snowflake::new(5);

        let first = service.issue_access_token(user_id, None).unwrap();
        let second = service.issue_access_token(user_id, None).unwrap();

        let first = service.session_from_token(&first).unwrap();
        let second = service.session_from_token(&second).unwrap();
        assert_ne!(first.id, second.id);
    }
}
