//! Signed identity tokens

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::{ServiceError, UserId};

/// The only algorithm tokens are signed and accepted with
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Default token lifetime in seconds
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 2 * 60 * 60;

/// Upper bound accepted for the token lifetime
pub const MAX_TOKEN_TTL_SECS: u64 = 366 * 24 * 60 * 60;

const BEARER_PREFIX: &str = "Bearer ";

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User's email at issuance
    pub email: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Token errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenError> for ServiceError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidToken => ServiceError::unauthenticated("invalid token"),
            TokenError::TokenExpired => ServiceError::unauthenticated("token expired"),
            TokenError::Signing(msg) => ServiceError::unavailable(msg),
        }
    }
}

/// Token service configuration
#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC signing secret
    pub secret: String,
    /// Token validity in seconds, capped at one year
    pub ttl_secs: u64,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }
}

/// Issues and verifies identity tokens
///
/// The signing secret is owned by the instance and never changes after
/// construction; share the service behind an `Arc`.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl: Duration::seconds(config.ttl_secs.min(MAX_TOKEN_TTL_SECS) as i64),
        }
    }

    /// Token lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Creates a token for the user, issued now
    pub fn issue(&self, user_id: UserId, email: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, email, Utc::now())
    }

    /// Creates a token for the user with an explicit issuance instant
    ///
    /// The expiry is always `issued_at + ttl`.
    pub fn issue_at(
        &self,
        user_id: UserId,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: (issued_at + self.ttl).timestamp(),
            iat: issued_at.timestamp(),
        };

        encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies a token and returns its claims
    pub fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::TokenExpired,
                _ => TokenError::InvalidToken,
            })
    }

    /// Verifies a token and returns the user it identifies
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let claims = self.decode_claims(token)?;
        claims
            .sub
            .parse::<UserId>()
            .map_err(|_| TokenError::InvalidToken)
    }
}

/// Strips an optional `Bearer ` prefix from an authorization value
pub fn bearer_token(value: &str) -> &str {
    let value = value.trim();
    value.strip_prefix(BEARER_PREFIX).map(str::trim).unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(TokenConfig::new("unit-test-secret"))
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = service();
        let token = tokens.issue(UserId::new(42), "a@x.com").unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), UserId::new(42));
    }

    #[test]
    fn test_expiry_window() {
        let tokens = service();
        let issued = Utc::now();
        let token = tokens.issue_at(UserId::new(1), "a@x.com", issued).unwrap();
        let claims = tokens.decode_claims(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_SECS as i64);
        assert_eq!(claims.email, "a@x.com");
    }

    #[test]
    fn test_expired_token() {
        let tokens = service();
        let issued = Utc::now() - Duration::hours(3);
        let token = tokens.issue_at(UserId::new(1), "a@x.com", issued).unwrap();
        assert!(matches!(tokens.verify(&token), Err(TokenError::TokenExpired)));
    }

    #[test]
    fn test_bearer_prefix() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), "abc.def.ghi");
        assert_eq!(bearer_token("abc.def.ghi"), "abc.def.ghi");
        assert_eq!(bearer_token("  Bearer   abc "), "abc");
    }
}
