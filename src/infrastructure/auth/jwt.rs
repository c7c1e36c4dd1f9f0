//! JWT token generation and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use uuid::Uuid;

use crate::domain::user::{User, UserId};
use crate::domain::DomainError;

/// Purpose of a token; only access tokens authenticate API requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    pub token_type: TokenType,
    /// Unique token id
    pub jti: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    pub fn new(user: &User, token_type: TokenType, lifetime: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user.id().to_string(),
            username: user.username().to_string(),
            token_type,
            jti: Uuid::new_v4().simple().to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }

    /// User ID carried in `sub`
    pub fn user_id(&self) -> Result<UserId, DomainError> {
        UserId::parse(&self.sub)
            .map_err(|_| DomainError::unauthorized("Token subject is not a valid user id"))
    }
}

/// Access and refresh token issued together on login
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Configuration for JWT service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HS256 signing
    pub secret: String,
    pub access_token_minutes: u64,
    pub refresh_token_hours: u64,
}

impl JwtConfig {
    pub fn new(
        secret: impl Into<String>,
        access_token_minutes: u64,
        refresh_token_hours: u64,
    ) -> Self {
        Self {
            secret: secret.into(),
            access_token_minutes,
            refresh_token_hours,
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_token_minutes: 5,
            refresh_token_hours: 24,
        }
    }
}

/// Trait for JWT operations
pub trait JwtGenerator: Send + Sync + Debug {
    /// Issue an access/refresh pair for a user
    fn issue_pair(&self, user: &User) -> Result<TokenPair, DomainError>;

    /// Issue a single access token
    fn issue_access(&self, user: &User) -> Result<String, DomainError>;

    /// Validate a token of the expected type and return its claims
    fn validate(&self, token: &str, expected: TokenType) -> Result<JwtClaims, DomainError>;
}

/// JWT service implementation using a shared secret
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_minutes", &self.config.access_token_minutes)
            .field("refresh_token_hours", &self.config.refresh_token_hours)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn lifetime(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => Duration::minutes(self.config.access_token_minutes as i64),
            TokenType::Refresh => Duration::hours(self.config.refresh_token_hours as i64),
        }
    }

    fn sign(&self, user: &User, token_type: TokenType) -> Result<String, DomainError> {
        let claims = JwtClaims::new(user, token_type, self.lifetime(token_type));

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))
    }
}

impl JwtGenerator for JwtService {
    fn issue_pair(&self, user: &User) -> Result<TokenPair, DomainError> {
        Ok(TokenPair {
            access: self.sign(user, TokenType::Access)?,
            refresh: self.sign(user, TokenType::Refresh)?,
        })
    }

    fn issue_access(&self, user: &User) -> Result<String, DomainError> {
        self.sign(user, TokenType::Access)
    }

    fn validate(&self, token: &str, expected: TokenType) -> Result<JwtClaims, DomainError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| DomainError::unauthorized(format!("Invalid token: {}", e)))?
            .claims;

        if claims.token_type != expected {
            return Err(DomainError::unauthorized("Token has wrong type"));
        }

        Ok(claims)
    }
}
