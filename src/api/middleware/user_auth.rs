//! User authentication extractor using JWT access tokens

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;
use crate::infrastructure::auth::TokenType;

/// Authorization schemes accepted in front of the token
const AUTH_SCHEMES: [&str; 2] = ["Bearer ", "JWT "];

/// Extractor that requires a valid access token
///
/// Reads `Authorization: Bearer <token>` or `Authorization: JWT <token>`.
/// Refresh tokens are rejected, as are tokens of missing or suspended users.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_token(&parts.headers)?;

        let claims = state
            .jwt_service
            .validate(&token, TokenType::Access)
            .map_err(|e| {
                debug!(error = %e, "Rejected access token");
                ApiError::unauthorized("Given token not valid for any token type")
            })?;

        let user = state
            .user_service
            .get(&claims.user_id()?)
            .await?
            .ok_or_else(|| ApiError::unauthorized("User not found"))?;

        if !user.is_active() {
            return Err(ApiError::unauthorized("User account is suspended"));
        }

        Ok(RequireUser(user))
    }
}

/// Extract the token from the Authorization header
pub fn extract_jwt_token(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::unauthorized("Invalid Authorization header encoding"))?;

        let token = AUTH_SCHEMES
            .iter()
            .find_map(|scheme| auth_str.strip_prefix(scheme))
            .map(str::trim)
            .filter(|token| !token.is_empty());

        if let Some(token) = token {
            return Ok(token.to_string());
        }
    }

    Err(ApiError::unauthorized(
        "Authentication credentials were not provided",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        let result = extract_jwt_token(&headers_with("Bearer eyJhbGciOiJIUzI1NiJ9.test"));
        assert_eq!(result.unwrap(), "eyJhbGciOiJIUzI1NiJ9.test");
    }

    #[test]
    fn test_extract_jwt_scheme_token() {
        let result = extract_jwt_token(&headers_with("JWT eyJhbGciOiJIUzI1NiJ9.test"));
        assert_eq!(result.unwrap(), "eyJhbGciOiJIUzI1NiJ9.test");
    }

    #[test]
    fn test_missing_token() {
        let err = extract_jwt_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_invalid_auth_scheme() {
        assert!(extract_jwt_token(&headers_with("Basic dXNlcjpwYXNz")).is_err());
        assert!(extract_jwt_token(&headers_with("Bearer    ")).is_err());
    }

    #[test]
    fn test_trimmed_token() {
        let result = extract_jwt_token(&headers_with("Bearer   token-with-spaces   "));
        assert_eq!(result.unwrap(), "token-with-spaces");
    }
}
