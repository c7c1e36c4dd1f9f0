//! Authentication API endpoints
//!
//! Token pair issuing, access token refresh and current user lookup.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::User;
use crate::infrastructure::auth::{TokenPair, TokenType};

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/token", post(obtain_token))
        .route("/refresh", post(refresh_token))
        .route("/me", get(get_current_user))
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// User response (safe to expose)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    pub last_login_at: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            status: user.status().as_str().to_string(),
            created_at: user.created_at().to_rfc3339(),
            updated_at: user.updated_at().to_rfc3339(),
            last_login_at: user.last_login_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// POST /api/token
///
/// Exchange credentials for an access/refresh token pair.
pub async fn obtain_token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let user = state
        .user_service
        .authenticate(&request.username, &request.password)
        .await?
        .ok_or_else(|| {
            ApiError::unauthorized("No active account found with the given credentials")
        })?;

    debug!(user_id = %user.id(), "Issuing token pair");

    Ok(Json(state.jwt_service.issue_pair(&user)?))
}

/// POST /api/refresh
///
/// Exchange a refresh token for a new access token.
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let claims = state
        .jwt_service
        .validate(&request.refresh, TokenType::Refresh)
        .map_err(|_| ApiError::unauthorized("Token is invalid or expired"))?;

    let user = state
        .user_service
        .get(&claims.user_id()?)
        .await?
        .filter(User::is_active)
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    debug!(user_id = %user.id(), "Refreshing access token");

    Ok(Json(RefreshResponse {
        access: state.jwt_service.issue_access(&user)?,
    }))
}

/// GET /api/me
pub async fn get_current_user(RequireUser(user): RequireUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}
