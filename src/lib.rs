//! Weekly event scheduler API
//!
//! Users keep a personal weekly timetable of events. Every event belongs to
//! the user who created it and is visible and mutable only by that user.
//! Authentication uses JWT access/refresh token pairs.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::{AppState, EventServiceTrait, UserServiceTrait};
use infrastructure::{
    auth::{JwtConfig, JwtService},
    event::{EventService, InMemoryEventRepository, PostgresEventRepository},
    storage::{connect_pool, migrations::run_schema_migrations, StorageType},
    user::{
        Argon2Hasher, CreateUserRequest, InMemoryUserRepository, PostgresUserRepository,
        UserService,
    },
};
use tracing::{info, warn};
use uuid::Uuid;

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let backend = StorageType::parse(&config.storage.backend).ok_or_else(|| {
        anyhow::anyhow!("Unknown storage backend '{}'", config.storage.backend)
    })?;

    info!(backend = ?backend, "Storage backend selected");

    let hasher = Arc::new(Argon2Hasher::new());

    let (user_service, event_service): (Arc<dyn UserServiceTrait>, Arc<dyn EventServiceTrait>) =
        match backend {
            StorageType::InMemory => (
                Arc::new(UserService::new(
                    Arc::new(InMemoryUserRepository::new()),
                    hasher,
                )),
                Arc::new(EventService::new(Arc::new(InMemoryEventRepository::new()))),
            ),
            StorageType::Postgres => {
                let pool = connect_pool(&config.database).await?;

                if config.storage.run_migrations {
                    run_schema_migrations(&pool).await?;
                }

                (
                    Arc::new(UserService::new(
                        Arc::new(PostgresUserRepository::new(pool.clone())),
                        hasher,
                    )),
                    Arc::new(EventService::new(Arc::new(PostgresEventRepository::new(pool)))),
                )
            }
        };

    let jwt_service = Arc::new(JwtService::new(jwt_config(config)));

    if let Some(bootstrap) = &config.auth.bootstrap_user {
        create_bootstrap_user(user_service.as_ref(), &bootstrap.username, &bootstrap.password)
            .await?;
    }

    Ok(AppState::new(user_service, event_service, jwt_service))
}

/// Signing secret from config, then `JWT_SECRET`, then a random per-process one
fn jwt_config(config: &AppConfig) -> JwtConfig {
    let secret = config
        .auth
        .jwt_secret
        .clone()
        .or_else(|| std::env::var("JWT_SECRET").ok())
        .unwrap_or_else(|| {
            warn!(
                "No auth.jwt_secret or JWT_SECRET configured. Generating random secret; \
                 issued tokens will NOT survive a restart."
            );
            format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
        });

    JwtConfig::new(
        secret,
        config.auth.access_token_minutes,
        config.auth.refresh_token_hours,
    )
}

/// Create the configured account when the user store is empty
async fn create_bootstrap_user(
    user_service: &dyn UserServiceTrait,
    username: &str,
    password: &str,
) -> anyhow::Result<()> {
    if user_service.count().await? > 0 {
        return Ok(());
    }

    let user = user_service
        .create(CreateUserRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
        .await?;

    info!(username = %user.username(), "Created bootstrap user");
    Ok(())
}
