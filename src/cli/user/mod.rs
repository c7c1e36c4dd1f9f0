//! Account management commands

use clap::Args;
use tracing::{info, warn};

use crate::infrastructure::storage::StorageType;
use crate::infrastructure::user::CreateUserRequest;

/// Username and password, for `create-user` and `set-password`
#[derive(Debug, Args)]
pub struct CredentialArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct UsernameArgs {
    #[arg(long)]
    pub username: String,
}

async fn app_state() -> anyhow::Result<crate::api::AppState> {
    let config = super::bootstrap()?;

    if StorageType::parse(&config.storage.backend) == Some(StorageType::InMemory) {
        warn!("storage.backend is 'memory'; changes are lost when this command exits");
    }

    crate::create_app_state_with_config(&config).await
}

pub async fn create(args: CredentialArgs) -> anyhow::Result<()> {
    let state = app_state().await?;

    let user = state
        .user_service
        .create(CreateUserRequest {
            username: args.username,
            password: args.password,
        })
        .await?;

    info!(user_id = %user.id(), username = %user.username(), "User created");
    println!("{}", user.id());

    Ok(())
}

pub async fn suspend(args: UsernameArgs) -> anyhow::Result<()> {
    let state = app_state().await?;
    let user = state.user_service.suspend(&args.username).await?;

    info!(user_id = %user.id(), "User suspended");
    Ok(())
}

pub async fn activate(args: UsernameArgs) -> anyhow::Result<()> {
    let state = app_state().await?;
    let user = state.user_service.activate(&args.username).await?;

    info!(user_id = %user.id(), "User activated");
    Ok(())
}

pub async fn set_password(args: CredentialArgs) -> anyhow::Result<()> {
    let state = app_state().await?;
    let user = state
        .user_service
        .set_password(&args.username, &args.password)
        .await?;

    info!(user_id = %user.id(), "Password updated");
    Ok(())
}
