//! CLI module for the weekly scheduler
//!
//! Subcommands:
//! - `serve`: run the HTTP API
//! - `migrate`: apply (or revert) PostgreSQL schema migrations
//! - `create-user`, `suspend-user`, `activate-user`, `set-password`: accounts

pub mod migrate;
pub mod serve;
pub mod user;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Weekly event scheduler - per-user weekly timetables over HTTP
#[derive(Parser)]
#[command(name = "weekscheduler")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,

    /// Apply pending database migrations
    Migrate {
        /// Revert the most recent migration instead
        #[arg(long)]
        revert: bool,
    },

    /// Create a user account
    CreateUser(user::CredentialArgs),

    /// Suspend a user account; its tokens stop working
    SuspendUser(user::UsernameArgs),

    /// Re-activate a suspended user account
    ActivateUser(user::UsernameArgs),

    /// Replace a user's password
    SetPassword(user::CredentialArgs),
}

/// Load `.env` and the layered config, then start logging
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["weekscheduler", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
    }

    #[test]
    fn test_parse_migrate_revert() {
        let cli = Cli::try_parse_from(["weekscheduler", "migrate", "--revert"]).unwrap();
        assert!(matches!(cli.command, Command::Migrate { revert: true }));
    }

    #[test]
    fn test_parse_create_user() {
        let cli = Cli::try_parse_from([
            "weekscheduler",
            "create-user",
            "--username",
            "boris",
            "--password",
            "boris_password",
        ])
        .unwrap();

        match cli.command {
            Command::CreateUser(args) => {
                assert_eq!(args.username, "boris");
                assert_eq!(args.password, "boris_password");
            }
            _ => panic!("expected create-user"),
        }
    }

    #[test]
    fn test_create_user_requires_password() {
        assert!(Cli::try_parse_from(["weekscheduler", "create-user", "--username", "boris"]).is_err());
    }
}
