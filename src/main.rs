use clap::Parser;
use weekscheduler::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Migrate { revert } => cli::migrate::run(revert).await,
        Command::CreateUser(args) => cli::user::create(args).await,
        Command::SuspendUser(args) => cli::user::suspend(args).await,
        Command::ActivateUser(args) => cli::user::activate(args).await,
        Command::SetPassword(args) => cli::user::set_password(args).await,
    }
}
