//! Migrate command - manages the PostgreSQL schema

use tracing::info;

use crate::infrastructure::storage::connect_pool;
use crate::infrastructure::storage::migrations::{Migrator, PostgresMigrator};

pub async fn run(revert: bool) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let pool = connect_pool(&config.database).await?;
    let migrator = PostgresMigrator::new(pool);

    if revert {
        migrator.revert().await?;
    } else {
        migrator.run().await?;
    }

    let version = migrator.version().await?;
    info!(version = ?version, "Schema is at version");

    Ok(())
}
