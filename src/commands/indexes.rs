//! Indexes command - Creates the database indexes and exits.

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;

/// Execute the indexes command
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    db.ensure_indexes().await?;
    tracing::info!("Indexes created");
    Ok(())
}
