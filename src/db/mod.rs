use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::error::{AppError, AppResult};

/// Connect to Postgres and bring the truck schema up to date
pub async fn connect(database_url: &str) -> AppResult<DatabaseConnection> {
    let db = Database::connect(database_url)
        .await
        .map_err(|e| AppError::Config(format!("Failed to connect to database: {}", e)))?;

    migration::Migrator::up(&db, None).await?;
    tracing::info!("Migrations complete");

    Ok(db)
}
