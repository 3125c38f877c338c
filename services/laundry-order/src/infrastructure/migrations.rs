//! 内嵌的数据库迁移

use laundry_adapter_postgres::{Migration, MigrationManager, MigrationResult};
use laundry_errors::AppResult;
use sqlx::PgPool;
use tracing::info;

pub fn migrations() -> Vec<Migration> {
    vec![Migration::new(
        1,
        "init_schema",
        include_str!("../../migrations/0001_init_schema.sql"),
    )]
}

pub async fn run_migrations(pool: &PgPool) -> AppResult<MigrationResult> {
    let result = MigrationManager::new(pool.clone())
        .migrate(&migrations())
        .await?
        .into_result()?;

    info!(applied = result.applied_count(), "Database migrations complete");
    Ok(result)
}
