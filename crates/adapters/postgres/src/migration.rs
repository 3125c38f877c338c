//! 嵌入式 schema 迁移
//!
//! 迁移脚本随服务二进制发布（`include_str!`），启动时按版本升序执行。
//! 已执行版本记录在 `_schema_migrations`，脚本内容以 SHA-256 校验，
//! 发布后被改动的脚本会使启动失败。

use laundry_errors::{AppError, AppResult};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::{info, warn};

const MIGRATION_TABLE: &str = "_schema_migrations";

/// 多实例同时启动时串行化迁移的咨询锁键
const MIGRATION_LOCK_KEY: i64 = 0x4c41_554e_4452_59;

fn db_error(step: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |e| AppError::database(format!("{step}: {e}"))
}

/// 单个迁移脚本
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub name: String,
    pub sql: String,
    pub checksum: String,
}

impl Migration {
    pub fn new(version: i64, name: impl Into<String>, sql: impl Into<String>) -> Self {
        let sql = sql.into();
        Self {
            version,
            name: name.into(),
            checksum: hex::encode(Sha256::digest(sql.as_bytes())),
            sql,
        }
    }
}

/// 一次 `migrate` 的结果
#[derive(Debug, Clone, Default)]
pub struct MigrationResult {
    pub applied: Vec<i64>,
    pub skipped: Vec<i64>,
    pub errors: Vec<MigrationError>,
}

#[derive(Debug, Clone)]
pub struct MigrationError {
    pub version: i64,
    pub name: String,
    pub error: String,
}

impl MigrationResult {
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    /// 有失败时转换为错误
    pub fn into_result(self) -> AppResult<Self> {
        match self.errors.first() {
            None => Ok(self),
            Some(first) => Err(AppError::internal(format!(
                "Migration {} ({}) failed: {}",
                first.version, first.name, first.error
            ))),
        }
    }

    fn fail(&mut self, migration: &Migration, error: impl Into<String>) {
        self.errors.push(MigrationError {
            version: migration.version,
            name: migration.name.clone(),
            error: error.into(),
        });
    }
}

pub struct MigrationManager {
    pool: PgPool,
}

impl MigrationManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn init(&self) -> AppResult<()> {
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {MIGRATION_TABLE} (
                version BIGINT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                checksum CHAR(64) NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )"
        ))
        .execute(&self.pool)
        .await
        .map_err(db_error("create migration table"))?;
        Ok(())
    }

    /// 已执行的 (version, checksum)，按版本升序
    pub async fn applied_versions(&self) -> AppResult<Vec<(i64, String)>> {
        sqlx::query_as(&format!(
            "SELECT version, checksum FROM {MIGRATION_TABLE} ORDER BY version"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("load applied migrations"))
    }

    /// 在单个事务内执行脚本并登记版本；返回 false 表示其他实例已先执行
    pub async fn apply(&self, migration: &Migration) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin migration"))?;

        // 锁随事务结束释放
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(db_error("acquire migration lock"))?;

        let already: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS (SELECT 1 FROM {MIGRATION_TABLE} WHERE version = $1)"
        ))
        .bind(migration.version)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("check migration"))?;

        if already {
            warn!(version = migration.version, "Migration applied by another instance");
            return Ok(false);
        }

        let step = format!("apply migration {}", migration.version);
        sqlx::raw_sql(&migration.sql)
            .execute(&mut *tx)
            .await
            .map_err(db_error(&step))?;

        sqlx::query(&format!(
            "INSERT INTO {MIGRATION_TABLE} (version, name, checksum) VALUES ($1, $2, $3)"
        ))
        .bind(migration.version)
        .bind(&migration.name)
        .bind(&migration.checksum)
        .execute(&mut *tx)
        .await
        .map_err(db_error("record migration"))?;

        tx.commit().await.map_err(db_error("commit migration"))?;

        info!(version = migration.version, name = %migration.name, "Migration applied");
        Ok(true)
    }

    /// 执行所有未执行的迁移；遇到第一个失败即停止
    pub async fn migrate(&self, migrations: &[Migration]) -> AppResult<MigrationResult> {
        self.init().await?;
        let applied = self.applied_versions().await?;

        let mut pending: Vec<&Migration> = migrations.iter().collect();
        pending.sort_by_key(|m| m.version);

        let mut result = MigrationResult::default();
        for migration in pending {
            match verify(&applied, migration) {
                Some(Ok(())) => {
                    result.skipped.push(migration.version);
                    continue;
                }
                Some(Err(mismatch)) => {
                    result.fail(migration, mismatch);
                    continue;
                }
                None => {}
            }

            match self.apply(migration).await {
                Ok(true) => result.applied.push(migration.version),
                Ok(false) => result.skipped.push(migration.version),
                Err(e) => {
                    result.fail(migration, e.to_string());
                    break;
                }
            }
        }

        Ok(result)
    }
}

/// 已执行版本的校验：None 表示尚未执行
fn verify(applied: &[(i64, String)], migration: &Migration) -> Option<Result<(), String>> {
    applied
        .iter()
        .find(|(version, _)| *version == migration.version)
        .map(|(_, checksum)| {
            if *checksum == migration.checksum {
                Ok(())
            } else {
                Err("checksum mismatch, script changed after it was applied".to_string())
            }
        })
}
