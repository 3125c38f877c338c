//! PostgreSQL 连接管理

use std::str::FromStr;
use std::time::Duration;

use laundry_errors::{AppError, AppResult};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

/// 连接池参数
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    /// 出现在 pg_stat_activity 中，便于按服务定位连接
    pub application_name: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>, application_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            application_name: application_name.into(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }

    pub fn with_pool_size(mut self, min: u32, max: u32) -> Self {
        self.max_connections = max.max(1);
        self.min_connections = min.min(self.max_connections);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// URL 格式错误属于配置问题，不应进入连接重试
    pub fn connect_options(&self) -> AppResult<PgConnectOptions> {
        PgConnectOptions::from_str(&self.url)
            .map(|opts| opts.application_name(&self.application_name))
            .map_err(|e| AppError::internal(format!("Invalid database URL: {}", e)))
    }
}

/// 创建 PostgreSQL 连接池
pub async fn create_pool(config: &PostgresConfig, options: PgConnectOptions) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(config.idle_timeout)
        .connect_with(options)
        .await
        .map_err(|e| AppError::database(format!("Failed to create pool: {}", e)))
}

/// 检查数据库连接
pub async fn check_connection(pool: &PgPool) -> AppResult<()> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database(format!("Database health check failed: {}", e)))?;
    Ok(())
}
