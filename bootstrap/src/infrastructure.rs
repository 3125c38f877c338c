//! 基础设施资源管理

use std::sync::Arc;
use std::time::Duration;

use laundry_adapter_postgres::{PostgresConfig, check_connection, create_pool};
use laundry_auth_core::TokenService;
use laundry_config::AppConfig;
use laundry_errors::AppResult;
use laundry_telemetry::HealthStatus;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

use crate::retry::{RetryPolicy, with_retry};

/// 基础设施资源容器
#[derive(Clone)]
pub struct Infrastructure {
    config: AppConfig,
    postgres_pool: PgPool,
    token_service: Arc<TokenService>,
}

impl Infrastructure {
    /// 从配置创建基础设施资源（数据库连接带重试）
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let retry_policy = RetryPolicy::default();

        let pg_config = PostgresConfig::new(config.database.url.expose_secret(), &config.app_name)
            .with_pool_size(config.database.min_connections, config.database.max_connections)
            .with_connect_timeout(Duration::from_secs(config.database.connect_timeout_secs));
        let connect_options = pg_config.connect_options()?;
        let postgres_pool = with_retry(&retry_policy, "postgres", || {
            create_pool(&pg_config, connect_options.clone())
        })
        .await?;
        info!(
            "PostgreSQL connection pool created (max_connections: {})",
            config.database.max_connections
        );

        let token_service = Arc::new(TokenService::new(
            config.jwt.secret.expose_secret(),
            config.jwt.expires_in as i64,
            config.jwt.issuer.clone(),
            config.jwt.audience.clone(),
        ));

        Ok(Self {
            config,
            postgres_pool,
            token_service,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    pub fn token_service(&self) -> Arc<TokenService> {
        self.token_service.clone()
    }

    /// 汇总依赖健康状态
    pub async fn health(&self) -> HealthStatus {
        let mut status = HealthStatus::new();
        match check_connection(&self.postgres_pool).await {
            Ok(()) => status.add_check("postgres", true, None),
            Err(e) => status.add_check("postgres", false, Some(e.to_string())),
        }
        status
    }
}
