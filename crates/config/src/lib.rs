//! laundry-config - 配置加载库

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use thiserror::Error;

use secrecy::Secret;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    // 开发环境: 10, 生产环境: 50
    match std::env::var("APP_ENV").as_deref() {
        Ok("production") => 50,
        _ => 10,
    }
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout_secs() -> u64 {
    30
}

/// JWT 配置
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_issuer() -> String {
    "laundry-auth".to_string()
}

fn default_audience() -> String {
    "laundry-api".to_string()
}

fn default_expires_in() -> u64 {
    3600
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// 订单受理配置
#[derive(Debug, Clone, Deserialize)]
pub struct IntakeConfig {
    /// 发票号唯一约束冲突时的最大重试次数
    #[serde(default = "default_invoice_retry_limit")]
    pub invoice_retry_limit: u32,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            invoice_retry_limit: default_invoice_retry_limit(),
        }
    }
}

fn default_invoice_retry_limit() -> u32 {
    3
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub intake: IntakeConfig,
}

fn default_app_env() -> String {
    "development".to_string()
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 覆盖顺序: `default.toml` < `{APP_ENV}.toml` < `LAUNDRY_` 前缀环境变量（`__` 分隔层级）
    /// < `DATABASE_URL` / `JWT_SECRET`。
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        Ok(Self::figment(config_dir).extract()?)
    }

    pub fn figment(config_dir: &str) -> Figment {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("LAUNDRY_").split("__"))
            .merge(
                Env::raw()
                    .only(&["database_url", "jwt_secret", "app_env"])
                    .map(|key| match key.as_str() {
                        "database_url" => "database.url".into(),
                        "jwt_secret" => "jwt.secret".into(),
                        _ => key.into(),
                    }),
            )
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}
